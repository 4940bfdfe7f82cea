use url::Url;
use uuid::Uuid;

/// A single image in the feed.
///
/// Immutable value type: equality is structural and there is no identity
/// beyond the `id` field. The `id` and `url` fields are strict domain types;
/// anything that persists a `FeedImage` as strings is responsible for
/// re-parsing them on the way back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedImage {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Url,
}

impl FeedImage {
    pub fn new(id: Uuid, description: Option<String>, location: Option<String>, url: Url) -> Self {
        Self { id, description, location, url }
    }
}

impl AsRef<FeedImage> for FeedImage {
    fn as_ref(&self) -> &FeedImage {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_structural() {
        let id = Uuid::new_v4();
        let url = Url::parse("https://images.example/1.jpg").unwrap();
        let a = FeedImage::new(id, Some("desc".to_string()), None, url.clone());
        let b = FeedImage::new(id, Some("desc".to_string()), None, url.clone());
        let c = FeedImage::new(id, None, None, url);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
