use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use reel_feed::FeedImage;
use url::Url;
use uuid::Uuid;

/// Persisted form of a [`FeedImage`].
///
/// The strict domain types (`Uuid`, `Url`) are stored as plain strings.
/// Encoding is total; decoding re-parses them and fails with
/// [`ErrorKind::InvalidData`] when a stored string no longer parses, which
/// makes the whole snapshot unreadable rather than silently dropping the
/// record.
#[derive(sqlx::FromRow)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct ImageRow {
    pub(crate) image_id: String,
    pub(crate) description: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) url: String,
}

impl From<&FeedImage> for ImageRow {
    fn from(image: &FeedImage) -> Self {
        Self {
            image_id: image.id.to_string(),
            description: image.description.clone(),
            location: image.location.clone(),
            url: image.url.to_string(),
        }
    }
}
impl TryFrom<ImageRow> for FeedImage {
    type Error = Error;
    fn try_from(row: ImageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&row.image_id).or_raise(|| ErrorKind::InvalidData("image id"))?,
            description: row.description,
            location: row.location,
            url: Url::parse(&row.url).or_raise(|| ErrorKind::InvalidData("image url"))?,
        })
    }
}
