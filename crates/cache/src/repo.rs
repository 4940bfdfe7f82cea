//! Repository for the cached feed snapshot.
//!
//! One logical row lives here: the current snapshot (fixed key `0`) and its
//! owned image records. Replacement is delete-then-insert inside a single
//! transaction, so the only states an observer can see are "old snapshot" and
//! "new snapshot" - never a mix, and a failed replace leaves the old one in
//! place.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{ImageRow, SnapshotRow};
use exn::ResultExt;
use reel_feed::FeedImage;
use sqlx::SqlitePool;
use time::UtcDateTime;

/// Repository for the singleton feed snapshot.
///
/// All operations run against the pool of an already-open [`Database`];
/// serialization of writers is the caller's concern (see
/// [`FeedStore`](crate::FeedStore)).
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Atomically replace whatever snapshot is stored with `feed`/`timestamp`.
    ///
    /// Deletes the existing singleton row (image records cascade) and inserts
    /// the new one in the same transaction. Insertion order of `feed` is
    /// preserved via the `position` column.
    pub async fn replace(&self, feed: &[FeedImage], timestamp: UtcDateTime) -> Result<()> {
        let snapshot = SnapshotRow::try_from(&timestamp)?;
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        sqlx::query(include_str!("../queries/delete_snapshot.sql"))
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        sqlx::query(include_str!("../queries/insert_snapshot.sql"))
            .bind(snapshot.cached_at)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        for (position, image) in feed.iter().enumerate() {
            let row = ImageRow::from(image);
            sqlx::query(include_str!("../queries/insert_image.sql"))
                .bind(i64::try_from(position).or_raise(|| ErrorKind::InvalidData("position"))?)
                .bind(row.image_id)
                .bind(row.description)
                .bind(row.location)
                .bind(row.url)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Load the stored snapshot, or `None` if the cache has never been
    /// populated (or was cleared).
    ///
    /// Both queries run inside one read transaction so a writer on another
    /// handle cannot interleave between them. A record that fails to decode
    /// makes the whole load fail with [`ErrorKind::InvalidData`].
    pub async fn load(&self) -> Result<Option<(Vec<FeedImage>, UtcDateTime)>> {
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        let snapshot: Option<SnapshotRow> = sqlx::query_as(include_str!("../queries/load_snapshot.sql"))
            .fetch_optional(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let Some(snapshot) = snapshot else {
            return Ok(None);
        };
        let rows: Vec<ImageRow> = sqlx::query_as(include_str!("../queries/load_images.sql"))
            .fetch_all(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        // Read-only transaction; dropping it rolls back without a commit.
        drop(tx);
        let timestamp = UtcDateTime::try_from(snapshot)?;
        let feed = rows.into_iter().map(FeedImage::try_from).collect::<Result<Vec<_>>>()?;
        Ok(Some((feed, timestamp)))
    }

    /// Delete the stored snapshot and its image records.
    ///
    /// A no-op success when the cache is already empty.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query(include_str!("../queries/delete_snapshot.sql"))
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use uuid::Uuid;

    fn make_test_feed(count: usize, marker: &str) -> Vec<FeedImage> {
        (0..count)
            .map(|n| {
                FeedImage::new(
                    Uuid::new_v4(),
                    Some(format!("{marker} #{n}")),
                    None,
                    Url::parse(&format!("https://images.example/{marker}/{n}.jpg")).unwrap(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_load_on_fresh_database_is_none() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_then_load_round_trips_in_order() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        let feed = make_test_feed(3, "first");
        let timestamp = UtcDateTime::now();
        repo.replace(&feed, timestamp).await.unwrap();
        let (loaded, loaded_at) = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, feed);
        assert_eq!(loaded_at, timestamp);
    }

    #[tokio::test]
    async fn test_replace_supersedes_previous_snapshot() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        let first = make_test_feed(3, "first");
        repo.replace(&first, UtcDateTime::now()).await.unwrap();
        // Shared identifier between generations must not cause a merge.
        let mut second = make_test_feed(2, "second");
        second[0].id = first[0].id;
        let timestamp = UtcDateTime::now();
        repo.replace(&second, timestamp).await.unwrap();
        let (loaded, loaded_at) = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, second);
        assert_eq!(loaded_at, timestamp);
    }

    #[tokio::test]
    async fn test_empty_feed_is_stored_not_absent() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        let timestamp = UtcDateTime::now();
        repo.replace(&[], timestamp).await.unwrap();
        let (loaded, loaded_at) = repo.load().await.unwrap().unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded_at, timestamp);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        repo.clear().await.unwrap();
        repo.replace(&make_test_feed(2, "feed"), UtcDateTime::now()).await.unwrap();
        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
        repo.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_removes_owned_image_records() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        repo.replace(&make_test_feed(4, "feed"), UtcDateTime::now()).await.unwrap();
        repo.clear().await.unwrap();
        let (orphans,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM snapshot_images").fetch_one(db.pool()).await.unwrap();
        assert_eq!(orphans, 0, "image records must not outlive their snapshot");
    }

    #[tokio::test]
    async fn test_load_fails_on_undecodable_record() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        repo.replace(&make_test_feed(1, "feed"), UtcDateTime::now()).await.unwrap();
        sqlx::query("UPDATE snapshot_images SET image_id = 'corrupted'")
            .execute(db.pool())
            .await
            .unwrap();
        let err = repo.load().await.unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidData("image id")));
    }
}
