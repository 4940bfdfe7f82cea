//! The public feed-cache contract.
//!
//! [`FeedStore`] composes the repository, the row codec and a read/write
//! gate into the three operations callers see: retrieve, insert, delete.
//! Every operation is an `async fn`; the returned future is the completion
//! and resolves exactly once. There is no cancellation path and no timeout -
//! callers needing bounded latency must impose it externally.

use crate::Database;
use crate::error::Result;
use crate::repo::Repository;
use reel_feed::FeedImage;
use std::path::PathBuf;
use time::UtcDateTime;
use tokio::sync::{OnceCell, RwLock};
use tracing::instrument;

/// Result of retrieving the cached feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieval {
    /// Nothing is cached. Also reported when the cache cannot be opened:
    /// absence of access is indistinguishable from absence of data.
    Empty,
    /// The cached feed (possibly zero records) and its capture timestamp.
    Found { feed: Vec<FeedImage>, timestamp: UtcDateTime },
}

/// Where the cache database lives. Consulted on the first operation only.
enum Location {
    OnDisk(PathBuf),
    InMemory,
}

/// Single-slot persistent cache for one feed snapshot.
///
/// # Concurrency
///
/// One store instance serializes its own operations: `insert` and
/// `delete_cached_feed` hold the write half of an [`RwLock`] (an exclusive
/// barrier), `retrieve` holds the read half and may overlap with other
/// retrievals but never with a write. Tokio's `RwLock` queues waiters in
/// FIFO order, so all operations on one instance observe a single global
/// order and a read issued after a write sees that write's effect.
///
/// Two store instances pointed at the same file do not pass through the
/// same gate and are *not* race-free with respect to each other.
///
/// # Opening
///
/// The database is opened lazily on the first operation, so an unreachable
/// location is a per-operation outcome, not a construction failure. A failed
/// open is not cached; the next operation tries again.
pub struct FeedStore {
    location: Location,
    database: OnceCell<Database>,
    gate: RwLock<()>,
}

impl FeedStore {
    /// A store backed by an SQLite file at `path`.
    ///
    /// The file is created on first use if missing; the parent directory
    /// must exist.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self::with_location(Location::OnDisk(path.into()))
    }

    /// A store backed by an in-memory database. Contents live as long as
    /// this instance. Useful for tests and previews.
    pub fn in_memory() -> Self {
        Self::with_location(Location::InMemory)
    }

    /// A store sharing an already-open [`Database`] handle.
    ///
    /// Used when the cache lives next to other tables, and by tests that
    /// need direct access to the underlying rows.
    pub fn with_database(database: Database) -> Self {
        Self {
            // Never consulted: the cell is already populated.
            location: Location::InMemory,
            database: OnceCell::new_with(Some(database)),
            gate: RwLock::new(()),
        }
    }

    fn with_location(location: Location) -> Self {
        Self {
            location,
            database: OnceCell::new(),
            gate: RwLock::new(()),
        }
    }

    async fn database(&self) -> Result<&Database> {
        self.database
            .get_or_try_init(|| async {
                match &self.location {
                    Location::OnDisk(path) => Database::connect(path).await,
                    Location::InMemory => Database::connect_in_memory().await,
                }
            })
            .await
    }

    /// Retrieve the cached feed.
    ///
    /// Never mutates the store. An engine that cannot be opened reports
    /// [`Retrieval::Empty`]; an engine that opens but holds undecodable
    /// data reports an error.
    #[instrument(skip(self))]
    pub async fn retrieve(&self) -> Result<Retrieval> {
        let _shared = self.gate.read().await;
        let database = match self.database().await {
            Ok(database) => database,
            Err(err) if err.is_open_failure() => return Ok(Retrieval::Empty),
            Err(err) => return Err(err),
        };
        match Repository::from(database).load().await? {
            Some((feed, timestamp)) => Ok(Retrieval::Found { feed, timestamp }),
            None => Ok(Retrieval::Empty),
        }
    }

    /// Cache `feed`/`timestamp`, fully replacing any previous snapshot.
    ///
    /// On failure the previously stored snapshot (if any) is unchanged.
    #[instrument(skip(self, feed), fields(images = feed.len()))]
    pub async fn insert(&self, feed: &[FeedImage], timestamp: UtcDateTime) -> Result<()> {
        let _exclusive = self.gate.write().await;
        let database = self.database().await?;
        Repository::from(database).replace(feed, timestamp).await
    }

    /// Delete the cached feed. Succeeds when the store was already empty.
    #[instrument(skip(self))]
    pub async fn delete_cached_feed(&self) -> Result<()> {
        let _exclusive = self.gate.write().await;
        let database = self.database().await?;
        Repository::from(database).clear().await
    }
}
