//! SQLite-backed single-slot cache for the reel image feed.
//!
//! This crate persists exactly one feed snapshot: an ordered list of
//! [`FeedImage`](reel_feed::FeedImage) records plus the timestamp it was
//! captured at. Callers replace the whole snapshot atomically, read it
//! back, or clear it - there is no partial update and no second slot.
//!
//! # Architecture
//! - [`Database`]: connection pool management, schema migrations.
//! - [`Repository`]: the transactional read/replace/clear operations
//!   against the singleton snapshot row and its owned image records.
//! - `models` (private): row proxy types that encode domain values into
//!   persistable strings and validate them on the way back out.
//! - [`FeedStore`]: the public contract. Serializes writes against reads
//!   through a read/write gate and fixes the failure policy (a cache that
//!   cannot be opened retrieves as empty; one that holds undecodable data
//!   retrieves as an error).

mod db;
pub mod error;
mod models;
mod repo;
mod store;

pub use crate::db::Database;
pub use crate::repo::Repository;
pub use crate::store::{FeedStore, Retrieval};
