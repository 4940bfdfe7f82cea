//! Cache Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Every failure an operation can hit maps onto one of
//! the kinds below; nothing is thrown across the async boundary and nothing
//! is retried on the caller's behalf.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The storage engine could not be opened at all (bad location,
    /// permissions). [`FeedStore::retrieve`](crate::FeedStore::retrieve)
    /// masks this as an empty cache; mutating operations surface it.
    #[display("cache database could not be opened")]
    Open,
    /// Schema setup failed while opening. Same masking class as [`Open`](Self::Open).
    #[display("cache schema migration error")]
    Migration,
    /// A query or transaction failed against an engine that did open.
    /// The previously stored snapshot, if any, is unchanged.
    #[display("cache database error")]
    Database,
    /// A persisted record failed to decode back into its domain type.
    /// The whole snapshot is considered unreadable, never partially returned.
    #[display("invalid cached data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if the failure belongs to the open-path class that
    /// `retrieve` reports as an empty cache.
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Self::Open | Self::Migration)
    }
}
