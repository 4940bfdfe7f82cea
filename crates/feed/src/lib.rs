//! Domain model for the reel image feed.
//!
//! This crate owns the `FeedImage` value type that the rest of the system
//! passes around. It deliberately contains no behavior beyond construction:
//! parsing, persistence and presentation all live in their own crates and
//! treat these types as opaque values.

mod image;

pub use crate::image::FeedImage;
