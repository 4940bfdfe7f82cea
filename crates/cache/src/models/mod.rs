mod image;
mod snapshot;

pub(crate) use self::image::ImageRow;
pub(crate) use self::snapshot::SnapshotRow;
