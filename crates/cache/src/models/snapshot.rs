use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use time::UtcDateTime;

/// Persisted form of the singleton snapshot row.
///
/// Only the capture timestamp lives here; the fixed key is baked into the
/// SQL. The timestamp is stored as unix nanoseconds so it round-trips with
/// full sub-second precision.
#[derive(sqlx::FromRow)]
pub(crate) struct SnapshotRow {
    pub(crate) cached_at: i64,
}

impl TryFrom<&UtcDateTime> for SnapshotRow {
    type Error = Error;
    fn try_from(timestamp: &UtcDateTime) -> Result<Self, Self::Error> {
        // i64 nanoseconds covers 1678..2262; out of that range is a caller bug.
        Ok(Self {
            cached_at: i64::try_from(timestamp.unix_timestamp_nanos())
                .or_raise(|| ErrorKind::InvalidData("timestamp"))?,
        })
    }
}
impl TryFrom<SnapshotRow> for UtcDateTime {
    type Error = Error;
    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        UtcDateTime::from_unix_timestamp_nanos(i128::from(row.cached_at))
            .or_raise(|| ErrorKind::InvalidData("timestamp"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip_keeps_nanoseconds() {
        let timestamp = UtcDateTime::now().replace_nanosecond(123_456_789).unwrap();
        let row = SnapshotRow::try_from(&timestamp).unwrap();
        assert_eq!(UtcDateTime::try_from(row).unwrap(), timestamp);
    }

    #[test]
    fn test_decode_of_epoch_is_valid() {
        let row = SnapshotRow { cached_at: 0 };
        assert_eq!(UtcDateTime::try_from(row).unwrap(), UtcDateTime::UNIX_EPOCH);
    }
}
