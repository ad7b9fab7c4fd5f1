use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time in Unix milliseconds.
///
/// A clock set before the Unix epoch reads as `0`.
#[must_use]
pub fn now_ms() -> u64 {
    timestamp(SystemTime::now())
}

/// Converts a [`SystemTime`] to Unix milliseconds.
///
/// Times before the epoch saturate to `0`; times past `u64::MAX`
/// milliseconds saturate to `u64::MAX`. Neither fits a ULID, and
/// [`Ulid::new`] rejects the latter with [`Error::BigTime`].
///
/// [`Ulid::new`]: crate::Ulid::new
/// [`Error::BigTime`]: crate::Error::BigTime
#[must_use]
pub fn timestamp(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Converts Unix milliseconds to a [`SystemTime`].
#[must_use]
pub fn system_time(ms: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(ms)
}
