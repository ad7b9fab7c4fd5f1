/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `rulid` can produce.
///
/// Every codec and generator operation returns its error directly to the
/// caller. Nothing is retried internally, and no partially built [`Ulid`] is
/// ever handed out alongside an error.
///
/// [`Ulid`]: crate::Ulid
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested timestamp does not fit in 48 bits.
    #[error("ulid: time too big ({ms} > {max})", max = crate::Ulid::MAX_TIME)]
    BigTime {
        /// The rejected timestamp in milliseconds.
        ms: u64,
    },

    /// An input buffer or string has the wrong length for its format.
    #[error("ulid: bad data size when unmarshaling (expected {expected}, got {actual})")]
    DataSize {
        /// Required length.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// An output buffer has the wrong length for its format.
    #[error("ulid: bad buffer size when marshaling (expected {expected}, got {actual})")]
    BufferSize {
        /// Required length.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// Strict text decoding hit a byte outside the Crockford alphabet.
    #[error("ulid: bad data characters when unmarshaling (byte {byte:#04x} at index {index})")]
    InvalidCharacters {
        /// The offending byte.
        byte: u8,
        /// Its position in the input.
        index: usize,
    },

    /// The first encoded symbol is larger than 7, so the text would need
    /// more than 128 bits.
    #[error("ulid: overflow when unmarshaling")]
    Overflow,

    /// Incrementing the previous entropy within the same millisecond would
    /// exceed 80 bits.
    ///
    /// This is an expected condition at very high generation rates. Callers
    /// either wait for the next millisecond or fall back to fresh,
    /// non-monotonic entropy.
    #[error("ulid: monotonic entropy overflow")]
    MonotonicOverflow,

    /// The underlying random source failed to produce bytes.
    #[error("ulid: entropy source failed: {reason}")]
    EntropySource {
        /// Description reported by the source.
        reason: String,
    },

    /// A shared generator's lock was poisoned by a panicking thread.
    ///
    /// With the `parking-lot` feature, mutexes do not poison and this variant
    /// is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("ulid: entropy lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = Error::InvalidCharacters {
            byte: b'!',
            index: 6,
        };
        assert_eq!(
            err.to_string(),
            "ulid: bad data characters when unmarshaling (byte 0x21 at index 6)"
        );

        let err = Error::DataSize {
            expected: 26,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "ulid: bad data size when unmarshaling (expected 26, got 3)"
        );

        let err = Error::BigTime { ms: 1 << 48 };
        assert_eq!(
            err.to_string(),
            "ulid: time too big (281474976710656 > 281474976710655)"
        );
    }
}
