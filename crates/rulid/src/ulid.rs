use core::{cmp::Ordering, fmt, ops, str};
use std::time::SystemTime;

use crate::{
    Error, Result, U80,
    base32::{self, BINARY_LEN, ENCODED_LEN},
    rand::{Entropy, MonotonicSource, RandSource},
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A 128-bit Universally Unique Lexicographically Sortable Identifier.
///
/// ```text
///  Bit Index:  127            80 79            0
///              +----------------+--------------+
///  Field:      | timestamp (48) | entropy (80) |
///              +----------------+--------------+
///              |<-- MSB -- 128 bits -- LSB --->|
/// ```
///
/// Both fields are stored big-endian, so comparing the raw bytes orders
/// identifiers by timestamp first and entropy second. The text form keeps
/// that order as plain string order.
///
/// # Example
///
/// ```
/// use rulid::{Entropy, ThreadRandom, Ulid};
///
/// let mut rng = ThreadRandom;
/// let id = Ulid::new(rulid::now_ms(), Entropy::Random(&mut rng))?;
/// let text = id.to_string();
/// assert_eq!(text.len(), 26);
/// assert_eq!(text.parse::<Ulid>()?, id);
/// # Ok::<(), rulid::Error>(())
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Ulid([u8; BINARY_LEN]);

impl Ulid {
    /// The all-zero identifier, used as the "unset" sentinel. It is a valid
    /// identifier, not an error state.
    pub const ZERO: Self = Self([0; BINARY_LEN]);

    /// Alias of [`Ulid::ZERO`].
    pub const NIL: Self = Self::ZERO;

    /// The largest identifier, `7ZZZZZZZZZZZZZZZZZZZZZZZZZ`.
    pub const MAX: Self = Self([0xFF; BINARY_LEN]);

    /// The largest timestamp a ULID can hold, `2^48 - 1` milliseconds.
    pub const MAX_TIME: u64 = (1 << 48) - 1;

    /// Length of the text encoding.
    pub const ENCODED_LEN: usize = ENCODED_LEN;

    /// Length of the binary encoding.
    pub const BINARY_LEN: usize = BINARY_LEN;

    /// Length of the entropy field in bytes.
    pub const ENTROPY_LEN: usize = U80::BYTES;

    /// Creates a ULID from a Unix millisecond timestamp and an entropy
    /// source.
    ///
    /// - [`Entropy::Monotonic`] fills the entropy field through
    ///   [`MonotonicSource::fill_monotonic`] for `ms`.
    /// - [`Entropy::Random`] performs a plain byte read.
    /// - [`Entropy::None`] leaves the entropy field zeroed.
    ///
    /// Safety for concurrent use depends only on the source.
    ///
    /// # Errors
    ///
    /// - [`Error::BigTime`] if `ms` exceeds [`Ulid::MAX_TIME`].
    /// - Any error the entropy source reports, e.g.
    ///   [`Error::MonotonicOverflow`].
    ///
    /// # Example
    ///
    /// ```
    /// use rulid::{Entropy, Ulid};
    ///
    /// let id = Ulid::new(0, Entropy::None)?;
    /// assert!(id.is_zero());
    /// # Ok::<(), rulid::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(entropy)))]
    pub fn new(ms: u64, entropy: Entropy<'_>) -> Result<Self> {
        let id = Self::ZERO.with_time(ms)?;
        let mut buf = [0_u8; U80::BYTES];
        match entropy {
            Entropy::None => return Ok(id),
            Entropy::Random(src) => src.fill_bytes(&mut buf)?,
            Entropy::Monotonic(src) => src.fill_monotonic(ms, &mut buf)?,
        }
        Ok(id.with_entropy_bytes(buf))
    }

    /// Creates a ULID from a timestamp and a plain random source.
    ///
    /// Shorthand for `Ulid::new(ms, Entropy::Random(rng))`.
    ///
    /// # Errors
    ///
    /// See [`Ulid::new`].
    pub fn with_rng<R: RandSource + ?Sized>(ms: u64, rng: &mut R) -> Result<Self> {
        let id = Self::ZERO.with_time(ms)?;
        let mut buf = [0_u8; U80::BYTES];
        rng.fill_bytes(&mut buf)?;
        Ok(id.with_entropy_bytes(buf))
    }

    /// Creates a ULID from a timestamp and a monotonic source.
    ///
    /// Shorthand for `Ulid::new(ms, Entropy::Monotonic(src))`.
    ///
    /// # Errors
    ///
    /// See [`Ulid::new`].
    pub fn with_monotonic<M: MonotonicSource + ?Sized>(ms: u64, src: &mut M) -> Result<Self> {
        let id = Self::ZERO.with_time(ms)?;
        let mut buf = [0_u8; U80::BYTES];
        src.fill_monotonic(ms, &mut buf)?;
        Ok(id.with_entropy_bytes(buf))
    }

    /// Assembles a ULID from a timestamp and an 80-bit entropy value.
    ///
    /// # Errors
    ///
    /// [`Error::BigTime`] if `ms` exceeds [`Ulid::MAX_TIME`].
    pub fn from_parts(ms: u64, entropy: U80) -> Result<Self> {
        Ok(Self::ZERO
            .with_time(ms)?
            .with_entropy_bytes(entropy.to_be_bytes()))
    }

    /// Wraps 16 raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; BINARY_LEN]) -> Self {
        Self(bytes)
    }

    /// Copies a ULID out of a byte slice.
    ///
    /// # Errors
    ///
    /// [`Error::DataSize`] if `data` is not exactly 16 bytes long.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let bytes: [u8; BINARY_LEN] = data.try_into().map_err(|_| Error::DataSize {
            expected: BINARY_LEN,
            actual: data.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Parses a text-encoded ULID without validating the alphabet.
    ///
    /// Bytes outside the alphabet are not rejected and produce an undefined
    /// identifier. Use [`Ulid::parse_strict`] to reject them.
    ///
    /// # Errors
    ///
    /// - [`Error::DataSize`] if `text` is not 26 bytes long.
    /// - [`Error::Overflow`] if the first symbol exceeds 7.
    pub fn parse(text: &str) -> Result<Self> {
        base32::decode(text.as_bytes(), false).map(Self)
    }

    /// Parses a text-encoded ULID, rejecting any byte outside the Crockford
    /// alphabet. Decoding is case-insensitive.
    ///
    /// # Errors
    ///
    /// - [`Error::DataSize`] if `text` is not 26 bytes long.
    /// - [`Error::InvalidCharacters`] on a byte outside the alphabet.
    /// - [`Error::Overflow`] if the first symbol exceeds 7.
    pub fn parse_strict(text: &str) -> Result<Self> {
        base32::decode(text.as_bytes(), true).map(Self)
    }

    /// Returns a reference to the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BINARY_LEN] {
        &self.0
    }

    /// Returns a copy of the underlying bytes.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; BINARY_LEN] {
        self.0
    }

    /// Writes the binary encoding into `dst`.
    ///
    /// # Errors
    ///
    /// [`Error::BufferSize`] if `dst` is not exactly 16 bytes long.
    pub fn write_bytes(&self, dst: &mut [u8]) -> Result<()> {
        if dst.len() != BINARY_LEN {
            return Err(Error::BufferSize {
                expected: BINARY_LEN,
                actual: dst.len(),
            });
        }
        dst.copy_from_slice(&self.0);
        Ok(())
    }

    /// Returns a stack-allocated text view that implements
    /// [`fmt::Display`] and dereferences to `str`.
    ///
    /// ```
    /// use rulid::Ulid;
    ///
    /// let id = Ulid::from(0x015F_4BFF_CD73_5334_ADA7_8EDC_1D4A_6F1F_u128);
    /// assert_eq!(&*id.encode(), "01BX5ZZKBKACTAV9WEVGEMMVRZ");
    /// ```
    #[must_use]
    pub const fn encode(&self) -> UlidStr {
        UlidStr(base32::encode(&self.0))
    }

    /// Writes the text encoding into `dst`.
    ///
    /// # Errors
    ///
    /// [`Error::BufferSize`] if `dst` is not exactly 26 bytes long.
    pub fn encode_to_buf(&self, dst: &mut [u8]) -> Result<()> {
        if dst.len() != ENCODED_LEN {
            return Err(Error::BufferSize {
                expected: ENCODED_LEN,
                actual: dst.len(),
            });
        }
        dst.copy_from_slice(&base32::encode(&self.0));
        Ok(())
    }

    /// Returns the timestamp in Unix milliseconds.
    #[must_use]
    pub const fn timestamp_ms(&self) -> u64 {
        let b = &self.0;
        u64::from_be_bytes([0, 0, b[0], b[1], b[2], b[3], b[4], b[5]])
    }

    /// Returns the timestamp as a [`SystemTime`].
    #[must_use]
    pub fn system_time(&self) -> SystemTime {
        crate::system_time(self.timestamp_ms())
    }

    /// Returns a copy of the 10 entropy bytes.
    #[must_use]
    pub fn entropy(&self) -> [u8; U80::BYTES] {
        let mut e = [0_u8; U80::BYTES];
        e.copy_from_slice(&self.0[6..]);
        e
    }

    /// Returns the entropy field as an 80-bit integer.
    #[must_use]
    pub fn entropy_u80(&self) -> U80 {
        U80::from_be_bytes(self.entropy())
    }

    /// Returns a copy with the timestamp replaced.
    ///
    /// # Errors
    ///
    /// [`Error::BigTime`] if `ms` exceeds [`Ulid::MAX_TIME`].
    pub fn with_time(self, ms: u64) -> Result<Self> {
        if ms > Self::MAX_TIME {
            return Err(Error::BigTime { ms });
        }
        let mut bytes = self.0;
        bytes[..6].copy_from_slice(&ms.to_be_bytes()[2..]);
        Ok(Self(bytes))
    }

    /// Returns a copy with the entropy replaced.
    ///
    /// # Errors
    ///
    /// [`Error::DataSize`] if `entropy` is not exactly 10 bytes long.
    pub fn with_entropy(self, entropy: &[u8]) -> Result<Self> {
        let e: [u8; U80::BYTES] = entropy.try_into().map_err(|_| Error::DataSize {
            expected: U80::BYTES,
            actual: entropy.len(),
        })?;
        Ok(self.with_entropy_bytes(e))
    }

    const fn with_entropy_bytes(self, e: [u8; U80::BYTES]) -> Self {
        let b = self.0;
        Self([
            b[0], b[1], b[2], b[3], b[4], b[5], e[0], e[1], e[2], e[3], e[4], e[5], e[6], e[7],
            e[8], e[9],
        ])
    }

    /// Compares two identifiers as unsigned big-endian byte strings.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }

    /// Returns `true` for the all-zero sentinel.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.compare(&Self::ZERO) == Ordering::Equal
    }
}

impl fmt::Display for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ulid").field(&&*self.encode()).finish()
    }
}

impl str::FromStr for Ulid {
    type Err = Error;

    /// Parses with strict alphabet validation, see [`Ulid::parse_strict`].
    fn from_str(s: &str) -> Result<Self> {
        Self::parse_strict(s)
    }
}

impl TryFrom<&str> for Ulid {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse_strict(s)
    }
}

impl TryFrom<&[u8]> for Ulid {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self> {
        Self::from_slice(data)
    }
}

impl From<[u8; BINARY_LEN]> for Ulid {
    fn from(bytes: [u8; BINARY_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Ulid> for [u8; BINARY_LEN] {
    fn from(id: Ulid) -> Self {
        id.0
    }
}

impl From<u128> for Ulid {
    fn from(raw: u128) -> Self {
        Self(raw.to_be_bytes())
    }
}

impl From<Ulid> for u128 {
    fn from(id: Ulid) -> Self {
        Self::from_be_bytes(id.0)
    }
}

impl From<Ulid> for String {
    fn from(id: Ulid) -> Self {
        id.to_string()
    }
}

impl AsRef<[u8]> for Ulid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Stack-allocated text form of a [`Ulid`], returned by [`Ulid::encode`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UlidStr([u8; ENCODED_LEN]);

impl ops::Deref for UlidStr {
    type Target = str;

    fn deref(&self) -> &str {
        // Every symbol comes from the ASCII alphabet.
        str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl AsRef<str> for UlidStr {
    fn as_ref(&self) -> &str {
        self
    }
}

impl fmt::Display for UlidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl fmt::Debug for UlidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl PartialEq<str> for UlidStr {
    fn eq(&self, other: &str) -> bool {
        **self == *other
    }
}

impl PartialEq<&str> for UlidStr {
    fn eq(&self, other: &&str) -> bool {
        **self == **other
    }
}
