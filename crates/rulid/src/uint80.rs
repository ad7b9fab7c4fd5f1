/// An 80-bit unsigned integer made of a 16-bit high word and a 64-bit low
/// word.
///
/// This is the numeric view of a ULID's entropy field. Addition never wraps
/// silently: [`U80::overflowing_add`] reports a true 80-bit wrap and
/// [`U80::checked_add`] refuses it, so a wrapped value is never observed by
/// callers that honor the flag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U80 {
    hi: u16,
    lo: u64,
}

impl U80 {
    /// Size of the big-endian representation in bytes.
    pub const BYTES: usize = 10;

    /// The value zero.
    pub const ZERO: Self = Self { hi: 0, lo: 0 };

    /// The largest representable value, `2^80 - 1`.
    pub const MAX: Self = Self {
        hi: u16::MAX,
        lo: u64::MAX,
    };

    /// Builds a value from its high and low words.
    #[must_use]
    pub const fn from_parts(hi: u16, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// Returns the high 16 bits.
    #[must_use]
    pub const fn hi(&self) -> u16 {
        self.hi
    }

    /// Returns the low 64 bits.
    #[must_use]
    pub const fn lo(&self) -> u64 {
        self.lo
    }

    /// Loads a value from 10 big-endian bytes.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; Self::BYTES]) -> Self {
        let hi = u16::from_be_bytes([bytes[0], bytes[1]]);
        let lo = u64::from_be_bytes([
            bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7], bytes[8], bytes[9],
        ]);
        Self { hi, lo }
    }

    /// Stores the value as 10 big-endian bytes.
    #[must_use]
    pub const fn to_be_bytes(&self) -> [u8; Self::BYTES] {
        let hi = self.hi.to_be_bytes();
        let lo = self.lo.to_be_bytes();
        [
            hi[0], hi[1], lo[0], lo[1], lo[2], lo[3], lo[4], lo[5], lo[6], lo[7],
        ]
    }

    /// Adds `n` and returns the wrapped sum together with an overflow flag.
    ///
    /// A carry out of the low word bumps the high word; the flag is set only
    /// when that bump itself wraps, i.e. exactly on an 80-bit wrap.
    #[must_use]
    pub const fn overflowing_add(self, n: u64) -> (Self, bool) {
        let (lo, carry) = self.lo.overflowing_add(n);
        let (hi, overflow) = if carry {
            self.hi.overflowing_add(1)
        } else {
            (self.hi, false)
        };
        (Self { hi, lo }, overflow)
    }

    /// Adds `n`, returning `None` on an 80-bit overflow.
    #[must_use]
    pub const fn checked_add(self, n: u64) -> Option<Self> {
        match self.overflowing_add(n) {
            (sum, false) => Some(sum),
            (_, true) => None,
        }
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.hi == 0 && self.lo == 0
    }
}

impl From<U80> for u128 {
    fn from(v: U80) -> Self {
        (u128::from(v.hi) << 64) | u128::from(v.lo)
    }
}
