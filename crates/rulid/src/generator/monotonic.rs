#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, MonotonicSource, RandSource, Result, U80};

/// A *monotonic* entropy generator for single-owner use.
///
/// Wraps a byte [`RandSource`] and remembers the last millisecond and
/// entropy value it handed out:
///
/// - On a new millisecond (or the first call) it draws 10 fresh random
///   bytes.
/// - Within the same millisecond it adds a random increment in `[1, inc)`
///   to the previous value, so entropy strictly increases.
///
/// When the addition would exceed 80 bits, [`Error::MonotonicOverflow`] is
/// returned and the state is left untouched; the next millisecond starts
/// over with a fresh draw.
///
/// The generator needs `&mut self` and is not shared between threads by
/// itself. See [`LockedMonotonic`] and [`PooledMonotonic`].
///
/// # Example
///
/// ```
/// use rulid::{MonotonicEntropy, ThreadRandom, Ulid};
///
/// let mut mono = MonotonicEntropy::new(ThreadRandom, 0);
/// let a = Ulid::with_monotonic(1_000, &mut mono)?;
/// let b = Ulid::with_monotonic(1_000, &mut mono)?;
/// assert!(a < b);
/// # Ok::<(), rulid::Error>(())
/// ```
///
/// [`LockedMonotonic`]: crate::LockedMonotonic
/// [`PooledMonotonic`]: crate::PooledMonotonic
#[derive(Clone, Debug)]
pub struct MonotonicEntropy<R> {
    rng: R,
    inc: u64,
    last: Option<(u64, U80)>,
}

impl<R: RandSource> MonotonicEntropy<R> {
    /// Increment bound used when `0` is requested: `2^32`.
    pub const DEFAULT_INC: u64 = 1 << 32;

    /// Creates an empty generator.
    ///
    /// # Parameters
    /// - `rng`: source of fresh entropy and of increments
    /// - `inc`: exclusive upper bound of the random increment applied within
    ///   one millisecond; `0` selects [`Self::DEFAULT_INC`]. Values `<= 1`
    ///   after that substitution always increment by exactly `1`.
    ///
    /// Smaller bounds leave more room before an overflow at the cost of
    /// making successive identifiers easier to guess.
    pub fn new(rng: R, inc: u64) -> Self {
        Self {
            rng,
            inc: Self::effective_inc(inc),
            last: None,
        }
    }

    /// Creates a generator that already handed out `entropy` at `tick`.
    ///
    /// Useful to resume a sequence after a restart or to start right below
    /// the overflow boundary. Prefer [`Self::new`] otherwise.
    pub fn from_components(tick: u64, entropy: U80, inc: u64, rng: R) -> Self {
        Self {
            rng,
            inc: Self::effective_inc(inc),
            last: Some((tick, entropy)),
        }
    }

    const fn effective_inc(inc: u64) -> u64 {
        if inc == 0 { Self::DEFAULT_INC } else { inc }
    }

    /// Returns the exclusive increment bound in effect.
    pub const fn inc(&self) -> u64 {
        self.inc
    }

    /// Returns the last millisecond and entropy handed out, or `None` if the
    /// generator has not produced anything yet.
    pub const fn last(&self) -> Option<(u64, U80)> {
        self.last
    }

    /// Consumes the generator, returning the inner source.
    pub fn into_inner(self) -> R {
        self.rng
    }

    /// Draws a uniform increment in `[1, inc)`, or `1` when `inc <= 1`.
    ///
    /// Uses the source's native bounded draw when it has one. Otherwise it
    /// reads just enough bytes for `inc - 1`, masks the excess high bits of
    /// the leading byte and rejects out-of-range candidates.
    fn random_increment(&mut self) -> Result<u64> {
        if self.inc <= 1 {
            return Ok(1);
        }
        let max = self.inc - 1;
        if let Some(r) = self.rng.random_below(max) {
            return Ok(1 + r);
        }

        let bit_len = u64::BITS - max.leading_zeros();
        let byte_len = bit_len.div_ceil(8) as usize;
        let mask = match bit_len % 8 {
            0 => u8::MAX,
            n => u8::MAX >> (8 - n),
        };

        let mut buf = [0_u8; 8];
        loop {
            let draw = &mut buf[8 - byte_len..];
            self.rng.fill_bytes(draw)?;
            draw[0] &= mask;
            let r = u64::from_be_bytes(buf);
            if (1..self.inc).contains(&r) {
                return Ok(r);
            }
        }
    }
}

impl<R: RandSource> MonotonicSource for MonotonicEntropy<R> {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, dest)))]
    fn fill_monotonic(&mut self, ms: u64, dest: &mut [u8; U80::BYTES]) -> Result<()> {
        let next = match self.last {
            Some((tick, prev)) if tick == ms => {
                let r = self.random_increment()?;
                let Some(next) = prev.checked_add(r) else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(ms, inc = r, "monotonic entropy overflow");
                    return Err(Error::MonotonicOverflow);
                };
                next
            }
            _ => {
                let mut fresh = [0_u8; U80::BYTES];
                self.rng.fill_bytes(&mut fresh)?;
                U80::from_be_bytes(fresh)
            }
        };
        self.last = Some((ms, next));
        *dest = next.to_be_bytes();
        Ok(())
    }
}

/// Plain reads bypass the monotonic state and go straight to the source.
impl<R: RandSource> RandSource for MonotonicEntropy<R> {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        self.rng.fill_bytes(dest)
    }

    fn random_below(&mut self, bound: u64) -> Option<u64> {
        self.rng.random_below(bound)
    }
}
