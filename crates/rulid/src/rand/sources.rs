use rand::{Rng, RngCore, TryRngCore, rng, rngs::OsRng};

use crate::{Error, RandSource, Result};

/// A `RandSource` backed by the operating system's CSPRNG.
///
/// Every call is a fresh read from the OS, so this is the slowest source but
/// needs no seeding. Failures surface as [`Error::EntropySource`].
#[derive(Default, Clone, Copy, Debug)]
pub struct OsRandom;

impl RandSource for OsRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(dest).map_err(|e| Error::EntropySource {
            reason: e.to_string(),
        })
    }
}

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// The RNG is ChaCha-based, cryptographically secure and reseeded
/// periodically. This type does not store the RNG itself; it reaches the
/// calling thread's generator on each call, so it is freely `Send` and
/// `Sync` and never fails.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        rng().fill_bytes(dest);
        Ok(())
    }

    fn random_below(&mut self, bound: u64) -> Option<u64> {
        Some(rng().random_range(0..bound))
    }
}

/// Adapts any infallible `rand` RNG into a `RandSource`.
///
/// Mostly useful with a seeded [`rand::rngs::StdRng`] for reproducible
/// sequences.
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use rulid::{RandSource, RngAdapter};
///
/// let mut a = RngAdapter(StdRng::seed_from_u64(3));
/// let mut b = RngAdapter(StdRng::seed_from_u64(3));
/// let (mut x, mut y) = ([0; 10], [0; 10]);
/// a.fill_bytes(&mut x)?;
/// b.fill_bytes(&mut y)?;
/// assert_eq!(x, y);
/// # Ok::<(), rulid::Error>(())
/// ```
#[derive(Default, Clone, Debug)]
pub struct RngAdapter<R>(pub R);

impl<R: RngCore> RandSource for RngAdapter<R> {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        self.0.fill_bytes(dest);
        Ok(())
    }

    fn random_below(&mut self, bound: u64) -> Option<u64> {
        Some(self.0.random_range(0..bound))
    }
}

/// A `RandSource` that yields only zero bytes.
///
/// Produces placeholder identifiers whose entropy field is all zero.
#[derive(Default, Clone, Copy, Debug)]
pub struct ZeroRandom;

impl RandSource for ZeroRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        dest.fill(0);
        Ok(())
    }

    fn random_below(&mut self, _bound: u64) -> Option<u64> {
        Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn os_random_fills_the_whole_buffer() {
        let mut a = [0_u8; 32];
        let mut b = [0_u8; 32];
        OsRandom.fill_bytes(&mut a).unwrap();
        OsRandom.fill_bytes(&mut b).unwrap();
        // 2^-256 chance of a false failure.
        assert_ne!(a, b);
    }

    #[test]
    fn bounded_draws_stay_in_range() {
        let mut sources: [Box<dyn RandSource>; 2] = [
            Box::new(ThreadRandom),
            Box::new(RngAdapter(StdRng::seed_from_u64(11))),
        ];
        for src in &mut sources {
            for bound in [1, 2, 3, 255, 256, 1 << 32, u64::MAX] {
                for _ in 0..200 {
                    let v = src.random_below(bound).unwrap();
                    assert!(v < bound, "{v} >= {bound}");
                }
            }
        }
    }

    #[test]
    fn zero_random_is_all_zero() {
        let mut buf = [0xAA_u8; 10];
        ZeroRandom.fill_bytes(&mut buf).unwrap();
        assert_eq!(buf, [0; 10]);
        assert_eq!(ZeroRandom.random_below(10), Some(0));
    }

    #[test]
    fn seeded_adapter_is_reproducible() {
        let mut a = RngAdapter(StdRng::seed_from_u64(5));
        let mut b = RngAdapter(StdRng::seed_from_u64(5));
        for _ in 0..10 {
            let (mut x, mut y) = ([0_u8; 10], [0_u8; 10]);
            a.fill_bytes(&mut x).unwrap();
            b.fill_bytes(&mut y).unwrap();
            assert_eq!(x, y);
        }
    }
}
