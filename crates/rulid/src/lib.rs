//! Lexicographically sortable 128-bit identifiers.
//!
//! ```text
//!  Bit Index:  127            80 79            0
//!              +----------------+--------------+
//!  Field:      | timestamp (48) | entropy (80) |
//!              +----------------+--------------+
//! ```
//!
//! A [`Ulid`] is built from a millisecond timestamp and an [`Entropy`]
//! source, and encodes to 26 Crockford Base32 symbols whose string order
//! matches the numeric order. [`MonotonicEntropy`] keeps identifiers
//! strictly increasing within one millisecond; [`LockedMonotonic`] and
//! [`PooledMonotonic`] share that across threads.
//!
//! ```
//! use rulid::{Entropy, LockedMonotonic, ThreadRandom, Ulid, now_ms};
//!
//! let source = LockedMonotonic::new(ThreadRandom, 0);
//! let ms = now_ms();
//! let a = source.next_ulid(ms)?;
//! let b = Ulid::new(ms, Entropy::Monotonic(&mut &source))?;
//! assert!(a < b);
//! # Ok::<(), rulid::Error>(())
//! ```

pub mod base32;
mod error;
mod generator;
mod rand;
#[cfg(feature = "serde")]
mod serde;
mod time;
mod uint80;
mod ulid;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::rand::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
pub use crate::uint80::*;
pub use crate::ulid::*;
