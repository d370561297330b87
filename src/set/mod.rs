//! The set flavors and their shared operand surface.
//!
//! Two renditions of the same digest-keyed engine:
//!
//! - [`XorSet`]: the single-threaded core. Mutation through `&mut self`,
//!   no locking, the full algebra and combinatorics.
//! - `ConcurrentXorSet` (feature `sync`): the lock-protected flavor. Every
//!   method takes `&self`, so one handle is shared across threads by
//!   reference.
//!
//! Either flavor can stand as the second operand of the other's binary
//! operations through [`SetLike`]. [`SetOptions`] configures the digest
//! builder and cache before construction, and [`OrderedPair`] carries
//! cartesian product members.
//!
//! # Examples
//!
//! ```rust
//! use xorset::set::XorSet;
//!
//! let primes: XorSet<i32> = XorSet::from_iter([2, 3, 5, 7]);
//! let odds: XorSet<i32> = XorSet::from_iter([1, 3, 5, 7, 9]);
//!
//! let odd_primes = primes.intersection(&odds);
//! assert_eq!(odd_primes.len(), 3);
//! assert!(odd_primes.is_proper_subset(&primes));
//! ```

#[cfg(feature = "sync")]
mod concurrent;
mod core;
mod flavor;
mod options;
mod pair;

#[cfg(feature = "sync")]
pub use concurrent::{ConcurrentIter, ConcurrentXorSet};
pub use flavor::SetLike;
pub use options::SetOptions;
pub use pair::OrderedPair;
pub use self::core::{XorSet, XorSetIntoIterator, XorSetIterator};
