//! Structural digests: how sets identify their elements.
//!
//! Every element of a set is identified by a 64-bit *digest*, the output of
//! a [`BuildHasher`](std::hash::BuildHasher) applied to the element's
//! [`Hash`](std::hash::Hash) implementation. Two values with equal digests
//! are the same member; native equality is never consulted. The set-level
//! *fingerprint* is the XOR of all member digests, so it can be maintained
//! incrementally and compared in O(1).
//!
//! The builder is per-instance state: each set owns one and passes it to
//! every digest computation. The default, [`DefaultDigestBuilder`], is
//! stateless and deterministic, so independently constructed sets assign
//! identical digests to equal values and can be combined freely. Sets built
//! with seeded builders must share the seed (clone one builder) before they
//! are compared or combined.
//!
//! # Examples
//!
//! ```rust
//! use xorset::set::XorSet;
//!
//! let a: XorSet<&str> = XorSet::from_iter(["x"]);
//! let b: XorSet<&str> = XorSet::from_iter(["x"]);
//!
//! // Deterministic default builder: equal values, equal digests,
//! // even across independently constructed sets.
//! assert_eq!(a.digest_of("x"), b.digest_of("x"));
//! assert_eq!(a.fingerprint(), b.fingerprint());
//! ```

mod cache;
mod digest;

pub(crate) use cache::DigestCache;
pub use digest::DefaultDigestBuilder;

#[cfg(feature = "ahash")]
pub use digest::AHashDigestBuilder;
