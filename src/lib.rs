//! # xorset
//!
//! Hash-fingerprinted sets: unordered, deduplicating collections whose
//! element identity is a structural 64-bit digest and whose set-level hash
//! is the XOR of all member digests.
//!
//! ## Overview
//!
//! This library provides set collections built around an incrementally
//! maintained XOR fingerprint. It includes:
//!
//! - **Two flavors**: [`set::XorSet`] for single-threaded use and
//!   `ConcurrentXorSet`, a lock-protected wrapper sharing the same engine
//! - **O(1) set-level hashing**: the fingerprint is updated on every insert
//!   and removal, so whole sets nest inside other sets as ordinary elements
//! - **Set algebra**: union, intersection, difference, symmetric difference,
//!   the subset family, and disjointness checks that reuse stored digests
//! - **Power sets and Cartesian products**: combinatorial constructions with
//!   nested sets and ordered pairs as first-class elements
//! - **JSON codec**: array encoding for any serializable element type and a
//!   lenient scalar decoder that skips nested composites
//! - **Pluggable digests**: any `BuildHasher` can supply the per-instance
//!   digest function; the default is deterministic across instances
//!
//! ## Feature Flags
//!
//! - `sync`: the lock-protected `ConcurrentXorSet` flavor
//! - `serde`: `Serialize`/`Deserialize` for sets and pairs
//! - `json`: the JSON codec (`Scalar`, lenient decoding)
//! - `ahash`: an alternative seeded digest builder
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use xorset::prelude::*;
//!
//! let mut required: XorSet<&str> = XorSet::new();
//! required.insert("biology");
//! required.insert("chemistry");
//!
//! let elective = XorSet::from_iter(["music", "chemistry"]);
//!
//! let catalog = required.union(&elective);
//! assert_eq!(catalog.len(), 3);
//! assert!(catalog.is_superset(&required));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use xorset::prelude::*;
/// ```
pub mod prelude {

    pub use crate::hash::*;

    pub use crate::set::*;

    #[cfg(feature = "json")]
    pub use crate::codec::*;
}

pub mod hash;

pub mod set;

#[cfg(feature = "json")]
pub mod codec;
