//! Digest builder aliases.

/// The default digest builder.
///
/// [`FxBuildHasher`](rustc_hash::FxBuildHasher) is stateless: every instance
/// computes the same digest for the same value, in this process and in any
/// other running the same build. That determinism is what lets two sets
/// constructed independently agree on element identity, which every binary
/// operation relies on.
///
/// The hash is fast and non-cryptographic. Digests are not a serialization
/// format: they may change across compiler or dependency upgrades, so never
/// persist them.
pub type DefaultDigestBuilder = rustc_hash::FxBuildHasher;

/// An alternative, seedable digest builder.
///
/// [`ahash::RandomState`] instances created with `new` carry random keys, so
/// two fresh instances disagree on digests. To combine or compare sets built
/// with this builder, construct one instance (seeded via
/// [`with_seeds`](ahash::RandomState::with_seeds) for reproducibility) and
/// clone it into every set involved.
///
/// ```rust
/// use xorset::set::SetOptions;
/// use xorset::hash::AHashDigestBuilder;
///
/// let builder = AHashDigestBuilder::with_seeds(1, 2, 3, 4);
/// let a = SetOptions::new()
///     .hasher(builder.clone())
///     .build_from(["x", "y"]);
/// let b = SetOptions::new().hasher(builder).build_from(["y", "x"]);
/// assert_eq!(a, b);
/// ```
#[cfg(feature = "ahash")]
pub use ahash::RandomState as AHashDigestBuilder;
