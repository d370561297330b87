//! Construction options for sets.
//!
//! [`SetOptions`] configures the digest builder and the digest cache before
//! a set exists, then stamps out core or lock-protected sets that share
//! that configuration.

use std::hash::{BuildHasher, Hash};

use crate::hash::DefaultDigestBuilder;
#[cfg(feature = "sync")]
use crate::set::concurrent::ConcurrentXorSet;
use crate::set::core::XorSet;

// =============================================================================
// SetOptions Definition
// =============================================================================

/// A builder for [`XorSet`] and `ConcurrentXorSet` values.
///
/// Options are reusable: every set built from the same options value gets a
/// clone of the same digest builder, so their digests agree and the sets
/// can be compared and combined. That matters for builders with
/// per-instance state; the default builder is stateless, so sets built from
/// separate options agree anyway.
///
/// # Examples
///
/// ```rust
/// use xorset::set::SetOptions;
///
/// let options = SetOptions::new().cached(true);
///
/// let numbers = options.build_from([1, 2, 3]);
/// let letters = options.build_from(['a', 'b']);
/// assert!(numbers.is_cached());
/// assert!(letters.is_cached());
/// ```
#[derive(Clone, Debug)]
pub struct SetOptions<S = DefaultDigestBuilder> {
    hasher: S,
    cached: bool,
}

// =============================================================================
// Construction
// =============================================================================

impl SetOptions<DefaultDigestBuilder> {
    /// Default options: the default digest builder, digest cache disabled.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            hasher: DefaultDigestBuilder::default(),
            cached: false,
        }
    }
}

impl Default for SetOptions<DefaultDigestBuilder> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SetOptions<S> {
    /// Enables or disables the digest cache for built sets.
    ///
    /// A cached set memoizes content-to-digest lookups, trading memory (a
    /// clone of each distinct value probed on a mutating path) for skipped
    /// rehashing. Worthwhile when elements are large and repeatedly
    /// inserted, removed, or probed; a slowdown for cheap-to-hash elements.
    #[must_use]
    pub fn cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    /// Replaces the digest builder, keeping the cache flag.
    ///
    /// Builders with per-instance state must be cloned into every options
    /// value (or shared through one) whose sets will be compared or
    /// combined with each other.
    #[must_use]
    pub fn hasher<S2>(self, hasher: S2) -> SetOptions<S2> {
        SetOptions {
            hasher,
            cached: self.cached,
        }
    }
}

// =============================================================================
// Building
// =============================================================================

impl<S> SetOptions<S>
where
    S: BuildHasher + Clone,
{
    /// Builds an empty core set with this configuration.
    #[must_use]
    pub fn build<T>(&self) -> XorSet<T, S>
    where
        T: Clone + Hash + Eq,
    {
        XorSet::with_config(self.hasher.clone(), self.cached)
    }

    /// Builds a core set seeded with `values`.
    #[must_use]
    pub fn build_from<T, I>(&self, values: I) -> XorSet<T, S>
    where
        T: Clone + Hash + Eq,
        I: IntoIterator<Item = T>,
    {
        let mut set = self.build();
        set.insert_all(values);
        set
    }

    /// Builds an empty lock-protected set with this configuration.
    #[cfg(feature = "sync")]
    #[must_use]
    pub fn build_concurrent<T>(&self) -> ConcurrentXorSet<T, S>
    where
        T: Clone + Hash + Eq,
    {
        ConcurrentXorSet::from(self.build())
    }

    /// Builds a lock-protected set seeded with `values`.
    #[cfg(feature = "sync")]
    #[must_use]
    pub fn build_concurrent_from<T, I>(&self, values: I) -> ConcurrentXorSet<T, S>
    where
        T: Clone + Hash + Eq,
        I: IntoIterator<Item = T>,
    {
        ConcurrentXorSet::from(self.build_from(values))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_build_uncached_sets() {
        let set: XorSet<i32> = SetOptions::new().build();
        assert!(!set.is_cached());
        assert!(set.is_empty());
    }

    #[test]
    fn cached_flag_carries_into_built_sets() {
        let options = SetOptions::new().cached(true);
        let set: XorSet<i32> = options.build();
        assert!(set.is_cached());
    }

    #[test]
    fn hasher_swap_keeps_cache_flag() {
        let options = SetOptions::new()
            .cached(true)
            .hasher(DefaultDigestBuilder::default());
        let set: XorSet<i32> = options.build();
        assert!(set.is_cached());
    }

    #[test]
    fn sets_from_one_options_value_agree_on_digests() {
        let options = SetOptions::new();
        let a = options.build_from(["x", "y"]);
        let b = options.build_from(["y", "x"]);
        assert_eq!(a.digest_of("x"), b.digest_of("x"));
        assert_eq!(a, b);
    }

    #[cfg(feature = "sync")]
    #[test]
    fn concurrent_builds_share_configuration() {
        let options = SetOptions::new().cached(true);
        let set = options.build_concurrent_from([1, 2]);
        assert!(set.is_cached());
        assert_eq!(set.len(), 2);
    }
}
