//! Value-to-digest memoization for cache-enabled sets.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// Memoized digests, keyed by element content.
///
/// The digest function is pure, so an entry can become unused but never
/// incorrect. Eviction exists to bound memory, not to preserve correctness.
/// Probes are read-only; entries are added through the mutating entry points
/// of the owning set.
#[derive(Clone, Debug)]
pub(crate) struct DigestCache<T, S> {
    entries: HashMap<T, u64, S>,
}

impl<T, S> DigestCache<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn new(hasher: S) -> Self {
        Self {
            entries: HashMap::with_hasher(hasher),
        }
    }

    /// Memoized digest of `value`, computed via `hasher` and recorded on a
    /// miss.
    pub(crate) fn get_or_compute(&mut self, value: &T, hasher: &S) -> u64
    where
        T: Clone,
    {
        if let Some(&digest) = self.entries.get(value) {
            return digest;
        }
        let digest = hasher.hash_one(value);
        self.entries.insert(value.clone(), digest);
        digest
    }

    /// Memoized digest of `value`, or `None` on a miss. Never populates.
    pub(crate) fn probe<Q>(&self, value: &Q) -> Option<u64>
    where
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(value).copied()
    }

    pub(crate) fn evict<Q>(&mut self, value: &Q)
    where
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.remove(value);
    }

    /// Record `digest` for `value`, replacing any previous entry.
    pub(crate) fn record(&mut self, value: T, digest: u64) {
        self.entries.insert(value, digest);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
