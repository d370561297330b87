//! The single-threaded set engine.
//!
//! [`XorSet`] keys every element by a structural 64-bit digest and folds all
//! member digests into one XOR fingerprint, maintained incrementally on each
//! insert and removal. Everything else in the crate is a view over this
//! engine.

use std::borrow::Borrow;
use std::collections::hash_map;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::ops::ControlFlow;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::hash::{DefaultDigestBuilder, DigestCache};
#[cfg(feature = "sync")]
use crate::set::concurrent::ConcurrentXorSet;
use crate::set::flavor::SetLike;
use crate::set::flavor::sealed::Operand;
use crate::set::pair::OrderedPair;

// =============================================================================
// XorSet Definition
// =============================================================================

/// An unordered set whose element identity is a structural 64-bit digest.
///
/// Every element is keyed by the digest the builder `S` assigns to the
/// element's [`Hash`] implementation; native equality is never consulted.
/// Values that hash equal are the same member, so a digest collision makes
/// the later value indistinguishable from the earlier one.
///
/// Alongside the members the set maintains a *fingerprint*, the XOR of all
/// member digests, updated on every insert and removal. Set equality,
/// set-level hashing, and the fast paths of the subset family read the
/// fingerprint instead of walking members, which is what lets whole sets
/// nest inside other sets as ordinary elements.
///
/// # Time Complexity
///
/// | Operation              | Complexity        |
/// |------------------------|-------------------|
/// | `insert`               | O(1) expected     |
/// | `remove`               | O(1) expected     |
/// | `contains`             | O(1) expected     |
/// | `len` / `fingerprint`  | O(1)              |
/// | `==`                   | O(1)              |
/// | `union`                | O(n + m)          |
/// | `intersection`         | O(min(n, m))      |
/// | `difference`           | O(n)              |
/// | `symmetric_difference` | O(n + m)          |
/// | `is_subset`            | O(n)              |
/// | `power_set`            | O(n · 2ⁿ)         |
/// | `cartesian_product`    | O(n · m)          |
///
/// # Examples
///
/// ```rust
/// use xorset::set::XorSet;
///
/// let mut set = XorSet::new();
/// set.insert("one");
/// set.insert("two");
/// set.insert("one");
/// assert_eq!(set.len(), 2);
/// assert!(set.remove("two"));
/// assert_eq!(set.to_string(), "Set{one}");
/// ```
///
/// Sets nest, and membership of a nested set is structural:
///
/// ```rust
/// use xorset::set::XorSet;
///
/// let inner: XorSet<i32> = XorSet::from_iter([1, 2]);
/// let mut outer = XorSet::new();
/// outer.insert(inner);
///
/// // An equal set built separately is the same member.
/// let twin: XorSet<i32> = XorSet::from_iter([2, 1]);
/// assert!(outer.contains(&twin));
/// ```
#[derive(Clone)]
pub struct XorSet<T, S = DefaultDigestBuilder> {
    members: FxHashMap<u64, T>,
    fingerprint: u64,
    hasher: S,
    cache: Option<DigestCache<T, S>>,
}

// =============================================================================
// Construction
// =============================================================================

impl<T> XorSet<T, DefaultDigestBuilder> {
    /// Creates a new empty set with the default digest builder and no cache.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let set: XorSet<i32> = XorSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.fingerprint(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultDigestBuilder::default())
    }

    /// Creates a set containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let set = XorSet::singleton(42);
    /// assert_eq!(set.len(), 1);
    /// assert!(set.contains(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self
    where
        T: Clone + Hash + Eq,
    {
        let mut set = Self::new();
        set.insert(element);
        set
    }
}

impl<T, S> XorSet<T, S> {
    /// Creates a new empty set using `hasher` as its digest builder.
    ///
    /// Sets that will be compared or combined must assign equal digests to
    /// equal values; builders with per-instance random state have to be
    /// cloned across such sets.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            members: FxHashMap::default(),
            fingerprint: 0,
            hasher,
            cache: None,
        }
    }
}

impl<T, S> XorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Creates an empty set with an explicit digest builder and cache flag.
    pub(crate) fn with_config(hasher: S, cached: bool) -> Self {
        let cache = cached.then(|| DigestCache::new(hasher.clone()));
        Self {
            members: FxHashMap::default(),
            fingerprint: 0,
            hasher,
            cache,
        }
    }

    /// An empty set inheriting this set's digest builder and cache flag.
    ///
    /// Derived sets (algebra results, subsets of a power set, products)
    /// start from this configuration.
    fn derived(&self) -> Self {
        Self::with_config(self.hasher.clone(), self.cache.is_some())
    }

    /// An empty set for elements of another type, inheriting this set's
    /// digest builder and cache flag.
    fn derived_as<U: Clone + Hash + Eq>(&self) -> XorSet<U, S> {
        XorSet::with_config(self.hasher.clone(), self.cache.is_some())
    }
}

// =============================================================================
// Queries
// =============================================================================

impl<T, S> XorSet<T, S> {
    /// Returns the number of members.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let set: XorSet<i32> = XorSet::from_iter([1, 2, 2]);
    /// assert_eq!(set.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the set contains no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The set-level hash: XOR of all member digests, `0` when empty.
    ///
    /// Maintained incrementally, so reading it never walks the members.
    /// Two sets with equal cardinality and equal fingerprints are equal.
    #[inline]
    #[must_use]
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Whether digest memoization is enabled for this set.
    #[inline]
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Visits every member in arbitrary order until `visit` breaks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::ops::ControlFlow;
    /// use xorset::set::XorSet;
    ///
    /// let set: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
    /// let mut seen = 0;
    /// set.each(|_| {
    ///     seen += 1;
    ///     if seen == 2 {
    ///         ControlFlow::Break(())
    ///     } else {
    ///         ControlFlow::Continue(())
    ///     }
    /// });
    /// assert_eq!(seen, 2);
    /// ```
    pub fn each<F>(&self, mut visit: F)
    where
        F: FnMut(&T) -> ControlFlow<()>,
    {
        for value in self.members.values() {
            if visit(value).is_break() {
                break;
            }
        }
    }

    /// A borrowed iterator over the members, in arbitrary order.
    #[must_use]
    pub fn iter(&self) -> XorSetIterator<'_, T> {
        XorSetIterator {
            inner: self.members.values(),
        }
    }
}

// =============================================================================
// Membership
// =============================================================================

impl<T, S> XorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// The digest this set's builder assigns to `value`.
    ///
    /// This is the identity under which `value` would be stored: any two
    /// values with the same digest are the same member. Digests are not
    /// stable across builders, processes, or crate upgrades.
    #[must_use]
    pub fn digest_of<Q>(&self, value: &Q) -> u64
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(cache) = &self.cache {
            if let Some(digest) = cache.probe(value) {
                return digest;
            }
        }
        self.hasher.hash_one(value)
    }

    /// Digest of an owned value on the mutating path, memoizing when the
    /// cache is enabled.
    fn admit_digest(&mut self, value: &T) -> u64 {
        match &mut self.cache {
            Some(cache) => cache.get_or_compute(value, &self.hasher),
            None => self.hasher.hash_one(value),
        }
    }

    /// Adds `value`, returning `true` if it was not already a member.
    ///
    /// Re-inserting an existing member (any value with the same digest) is a
    /// no-op: the stored value and the fingerprint are left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let mut set = XorSet::new();
    /// assert!(set.insert("one"));
    /// assert!(!set.insert("one"));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let digest = self.admit_digest(&value);
        self.insert_with_digest(digest, value)
    }

    /// Adds every value from `values`.
    pub fn insert_all<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.insert(value);
        }
    }

    /// Stores `value` under an already-computed digest.
    ///
    /// Derived sets are built through this path so digests computed once are
    /// never recomputed.
    pub(crate) fn insert_with_digest(&mut self, digest: u64, value: T) -> bool {
        match self.members.entry(digest) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                self.fingerprint ^= digest;
                true
            }
        }
    }

    /// Removes `value`, returning `true` if it was a member.
    ///
    /// Removing an absent value is a no-op; in particular it must not
    /// disturb the fingerprint.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let mut set: XorSet<i32> = XorSet::from_iter([1, 2]);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let digest = self.digest_of(value);
        if self.members.remove(&digest).is_some() {
            // Only a digest that was actually present may touch the fingerprint.
            self.fingerprint ^= digest;
            if let Some(cache) = &mut self.cache {
                cache.evict(value);
            }
            true
        } else {
            false
        }
    }

    /// Removes every value in `values` that is a member.
    pub fn remove_all<Q>(&mut self, values: &[Q])
    where
        T: Borrow<Q>,
        Q: Hash + Eq,
    {
        for value in values {
            self.remove(value);
        }
    }

    /// Returns `true` if `value` is a member.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let set: XorSet<String> = XorSet::from_iter(["one".to_string()]);
    /// assert!(set.contains("one"));
    /// assert!(!set.contains("two"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.members.contains_key(&self.digest_of(value))
    }

    /// Returns `true` if every value in `values` is a member.
    ///
    /// Queries longer than the cardinality answer `false` without hashing.
    /// A query exactly as long as the cardinality is answered by comparing
    /// the XOR of the query digests against the fingerprint; as a
    /// consequence, such a query listing the same member twice reports
    /// `false` even though each listed value is present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let set: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
    /// assert!(set.contains_all(&[1, 3]));
    /// assert!(set.contains_all(&[3, 2, 1]));
    /// assert!(!set.contains_all(&[1, 2, 3, 4]));
    /// ```
    #[must_use]
    pub fn contains_all<Q>(&self, values: &[Q]) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq,
    {
        if values.len() > self.len() {
            return false;
        }
        if values.len() == self.len() {
            let combined = values
                .iter()
                .fold(0_u64, |acc, value| acc ^ self.digest_of(value));
            return combined == self.fingerprint;
        }
        values.iter().all(|value| self.contains(value))
    }

    /// Removes and returns an arbitrary member, or `None` if empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let mut set = XorSet::singleton(7);
    /// assert_eq!(set.pop(), Some(7));
    /// assert_eq!(set.pop(), None);
    /// assert_eq!(set.fingerprint(), 0);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        let digest = *self.members.keys().next()?;
        let value = self.members.remove(&digest)?;
        self.fingerprint ^= digest;
        if let Some(cache) = &mut self.cache {
            cache.evict(&value);
        }
        Some(value)
    }

    /// Removes all members, resetting the fingerprint to `0`.
    ///
    /// The digest builder and the cache flag survive; cache entries do not.
    pub fn clear(&mut self) {
        self.members.clear();
        self.fingerprint = 0;
        if let Some(cache) = &mut self.cache {
            cache.clear();
        }
    }
}

// =============================================================================
// Set Algebra
// =============================================================================

impl<T, S> XorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Resolves an operand of either flavor to its core engine.
    ///
    /// A concurrent operand is read-locked for the duration of `f`.
    fn with_operand<R>(other: &impl SetLike<T, S>, f: impl FnOnce(&Self) -> R) -> R {
        match other.operand() {
            Operand::Core(set) => f(set),
            #[cfg(feature = "sync")]
            Operand::Concurrent(set) => set.with_core(f),
        }
    }

    /// Returns a new set containing the members of both sets.
    ///
    /// The result inherits this set's digest builder and cache flag. Stored
    /// digests are reused; no member is hashed again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let a: XorSet<i32> = XorSet::from_iter([1, 2]);
    /// let b: XorSet<i32> = XorSet::from_iter([2, 3]);
    /// assert_eq!(a.union(&b), XorSet::from_iter([1, 2, 3]));
    /// ```
    #[must_use]
    pub fn union(&self, other: &impl SetLike<T, S>) -> Self {
        Self::with_operand(other, |operand| self.union_core(operand))
    }

    pub(crate) fn union_core(&self, other: &Self) -> Self {
        let mut result = self.clone();
        if let Some(cache) = &mut result.cache {
            cache.clear();
        }
        for (&digest, value) in &other.members {
            result.insert_with_digest(digest, value.clone());
        }
        result
    }

    /// Returns a new set containing the members present in both sets.
    ///
    /// Iterates the smaller operand and probes the larger.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let a: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
    /// let b: XorSet<i32> = XorSet::from_iter([2, 3, 4]);
    /// assert_eq!(a.intersection(&b), XorSet::from_iter([2, 3]));
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &impl SetLike<T, S>) -> Self {
        Self::with_operand(other, |operand| self.intersection_core(operand))
    }

    pub(crate) fn intersection_core(&self, other: &Self) -> Self {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut result = self.derived();
        for (&digest, value) in &smaller.members {
            if larger.members.contains_key(&digest) {
                result.insert_with_digest(digest, value.clone());
            }
        }
        result
    }

    /// Returns a new set containing the members of this set absent from
    /// `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let a: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
    /// let b: XorSet<i32> = XorSet::from_iter([2]);
    /// assert_eq!(a.difference(&b), XorSet::from_iter([1, 3]));
    /// ```
    #[must_use]
    pub fn difference(&self, other: &impl SetLike<T, S>) -> Self {
        Self::with_operand(other, |operand| self.difference_core(operand))
    }

    pub(crate) fn difference_core(&self, other: &Self) -> Self {
        let mut result = self.derived();
        for (&digest, value) in &self.members {
            if !other.members.contains_key(&digest) {
                result.insert_with_digest(digest, value.clone());
            }
        }
        result
    }

    /// Returns a new set containing the members in exactly one of the two
    /// sets: `(self − other) ∪ (other − self)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let a: XorSet<i32> = XorSet::from_iter([1, 2]);
    /// let b: XorSet<i32> = XorSet::from_iter([2, 3]);
    /// assert_eq!(a.symmetric_difference(&b), XorSet::from_iter([1, 3]));
    /// ```
    #[must_use]
    pub fn symmetric_difference(&self, other: &impl SetLike<T, S>) -> Self {
        Self::with_operand(other, |operand| self.symmetric_difference_core(operand))
    }

    pub(crate) fn symmetric_difference_core(&self, other: &Self) -> Self {
        self.difference_core(other)
            .union_core(&other.difference_core(self))
    }

    /// Returns `true` if the two sets share no member.
    ///
    /// Iterates the smaller operand.
    #[must_use]
    pub fn is_disjoint(&self, other: &impl SetLike<T, S>) -> bool {
        Self::with_operand(other, |operand| self.is_disjoint_core(operand))
    }

    pub(crate) fn is_disjoint_core(&self, other: &Self) -> bool {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller
            .members
            .keys()
            .all(|digest| !larger.members.contains_key(digest))
    }
}

// =============================================================================
// Subset Family and Equality
// =============================================================================

impl<T, S> XorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Returns `true` if every member of this set is a member of `other`.
    ///
    /// Answered by the cardinality gate and the fingerprint shortcut before
    /// any member is probed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let a: XorSet<i32> = XorSet::from_iter([1, 2]);
    /// let b: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
    /// assert!(a.is_subset(&b));
    /// assert!(!b.is_subset(&a));
    /// ```
    #[must_use]
    pub fn is_subset(&self, other: &impl SetLike<T, S>) -> bool {
        Self::with_operand(other, |operand| self.is_subset_core(operand))
    }

    pub(crate) fn is_subset_core(&self, other: &Self) -> bool {
        if self.len() > other.len() {
            return false;
        }
        if self.eq_core(other) {
            return true;
        }
        self.members
            .keys()
            .all(|digest| other.members.contains_key(digest))
    }

    /// Returns `true` if this set is a subset of `other` and strictly
    /// smaller.
    #[must_use]
    pub fn is_proper_subset(&self, other: &impl SetLike<T, S>) -> bool {
        Self::with_operand(other, |operand| {
            self.len() < operand.len() && self.is_subset_core(operand)
        })
    }

    /// Returns `true` if every member of `other` is a member of this set.
    #[must_use]
    pub fn is_superset(&self, other: &impl SetLike<T, S>) -> bool {
        Self::with_operand(other, |operand| operand.is_subset_core(self))
    }

    /// Returns `true` if this set is a superset of `other` and strictly
    /// larger.
    #[must_use]
    pub fn is_proper_superset(&self, other: &impl SetLike<T, S>) -> bool {
        Self::with_operand(other, |operand| {
            operand.len() < self.len() && operand.is_subset_core(self)
        })
    }

    /// Equality as the engine defines it: same cardinality, same
    /// fingerprint.
    pub(crate) fn eq_core(&self, other: &Self) -> bool {
        self.len() == other.len() && self.fingerprint == other.fingerprint
    }
}

// =============================================================================
// Combinatorics
// =============================================================================

impl<T, S> XorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Returns the set of all 2ⁿ subsets of this set.
    ///
    /// Each subset is itself an [`XorSet`], hashed into the result by its
    /// own fingerprint. The result and every subset inherit this set's
    /// digest builder and cache flag. The empty set's power set is `{ {} }`.
    ///
    /// Subsets are accumulated incrementally: for each member, every subset
    /// gathered before that member's step is extended with it. Member
    /// digests are reused, never recomputed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let set: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
    /// let subsets = set.power_set();
    ///
    /// assert_eq!(subsets.len(), 8);
    /// assert!(subsets.contains(&XorSet::new()));
    /// assert!(subsets.contains(&XorSet::from_iter([1, 3])));
    /// assert!(subsets.contains(&set));
    /// ```
    #[must_use]
    pub fn power_set(&self) -> XorSet<Self, S> {
        let mut subsets: Vec<Self> = Vec::with_capacity(1 << self.len().min(16));
        subsets.push(self.derived());

        for (&digest, value) in &self.members {
            // Snapshot of the subsets gathered before this member's step;
            // the ones pushed below must not be extended again with it.
            let gathered = subsets.len();
            for index in 0..gathered {
                let mut extended = subsets[index].clone();
                extended.insert_with_digest(digest, value.clone());
                subsets.push(extended);
            }
        }

        let mut result = self.derived_as::<Self>();
        for subset in subsets {
            result.insert(subset);
        }
        result
    }

    /// Returns the set of all ordered pairs `(a, b)` with `a` from this set
    /// and `b` from `other`.
    ///
    /// The operand may hold a different element type; the result contains
    /// [`OrderedPair<T, U>`] members and has cardinality `|self| · |other|`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::{OrderedPair, XorSet};
    ///
    /// let numbers: XorSet<i32> = XorSet::from_iter([1, 2]);
    /// let letters: XorSet<char> = XorSet::from_iter(['a', 'b', 'c']);
    ///
    /// let grid = numbers.cartesian_product(&letters);
    /// assert_eq!(grid.len(), 6);
    /// assert!(grid.contains(&OrderedPair::new(2, 'a')));
    /// ```
    #[must_use]
    pub fn cartesian_product<U, O>(&self, other: &O) -> XorSet<OrderedPair<T, U>, S>
    where
        U: Clone + Hash + Eq,
        O: SetLike<U, S>,
    {
        XorSet::with_operand(other, |operand| self.product_core(operand))
    }

    pub(crate) fn product_core<U>(&self, other: &XorSet<U, S>) -> XorSet<OrderedPair<T, U>, S>
    where
        U: Clone + Hash + Eq,
    {
        let mut result = self.derived_as::<OrderedPair<T, U>>();
        for first in self.members.values() {
            for second in other.members.values() {
                result.insert(OrderedPair::new(first.clone(), second.clone()));
            }
        }
        result
    }
}

// =============================================================================
// Rehash Repair
// =============================================================================

impl<T, S> XorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Recomputes every member's digest and repairs the set after in-place
    /// element mutation, returning how many members had changed.
    ///
    /// A member whose content was mutated through interior mutability (a
    /// shared `Cell`, for instance) is stored under a stale digest: probes
    /// for its new content miss, and the fingerprint no longer reflects the
    /// members. This walks all members, re-keys the changed ones, refreshes
    /// their cache entries, and re-folds the fingerprint. Two members whose
    /// fresh digests collide merge into one, the usual collision rule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::cell::Cell;
    /// use std::hash::{Hash, Hasher};
    /// use std::rc::Rc;
    ///
    /// #[derive(Clone, PartialEq, Eq)]
    /// struct Tracked(Rc<Cell<u64>>);
    ///
    /// impl Hash for Tracked {
    ///     fn hash<H: Hasher>(&self, state: &mut H) {
    ///         self.0.get().hash(state);
    ///     }
    /// }
    ///
    /// use xorset::set::XorSet;
    ///
    /// let handle = Rc::new(Cell::new(1));
    /// let mut set = XorSet::new();
    /// set.insert(Tracked(Rc::clone(&handle)));
    ///
    /// handle.set(2); // mutates the stored member in place
    /// assert_eq!(set.update_hashes(), 1);
    /// assert!(set.contains(&Tracked(Rc::new(Cell::new(2)))));
    /// ```
    pub fn update_hashes(&mut self) -> usize {
        let mut moves: SmallVec<[(u64, u64); 8]> = SmallVec::new();
        for (&stored, value) in &self.members {
            let fresh = self.hasher.hash_one(value);
            if fresh != stored {
                moves.push((stored, fresh));
            }
        }

        // Detach every changed member before re-keying any of them, so two
        // members that swapped digests both survive.
        let mut staged: SmallVec<[(u64, T); 8]> = SmallVec::new();
        for (stale, fresh) in &moves {
            if let Some(value) = self.members.remove(stale) {
                self.fingerprint ^= stale;
                staged.push((*fresh, value));
            }
        }

        for (fresh, value) in staged {
            if self.members.contains_key(&fresh) {
                // Fresh digest already names a member: the two merge.
                continue;
            }
            self.fingerprint ^= fresh;
            if let Some(cache) = &mut self.cache {
                cache.record(value.clone(), fresh);
            }
            self.members.insert(fresh, value);
        }

        moves.len()
    }
}

// =============================================================================
// Conversion
// =============================================================================

impl<T, S> XorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Clones the members into a vector, in arbitrary order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::XorSet;
    ///
    /// let set: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
    /// let mut members = set.to_vec();
    /// members.sort_unstable();
    /// assert_eq!(members, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.members.values().cloned().collect()
    }

    /// Moves this set into the lock-protected flavor.
    #[cfg(feature = "sync")]
    #[must_use]
    pub fn into_concurrent(self) -> ConcurrentXorSet<T, S> {
        ConcurrentXorSet::from(self)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// A borrowed iterator over the members of an [`XorSet`].
pub struct XorSetIterator<'a, T> {
    inner: hash_map::Values<'a, u64, T>,
}

impl<'a, T> Iterator for XorSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for XorSetIterator<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An owning iterator over the members of an [`XorSet`].
pub struct XorSetIntoIterator<T> {
    inner: hash_map::IntoValues<u64, T>,
}

impl<T> Iterator for XorSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for XorSetIntoIterator<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, S: Default> Default for XorSet<T, S> {
    #[inline]
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> FromIterator<T> for XorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.insert_all(iter);
        set
    }
}

impl<T, S> Extend<T> for XorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<T, S> IntoIterator for XorSet<T, S> {
    type Item = T;
    type IntoIter = XorSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        XorSetIntoIterator {
            inner: self.members.into_values(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a XorSet<T, S> {
    type Item = &'a T;
    type IntoIter = XorSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Equality is digest equality: same cardinality, same fingerprint. Members
// are never walked and `T: PartialEq` is never consulted.
impl<T, S> PartialEq for XorSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.fingerprint == other.fingerprint
    }
}

impl<T, S> Eq for XorSet<T, S> {}

// Hashes as the fingerprint alone, so nested sets cost O(1) to digest.
impl<T, S> Hash for XorSet<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint);
    }
}

impl<T: fmt::Debug, S> fmt::Debug for XorSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.members.values()).finish()
    }
}

// Renders as `Set{a, b}`, members in arbitrary order.
impl<T: fmt::Display, S> fmt::Display for XorSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Set{{")?;
        let mut first = true;
        for value in self.members.values() {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T, S> serde::Serialize for XorSet<T, S>
where
    T: serde::Serialize,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self.members.values() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct XorSetVisitor<T, S> {
    marker: std::marker::PhantomData<(T, S)>,
}

#[cfg(feature = "serde")]
impl<T, S> XorSetVisitor<T, S> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::de::Visitor<'de> for XorSetVisitor<T, S>
where
    T: serde::Deserialize<'de> + Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    type Value = XorSet<T, S>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence of set members")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = XorSet::with_hasher(S::default());
        while let Some(value) = seq.next_element()? {
            set.insert(value);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::Deserialize<'de> for XorSet<T, S>
where
    T: serde::Deserialize<'de> + Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(XorSetVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::set::SetOptions;

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_set() {
        let set: XorSet<i32> = XorSet::new();
        assert_eq!(format!("{set}"), "Set{}");
    }

    #[rstest]
    fn test_display_single_member_set() {
        let set = XorSet::singleton("one");
        assert_eq!(format!("{set}"), "Set{one}");
    }

    #[rstest]
    fn test_display_multiple_members_set() {
        let set: XorSet<i32> = XorSet::from_iter([1, 2]);
        let display = format!("{set}");
        assert!(display == "Set{1, 2}" || display == "Set{2, 1}");
    }

    // =========================================================================
    // Fingerprint Tests
    // =========================================================================

    #[rstest]
    fn test_fingerprint_is_xor_of_digests() {
        let set: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
        let expected = set.digest_of(&1) ^ set.digest_of(&2) ^ set.digest_of(&3);
        assert_eq!(set.fingerprint(), expected);
    }

    #[rstest]
    fn test_fingerprint_ignores_duplicate_insert() {
        let mut set = XorSet::singleton(7);
        let before = set.fingerprint();
        assert!(!set.insert(7));
        assert_eq!(set.fingerprint(), before);
    }

    #[rstest]
    fn test_fingerprint_untouched_by_absent_remove() {
        let mut set: XorSet<i32> = XorSet::from_iter([1, 2]);
        let before = set.fingerprint();
        assert!(!set.remove(&9));
        assert_eq!(set.fingerprint(), before);
        assert_eq!(set.len(), 2);
    }

    #[rstest]
    fn test_fingerprint_returns_to_zero() {
        let mut set: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
        assert!(set.remove(&1));
        assert!(set.remove(&2));
        assert!(set.remove(&3));
        assert_eq!(set.fingerprint(), 0);
        assert!(set.is_empty());
    }

    // =========================================================================
    // Basic Operation Tests
    // =========================================================================

    #[rstest]
    fn test_pop_until_empty() {
        let mut set: XorSet<i32> = XorSet::from_iter([1, 2]);
        let first = set.pop().unwrap();
        let second = set.pop().unwrap();
        assert_ne!(first, second);
        assert_eq!(set.pop(), None);
        assert_eq!(set.fingerprint(), 0);
    }

    #[rstest]
    fn test_clear_keeps_configuration() {
        let mut set: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
        let digest = set.digest_of(&1);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.fingerprint(), 0);
        // Same builder after clearing: same digests.
        assert_eq!(set.digest_of(&1), digest);
    }

    #[rstest]
    fn test_equality_ignores_insertion_order() {
        let a: XorSet<i32> = XorSet::from_iter([1, 2, 3]);
        let b: XorSet<i32> = XorSet::from_iter([3, 1, 2]);
        assert_eq!(a, b);
    }

    #[rstest]
    fn test_clone_is_deep() {
        let original: XorSet<i32> = XorSet::from_iter([1, 2]);
        let mut copy = original.clone();
        copy.insert(3);
        assert_eq!(original.len(), 2);
        assert_eq!(copy.len(), 3);
        assert_ne!(original, copy);
    }

    #[rstest]
    fn test_union_result_starts_with_an_empty_cache() {
        let options = SetOptions::new().cached(true);
        let a: XorSet<i32> = options.build_from([1, 2]);
        let b: XorSet<i32> = options.build_from([2, 3]);

        let union = a.union(&b);
        assert_eq!(union.len(), 3);
        assert!(union.is_cached());
        assert_eq!(union.cache.as_ref().map(DigestCache::len), Some(0));
    }
}
