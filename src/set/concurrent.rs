//! The lock-protected set flavor.
//!
//! [`ConcurrentXorSet`] wraps the core engine in one
//! [`parking_lot::RwLock`]; every method takes `&self` and synchronizes
//! internally, so one handle can be shared across threads by reference.
//! Binary operations over two lock-protected sets acquire both read locks
//! in a fixed global order, never in receiver order, which is what rules
//! out deadlock between `a.union(&b)` and `b.union(&a)`.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use parking_lot::RwLock;

use crate::hash::DefaultDigestBuilder;
use crate::set::core::XorSet;
use crate::set::flavor::SetLike;
use crate::set::flavor::sealed::Operand;
use crate::set::pair::OrderedPair;

// =============================================================================
// ConcurrentXorSet Definition
// =============================================================================

/// A lock-protected [`XorSet`].
///
/// All methods take `&self`: mutations go through the write lock, queries
/// through the read lock, so any number of threads can share one handle by
/// reference. Bulk reads (`to_vec`, `each`, `Display`, comparisons, the
/// algebra) observe the state at lock acquisition as a single consistent
/// snapshot. Locks are acquired unconditionally; there are no try-lock
/// fallbacks and no timeouts.
///
/// [`Clone`] produces an independent deep copy, never a second handle to
/// the same members. The handles themselves implement [`Hash`], [`Eq`], and
/// [`Display`](fmt::Display) through the fingerprint, so lock-protected
/// sets nest inside other sets just like core sets do.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use xorset::set::ConcurrentXorSet;
///
/// let set = ConcurrentXorSet::new();
/// thread::scope(|scope| {
///     for worker in 0..4 {
///         let set = &set;
///         scope.spawn(move || {
///             for offset in 0..25 {
///                 set.insert(worker * 25 + offset);
///             }
///         });
///     }
/// });
/// assert_eq!(set.len(), 100);
/// ```
pub struct ConcurrentXorSet<T, S = DefaultDigestBuilder> {
    core: Arc<RwLock<XorSet<T, S>>>,
}

static_assertions::assert_impl_all!(ConcurrentXorSet<i32>: Send, Sync);
static_assertions::assert_impl_all!(ConcurrentXorSet<String>: Send, Sync);

// =============================================================================
// Lock Discipline
// =============================================================================

impl<T, S> ConcurrentXorSet<T, S> {
    /// Runs `f` over the core under the read lock.
    pub(crate) fn with_core<R>(&self, f: impl FnOnce(&XorSet<T, S>) -> R) -> R {
        let guard = self.core.read();
        f(&guard)
    }

    /// Runs `f` over the core under the write lock.
    fn with_core_mut<R>(&self, f: impl FnOnce(&mut XorSet<T, S>) -> R) -> R {
        let mut guard = self.core.write();
        f(&mut guard)
    }

    /// Runs `f` over both cores, read-locking in a fixed global order.
    ///
    /// Locks are ranked by allocation address, never by receiver role, so
    /// two threads running `a.op(&b)` and `b.op(&a)` rank the pair
    /// identically and cannot deadlock. Aliased handles take a single
    /// guard.
    fn with_cores<R>(&self, other: &Self, f: impl FnOnce(&XorSet<T, S>, &XorSet<T, S>) -> R) -> R {
        if Arc::ptr_eq(&self.core, &other.core) {
            let guard = self.core.read();
            return f(&guard, &guard);
        }

        let (first, second) = if Arc::as_ptr(&self.core) < Arc::as_ptr(&other.core) {
            (&self.core, &other.core)
        } else {
            (&other.core, &self.core)
        };
        let first_guard = first.read();
        let second_guard = second.read();

        if Arc::ptr_eq(first, &self.core) {
            f(&first_guard, &second_guard)
        } else {
            f(&second_guard, &first_guard)
        }
    }

    /// Runs `f` over this core and an operand of either flavor.
    fn with_operands<R>(
        &self,
        other: &impl SetLike<T, S>,
        f: impl FnOnce(&XorSet<T, S>, &XorSet<T, S>) -> R,
    ) -> R {
        match other.operand() {
            Operand::Core(set) => {
                let guard = self.core.read();
                f(&guard, set)
            }
            Operand::Concurrent(set) => self.with_cores(set, f),
        }
    }
}

// =============================================================================
// Construction
// =============================================================================

impl<T> ConcurrentXorSet<T, DefaultDigestBuilder> {
    /// Creates a new empty set with the default digest builder and no cache.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::ConcurrentXorSet;
    ///
    /// let set: ConcurrentXorSet<i32> = ConcurrentXorSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::from(XorSet::new())
    }
}

impl<T, S> ConcurrentXorSet<T, S> {
    /// Creates a new empty set using `hasher` as its digest builder.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self::from(XorSet::with_hasher(hasher))
    }
}

impl<T, S> From<XorSet<T, S>> for ConcurrentXorSet<T, S> {
    fn from(core: XorSet<T, S>) -> Self {
        Self {
            core: Arc::new(RwLock::new(core)),
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

impl<T, S> ConcurrentXorSet<T, S> {
    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_core(|core| core.len())
    }

    /// Returns `true` if the set contains no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with_core(|core| core.is_empty())
    }

    /// The set-level hash: XOR of all member digests, `0` when empty.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        self.with_core(|core| core.fingerprint())
    }

    /// Whether digest memoization is enabled for this set.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.with_core(|core| core.is_cached())
    }

    /// Visits every member in arbitrary order until `visit` breaks.
    ///
    /// The read lock is held for the duration of the walk.
    pub fn each<F>(&self, visit: F)
    where
        F: FnMut(&T) -> ControlFlow<()>,
    {
        self.with_core(|core| core.each(visit));
    }
}

// =============================================================================
// Membership
// =============================================================================

impl<T, S> ConcurrentXorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Adds `value`, returning `true` if it was not already a member.
    pub fn insert(&self, value: T) -> bool {
        self.with_core_mut(|core| core.insert(value))
    }

    /// Adds every value from `values` under one write lock.
    pub fn insert_all<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.with_core_mut(|core| core.insert_all(values));
    }

    /// Removes `value`, returning `true` if it was a member.
    ///
    /// Removing an absent value is a no-op and leaves the fingerprint
    /// untouched.
    pub fn remove<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.with_core_mut(|core| core.remove(value))
    }

    /// Removes every value in `values` under one write lock.
    pub fn remove_all<Q>(&self, values: &[Q])
    where
        T: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.with_core_mut(|core| core.remove_all(values));
    }

    /// Returns `true` if `value` is a member.
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.with_core(|core| core.contains(value))
    }

    /// Returns `true` if every value in `values` is a member.
    ///
    /// The whole query is answered under one read lock; see
    /// [`XorSet::contains_all`] for the fingerprint shortcut and its
    /// duplicate-query caveat.
    #[must_use]
    pub fn contains_all<Q>(&self, values: &[Q]) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.with_core(|core| core.contains_all(values))
    }

    /// The digest this set's builder assigns to `value`.
    #[must_use]
    pub fn digest_of<Q>(&self, value: &Q) -> u64
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.with_core(|core| core.digest_of(value))
    }

    /// Removes and returns an arbitrary member, or `None` if empty.
    pub fn pop(&self) -> Option<T> {
        self.with_core_mut(|core| core.pop())
    }

    /// Removes all members, resetting the fingerprint to `0`.
    pub fn clear(&self) {
        self.with_core_mut(|core| core.clear());
    }

    /// Recomputes member digests after in-place element mutation, returning
    /// how many members had changed. See [`XorSet::update_hashes`].
    pub fn update_hashes(&self) -> usize {
        self.with_core_mut(|core| core.update_hashes())
    }

    /// Clones the members into a vector, in arbitrary order.
    ///
    /// The vector is a consistent snapshot: the state at lock acquisition.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.with_core(|core| core.to_vec())
    }
}

// =============================================================================
// Set Algebra
// =============================================================================

impl<T, S> ConcurrentXorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Returns a new set containing the members of both sets.
    #[must_use]
    pub fn union(&self, other: &impl SetLike<T, S>) -> Self {
        Self::from(self.with_operands(other, |mine, theirs| mine.union_core(theirs)))
    }

    /// Returns a new set containing the members present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &impl SetLike<T, S>) -> Self {
        Self::from(self.with_operands(other, |mine, theirs| mine.intersection_core(theirs)))
    }

    /// Returns a new set containing the members of this set absent from
    /// `other`.
    #[must_use]
    pub fn difference(&self, other: &impl SetLike<T, S>) -> Self {
        Self::from(self.with_operands(other, |mine, theirs| mine.difference_core(theirs)))
    }

    /// Returns a new set containing the members in exactly one of the two
    /// sets.
    #[must_use]
    pub fn symmetric_difference(&self, other: &impl SetLike<T, S>) -> Self {
        Self::from(self.with_operands(other, |mine, theirs| {
            mine.symmetric_difference_core(theirs)
        }))
    }

    /// Returns `true` if the two sets share no member.
    #[must_use]
    pub fn is_disjoint(&self, other: &impl SetLike<T, S>) -> bool {
        self.with_operands(other, |mine, theirs| mine.is_disjoint_core(theirs))
    }

    /// Returns `true` if every member of this set is a member of `other`.
    #[must_use]
    pub fn is_subset(&self, other: &impl SetLike<T, S>) -> bool {
        self.with_operands(other, |mine, theirs| mine.is_subset_core(theirs))
    }

    /// Returns `true` if this set is a subset of `other` and strictly
    /// smaller.
    #[must_use]
    pub fn is_proper_subset(&self, other: &impl SetLike<T, S>) -> bool {
        self.with_operands(other, |mine, theirs| {
            mine.len() < theirs.len() && mine.is_subset_core(theirs)
        })
    }

    /// Returns `true` if every member of `other` is a member of this set.
    ///
    /// Delegates to the subset check with the roles swapped; the lock order
    /// stays the global address order, so the swap cannot deadlock against
    /// a concurrent subset check running the other way.
    #[must_use]
    pub fn is_superset(&self, other: &impl SetLike<T, S>) -> bool {
        self.with_operands(other, |mine, theirs| theirs.is_subset_core(mine))
    }

    /// Returns `true` if this set is a superset of `other` and strictly
    /// larger.
    #[must_use]
    pub fn is_proper_superset(&self, other: &impl SetLike<T, S>) -> bool {
        self.with_operands(other, |mine, theirs| {
            theirs.len() < mine.len() && theirs.is_subset_core(mine)
        })
    }

    /// Returns the set of all 2ⁿ subsets of this set's current state.
    ///
    /// Subsets are core sets; wrap one in a [`ConcurrentXorSet`] if it needs
    /// to be shared.
    #[must_use]
    pub fn power_set(&self) -> ConcurrentXorSet<XorSet<T, S>, S> {
        ConcurrentXorSet::from(self.with_core(|core| core.power_set()))
    }

    /// Returns the set of all ordered pairs `(a, b)` with `a` from this set
    /// and `b` from `other`.
    ///
    /// A lock-protected operand is read-locked together with this set, so
    /// every pair comes from one simultaneous state. The guards are taken
    /// in ascending allocation address order, the same global rank every
    /// two-lock operation uses; an operand aliasing this set re-enters the
    /// single lock with a recursive read, which never waits on a queued
    /// writer.
    #[must_use]
    pub fn cartesian_product<U, O>(&self, other: &O) -> ConcurrentXorSet<OrderedPair<T, U>, S>
    where
        U: Clone + Hash + Eq,
        O: SetLike<U, S>,
    {
        match other.operand() {
            Operand::Core(set) => {
                ConcurrentXorSet::from(self.with_core(|mine| mine.product_core(set)))
            }
            Operand::Concurrent(set) => {
                // The operand's element type can differ, so the ranking
                // compares raw allocation addresses. Equal addresses mean
                // one shared allocation, which only an aliased same-typed
                // operand can produce.
                let mine_address = Arc::as_ptr(&self.core) as usize;
                let theirs_address = Arc::as_ptr(&set.core) as usize;

                let product = if mine_address == theirs_address {
                    let mine = self.core.read();
                    let theirs = set.core.read_recursive();
                    mine.product_core(&theirs)
                } else if mine_address < theirs_address {
                    let mine = self.core.read();
                    let theirs = set.core.read();
                    mine.product_core(&theirs)
                } else {
                    let theirs = set.core.read();
                    let mine = self.core.read();
                    mine.product_core(&theirs)
                };
                ConcurrentXorSet::from(product)
            }
        }
    }
}

// =============================================================================
// Conversion
// =============================================================================

impl<T, S> ConcurrentXorSet<T, S>
where
    T: Clone,
    S: Clone,
{
    /// Clones the core out under the read lock.
    ///
    /// The snapshot is an independent [`XorSet`]; later mutations of this
    /// set do not show through.
    #[must_use]
    pub fn snapshot(&self) -> XorSet<T, S> {
        self.with_core(|core| core.clone())
    }

    /// Consumes the handle and returns the core engine.
    ///
    /// Unwraps without cloning when this is the last handle to the
    /// allocation; otherwise falls back to a snapshot.
    #[must_use]
    pub fn into_inner(self) -> XorSet<T, S> {
        match Arc::try_unwrap(self.core) {
            Ok(lock) => lock.into_inner(),
            Err(shared) => shared.read().clone(),
        }
    }
}

// =============================================================================
// Cancellable Iteration
// =============================================================================

impl<T, S> ConcurrentXorSet<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    /// Starts a cancellable iteration over the members.
    ///
    /// A producer thread takes the read lock and hands member clones over a
    /// rendezvous channel, one at a time: at most one element is in flight,
    /// and the producer blocks until the consumer takes it. The read lock
    /// is held until the iteration is exhausted, [`stop`]ped, or dropped;
    /// writing to this set from the consuming thread before then would
    /// block.
    ///
    /// [`stop`]: ConcurrentIter::stop
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xorset::set::ConcurrentXorSet;
    ///
    /// let set: ConcurrentXorSet<i32> = ConcurrentXorSet::from_iter(1..=100);
    /// let mut members = set.iter();
    ///
    /// let first = members.next();
    /// assert!(first.is_some());
    ///
    /// members.stop();
    /// assert_eq!(members.next(), None);
    /// set.insert(101); // the read lock is released
    /// ```
    #[must_use]
    pub fn iter(&self) -> ConcurrentIter<T> {
        let core = Arc::clone(&self.core);
        let (sender, receiver) = mpsc::sync_channel(0);
        let producer = thread::spawn(move || {
            // The read lock is taken here, inside the producer, and held
            // until enumeration finishes or the receiver hangs up.
            let guard = core.read();
            for value in guard.iter() {
                if sender.send(value.clone()).is_err() {
                    break;
                }
            }
        });

        ConcurrentIter {
            receiver: Some(receiver),
            producer: Some(producer),
        }
    }
}

/// A cancellable iterator over a [`ConcurrentXorSet`].
///
/// Yields member clones in arbitrary order. Dropping the iterator cancels
/// the iteration, so an abandoned iterator never leaks the producer thread
/// or the set's read lock.
pub struct ConcurrentIter<T> {
    receiver: Option<Receiver<T>>,
    producer: Option<JoinHandle<()>>,
}

static_assertions::assert_impl_all!(ConcurrentIter<i32>: Send);

impl<T> ConcurrentIter<T> {
    /// Cancels the iteration.
    ///
    /// Hangs up the channel, which fails the producer's next send and
    /// releases the set's read lock, then joins the producer. After `stop`
    /// the iterator yields `None`. Idempotent.
    pub fn stop(&mut self) {
        self.receiver = None;
        if let Some(producer) = self.producer.take() {
            // The producer cannot fail on its own; join only propagates a
            // panicking element Clone.
            let _ = producer.join();
        }
    }
}

impl<T> Iterator for ConcurrentIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        match self.receiver.as_ref()?.recv() {
            Ok(value) => Some(value),
            Err(_) => {
                // Producer exhausted the members and hung up; reap it.
                self.stop();
                None
            }
        }
    }
}

impl<T> Drop for ConcurrentIter<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, S: Default> Default for ConcurrentXorSet<T, S> {
    #[inline]
    fn default() -> Self {
        Self::from(XorSet::default())
    }
}

// Deep copy: an independent set, never a second handle to the same members.
impl<T: Clone, S: Clone> Clone for ConcurrentXorSet<T, S> {
    fn clone(&self) -> Self {
        Self::from(self.snapshot())
    }
}

impl<T, S> FromIterator<T> for ConcurrentXorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(XorSet::from_iter(iter))
    }
}

impl<T, S> Extend<T> for ConcurrentXorSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<T, S> PartialEq for ConcurrentXorSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.with_cores(other, |mine, theirs| {
            mine.len() == theirs.len() && mine.fingerprint() == theirs.fingerprint()
        })
    }
}

impl<T, S> Eq for ConcurrentXorSet<T, S> {}

impl<T, S> PartialEq<XorSet<T, S>> for ConcurrentXorSet<T, S> {
    fn eq(&self, other: &XorSet<T, S>) -> bool {
        self.with_core(|mine| {
            mine.len() == other.len() && mine.fingerprint() == other.fingerprint()
        })
    }
}

impl<T, S> PartialEq<ConcurrentXorSet<T, S>> for XorSet<T, S> {
    fn eq(&self, other: &ConcurrentXorSet<T, S>) -> bool {
        other.with_core(|theirs| {
            self.len() == theirs.len() && self.fingerprint() == theirs.fingerprint()
        })
    }
}

impl<T, S> Hash for ConcurrentXorSet<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint());
    }
}

impl<T: fmt::Debug, S> fmt::Debug for ConcurrentXorSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_core(|core| fmt::Debug::fmt(core, formatter))
    }
}

impl<T: fmt::Display, S> fmt::Display for ConcurrentXorSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_core(|core| fmt::Display::fmt(core, formatter))
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T, S> serde::Serialize for ConcurrentXorSet<T, S>
where
    T: serde::Serialize,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        self.with_core(|core| core.serialize(serializer))
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::Deserialize<'de> for ConcurrentXorSet<T, S>
where
    T: serde::Deserialize<'de> + Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        XorSet::deserialize(deserializer).map(Self::from)
    }
}

// =============================================================================
// Tests
// =============================================================================
