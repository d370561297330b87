//! The capability shared by both set flavors.

#[cfg(feature = "sync")]
use crate::set::concurrent::ConcurrentXorSet;
use crate::set::core::XorSet;

pub(crate) mod sealed {
    #[cfg(feature = "sync")]
    use crate::set::concurrent::ConcurrentXorSet;
    use crate::set::core::XorSet;

    /// A borrowed view of a binary-operation operand.
    ///
    /// Operations dispatch on this view: a core operand is used directly, a
    /// concurrent operand is read-locked by the receiver under the
    /// two-operand locking discipline.
    pub enum Operand<'a, T, S> {
        /// A single-threaded set.
        Core(&'a XorSet<T, S>),
        /// A lock-protected set.
        #[cfg(feature = "sync")]
        Concurrent(&'a ConcurrentXorSet<T, S>),
    }

    pub trait Sealed<T, S> {
        fn operand(&self) -> Operand<'_, T, S>;
    }
}

/// Capability of both set flavors, accepted by every binary operation.
///
/// `SetLike` is implemented by exactly [`XorSet`] and [`ConcurrentXorSet`].
/// The supertrait is crate-private, so no further implementation can be
/// written: an operand is always one of the two flavors, and operations can
/// rely on reaching its digest map. Code generic over flavors gets the
/// cheap read-only accessors below.
///
/// # Examples
///
/// ```rust
/// use xorset::set::{SetLike, XorSet};
///
/// fn audit<T, S>(set: &impl SetLike<T, S>) -> (usize, u64) {
///     (set.len(), set.fingerprint())
/// }
///
/// let weekdays: XorSet<&str> = XorSet::from_iter(["mon", "tue"]);
/// assert_eq!(audit(&weekdays).0, 2);
/// ```
///
/// Foreign types cannot implement it:
///
/// ```compile_fail
/// use xorset::set::SetLike;
///
/// struct Roster;
///
/// impl<T, S> SetLike<T, S> for Roster {}
/// ```
pub trait SetLike<T, S>: sealed::Sealed<T, S> {
    /// Number of members.
    fn len(&self) -> usize {
        match self.operand() {
            sealed::Operand::Core(set) => set.len(),
            #[cfg(feature = "sync")]
            sealed::Operand::Concurrent(set) => set.len(),
        }
    }

    /// Whether the set has no members.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The set-level hash: XOR of all member digests, `0` when empty.
    fn fingerprint(&self) -> u64 {
        match self.operand() {
            sealed::Operand::Core(set) => set.fingerprint(),
            #[cfg(feature = "sync")]
            sealed::Operand::Concurrent(set) => set.fingerprint(),
        }
    }
}

impl<T, S> sealed::Sealed<T, S> for XorSet<T, S> {
    fn operand(&self) -> sealed::Operand<'_, T, S> {
        sealed::Operand::Core(self)
    }
}

impl<T, S> SetLike<T, S> for XorSet<T, S> {}

#[cfg(feature = "sync")]
impl<T, S> sealed::Sealed<T, S> for ConcurrentXorSet<T, S> {
    fn operand(&self) -> sealed::Operand<'_, T, S> {
        sealed::Operand::Concurrent(self)
    }
}

#[cfg(feature = "sync")]
impl<T, S> SetLike<T, S> for ConcurrentXorSet<T, S> {}
