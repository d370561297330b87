//! Property-based tests for set laws.
//!
//! These tests verify the algebraic identities the fingerprint machinery
//! must preserve: cardinality bounds, commutativity, the subset order, and
//! the XOR structure of the set-level hash.

use proptest::prelude::*;
use xorset::set::XorSet;

// =============================================================================
// Union Cardinality Law
// Description: |A ∪ B| ≤ |A| + |B|, with equality exactly when A and B
// are disjoint
// =============================================================================

proptest! {
    #[test]
    fn prop_union_cardinality_law(
        elements_a in prop::collection::vec(any::<i32>(), 0..40),
        elements_b in prop::collection::vec(any::<i32>(), 0..40)
    ) {
        let a: XorSet<i32> = elements_a.into_iter().collect();
        let b: XorSet<i32> = elements_b.into_iter().collect();

        let union = a.union(&b);
        prop_assert!(union.len() <= a.len() + b.len());
        prop_assert_eq!(
            union.len() == a.len() + b.len(),
            a.is_disjoint(&b)
        );
    }
}

// =============================================================================
// Union Commutativity Law
// Description: A ∪ B = B ∪ A
// =============================================================================

proptest! {
    #[test]
    fn prop_union_commutativity_law(
        elements_a in prop::collection::vec(any::<i32>(), 0..40),
        elements_b in prop::collection::vec(any::<i32>(), 0..40)
    ) {
        let a: XorSet<i32> = elements_a.into_iter().collect();
        let b: XorSet<i32> = elements_b.into_iter().collect();

        prop_assert_eq!(a.union(&b), b.union(&a));
    }
}

// =============================================================================
// Intersection Commutativity Law
// Description: A ∩ B = B ∩ A
// =============================================================================

proptest! {
    #[test]
    fn prop_intersection_commutativity_law(
        elements_a in prop::collection::vec(any::<i32>(), 0..40),
        elements_b in prop::collection::vec(any::<i32>(), 0..40)
    ) {
        let a: XorSet<i32> = elements_a.into_iter().collect();
        let b: XorSet<i32> = elements_b.into_iter().collect();

        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
    }
}

// =============================================================================
// Symmetric Difference Law
// Description: A △ B = (A \ B) ∪ (B \ A)
// =============================================================================

proptest! {
    #[test]
    fn prop_symmetric_difference_law(
        elements_a in prop::collection::vec(any::<i32>(), 0..40),
        elements_b in prop::collection::vec(any::<i32>(), 0..40)
    ) {
        let a: XorSet<i32> = elements_a.into_iter().collect();
        let b: XorSet<i32> = elements_b.into_iter().collect();

        let direct = a.symmetric_difference(&b);
        let composed = a.difference(&b).union(&b.difference(&a));
        prop_assert_eq!(direct, composed);
    }
}

// =============================================================================
// Intersection Bound Law
// Description: A ∩ B ⊆ A and A ∩ B ⊆ B
// =============================================================================

proptest! {
    #[test]
    fn prop_intersection_bound_law(
        elements_a in prop::collection::vec(any::<i32>(), 0..40),
        elements_b in prop::collection::vec(any::<i32>(), 0..40)
    ) {
        let a: XorSet<i32> = elements_a.into_iter().collect();
        let b: XorSet<i32> = elements_b.into_iter().collect();

        let shared = a.intersection(&b);
        prop_assert!(shared.is_subset(&a));
        prop_assert!(shared.is_subset(&b));
    }
}

// =============================================================================
// Subset Order Laws
// Description: ⊆ is reflexive, proper-⊂ is irreflexive, and mutual
// inclusion implies equality
// =============================================================================

proptest! {
    #[test]
    fn prop_subset_reflexivity_law(elements in prop::collection::vec(any::<i32>(), 0..40)) {
        let set: XorSet<i32> = elements.into_iter().collect();

        prop_assert!(set.is_subset(&set));
        prop_assert!(set.is_superset(&set));
        prop_assert!(!set.is_proper_subset(&set));
        prop_assert!(!set.is_proper_superset(&set));
    }
}

proptest! {
    #[test]
    fn prop_mutual_inclusion_implies_equality_law(
        elements_a in prop::collection::vec(any::<i32>(), 0..40),
        elements_b in prop::collection::vec(any::<i32>(), 0..40)
    ) {
        let a: XorSet<i32> = elements_a.into_iter().collect();
        let b: XorSet<i32> = elements_b.into_iter().collect();

        prop_assert_eq!(a.is_subset(&b) && b.is_subset(&a), a == b);
    }
}

// =============================================================================
// Equality Order-Insensitivity Law
// Description: insertion order never affects equality or the fingerprint
// =============================================================================

proptest! {
    #[test]
    fn prop_equality_ignores_order_law(elements in prop::collection::vec(any::<i32>(), 0..40)) {
        let forward: XorSet<i32> = elements.iter().copied().collect();
        let backward: XorSet<i32> = elements.iter().rev().copied().collect();

        prop_assert_eq!(forward.fingerprint(), backward.fingerprint());
        prop_assert_eq!(forward, backward);
    }
}

// =============================================================================
// Fingerprint Structure Laws
// Description: the fingerprint is the XOR fold of member digests, and
// draining a set restores the empty fingerprint
// =============================================================================

proptest! {
    #[test]
    fn prop_fingerprint_is_digest_fold_law(elements in prop::collection::vec(any::<i32>(), 0..40)) {
        let set: XorSet<i32> = elements.into_iter().collect();

        let folded = set
            .iter()
            .fold(0_u64, |accumulator, member| accumulator ^ set.digest_of(member));
        prop_assert_eq!(set.fingerprint(), folded);
    }
}

proptest! {
    #[test]
    fn prop_drained_set_has_zero_fingerprint_law(
        elements in prop::collection::vec(any::<i32>(), 0..40)
    ) {
        let mut set: XorSet<i32> = XorSet::new();
        set.insert_all(elements.iter().copied());
        set.remove_all(&elements);

        prop_assert!(set.is_empty());
        prop_assert_eq!(set.fingerprint(), 0);
    }
}

// =============================================================================
// Contains-All Consistency Law
// Description: a query drawn from the members always answers true
// =============================================================================

proptest! {
    #[test]
    fn prop_contains_all_members_law(elements in prop::collection::vec(any::<i32>(), 0..40)) {
        let set: XorSet<i32> = elements.into_iter().collect();
        let members = set.to_vec();

        prop_assert!(set.contains_all(&members));
    }
}

// =============================================================================
// Power Set Cardinality Law
// Description: |P(A)| = 2^|A|
// =============================================================================

proptest! {
    #[test]
    fn prop_power_set_cardinality_law(elements in prop::collection::vec(any::<i32>(), 0..6)) {
        let set: XorSet<i32> = elements.into_iter().collect();
        let subsets = set.power_set();

        prop_assert_eq!(subsets.len(), 1 << set.len());
        prop_assert!(subsets.contains(&XorSet::new()));
        prop_assert!(subsets.contains(&set));
    }
}

// =============================================================================
// Cartesian Product Cardinality Law
// Description: |A × B| = |A| · |B|
// =============================================================================

proptest! {
    #[test]
    fn prop_product_cardinality_law(
        elements_a in prop::collection::vec(any::<i32>(), 0..12),
        elements_b in prop::collection::vec(any::<i8>(), 0..12)
    ) {
        let a: XorSet<i32> = elements_a.into_iter().collect();
        let b: XorSet<i8> = elements_b.into_iter().collect();

        prop_assert_eq!(a.cartesian_product(&b).len(), a.len() * b.len());
    }
}
