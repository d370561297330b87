//! IAI-Callgrind benchmark for XorSet operations.
//!
//! Measures instruction counts for construction, membership probing, set
//! algebra, and equality. Equality runs at 10000 elements because it resolves
//! from the cardinality and the aggregate fingerprint; its instruction count
//! should stay flat as the sets grow.

use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use std::hint::black_box;
use xorset::set::{OrderedPair, XorSet};

// Setup functions for different data sizes
fn setup_vec_100() -> Vec<i32> {
    (0..100).collect()
}

fn setup_vec_1000() -> Vec<i32> {
    (0..1000).collect()
}

fn setup_vec_10000() -> Vec<i32> {
    (0..10000).collect()
}

fn setup_set_10() -> XorSet<i32> {
    (0..10).collect()
}

fn setup_set_1000() -> XorSet<i32> {
    (0..1000).collect()
}

fn setup_overlapping_sets_1000() -> (XorSet<i32>, XorSet<i32>) {
    ((0..1000).collect(), (500..1500).collect())
}

fn setup_equal_sets_10000() -> (XorSet<i32>, XorSet<i32>) {
    ((0..10000).collect(), (0..10000).rev().collect())
}

fn setup_square_sets_32() -> (XorSet<i32>, XorSet<i32>) {
    ((0..32).collect(), (0..32).collect())
}

// from_iter benchmarks
#[library_benchmark]
#[bench::with_setup(setup_vec_100())]
fn from_iter_100(elements: Vec<i32>) -> XorSet<i32> {
    black_box(XorSet::from_iter(black_box(elements)))
}

#[library_benchmark]
#[bench::with_setup(setup_vec_1000())]
fn from_iter_1000(elements: Vec<i32>) -> XorSet<i32> {
    black_box(XorSet::from_iter(black_box(elements)))
}

#[library_benchmark]
#[bench::with_setup(setup_vec_10000())]
fn from_iter_10000(elements: Vec<i32>) -> XorSet<i32> {
    black_box(XorSet::from_iter(black_box(elements)))
}

// Incremental insert benchmark
#[library_benchmark]
fn insert_1000() -> XorSet<i32> {
    let mut set = XorSet::new();
    for index in 0..1000 {
        set.insert(black_box(index));
    }
    black_box(set)
}

// Membership probing benchmark
#[library_benchmark]
#[bench::with_setup(setup_set_1000())]
fn contains_all_1000(set: XorSet<i32>) -> i32 {
    let set = black_box(set);
    let mut hits = 0;
    for key in 0..1000 {
        if set.contains(&black_box(key)) {
            hits += 1;
        }
    }
    black_box(hits)
}

// Set algebra benchmarks
#[library_benchmark]
#[bench::with_setup(setup_overlapping_sets_1000())]
fn union_1000(operands: (XorSet<i32>, XorSet<i32>)) -> XorSet<i32> {
    let (left, right) = black_box(operands);
    black_box(left.union(&right))
}

#[library_benchmark]
#[bench::with_setup(setup_overlapping_sets_1000())]
fn intersection_1000(operands: (XorSet<i32>, XorSet<i32>)) -> XorSet<i32> {
    let (left, right) = black_box(operands);
    black_box(left.intersection(&right))
}

// Equality benchmark
#[library_benchmark]
#[bench::with_setup(setup_equal_sets_10000())]
fn equality_10000(operands: (XorSet<i32>, XorSet<i32>)) -> bool {
    let (forward, backward) = black_box(operands);
    black_box(forward == backward)
}

// Subset enumeration benchmark
#[library_benchmark]
#[bench::with_setup(setup_set_10())]
fn power_set_10(set: XorSet<i32>) -> XorSet<XorSet<i32>> {
    black_box(black_box(set).power_set())
}

// Pairing benchmark
#[library_benchmark]
#[bench::with_setup(setup_square_sets_32())]
fn cartesian_product_32(operands: (XorSet<i32>, XorSet<i32>)) -> XorSet<OrderedPair<i32, i32>> {
    let (left, right) = black_box(operands);
    black_box(left.cartesian_product(&right))
}

// Iteration benchmark
#[library_benchmark]
#[bench::with_setup(setup_set_1000())]
fn iter_1000(set: XorSet<i32>) -> i32 {
    black_box(black_box(set).iter().sum())
}

library_benchmark_group!(
    name = xor_set_group;
    benchmarks =
        from_iter_100, from_iter_1000, from_iter_10000,
        insert_1000,
        contains_all_1000,
        union_1000, intersection_1000,
        equality_10000,
        power_set_10,
        cartesian_product_32,
        iter_1000
);

main!(library_benchmark_groups = xor_set_group);
