//! IAI-Callgrind benchmark for PersistentTreeMap operations.
//!
//! Measures instruction counts for construction, lookup, erase and iteration.
//!
//! # Data Sizes
//!
//! - **get_sequential / erase_all**: 100, 1000, 10000 (multi-size for regression detection)
//! - **insert_sequential / iter**: 1000 (single size)
//!
//! Setup functions passed to `#[bench::with_setup]` build the input maps, so
//! their cost is not attributed to the measured operation.

use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use persistent_rbmap::persistent::PersistentTreeMap;
use std::hint::black_box;

fn setup_map(size: i32) -> PersistentTreeMap<i32, i32> {
    (0..size).map(|key| (key, key)).collect()
}

#[library_benchmark]
fn insert_sequential_1000() -> PersistentTreeMap<i32, i32> {
    let mut map = PersistentTreeMap::new();
    for key in 0..1000 {
        map = map.insert(black_box(key), black_box(key));
    }
    black_box(map)
}

#[library_benchmark]
fn insert_interleaved_1000() -> PersistentTreeMap<i32, i32> {
    let mut map = PersistentTreeMap::new();
    for index in 0..1000 {
        let key = (index * 7919) % 1000;
        map = map.insert(black_box(key), black_box(index));
    }
    black_box(map)
}

#[library_benchmark]
#[bench::size_100(setup_map(100))]
#[bench::size_1000(setup_map(1000))]
#[bench::size_10000(setup_map(10000))]
fn get_sequential(map: PersistentTreeMap<i32, i32>) -> i32 {
    let mut sum = 0;
    for key in 0..black_box(map.len() as i32) {
        if let Some(&value) = map.get(&key) {
            sum += value;
        }
    }
    black_box(sum)
}

#[library_benchmark]
#[bench::size_100(setup_map(100))]
#[bench::size_1000(setup_map(1000))]
#[bench::size_10000(setup_map(10000))]
fn erase_all(map: PersistentTreeMap<i32, i32>) -> PersistentTreeMap<i32, i32> {
    let mut current = map.clone();
    for key in 0..black_box(map.len() as i32) {
        current = current.erase(&key);
    }
    black_box(current)
}

#[library_benchmark]
#[bench::with_setup(setup_map(1000))]
fn iter_1000(map: PersistentTreeMap<i32, i32>) -> i32 {
    black_box(map.values().sum())
}

library_benchmark_group!(
    name = persistent_treemap_group;
    benchmarks =
        insert_sequential_1000, insert_interleaved_1000,
        get_sequential,
        erase_all,
        iter_1000
);

main!(library_benchmark_groups = persistent_treemap_group);
