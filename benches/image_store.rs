// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for image store lookups.
//!
//! Measures the performance of:
//! - Range scanning of a populated target directory
//! - Next-index allocation on a cold store (scan + probe)
//! - Adjacent lookups across a sparse directory

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::path::Path;
use tempfile::TempDir;
use touchcam::domain::storage::{Direction, ImageIndex, StorageTarget};
use touchcam::storage::{ImageStore, Ownership, StoragePaths};

/// Creates a directory with `count` empty photos spaced `stride` apart.
fn populated_dir(count: u16, stride: u16) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for i in 0..count {
        let index = ImageIndex::new(i * stride).expect("index in range");
        std::fs::write(dir.path().join(index.file_name()), b"jpeg").expect("write photo");
    }
    dir
}

fn store(path: &Path) -> ImageStore {
    ImageStore::new(StoragePaths::uniform(path), Ownership::process())
}

fn bench_scan_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_store");
    let dir = populated_dir(500, 1);
    let store = store(dir.path());

    group.bench_function("scan_range_500", |b| {
        b.iter(|| black_box(store.scan_range(StorageTarget::Photos)));
    });

    group.finish();
}

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_store");
    let dir = populated_dir(500, 1);

    group.bench_function("allocate_cold", |b| {
        b.iter(|| {
            let mut store = store(dir.path());
            black_box(store.allocate_next_index(StorageTarget::Photos).ok());
        });
    });

    group.finish();
}

fn bench_find_adjacent(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_store");
    // Ten photos spread across the whole index range.
    let dir = populated_dir(10, 1000);
    let store = store(dir.path());
    let from = ImageIndex::new(5000).expect("index in range");

    group.bench_function("find_adjacent_sparse", |b| {
        b.iter(|| {
            black_box(store.find_adjacent(
                StorageTarget::Photos,
                Some(from),
                Direction::Forward,
            ))
        });
    });

    group.bench_function("find_adjacent_wrap", |b| {
        b.iter(|| {
            black_box(store.find_adjacent(
                StorageTarget::Photos,
                Some(ImageIndex::new(9000).expect("index in range")),
                Direction::Forward,
            ))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_scan_range, bench_allocate, bench_find_adjacent);
criterion_main!(benches);
