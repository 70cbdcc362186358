//! Matrix Multiplication Benchmark Comparison
//!
//! Compares the `ijk`, `ikj` and tiled kernels across matrix sizes, with
//! ndarray's `dot` as an outside reference point.
//!
//! # Usage:
//! ```bash
//! # Run all matrix multiplication benchmarks
//! cargo bench --bench matmul
//!
//! # Run one size group
//! cargo bench --bench matmul -- matmul_256
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use ndarray::Array2;
use rand::prelude::*;

use matbench::kernels::{matmul_ijk, matmul_ikj, matmul_tiled};
use matbench::Matrix;

/// Create a row-major test matrix with entries in [-1, 1).
fn create_matrix(n: usize, rng: &mut StdRng) -> Matrix {
    Matrix::from_fn(n, |_| rng.random_range(-1.0..1.0)).unwrap()
}

/// Benchmark all kernels for a specific size - creates one graph per size
fn bench_matmul_by_size(c: &mut Criterion) {
    let sizes = [64, 128, 256, 512];

    for n in sizes {
        let mut group = c.benchmark_group(format!("matmul_{n}"));
        group.sample_size(10);
        group.throughput(Throughput::Elements((2 * n * n * n) as u64));

        let mut rng = StdRng::seed_from_u64(42);
        let a = create_matrix(n, &mut rng);
        let b = create_matrix(n, &mut rng);
        let mut out = Matrix::new(n).unwrap();

        group.bench_function("ijk", |bench| {
            bench.iter(|| {
                matmul_ijk(black_box(&a), black_box(&b), black_box(&mut out), n);
            });
        });

        out.fill(0.0);
        group.bench_function("ikj", |bench| {
            bench.iter(|| {
                matmul_ikj(black_box(&a), black_box(&b), black_box(&mut out), n);
            });
        });

        out.fill(0.0);
        group.bench_function("tiled_32", |bench| {
            bench.iter(|| {
                matmul_tiled(black_box(&a), black_box(&b), black_box(&mut out), n, 32);
            });
        });

        let a_nd = Array2::from_shape_vec((n, n), a.to_vec()).unwrap();
        let b_nd = Array2::from_shape_vec((n, n), b.to_vec()).unwrap();
        group.bench_function("ndarray", |bench| {
            bench.iter(|| black_box(black_box(&a_nd).dot(black_box(&b_nd))));
        });

        group.finish();
    }
}

criterion_group!(benches, bench_matmul_by_size);
criterion_main!(benches);
