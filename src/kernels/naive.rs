//! Untiled kernels: natural `i-j-k` and reordered `i-k-j`.
//!
//! # Arguments (both kernels)
//!
//! * `a` - Matrix A (n × n), row-major
//! * `b` - Matrix B (n × n), row-major
//! * `c` - Matrix C (n × n), row-major, accumulated into (C += A * B)
//! * `n` - Side length; every slice must hold exactly `n * n` elements

use super::axpy_row;

/// Natural-order multiplication (`i` outer, `j` middle, `k` inner).
///
/// Each `C[i][j]` is loaded once into a register, receives the whole
/// reduction, and is stored once. The reduction walks a row of `A`
/// contiguously but a column of `B` with stride `n`, so every step of the
/// inner loop touches a new cache line of `B` once `n` is large.
pub fn matmul_ijk(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    debug_assert!(a.len() == n * n && b.len() == n * n && c.len() == n * n);

    for i in 0..n {
        let a_row = &a[i * n..(i + 1) * n];
        let c_row = &mut c[i * n..(i + 1) * n];

        for (j, cij) in c_row.iter_mut().enumerate() {
            let mut acc = *cij;
            for (k, &aik) in a_row.iter().enumerate() {
                acc += aik * b[k * n + j];
            }
            *cij = acc;
        }
    }
}

/// Reordered multiplication (`i` outer, `k` middle, `j` inner).
///
/// Swapping the `j` and `k` loops turns the inner loop into
/// `C[i][..] += A[i][k] * B[k][..]`: one scalar of `A` is loaded per
/// `(i, k)` and broadcast across unit-stride rows of `B` and `C`.
/// Same FLOP count as [`matmul_ijk`], far better spatial locality.
pub fn matmul_ikj(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    debug_assert!(a.len() == n * n && b.len() == n * n && c.len() == n * n);

    for i in 0..n {
        let c_row = &mut c[i * n..(i + 1) * n];
        for k in 0..n {
            let aik = a[i * n + k];
            let b_row = &b[k * n..(k + 1) * n];
            axpy_row(aik, b_row, c_row);
        }
    }
}
