//! Cache-blocked `i-k-j` kernel.
//!
//! The `i`, `k` and `j` ranges are cut into blocks of `bs` indices and the
//! blocks are visited in `(i-block, k-block, j-block)` order. Inside a tile
//! the reordered inner pattern runs on row segments of length at most `bs`,
//! so between two uses of the same `A`, `B` and `C` sub-ranges the working
//! set stays around `3 * bs^2` doubles. A well-chosen `bs` keeps that in L1
//! or L2; a tiny one drowns in loop overhead.
//!
//! Edge tiles are clipped to `n`, so any `n` works with any `bs`. For
//! `bs >= n` there is a single tile and the kernel is exactly
//! [`matmul_ikj`](super::matmul_ikj).

use std::cmp::min;

use super::axpy_row;

/// Tiled multiplication `C += A * B` with square tiles of side `bs`.
///
/// # Arguments
///
/// * `a`, `b` - Operands (n × n), row-major
/// * `c` - Accumulator (n × n), row-major
/// * `n` - Side length
/// * `bs` - Tile side; values above `n` behave like `n`
///
/// # Panics
///
/// Panics if `bs == 0`.
pub fn matmul_tiled(a: &[f64], b: &[f64], c: &mut [f64], n: usize, bs: usize) {
    assert!(bs > 0, "block size must be positive");
    debug_assert!(a.len() == n * n && b.len() == n * n && c.len() == n * n);

    let bs = min(bs, n);

    for i0 in (0..n).step_by(bs) {
        let i_max = min(i0 + bs, n);

        for k0 in (0..n).step_by(bs) {
            let k_max = min(k0 + bs, n);

            for j0 in (0..n).step_by(bs) {
                let j_max = min(j0 + bs, n);

                for i in i0..i_max {
                    let c_seg = &mut c[i * n + j0..i * n + j_max];
                    for k in k0..k_max {
                        let aik = a[i * n + k];
                        let b_seg = &b[k * n + j0..k * n + j_max];
                        axpy_row(aik, b_seg, c_seg);
                    }
                }
            }
        }
    }
}
