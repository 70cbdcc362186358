//! The multiply kernel family.
//!
//! Every kernel computes `C += A * B` for square row-major `f64` matrices and
//! performs the same `2 * n^3` floating-point operations. They differ only in
//! the order the `(i, j, k)` iteration space is walked, which decides how well
//! each memory access reuses what is already in cache:
//!
//! | kernel  | inner loop                          | `B` access     |
//! |---------|-------------------------------------|----------------|
//! | `ijk`   | reduction over `k` into a register  | stride `n`     |
//! | `ikj`   | `C[i][..] += A[i][k] * B[k][..]`    | unit stride    |
//! | tiled   | `ikj` restricted to a `BS^3` tile   | unit stride    |
//!
//! For a fixed output cell `(i, j)` all three kernels add the products in
//! ascending `k`, so on the same inputs they produce bit-identical results
//! as long as the compiler does not contract `a * b + c` into an FMA.
//!
//! The slice-level functions ([`matmul_ijk`], [`matmul_ikj`], [`matmul_tiled`])
//! take raw row-major storage and perform no per-element validation. The
//! [`Kernel`] enum is the safe entry point: it works on [`Matrix`] values,
//! whose shared/exclusive borrows guarantee that `C` never aliases `A` or `B`.

use std::fmt;

use crate::matrix::Matrix;

pub mod naive;
pub mod tiled;

pub use naive::{matmul_ijk, matmul_ikj};
pub use tiled::matmul_tiled;

/// One interchangeable multiply strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// Natural `i-j-k` order with a register accumulator per output cell.
    Ijk,
    /// Reordered `i-k-j` order streaming contiguous rows of `B` and `C`.
    Ikj,
    /// Cache-blocked `i-k-j` order with square tiles of side `block`.
    Tiled { block: usize },
}

impl Kernel {
    /// The kernels compared by the loop-order mode, in report order.
    pub const LOOP_ORDERS: [Kernel; 2] = [Kernel::Ijk, Kernel::Ikj];

    /// Computes `c += a * b`.
    ///
    /// # Panics
    ///
    /// Panics if the three matrices do not share one dimension, or if a
    /// tiled kernel has `block == 0`.
    pub fn multiply(&self, a: &Matrix, b: &Matrix, c: &mut Matrix) {
        let n = c.dim();
        assert!(
            a.dim() == n && b.dim() == n,
            "dimension mismatch: A is {}, B is {}, C is {}",
            a.dim(),
            b.dim(),
            n
        );

        match *self {
            Kernel::Ijk => matmul_ijk(a, b, c, n),
            Kernel::Ikj => matmul_ikj(a, b, c, n),
            Kernel::Tiled { block } => matmul_tiled(a, b, c, n, block),
        }
    }

    /// Label used in the first CSV column: `ijk`, `ikj`, or the block size.
    pub fn label(&self) -> String {
        match self {
            Kernel::Ijk => "ijk".to_string(),
            Kernel::Ikj => "ikj".to_string(),
            Kernel::Tiled { block } => block.to_string(),
        }
    }

    /// Block size of a tiled kernel.
    pub fn block(&self) -> Option<usize> {
        match self {
            Kernel::Tiled { block } => Some(*block),
            _ => None,
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kernel::Ijk => f.pad("ijk"),
            Kernel::Ikj => f.pad("ikj"),
            Kernel::Tiled { block } => f.pad(&format!("tiled(bs={block})")),
        }
    }
}

/// `y += alpha * x` over two equally long rows.
///
/// Zipped iterators keep the bounds checks out of the loop so it
/// vectorizes into a broadcast and a stream of multiply-adds.
#[inline(always)]
pub(crate) fn axpy_row(alpha: f64, x: &[f64], y: &mut [f64]) {
    debug_assert_eq!(x.len(), y.len());
    for (yj, &xj) in y.iter_mut().zip(x) {
        *yj += alpha * xj;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Kernel::Ijk.label(), "ijk");
        assert_eq!(Kernel::Ikj.label(), "ikj");
        assert_eq!(Kernel::Tiled { block: 48 }.label(), "48");
        assert_eq!(Kernel::Tiled { block: 48 }.to_string(), "tiled(bs=48)");
        assert_eq!(Kernel::Tiled { block: 48 }.block(), Some(48));
        assert_eq!(Kernel::Ikj.block(), None);
    }

    #[test]
    fn test_axpy_row() {
        let x = [1.0, 2.0, 3.0];
        let mut y = [10.0, 20.0, 30.0];
        axpy_row(0.5, &x, &mut y);
        assert_eq!(y, [10.5, 21.0, 31.5]);
    }

    #[test]
    fn test_2x2_known_product() {
        let a = Matrix::from_fn(2, |i| [1.0, 2.0, 3.0, 4.0][i]).unwrap();
        let b = Matrix::from_fn(2, |i| [5.0, 6.0, 7.0, 8.0][i]).unwrap();

        for kernel in [Kernel::Ijk, Kernel::Ikj, Kernel::Tiled { block: 1 }] {
            let mut c = Matrix::new(2).unwrap();
            kernel.multiply(&a, &b, &mut c);
            assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0], "{kernel}");
        }
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn test_dimension_mismatch_panics() {
        let a = Matrix::new(3).unwrap();
        let b = Matrix::new(4).unwrap();
        let mut c = Matrix::new(3).unwrap();
        Kernel::Ikj.multiply(&a, &b, &mut c);
    }
}
