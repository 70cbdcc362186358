//! Deterministic operand initialization.
//!
//! Every trial starts from the same `A`, `B` and a zeroed `C`, so kernels
//! are compared on identical inputs. The patterns are pure functions of the
//! linear index with periods 97 and 89: neither operand is constant, and
//! the two never line up row-for-row.

use crate::matrix::Matrix;

/// Value of `A` at linear index `i`: `((i mod 97) - 48) * 0.01`.
#[inline]
pub fn a_value(i: usize) -> f64 {
    ((i % 97) as f64 - 48.0) * 0.01
}

/// Value of `B` at linear index `i`: `((i mod 89) - 44) * 0.01`.
#[inline]
pub fn b_value(i: usize) -> f64 {
    ((i % 89) as f64 - 44.0) * 0.01
}

/// Fills `a` and `b` with their patterns and zeroes `c`.
///
/// All three matrices must have the same dimension.
pub fn init_matrices(a: &mut Matrix, b: &mut Matrix, c: &mut Matrix) {
    debug_assert!(a.dim() == b.dim() && b.dim() == c.dim());

    for (i, x) in a.iter_mut().enumerate() {
        *x = a_value(i);
    }
    for (i, x) in b.iter_mut().enumerate() {
        *x = b_value(i);
    }
    c.fill(0.0);
}
