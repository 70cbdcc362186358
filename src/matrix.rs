//! Aligned storage for one square `f64` matrix operand.
//!
//! A [`Matrix`] owns exactly `n * n` doubles in a single row-major
//! allocation whose base address is [`ALIGNMENT`]-byte aligned, so wide
//! vector loads and stores on row starts never split a cache line. The
//! alignment matters for speed only; the kernels are correct on any
//! address.
//!
//! Storage is obtained with `std::alloc::alloc_zeroed` and released in
//! [`Drop`] with the very same [`Layout`]. There is no growth: the size
//! is fixed when the matrix is created.

use std::alloc::{self, Layout};
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr::NonNull;
use std::slice;

use ndarray::ArrayView2;

use crate::error::{allocation_error, invalid_argument, layout_error, Result};
use crate::ALIGNMENT;

/// A square, row-major, 64-byte aligned matrix of `f64`.
///
/// Element `(i, j)` lives at linear offset `i * n + j`.
pub struct Matrix {
    ptr: NonNull<f64>,
    n: usize,
    /// Stored so deallocation uses exactly the allocation layout.
    layout: Layout,
}

// SAFETY: `Matrix` uniquely owns its allocation, like `Vec<f64>`.
unsafe impl Send for Matrix {}
unsafe impl Sync for Matrix {}

impl Matrix {
    /// Allocates a zero-filled `n x n` matrix.
    ///
    /// # Errors
    ///
    /// * [`BenchError::InvalidArgument`] if `n == 0`.
    /// * [`BenchError::LayoutError`] if `n * n * 8` overflows or exceeds `isize::MAX`.
    /// * [`BenchError::AllocationError`] if the allocator returns null.
    ///
    /// [`BenchError::InvalidArgument`]: crate::BenchError::InvalidArgument
    /// [`BenchError::LayoutError`]: crate::BenchError::LayoutError
    /// [`BenchError::AllocationError`]: crate::BenchError::AllocationError
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(invalid_argument("matrix dimension must be positive"));
        }

        let size_bytes = n
            .checked_mul(n)
            .and_then(|len| len.checked_mul(mem::size_of::<f64>()))
            .ok_or_else(|| {
                layout_error(
                    usize::MAX,
                    ALIGNMENT,
                    format!("{n} x {n} matrix of f64 overflows usize"),
                )
            })?;

        let layout = Layout::from_size_align(size_bytes, ALIGNMENT)
            .map_err(|e| layout_error(size_bytes, ALIGNMENT, e.to_string()))?;

        // SAFETY: `layout` has a non-zero size because `n > 0`.
        let raw = unsafe { alloc::alloc_zeroed(layout) };

        let ptr = NonNull::new(raw.cast::<f64>()).ok_or_else(|| {
            allocation_error(
                size_bytes,
                ALIGNMENT,
                format!("cannot allocate {n} x {n} matrix"),
            )
        })?;

        Ok(Matrix { ptr, n, layout })
    }

    /// Allocates an `n x n` matrix whose linear element `i` is `f(i)`.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize) -> f64) -> Result<Self> {
        let mut matrix = Self::new(n)?;
        for (i, x) in matrix.iter_mut().enumerate() {
            *x = f(i);
        }
        Ok(matrix)
    }

    /// Side length `n`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Number of stored elements, always `n * n`.
    #[inline]
    pub fn len(&self) -> usize {
        self.n * self.n
    }

    /// Always `false`: a matrix holds at least one element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Size of the storage in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        // SAFETY: `ptr` points to `n * n` initialized (zeroed at least) f64s
        // owned by `self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len()) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len()) }
    }

    /// Returns `true` if the base address meets [`ALIGNMENT`].
    pub fn is_aligned(&self) -> bool {
        (self.ptr.as_ptr() as usize) % ALIGNMENT == 0
    }

    /// Row `i` as a contiguous slice of `n` elements.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.as_slice()[i * self.n..(i + 1) * self.n]
    }

    /// Two-dimensional `ndarray` view over the same storage.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        ArrayView2::from_shape((self.n, self.n), self.as_slice())
            .expect("matrix storage always holds n * n elements")
    }
}

impl Drop for Matrix {
    fn drop(&mut self) {
        // SAFETY: allocated in `new` with exactly `self.layout`.
        unsafe {
            alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout);
        }
    }
}

impl Deref for Matrix {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl DerefMut for Matrix {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.as_slice()[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        let n = self.n;
        &mut self.as_mut_slice()[i * n + j]
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("n", &self.n)
            .field("bytes", &self.layout.size())
            .field("align", &self.layout.align())
            .finish()
    }
}
