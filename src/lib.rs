//! Dense matrix-multiplication benchmarking for square `f64` matrices.
//!
//! The crate compares three ways of computing `C += A * B`:
//!
//! - [`Kernel::Ijk`]: the textbook order, strided access to `B`
//! - [`Kernel::Ikj`]: loops reordered so the inner loop streams rows of `B` and `C`
//! - [`Kernel::Tiled`]: the reordered pattern applied tile by tile
//!
//! and measures each with the [`harness`], which reports elapsed time, GFLOP/s,
//! an access-model bandwidth estimate and a sampled checksum as CSV.
//!
//! ```
//! use matbench::{init_matrices, checksum, Kernel, Matrix};
//!
//! let n = 64;
//! let mut a = Matrix::new(n).unwrap();
//! let mut b = Matrix::new(n).unwrap();
//! let mut c = Matrix::new(n).unwrap();
//!
//! init_matrices(&mut a, &mut b, &mut c);
//! Kernel::Tiled { block: 16 }.multiply(&a, &b, &mut c);
//!
//! let digest = checksum(c.as_slice(), n);
//! assert!(digest.is_finite());
//! ```

pub mod checksum;
pub mod cli;
pub mod error;
pub mod harness;
pub mod init;
pub mod kernels;
pub mod logging;
pub mod matrix;
pub mod report;

pub use checksum::checksum;
pub use error::{BenchError, Result};
pub use harness::{AccessModel, ElapsedPolicy, Harness, Mode, RunConfig};
pub use init::init_matrices;
pub use kernels::Kernel;
pub use matrix::Matrix;
pub use report::{Report, ReportRow};

/// Byte alignment of every matrix buffer (one cache line, one AVX-512 register).
pub const ALIGNMENT: usize = 64;

/// Target number of elements summed by [`checksum`].
pub const CHECKSUM_SAMPLES: usize = 1024;

/// Block sizes swept by the tiled mode when none are given on the command line.
pub const DEFAULT_BLOCK_SIZES: [usize; 9] = [4, 8, 16, 24, 32, 48, 64, 96, 128];

pub const DEFAULT_LOOP_ORDER_N: usize = 1024;
pub const DEFAULT_LOOP_ORDER_REPS: usize = 3;

pub const DEFAULT_TILED_N: usize = 512;
pub const DEFAULT_TILED_REPS: usize = 2;
