//! Timing and accounting harness.
//!
//! A run owns three matrices for its whole lifetime and executes one trial
//! per kernel configuration:
//!
//! 1. re-initialize `A`, `B`, `C` ([`init_matrices`]);
//! 2. read the monotonic clock ([`Instant`]);
//! 3. call the kernel `reps` times, each call accumulating into the same `C`;
//! 4. read the clock again;
//! 5. derive GFLOP/s from `reps * 2 * n^3` operations;
//! 6. derive GB/s from the kernel's [`AccessModel`];
//! 7. sample the checksum of `C` and emit a [`ReportRow`].
//!
//! `C` keeps growing across repetitions; that keeps every repetition doing
//! the same work on the same buffers and is what the FLOP count assumes.
//!
//! The checksum is written into every row, which makes the kernel results
//! observable and keeps the optimizer from discarding the multiplications.

use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::checksum::checksum;
use crate::error::{invalid_argument, measurement_error, Result};
use crate::init::init_matrices;
use crate::kernels::Kernel;
use crate::matrix::Matrix;
use crate::report::{CsvWriter, Report, ReportRow};
use crate::{
    DEFAULT_BLOCK_SIZES, DEFAULT_LOOP_ORDER_N, DEFAULT_LOOP_ORDER_REPS, DEFAULT_TILED_N,
    DEFAULT_TILED_REPS,
};

/// Smallest elapsed time a throughput is derived from.
pub const MIN_ELAPSED_SECS: f64 = 1e-9;

const BYTES_PER_F64: f64 = std::mem::size_of::<f64>() as f64;

/// Which family of kernels a run compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `ijk` against `ikj`.
    LoopOrder,
    /// The tiled kernel, once per block size.
    Tiled,
}

impl Mode {
    pub fn csv_header(&self) -> &'static str {
        match self {
            Mode::LoopOrder => "kernel,n,reps,time_ms,gflops,bandwidth_GBps,check",
            Mode::Tiled => "block,n,reps,time_ms,gflops,bandwidth_GBps,check",
        }
    }

    pub fn default_n(&self) -> usize {
        match self {
            Mode::LoopOrder => DEFAULT_LOOP_ORDER_N,
            Mode::Tiled => DEFAULT_TILED_N,
        }
    }

    pub fn default_reps(&self) -> usize {
        match self {
            Mode::LoopOrder => DEFAULT_LOOP_ORDER_REPS,
            Mode::Tiled => DEFAULT_TILED_REPS,
        }
    }
}

/// What to do when a trial finishes faster than [`MIN_ELAPSED_SECS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElapsedPolicy {
    /// Raise the elapsed time to the floor and flag the row as clamped.
    #[default]
    Clamp,
    /// Drop the row with a [`BenchError::MeasurementError`](crate::BenchError::MeasurementError).
    Skip,
}

/// Immutable description of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    pub n: usize,
    pub reps: usize,
    /// Tiled mode only; always positive.
    pub block_sizes: Vec<usize>,
    pub elapsed_policy: ElapsedPolicy,
}

impl RunConfig {
    /// `ijk` versus `ikj` on `n x n` matrices.
    pub fn loop_order(n: usize, reps: usize) -> Result<Self> {
        Self::validate(n, reps)?;
        Ok(RunConfig {
            mode: Mode::LoopOrder,
            n,
            reps,
            block_sizes: Vec::new(),
            elapsed_policy: ElapsedPolicy::default(),
        })
    }

    /// Tiled kernel for each block size; zero entries are dropped.
    pub fn tiled(n: usize, reps: usize, block_sizes: impl IntoIterator<Item = usize>) -> Result<Self> {
        Self::validate(n, reps)?;
        let block_sizes = block_sizes
            .into_iter()
            .filter(|&bs| {
                if bs == 0 {
                    debug!("skipping block size 0");
                }
                bs > 0
            })
            .collect();
        Ok(RunConfig {
            mode: Mode::Tiled,
            n,
            reps,
            block_sizes,
            elapsed_policy: ElapsedPolicy::default(),
        })
    }

    /// Tiled kernel over [`DEFAULT_BLOCK_SIZES`].
    pub fn tiled_default(n: usize, reps: usize) -> Result<Self> {
        Self::tiled(n, reps, DEFAULT_BLOCK_SIZES)
    }

    pub fn with_elapsed_policy(mut self, policy: ElapsedPolicy) -> Self {
        self.elapsed_policy = policy;
        self
    }

    /// Kernels to run, in report order.
    pub fn kernels(&self) -> Vec<Kernel> {
        match self.mode {
            Mode::LoopOrder => Kernel::LOOP_ORDERS.to_vec(),
            Mode::Tiled => self
                .block_sizes
                .iter()
                .map(|&block| Kernel::Tiled { block })
                .collect(),
        }
    }

    fn validate(n: usize, reps: usize) -> Result<()> {
        if n == 0 {
            return Err(invalid_argument("n must be positive"));
        }
        if reps == 0 {
            return Err(invalid_argument("reps must be positive"));
        }
        Ok(())
    }
}

/// Total floating-point operations of `reps` multiplications: `reps * 2 * n^3`.
pub fn flop_count(n: usize, reps: usize) -> f64 {
    let n = n as f64;
    reps as f64 * 2.0 * n * n * n
}

/// Closed-form memory-traffic model per kernel.
///
/// These are illustrative element-access counts times 8 bytes, not DRAM
/// traffic measured by hardware counters; caches absorb most of the modeled
/// accesses. They are only meant to compare kernels on a common scale.
///
/// * `ijk`: `A` and `B` loaded once per inner step (`2 n^3` loads), `C`
///   loaded and stored once per cell (`2 n^2`): `16 n^3 + 16 n^2` bytes.
/// * `ikj`: `B` loaded and `C` loaded and stored per inner step (`3 n^3`),
///   `A` loaded once per `(i, k)` (`n^2`): `24 n^3 + 8 n^2` bytes.
/// * tiled: the useful traffic only, one pass over each of `A`, `B` and a
///   read plus write of `C`: `4 n^2 * 8` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessModel;

impl AccessModel {
    /// Modeled bytes moved by `reps` calls of `kernel` on `n x n` matrices.
    pub fn bytes(kernel: Kernel, n: usize, reps: usize) -> f64 {
        let n = n as f64;
        let n2 = n * n;
        let n3 = n2 * n;
        let per_call = match kernel {
            Kernel::Ijk => 16.0 * n3 + 16.0 * n2,
            Kernel::Ikj => 24.0 * n3 + 8.0 * n2,
            Kernel::Tiled { .. } => 4.0 * n2 * BYTES_PER_F64,
        };
        reps as f64 * per_call
    }
}

/// Converts a measured duration into seconds usable as a divisor.
///
/// Returns the seconds and whether they were raised to [`MIN_ELAPSED_SECS`].
pub fn resolve_elapsed(elapsed: Duration, policy: ElapsedPolicy) -> Result<(f64, bool)> {
    let secs = elapsed.as_secs_f64();
    if secs >= MIN_ELAPSED_SECS {
        return Ok((secs, false));
    }

    match policy {
        ElapsedPolicy::Clamp => Ok((MIN_ELAPSED_SECS, true)),
        ElapsedPolicy::Skip => Err(measurement_error(
            secs,
            "elapsed time indistinguishable from zero; increase n or reps",
        )),
    }
}

/// Owns the three operands of a run.
#[derive(Debug)]
pub struct Harness {
    a: Matrix,
    b: Matrix,
    c: Matrix,
}

impl Harness {
    /// Allocates `A`, `B` and `C`. Any failure aborts before measuring.
    pub fn with_dimension(n: usize) -> Result<Self> {
        let a = Matrix::new(n)?;
        let b = Matrix::new(n)?;
        let c = Matrix::new(n)?;
        debug!(n, bytes_each = c.size_bytes(), "allocated operands");
        Ok(Harness { a, b, c })
    }

    pub fn dim(&self) -> usize {
        self.c.dim()
    }

    /// Output matrix as left by the last trial.
    pub fn output(&self) -> &Matrix {
        &self.c
    }

    /// Runs one trial from freshly initialized operands.
    ///
    /// # Errors
    ///
    /// [`BenchError::MeasurementError`](crate::BenchError::MeasurementError)
    /// if the elapsed time is below [`MIN_ELAPSED_SECS`] under
    /// [`ElapsedPolicy::Skip`].
    pub fn run_trial(
        &mut self,
        kernel: Kernel,
        reps: usize,
        policy: ElapsedPolicy,
    ) -> Result<ReportRow> {
        let n = self.dim();
        init_matrices(&mut self.a, &mut self.b, &mut self.c);

        debug!(%kernel, n, reps, "trial started");
        let start = Instant::now();
        for _ in 0..reps {
            kernel.multiply(&self.a, &self.b, &mut self.c);
        }
        let elapsed = start.elapsed();

        let check = checksum(&self.c, n);
        let (secs, clamped) = resolve_elapsed(elapsed, policy)?;

        let gflops = flop_count(n, reps) / secs / 1e9;
        let bandwidth_gbps = AccessModel::bytes(kernel, n, reps) / secs / 1e9;
        debug!(%kernel, secs, gflops, bandwidth_gbps, check, "trial finished");

        Ok(ReportRow {
            label: kernel.label(),
            n,
            reps,
            time_ms: secs * 1000.0,
            gflops,
            bandwidth_gbps,
            check,
            clamped,
        })
    }

    /// Runs every trial of `config`, streaming rows to `writer`.
    ///
    /// Rows that fail to measure are skipped; any other error aborts.
    pub fn run<W: Write>(&mut self, config: &RunConfig, writer: &mut CsvWriter<W>) -> Result<Report> {
        if config.n != self.dim() {
            return Err(invalid_argument(format!(
                "harness holds {0} x {0} matrices but the run asks for n = {1}",
                self.dim(),
                config.n
            )));
        }

        let kernels = config.kernels();
        info!(
            mode = ?config.mode,
            n = config.n,
            reps = config.reps,
            trials = kernels.len(),
            "starting run"
        );
        if kernels.is_empty() {
            warn!("no positive block sizes given; nothing to measure");
        }

        let mut report = Report::new(config.mode);
        writer.write_header(config.mode)?;

        for kernel in kernels {
            match self.run_trial(kernel, config.reps, config.elapsed_policy) {
                Ok(row) => {
                    if row.clamped {
                        warn!(
                            %kernel,
                            floor_secs = MIN_ELAPSED_SECS,
                            "elapsed time below clock floor, throughput unreliable; raise n or reps"
                        );
                    }
                    writer.write_row(&row)?;
                    report.push(row);
                }
                Err(e) if !e.is_fatal() => warn!(%kernel, error = %e, "row skipped"),
                Err(e) => return Err(e),
            }
        }

        if config.mode == Mode::Tiled {
            if let Some(best) = report.best() {
                info!(block = %best.label, gflops = best.gflops, "fastest block size");
            }
        }

        Ok(report)
    }
}

/// Allocates the operands for `config` and runs it, writing CSV to `out`.
///
/// Allocation happens before anything is written, so a failed allocation
/// leaves `out` untouched.
pub fn run<W: Write>(config: &RunConfig, out: W) -> Result<Report> {
    let mut harness = Harness::with_dimension(config.n)?;
    let mut writer = CsvWriter::new(out);
    harness.run(config, &mut writer)
}
