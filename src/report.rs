//! Report rows and their CSV rendering.
//!
//! Output format, one header then one line per trial:
//!
//! ```text
//! kernel,n,reps,time_ms,gflops,bandwidth_GBps,check
//! ijk,1024,3,9123.456,0.706,5.653,-1.234567e+02
//! ```
//!
//! In tiled mode the first column is `block` and holds the block size.
//! Time, throughput and bandwidth carry three decimals; the checksum uses
//! the C `%.6e` layout (signed, at least two exponent digits) so reports
//! diff cleanly against ones produced by other tools.

use std::io::Write;

use crate::error::Result;
use crate::harness::Mode;

/// Measurements of one `(kernel, configuration)` trial.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// `ijk`, `ikj`, or the block size.
    pub label: String,
    pub n: usize,
    pub reps: usize,
    pub time_ms: f64,
    pub gflops: f64,
    /// Access-model estimate, not a hardware counter reading.
    pub bandwidth_gbps: f64,
    /// Sampled checksum of `C` after the last repetition.
    pub check: f64,
    /// Elapsed time was below the clock floor and was raised to it.
    pub clamped: bool,
}

impl ReportRow {
    /// Renders the row without a trailing newline.
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{:.3},{:.3},{:.3},{}",
            self.label,
            self.n,
            self.reps,
            self.time_ms,
            self.gflops,
            self.bandwidth_gbps,
            format_scientific(self.check)
        )
    }
}

/// Formats `x` like C's `printf("%.6e", x)`.
pub fn format_scientific(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let rust = format!("{:.6e}", x);
    match rust.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => rust,
    }
}

/// CSV writer that streams rows as trials finish.
pub struct CsvWriter<W: Write> {
    out: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W) -> Self {
        CsvWriter { out }
    }

    pub fn write_header(&mut self, mode: Mode) -> Result<()> {
        writeln!(self.out, "{}", mode.csv_header())?;
        Ok(())
    }

    /// Writes and flushes one row, so partial runs still show finished trials.
    pub fn write_row(&mut self, row: &ReportRow) -> Result<()> {
        writeln!(self.out, "{}", row.to_csv())?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// All rows produced by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    mode: Mode,
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn new(mode: Mode) -> Self {
        Report {
            mode,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Row with the highest GFLOP/s. Ties keep the earliest row.
    pub fn best(&self) -> Option<&ReportRow> {
        self.rows.iter().fold(None, |best, row| match best {
            Some(b) if b.gflops >= row.gflops => Some(b),
            _ => Some(row),
        })
    }

    /// Full CSV text: header plus every row.
    pub fn to_csv(&self) -> String {
        let mut text = String::from(self.mode.csv_header());
        text.push('\n');
        for row in &self.rows {
            text.push_str(&row.to_csv());
            text.push('\n');
        }
        text
    }
}
