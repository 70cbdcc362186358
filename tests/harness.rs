//! End-to-end tests of the measurement harness and its CSV report.

use matbench::harness::{self, Harness, MIN_ELAPSED_SECS};
use matbench::{checksum, init_matrices, ElapsedPolicy, Kernel, Matrix, Mode, RunConfig};

fn run_to_string(config: &RunConfig) -> (matbench::Report, String) {
    let mut out = Vec::new();
    let report = harness::run(config, &mut out).unwrap();
    (report, String::from_utf8(out).unwrap())
}

fn assert_sane(row: &matbench::ReportRow) {
    assert!(row.time_ms > 0.0 && row.time_ms.is_finite(), "{row:?}");
    assert!(row.gflops > 0.0 && row.gflops.is_finite(), "{row:?}");
    assert!(row.bandwidth_gbps > 0.0 && row.bandwidth_gbps.is_finite(), "{row:?}");
    assert!(row.check.is_finite(), "{row:?}");
}

#[test]
fn test_loop_order_report() {
    let config = RunConfig::loop_order(48, 2).unwrap();
    let (report, csv) = run_to_string(&config);

    println!("{csv}");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "kernel,n,reps,time_ms,gflops,bandwidth_GBps,check");
    assert!(lines[1].starts_with("ijk,48,2,"));
    assert!(lines[2].starts_with("ikj,48,2,"));

    for line in &lines[1..] {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 7, "{line}");
        for field in &fields[3..6] {
            let decimals = field.split_once('.').map(|(_, d)| d.len());
            assert_eq!(decimals, Some(3), "{field} in {line}");
        }
        assert!(fields[6].contains("e+") || fields[6].contains("e-"), "{line}");
    }

    assert_eq!(report.rows().len(), 2);
    report.rows().iter().for_each(assert_sane);

    let (ijk, ikj) = (&report.rows()[0], &report.rows()[1]);
    let tolerance = 1e-9 * ijk.check.abs().max(1.0);
    assert!((ijk.check - ikj.check).abs() <= tolerance);
    assert_eq!(report.to_csv(), csv);
}

#[test]
fn test_tiled_report_follows_block_order() {
    let config = RunConfig::tiled(40, 1, [16, 3, 0, 64]).unwrap();
    let (report, csv) = run_to_string(&config);

    let labels: Vec<&str> = report.rows().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["16", "3", "64"]);
    assert!(csv.starts_with("block,n,reps,time_ms,gflops,bandwidth_GBps,check\n16,40,1,"));

    report.rows().iter().for_each(assert_sane);
    let first = report.rows()[0].check;
    for row in report.rows() {
        assert_eq!(row.check.to_bits(), first.to_bits(), "block {}", row.label);
    }
    assert!(report.best().is_some());
}

#[test]
fn test_checksum_matches_manual_repetition() {
    let n = 20;
    let reps = 3;
    let mut harness = Harness::with_dimension(n).unwrap();
    let row = harness
        .run_trial(Kernel::Tiled { block: 6 }, reps, ElapsedPolicy::Clamp)
        .unwrap();

    let mut a = Matrix::new(n).unwrap();
    let mut b = Matrix::new(n).unwrap();
    let mut c = Matrix::new(n).unwrap();
    init_matrices(&mut a, &mut b, &mut c);
    for _ in 0..reps {
        Kernel::Ikj.multiply(&a, &b, &mut c);
    }

    assert_eq!(row.check.to_bits(), checksum(&c, n).to_bits());
    assert_eq!(harness.output().as_slice(), c.as_slice());
}

#[test]
fn test_empty_block_list_emits_header_only() {
    let config = RunConfig::tiled(8, 1, [0, 0]).unwrap();
    let (report, csv) = run_to_string(&config);
    assert!(report.rows().is_empty());
    assert_eq!(csv, format!("{}\n", Mode::Tiled.csv_header()));
}

#[test]
fn test_tiny_trials_never_report_infinite_throughput() {
    // n = 1 finishes in nanoseconds; the row is clamped or skipped, never infinite.
    let clamp = RunConfig::loop_order(1, 1).unwrap();
    let (report, _) = run_to_string(&clamp);
    assert_eq!(report.rows().len(), 2);
    for row in report.rows() {
        assert_sane(row);
        assert!(row.time_ms >= MIN_ELAPSED_SECS * 1000.0);
    }

    let skip = RunConfig::loop_order(1, 1)
        .unwrap()
        .with_elapsed_policy(ElapsedPolicy::Skip);
    let (report, csv) = run_to_string(&skip);
    assert_eq!(csv.lines().count(), report.rows().len() + 1);
    report.rows().iter().for_each(assert_sane);
}

#[test]
fn test_allocation_failure_writes_nothing() {
    let config = RunConfig::loop_order(usize::MAX / 2, 1).unwrap();
    let mut out = Vec::new();
    let error = harness::run(&config, &mut out).unwrap_err();
    assert!(error.is_fatal());
    assert!(out.is_empty());
}
