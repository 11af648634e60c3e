use std::time::Duration;

use fifocov::prelude::*;

const SAFETY_NET: Duration = Duration::from_secs(30);

fn run(cfg: TbConfig, depth: usize) -> (TbResult<RunSummary>, Testbench<FifoModel>) {
    let dut = FifoModel::new(cfg.width, depth).with_seed(cfg.seed.unwrap_or(0));
    let mut tb = Testbench::new(cfg, dut).unwrap();
    (tb.run(), tb)
}

#[test]
fn read_data_closes_on_model() {
    let width = DataWidth::new(4);
    let cfg = TbConfig::read_data(width)
        .with_seed(11)
        .with_watchdog(Some(SAFETY_NET));
    let (res, tb) = run(cfg, 8);
    let summary = res.unwrap();

    assert_eq!(summary.variant, Variant::ReadData);
    assert_eq!(summary.seed, 11);
    assert_eq!(summary.output_covered, 16);
    assert_eq!(summary.domain, 16);
    assert!(summary.scoreboard.matched >= 16);
    assert_eq!(summary.scoreboard.received, summary.scoreboard.matched);
    assert!(summary.items_generated > 0);
    assert!(tb.is_closed());
}

#[test]
fn flag_stress_closes_on_model() {
    let width = DataWidth::new(4);
    let cfg = TbConfig::flag_stress(width)
        .with_seed(12)
        .with_watchdog(Some(SAFETY_NET));
    let (res, tb) = run(cfg, 8);
    let summary = res.unwrap();

    assert_eq!(summary.output_covered, 16);
    assert!(summary.flags_closed);
    for flag in [Flag::Overflow, Flag::Underflow] {
        assert_eq!(tb.coverage().flag_point(flag).covered(), 2);
    }
}

#[test]
fn flag_stress_closes_across_geometries() {
    for bits in 1..=4 {
        for depth in [1, 2, 4, 16, 32] {
            for seed in 0..3 {
                let cfg = TbConfig::flag_stress(DataWidth::new(bits))
                    .with_seed(seed)
                    .with_watchdog(Some(SAFETY_NET));
                let (res, tb) = run(cfg, depth);
                let summary = res.unwrap_or_else(|e| {
                    panic!("width {bits} depth {depth} seed {seed}: {e}")
                });
                assert!(summary.flags_closed);
                assert!(tb.coverage().flag_point(Flag::Overflow).contains(1));
            }
        }
    }
}

#[test]
fn narrow_data_deep_fifo_still_overflows() {
    // 2 * 2^(1+2) = 16 writes would only just fill 16 words
    let width = DataWidth::new(1);
    for seed in 0..40 {
        let cfg = TbConfig::flag_stress(width)
            .with_seed(seed)
            .with_watchdog(Some(SAFETY_NET));
        let (res, _) = run(cfg, 16);
        let summary = res.unwrap_or_else(|e| panic!("seed {seed}: {e}"));
        assert!(summary.flags_closed);
    }
}

#[test]
fn same_seed_same_run() {
    let width = DataWidth::new(3);
    let cfg = TbConfig::flag_stress(width)
        .with_seed(99)
        .with_watchdog(Some(SAFETY_NET));
    let (a, _) = run(cfg.clone(), 4);
    let (b, _) = run(cfg, 4);
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.steps, b.steps);
    assert_eq!(a.items_generated, b.items_generated);
    assert_eq!(a.scoreboard, b.scoreboard);
}

#[test]
fn spurious_read_done_is_caught() {
    let width = DataWidth::new(4);
    let cfg = TbConfig::flag_stress(width)
        .with_seed(5)
        .with_watchdog(Some(SAFETY_NET));
    let dut = FifoModel::new(width, 4)
        .with_seed(5)
        .with_mutation(Mutation::ReadDoneWhenEmpty)
        .unwrap();
    let mut tb = Testbench::new(cfg, dut).unwrap();
    let err = tb.run().unwrap_err();
    assert!(err.is_scoreboard_error(), "got {err}");
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn artifacts_written_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let vcd = dir.path().join("waveform.vcd");
    let xml = dir.path().join("results.xml");
    let width = DataWidth::new(2);
    let cfg = TbConfig::flag_stress(width)
        .with_seed(3)
        .with_watchdog(Some(SAFETY_NET))
        .with_trace(&vcd)
        .with_report(&xml);
    let (res, _) = run(cfg, 4);
    let summary = res.unwrap();

    let wave = std::fs::read_to_string(&vcd).unwrap();
    assert!(wave.contains("$enddefinitions $end"));
    assert!(wave.contains("#0\n"));
    assert!(wave.contains(&format!("#{}\n", summary.steps - 1)));

    let report = std::fs::read_to_string(&xml).unwrap();
    assert!(report.contains("fifocov.flag_stress"));
    assert!(report.contains("coverage.o_data"));
    assert!(report.contains("coverage.o_overflow"));
    assert!(!report.contains("<failure"));
}

#[test]
fn artifacts_written_on_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let vcd = dir.path().join("waveform.vcd");
    let xml = dir.path().join("results.xml");
    let width = DataWidth::new(8);
    let cfg = TbConfig::read_data(width)
        .with_seed(3)
        .with_watchdog(Some(Duration::ZERO))
        .with_trace(&vcd)
        .with_report(&xml);
    let (res, _) = run(cfg, 4);
    assert!(matches!(res, Err(TbError::CoverageTimeout { .. })));

    let wave = std::fs::read_to_string(&vcd).unwrap();
    assert!(wave.contains("#0\n"));
    let report = std::fs::read_to_string(&xml).unwrap();
    assert!(report.contains("coverage.o_data"));
    assert!(report.contains("<failure"));
}

#[test]
fn unwritable_report_surfaces_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let xml = dir.path().join("no_such_dir").join("results.xml");
    let width = DataWidth::new(2);
    let cfg = TbConfig::read_data(width)
        .with_seed(8)
        .with_watchdog(Some(SAFETY_NET))
        .with_report(&xml);
    let (res, _) = run(cfg, 4);
    let err = res.unwrap_err();
    assert!(matches!(err, TbError::Io { .. }));
    assert_eq!(err.exit_code(), 3);
}
