use std::path::Path;

use junit_report::{Duration, ReportBuilder, TestCase, TestCaseBuilder, TestSuiteBuilder};

use crate::config::Variant;
use crate::coverage::{CoverPoint, CoverageTracker, DataSet, Flag};
use crate::error::TbError;
use crate::testbench::RunSummary;
use crate::TbResult;

/// Coverpoints that must close for a run of this variant to pass.
fn required_points(variant: Variant, cvg: &CoverageTracker) -> Vec<&CoverPoint> {
    match variant {
        Variant::ReadData => vec![cvg.data_point(DataSet::Output)],
        Variant::FlagStress => vec![
            cvg.data_point(DataSet::Output),
            cvg.flag_point(Flag::Overflow),
            cvg.flag_point(Flag::Underflow),
        ],
    }
}

fn coverage_case(point: &CoverPoint, secs: f64) -> TestCase {
    let name = format!("coverage.{}", point.name());
    let duration = Duration::seconds_f64(secs);
    if point.is_closed() {
        TestCaseBuilder::success(&name, duration).build()
    } else {
        TestCaseBuilder::failure(
            &name,
            duration,
            "coverage",
            &format!(
                "covered {}/{} bins, missing {:?}",
                point.covered(),
                point.domain(),
                point.missing(16)
            ),
        )
        .build()
    }
}

/// Writes the results file: one case for the scoreboard, one per required
/// coverpoint.
pub fn write_report(
    path: &Path,
    summary: &RunSummary,
    cvg: &CoverageTracker,
    failure: Option<&TbError>,
) -> TbResult<()> {
    let secs = summary.elapsed.as_secs_f64();
    let mut test_cases = Vec::new();

    let scb_case = match failure {
        Some(e) if e.is_scoreboard_error() => TestCaseBuilder::failure(
            "scoreboard",
            Duration::seconds_f64(secs),
            "scoreboard",
            &e.to_string(),
        ),
        _ => TestCaseBuilder::success("scoreboard", Duration::seconds_f64(secs)),
    }
    .build();
    test_cases.push(scb_case);

    for point in required_points(summary.variant, cvg) {
        test_cases.push(coverage_case(point, secs));
    }

    let test_suite = TestSuiteBuilder::new(&format!("fifocov.{}", summary.variant.name()))
        .add_testcases(test_cases)
        .build();
    let report = ReportBuilder::new().add_testsuite(test_suite).build();
    let file = std::fs::File::create(path).map_err(|e| TbError::io(path, e))?;
    report.write_xml(file).map_err(|e| TbError::Report {
        path: path.to_path_buf(),
        reason: format!("{:?}", e),
    })
}
