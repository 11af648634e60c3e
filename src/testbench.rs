//! The closed-loop control loop tying stimulus, DUT and checking together.

use std::time::{Duration, Instant};

use log::{error, info, warn};
use num_format::{Locale, ToFormattedString};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{TbConfig, Variant};
use crate::coverage::{CoverageTracker, DataSet, Flag};
use crate::driver::Driver;
use crate::error::TbError;
use crate::junit;
use crate::monitor::{InputMonitor, OutputMonitor};
use crate::scoreboard::{Scoreboard, ScoreboardStats};
use crate::sequence::{Sequence, SequencePhase};
use crate::signal::Pin;
use crate::sim_if::{SimIf, SimTime};
use crate::trace::{NullTrace, TraceSink, VcdTrace};
use crate::TbResult;

/// Wall-clock deadline, polled once per step.
#[derive(Debug, Clone, Copy)]
pub struct Watchdog {
    start: Instant,
    limit: Option<Duration>,
}

impl Watchdog {
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed time once the limit has been reached.
    pub fn expired(&self) -> Option<Duration> {
        let limit = self.limit?;
        let elapsed = self.elapsed();
        (elapsed >= limit).then_some(elapsed)
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub variant: Variant,
    pub seed: u64,
    pub steps: u64,
    pub active_edges: u64,
    pub items_generated: u64,
    pub phase: SequencePhase,
    pub scoreboard: ScoreboardStats,
    pub input_covered: u64,
    pub output_covered: u64,
    pub domain: u64,
    pub flags_closed: bool,
    pub elapsed: Duration,
}

pub struct Testbench<D: SimIf> {
    config: TbConfig,
    seed: u64,
    dut: D,
    trace: Box<dyn TraceSink>,
    coverage: CoverageTracker,
    scoreboard: Scoreboard,
    sequence: Sequence,
    driver: Driver,
    in_mon: InputMonitor,
    out_mon: OutputMonitor,
    time: SimTime,
    active_edges: u64,
    elapsed: Duration,
}

impl<D: SimIf> Testbench<D> {
    pub fn new(mut config: TbConfig, dut: D) -> TbResult<Self> {
        match (config.depth, dut.fifo_depth()) {
            (Some(want), Some(have)) if want != have => {
                return Err(TbError::Config {
                    reason: format!(
                        "DUT is {} words deep but the testbench is configured for {}",
                        have, want
                    ),
                });
            }
            (None, Some(depth)) => config.depth = Some(depth),
            _ => {}
        }
        config.validate()?;
        if dut.width() != config.width {
            return Err(TbError::Config {
                reason: format!(
                    "DUT is {} wide but the testbench is configured for {}",
                    dut.width(),
                    config.width
                ),
            });
        }
        let seed = config.seed.unwrap_or_else(rand::random);
        let trace: Box<dyn TraceSink> = match &config.trace_path {
            Some(path) => Box::new(VcdTrace::create(path)?),
            None => Box::new(NullTrace),
        };
        let sequence = Sequence::new(
            config.width,
            config.variant.bias_set(),
            config.stress_burst(),
            StdRng::seed_from_u64(seed),
        );
        Ok(Self {
            seed,
            dut,
            trace,
            coverage: CoverageTracker::new(config.width),
            scoreboard: Scoreboard::new(),
            sequence,
            driver: Driver::new(),
            in_mon: InputMonitor::new(),
            out_mon: OutputMonitor::new(config.variant),
            time: SimTime::default(),
            active_edges: 0,
            elapsed: Duration::ZERO,
            config,
        })
    }

    /// Replaces the trace sink chosen from the configuration.
    pub fn with_trace(mut self, trace: Box<dyn TraceSink>) -> Self {
        self.trace = trace;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn dut(&self) -> &D {
        &self.dut
    }

    pub fn coverage(&self) -> &CoverageTracker {
        &self.coverage
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Runs until the variant's coverage goal is met or a failure occurs.
    ///
    /// Trace and results file are flushed on every exit path before this
    /// returns.
    pub fn run(&mut self) -> TbResult<RunSummary> {
        info!(
            "Starting {} run: {}, seed {}",
            self.config.variant.name(),
            self.config.width,
            self.seed
        );
        let watchdog = Watchdog::start(self.config.watchdog);
        let outcome = self.run_loop(&watchdog);
        self.elapsed = watchdog.elapsed();
        let finished = self.finish(outcome.as_ref().err());
        match (outcome, finished) {
            (Err(e), Err(flush)) => {
                error!("Failed to flush artifacts: {}", flush);
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), Err(flush)) => Err(flush),
            (Ok(()), Ok(())) => Ok(self.summary()),
        }
    }

    /// Coverage goal of the configured variant.
    pub fn is_closed(&self) -> bool {
        match self.config.variant {
            Variant::ReadData => self.coverage.data_coverage_closed(),
            Variant::FlagStress => {
                self.coverage.data_coverage_closed() && self.coverage.flag_coverage_closed()
            }
        }
    }

    fn run_loop(&mut self, watchdog: &Watchdog) -> TbResult<()> {
        while !self.is_closed() {
            self.step(watchdog)?;
        }
        Ok(())
    }

    /// Advances the design by half a clock period.
    pub fn step(&mut self, watchdog: &Watchdog) -> TbResult<()> {
        self.dut.rand_reset(self.config.reset_pattern);
        self.apply_reset()?;
        self.dut.toggle(Pin::IClkWr)?;
        self.dut.toggle(Pin::IClkRd)?;
        self.dut.eval();

        self.trace.dump(self.time.step(), &self.dut)?;
        self.time.advance();

        if let Some(elapsed) = watchdog.expired() {
            warn!(
                "Watchdog expired after {:.3}s at step {}",
                elapsed.as_secs_f64(),
                self.time
            );
            return Err(TbError::CoverageTimeout {
                elapsed,
                limit: watchdog.limit.unwrap_or_default(),
                step: self.time.step(),
            });
        }
        if let Some(max) = self.config.max_steps {
            if self.time.step() >= max {
                warn!("Step limit {} reached", max);
                return Err(TbError::StepLimit { steps: max });
            }
        }

        if self.dut.get_bool(Pin::IClkWr) && self.time.past_warmup() {
            self.active_edge()?;
        }
        Ok(())
    }

    fn apply_reset(&mut self) -> TbResult<()> {
        let rst = self.time.in_reset_window();
        self.dut.set_bool(Pin::IRstWr, rst)?;
        self.dut.set_bool(Pin::IRstRd, rst)
    }

    /// Generate, drive, then observe, in that order.
    fn active_edge(&mut self) -> TbResult<()> {
        self.active_edges += 1;
        let item = self.sequence.gen_tx(&self.coverage);
        self.driver.drive(&mut self.dut, item)?;
        self.in_mon
            .sample(&self.dut, &mut self.scoreboard, &mut self.coverage);
        self.out_mon
            .sample(&self.dut, &mut self.scoreboard, &mut self.coverage, self.time)
    }

    fn finish(&mut self, failure: Option<&TbError>) -> TbResult<()> {
        self.dut.finalize();
        let closed = self.trace.close();
        let summary = self.summary();
        self.log_summary(&summary, failure);
        let reported = match &self.config.report_path {
            Some(path) => junit::write_report(path, &summary, &self.coverage, failure),
            None => Ok(()),
        };
        closed.and(reported)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            variant: self.config.variant,
            seed: self.seed,
            steps: self.time.step(),
            active_edges: self.active_edges,
            items_generated: self.sequence.generated(),
            phase: self.sequence.phase(),
            scoreboard: self.scoreboard.stats(),
            input_covered: self.coverage.data_point(DataSet::Input).covered(),
            output_covered: self.coverage.data_point(DataSet::Output).covered(),
            domain: self.config.width.domain_size(),
            flags_closed: self.coverage.flag_coverage_closed(),
            elapsed: self.elapsed,
        }
    }

    fn log_summary(&self, summary: &RunSummary, failure: Option<&TbError>) {
        match failure {
            Some(e) => error!("Test Failure! {}", e),
            None => info!("Coverage closed"),
        }
        let secs = summary.elapsed.as_secs_f64();
        let speed = if secs > 0.0 {
            (summary.steps as f64 / secs) as u64
        } else {
            0
        };
        info!(
            "Steps: {}, active edges: {}, items: {}, real time: {:.3} s, speed: {} steps/s",
            summary.steps.to_formatted_string(&Locale::en),
            summary.active_edges.to_formatted_string(&Locale::en),
            summary.items_generated.to_formatted_string(&Locale::en),
            secs,
            speed.to_formatted_string(&Locale::en),
        );
        info!("Scoreboard: {}", self.scoreboard.result_str());
        info!(
            "Flags: {} {}/2, {} {}/2",
            Flag::Overflow.name(),
            self.coverage.flag_point(Flag::Overflow).covered(),
            Flag::Underflow.name(),
            self.coverage.flag_point(Flag::Underflow).covered(),
        );
        info!("Coverage:\n{}", self.coverage.report_table());
    }
}
