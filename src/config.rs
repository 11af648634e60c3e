use std::path::PathBuf;
use std::time::Duration;

use crate::coverage::DataSet;
use crate::error::TbError;
use crate::sequence::default_stress_writes;
use crate::sim_if::ResetPattern;
use crate::value::DataWidth;
use crate::TbResult;

/// Watchdog used by the flag-stress harness.
pub const DEFAULT_WATCHDOG: Duration = Duration::from_secs(4);

/// Coverage model and stop condition of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Stop once every data value has been read back.
    ReadData,
    /// Stop once every data value has appeared on `o_data` and both flags
    /// have toggled.
    FlagStress,
}

impl Variant {
    /// Coverpoint the generator biases its data draws against.
    pub fn bias_set(&self) -> DataSet {
        match self {
            Variant::ReadData => DataSet::Input,
            Variant::FlagStress => DataSet::Output,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::ReadData => "read_data",
            Variant::FlagStress => "flag_stress",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TbConfig {
    pub width: DataWidth,
    pub variant: Variant,
    /// `None` draws a seed from entropy; the drawn seed is logged.
    pub seed: Option<u64>,
    pub reset_pattern: ResetPattern,
    pub watchdog: Option<Duration>,
    pub max_steps: Option<u64>,
    /// FIFO depth; filled in from the DUT when it reports one.
    pub depth: Option<usize>,
    /// Explicit stress burst; `None` derives it from width and depth.
    pub stress_writes: Option<u64>,
    pub trace_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

impl TbConfig {
    pub fn read_data(width: DataWidth) -> Self {
        Self {
            width,
            variant: Variant::ReadData,
            seed: None,
            reset_pattern: ResetPattern::Random,
            watchdog: None,
            max_steps: None,
            depth: None,
            stress_writes: None,
            trace_path: None,
            report_path: None,
        }
    }

    pub fn flag_stress(width: DataWidth) -> Self {
        Self {
            variant: Variant::FlagStress,
            watchdog: Some(DEFAULT_WATCHDOG),
            ..Self::read_data(width)
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_reset_pattern(mut self, pattern: ResetPattern) -> Self {
        self.reset_pattern = pattern;
        self
    }

    pub fn with_watchdog(mut self, limit: Option<Duration>) -> Self {
        self.watchdog = limit;
        self
    }

    pub fn with_max_steps(mut self, steps: Option<u64>) -> Self {
        self.max_steps = steps;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_stress_writes(mut self, writes: u64) -> Self {
        self.stress_writes = Some(writes);
        self
    }

    /// Number of writes the stress phase issues before it starts reading.
    pub fn stress_burst(&self) -> u64 {
        self.stress_writes
            .unwrap_or_else(|| default_stress_writes(self.width, self.depth))
    }

    pub fn with_trace(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace_path = Some(path.into());
        self
    }

    pub fn with_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> TbResult<()> {
        if !self.width.is_valid() {
            return Err(TbError::Config {
                reason: format!(
                    "data width must be between 1 and {} bits, got {}",
                    DataWidth::MAX,
                    self.width.bits()
                ),
            });
        }
        if self.depth == Some(0) {
            return Err(TbError::Config {
                reason: "FIFO depth must not be zero".to_string(),
            });
        }
        let burst = self.stress_burst();
        if burst == 0 {
            return Err(TbError::Config {
                reason: "stress write burst must not be empty".to_string(),
            });
        }
        if let Some(depth) = self.depth {
            if burst <= depth as u64 {
                return Err(TbError::Config {
                    reason: format!(
                        "stress write burst of {} cannot overflow a FIFO of depth {}",
                        burst, depth
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_defaults() {
        let rd = TbConfig::read_data(DataWidth::new(8));
        assert_eq!(rd.watchdog, None);
        assert_eq!(rd.variant.bias_set(), DataSet::Input);
        let fs = TbConfig::flag_stress(DataWidth::new(8));
        assert_eq!(fs.watchdog, Some(Duration::from_secs(4)));
        assert_eq!(fs.variant.bias_set(), DataSet::Output);
        assert_eq!(fs.stress_burst(), 2048);
    }

    #[test]
    fn rejects_bad_width() {
        let err = TbConfig::read_data(DataWidth::new(0)).validate().unwrap_err();
        assert!(err.to_string().contains("data width"));
        assert!(TbConfig::read_data(DataWidth::new(17)).validate().is_err());
        assert!(TbConfig::read_data(DataWidth::new(16)).validate().is_ok());
    }

    #[test]
    fn rejects_empty_stress_burst() {
        let cfg = TbConfig::flag_stress(DataWidth::new(4)).with_stress_writes(0);
        assert!(matches!(cfg.validate(), Err(TbError::Config { .. })));
    }

    #[test]
    fn default_burst_follows_depth() {
        let cfg = TbConfig::flag_stress(DataWidth::new(1)).with_depth(16);
        assert_eq!(cfg.stress_burst(), 17);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_burst_that_cannot_overflow() {
        let cfg = TbConfig::flag_stress(DataWidth::new(4))
            .with_depth(16)
            .with_stress_writes(16);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("cannot overflow"));
        assert!(cfg.with_stress_writes(17).validate().is_ok());
    }

    #[test]
    fn rejects_zero_depth() {
        let cfg = TbConfig::read_data(DataWidth::new(4)).with_depth(0);
        assert!(matches!(cfg.validate(), Err(TbError::Config { .. })));
    }
}
