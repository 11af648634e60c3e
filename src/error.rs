//! Failure kinds of a verification run.

use std::path::PathBuf;
use std::time::Duration;

use crate::signal::Pin;

/// Errors that end a run.
///
/// Scoreboard divergences are fatal: the first one stops the control loop.
#[derive(Debug, thiserror::Error)]
pub enum TbError {
    /// A completed read returned something other than the oldest accepted write.
    #[error("data mismatch at step {step}: expected {expected}, got {actual}")]
    DataMismatch {
        expected: u32,
        actual: u32,
        step: u64,
    },

    /// A completed read was observed with no outstanding accepted write.
    #[error("scoreboard underflow at step {step}: got {actual} with no pending expected value")]
    ScoreboardUnderflow { actual: u32, step: u64 },

    /// The wall-clock watchdog elapsed before coverage closed.
    #[error("coverage not closed after {elapsed:?} (limit {limit:?}, step {step})")]
    CoverageTimeout {
        elapsed: Duration,
        limit: Duration,
        step: u64,
    },

    /// The optional step ceiling was reached before coverage closed.
    #[error("coverage not closed within {steps} steps")]
    StepLimit { steps: u64 },

    /// The harness tried to drive a pin the DUT owns.
    #[error("pin {} is not writable", .pin.name())]
    ReadOnlyPin { pin: Pin },

    /// Writing a trace or report artifact failed.
    #[error("artifact I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing the results file failed inside the report encoder.
    #[error("failed to write report {}: {reason}", .path.display())]
    Report { path: PathBuf, reason: String },

    #[error("invalid configuration: {reason}")]
    Config { reason: String },
}

impl TbError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TbError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for divergences detected by the scoreboard.
    pub fn is_scoreboard_error(&self) -> bool {
        matches!(
            self,
            TbError::DataMismatch { .. } | TbError::ScoreboardUnderflow { .. }
        )
    }

    /// Process exit status for this failure. Success is 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            TbError::DataMismatch { .. } | TbError::ScoreboardUnderflow { .. } => 1,
            TbError::CoverageTimeout { .. } | TbError::StepLimit { .. } => 2,
            TbError::ReadOnlyPin { .. }
            | TbError::Io { .. }
            | TbError::Report { .. }
            | TbError::Config { .. } => 3,
        }
    }
}
