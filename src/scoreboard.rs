use std::collections::VecDeque;

use log::{debug, error};

use crate::error::TbError;
use crate::sim_if::SimTime;
use crate::TbResult;

/// Data of a write the DUT accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedEvent {
    pub data: u32,
}

/// Data of a read the DUT completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActualEvent {
    pub data: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreboardStats {
    pub expected: u64,
    pub received: u64,
    pub matched: u64,
    pub pending: usize,
}

/// In-order reference model: every completed read must return the oldest
/// accepted write that has not been read yet.
#[derive(Debug, Default)]
pub struct Scoreboard {
    exp_q: VecDeque<ExpectedEvent>,
    expected: u64,
    received: u64,
    matched: u64,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_exp(&mut self, event: ExpectedEvent) {
        self.exp_q.push_back(event);
        self.expected += 1;
    }

    /// Matches a completed read against the oldest pending write.
    ///
    /// Any divergence is returned as an error; the caller is expected to end
    /// the run on it.
    pub fn on_actual(&mut self, event: ActualEvent, time: SimTime) -> TbResult<()> {
        self.received += 1;
        let exp = match self.exp_q.pop_front() {
            Some(exp) => exp,
            None => {
                error!(
                    "Scoreboard underflow at step {}: read {} with no outstanding write",
                    time, event.data
                );
                return Err(TbError::ScoreboardUnderflow {
                    actual: event.data,
                    step: time.step(),
                });
            }
        };
        if exp.data != event.data {
            error!(
                "Data mismatch at step {}: expected {}, got {}",
                time, exp.data, event.data
            );
            return Err(TbError::DataMismatch {
                expected: exp.data,
                actual: event.data,
                step: time.step(),
            });
        }
        self.matched += 1;
        debug!("PASS: expected {}, got {}", exp.data, event.data);
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.exp_q.len()
    }

    pub fn stats(&self) -> ScoreboardStats {
        ScoreboardStats {
            expected: self.expected,
            received: self.received,
            matched: self.matched,
            pending: self.exp_q.len(),
        }
    }

    pub fn result_str(&self) -> String {
        format!(
            "expected={}, received={}, matched={}, pending={}",
            self.expected,
            self.received,
            self.matched,
            self.exp_q.len()
        )
    }
}
