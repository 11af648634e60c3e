//! Coverage-driven stimulus generation.

use log::info;
use rand::rngs::StdRng;
use rand::Rng;

use crate::coverage::{CoverageTracker, DataSet};
use crate::value::DataWidth;

/// In the fill phase an item is emitted on one active edge out of this many.
pub const EMIT_ONE_IN: u32 = 5;

/// Default length of the stress write burst: `2 * 2^(W+2)`, stretched to
/// `depth + 1` when the FIFO is deeper so the burst always overflows it.
pub fn default_stress_writes(width: DataWidth, depth: Option<usize>) -> u64 {
    let base = 1u64
        .checked_shl(width.bits() + 2)
        .map_or(u64::MAX, |n| n.saturating_mul(2));
    match depth {
        Some(depth) => base.max((depth as u64).saturating_add(1)),
        None => base,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StimulusItem {
    pub write_enable: bool,
    pub read_enable: bool,
    pub data: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencePhase {
    /// Random traffic, data biased toward uncovered values.
    Fill,
    /// Write burst toward full/overflow, then reads toward empty/underflow.
    Stress,
}

pub struct Sequence {
    width: DataWidth,
    bias: DataSet,
    phase: SequencePhase,
    stress_writes: u64,
    stress_iter: u64,
    rng: StdRng,
    generated: u64,
    redraws: u64,
}

impl Sequence {
    pub fn new(width: DataWidth, bias: DataSet, stress_writes: u64, rng: StdRng) -> Self {
        Self {
            width,
            bias,
            phase: SequencePhase::Fill,
            stress_writes,
            stress_iter: 0,
            rng,
            generated: 0,
            redraws: 0,
        }
    }

    pub fn phase(&self) -> SequencePhase {
        self.phase
    }

    /// Number of items emitted so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Draws discarded by rejection sampling so far.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Produces the stimulus for one active edge, or `None` for an idle edge.
    pub fn gen_tx(&mut self, cvg: &CoverageTracker) -> Option<StimulusItem> {
        if self.phase == SequencePhase::Fill && cvg.data_coverage_closed() {
            info!("Data coverage closed, switching to stress sequence");
            self.phase = SequencePhase::Stress;
        }
        let item = match self.phase {
            SequencePhase::Fill => self.fill(cvg),
            SequencePhase::Stress => Some(self.stress()),
        };
        if item.is_some() {
            self.generated += 1;
        }
        item
    }

    fn fill(&mut self, cvg: &CoverageTracker) -> Option<StimulusItem> {
        if !self.rng.gen_ratio(1, EMIT_ONE_IN) {
            return None;
        }
        let write_enable = self.rng.gen::<bool>();
        let read_enable = self.rng.gen::<bool>();
        let data = self.draw_uncovered(cvg);
        Some(StimulusItem {
            write_enable,
            read_enable,
            data,
        })
    }

    /// Rejection-samples a value missing from the bias coverpoint. Once that
    /// coverpoint is complete there is nothing left to reject against, and
    /// the draw is plain uniform.
    fn draw_uncovered(&mut self, cvg: &CoverageTracker) -> u32 {
        let domain = self.width.domain_size();
        if cvg.is_closed(self.bias) {
            return self.rng.gen_range(0..domain) as u32;
        }
        loop {
            let data = self.rng.gen_range(0..domain) as u32;
            if !cvg.is_covered(self.bias, data) {
                return data;
            }
            self.redraws += 1;
        }
    }

    fn stress(&mut self) -> StimulusItem {
        let data = self.rng.gen_range(0..self.width.domain_size()) as u32;
        let writing = self.stress_iter < self.stress_writes;
        self.stress_iter = self.stress_iter.saturating_add(1);
        StimulusItem {
            write_enable: writing,
            read_enable: !writing,
            data,
        }
    }
}
