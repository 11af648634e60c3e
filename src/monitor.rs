//! Pin-level observers feeding coverage and the scoreboard.

use crate::config::Variant;
use crate::coverage::{CoverageTracker, Flag};
use crate::scoreboard::{ActualEvent, ExpectedEvent, Scoreboard};
use crate::signal::Pin;
use crate::sim_if::{SimIf, SimTime};
use crate::TbResult;

/// Watches the write side for accepted writes.
#[derive(Debug, Default)]
pub struct InputMonitor;

impl InputMonitor {
    pub fn new() -> Self {
        Self
    }

    /// A write counts as accepted when `i_wr` is driven and the FIFO is not
    /// full. Rejected or absent writes produce nothing.
    pub fn sample(
        &self,
        dut: &dyn SimIf,
        scb: &mut Scoreboard,
        cvg: &mut CoverageTracker,
    ) -> Option<ExpectedEvent> {
        if dut.get_bool(Pin::IWr) && !dut.get_bool(Pin::OFull) {
            let tx = ExpectedEvent {
                data: dut.get_value(Pin::IData),
            };
            scb.add_exp(tx);
            cvg.record_input(tx.data);
            Some(tx)
        } else {
            None
        }
    }
}

/// Watches the read side for completed reads and samples status outputs.
#[derive(Debug)]
pub struct OutputMonitor {
    variant: Variant,
}

impl OutputMonitor {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    pub fn sample(
        &self,
        dut: &dyn SimIf,
        scb: &mut Scoreboard,
        cvg: &mut CoverageTracker,
        time: SimTime,
    ) -> TbResult<()> {
        let rd_done = dut.get_bool(Pin::FRdDone);
        let data = dut.get_value(Pin::OData);
        match self.variant {
            Variant::ReadData => {
                if rd_done {
                    scb.on_actual(ActualEvent { data }, time)?;
                    cvg.record_output(data);
                }
            }
            Variant::FlagStress => {
                // status and data are sampled every edge, reads or not
                cvg.record_output(data);
                cvg.record_flag(Flag::Overflow, dut.get_bool(Pin::OOverflow));
                cvg.record_flag(Flag::Underflow, dut.get_bool(Pin::OUnderflow));
                if rd_done {
                    scb.on_actual(ActualEvent { data }, time)?;
                }
            }
        }
        Ok(())
    }
}
