use crate::sequence::StimulusItem;
use crate::signal::Pin;
use crate::sim_if::SimIf;
use crate::TbResult;

/// Turns stimulus items into pin wiggles on the DUT inputs.
#[derive(Debug, Default)]
pub struct Driver {
    applied: u64,
}

impl Driver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `item` for this edge. With no item the inputs keep whatever
    /// they were last driven to.
    pub fn drive(&mut self, dut: &mut dyn SimIf, item: Option<StimulusItem>) -> TbResult<()> {
        if let Some(tx) = item {
            dut.set_value(Pin::IData, tx.data)?;
            dut.set_bool(Pin::IWr, tx.write_enable)?;
            dut.set_bool(Pin::IRd, tx.read_enable)?;
            self.applied += 1;
        }
        Ok(())
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }
}
