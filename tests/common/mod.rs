#![allow(dead_code)]

use fifocov::prelude::*;

/// Pin storage with no behaviour of its own; outputs are poked by the test.
pub struct PinBoard {
    width: DataWidth,
    pins: [u32; Pin::COUNT],
    pub evals: u64,
}

impl PinBoard {
    pub fn new(width: DataWidth) -> Self {
        Self {
            width,
            pins: [0; Pin::COUNT],
            evals: 0,
        }
    }

    pub fn poke(&mut self, pin: Pin, value: u32) {
        self.pins[pin.index()] = value & pin.mask(self.width);
    }
}

impl SimIf for PinBoard {
    fn set_value(&mut self, pin: Pin, value: u32) -> TbResult<()> {
        if !pin.is_modifiable() {
            return Err(TbError::ReadOnlyPin { pin });
        }
        self.poke(pin, value);
        Ok(())
    }

    fn get_value(&self, pin: Pin) -> u32 {
        self.pins[pin.index()]
    }

    fn eval(&mut self) {
        self.evals += 1;
    }

    fn rand_reset(&mut self, _pattern: ResetPattern) {}

    fn width(&self) -> DataWidth {
        self.width
    }
}

/// Drives a DUT one clock cycle at a time the same way the testbench does:
/// rising edge, then generate/drive/observe, then falling edge.
pub struct Rig<D: SimIf> {
    pub dut: D,
    pub scb: Scoreboard,
    pub cvg: CoverageTracker,
    pub drv: Driver,
    pub in_mon: InputMonitor,
    pub out_mon: OutputMonitor,
    pub time: SimTime,
    pub reads: Vec<u32>,
}

impl<D: SimIf> Rig<D> {
    pub fn new(dut: D, variant: Variant) -> Self {
        let width = dut.width();
        Self {
            dut,
            scb: Scoreboard::new(),
            cvg: CoverageTracker::new(width),
            drv: Driver::new(),
            in_mon: InputMonitor::new(),
            out_mon: OutputMonitor::new(variant),
            time: SimTime::default(),
            reads: Vec::new(),
        }
    }

    fn half_cycle(&mut self) {
        self.dut.toggle(Pin::IClkWr).unwrap();
        self.dut.toggle(Pin::IClkRd).unwrap();
        self.dut.eval();
        self.time.advance();
    }

    pub fn reset(&mut self) {
        self.dut.set_value(Pin::IRstWr, 1).unwrap();
        self.dut.set_value(Pin::IRstRd, 1).unwrap();
        self.half_cycle();
        self.half_cycle();
        self.dut.set_value(Pin::IRstWr, 0).unwrap();
        self.dut.set_value(Pin::IRstRd, 0).unwrap();
    }

    pub fn edge(&mut self, item: Option<StimulusItem>) -> TbResult<()> {
        self.half_cycle();
        self.drv.drive(&mut self.dut, item)?;
        self.in_mon.sample(&self.dut, &mut self.scb, &mut self.cvg);
        if self.dut.get_bool(Pin::FRdDone) {
            self.reads.push(self.dut.get_value(Pin::OData));
        }
        let res = self
            .out_mon
            .sample(&self.dut, &mut self.scb, &mut self.cvg, self.time);
        self.half_cycle();
        res
    }
}

pub fn write(data: u32) -> Option<StimulusItem> {
    Some(StimulusItem {
        write_enable: true,
        read_enable: false,
        data,
    })
}

pub fn read() -> Option<StimulusItem> {
    Some(StimulusItem {
        write_enable: false,
        read_enable: true,
        data: 0,
    })
}
