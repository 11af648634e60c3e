//! Behavioural model of a synchronous FIFO exposing the same pins as the RTL.
//!
//! Stands in for a compiled simulator wherever one is not available, and can
//! be mutated to check that the testbench actually catches broken designs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TbError;
use crate::signal::Pin;
use crate::sim_if::{ResetPattern, SimIf};
use crate::value::DataWidth;
use crate::TbResult;

/// Deliberate design faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mutation {
    #[default]
    None,
    /// Inverts one bit of every word read out.
    FlipDataBit(u32),
    /// Strobes `f_rd_done` for reads from an empty FIFO.
    ReadDoneWhenEmpty,
}

#[derive(Debug, Clone)]
pub struct FifoModel {
    width: DataWidth,
    depth: usize,
    pins: [u32; Pin::COUNT],
    mem: Vec<u32>,
    wr_ptr: usize,
    rd_ptr: usize,
    count: usize,
    last_clk_wr: u32,
    last_clk_rd: u32,
    pattern: ResetPattern,
    // state is still the power-on fill until the first eval
    pristine: bool,
    rng: StdRng,
    mutation: Mutation,
}

impl FifoModel {
    pub fn new(width: DataWidth, depth: usize) -> Self {
        let mut model = Self {
            width,
            depth: depth.max(1),
            pins: [0; Pin::COUNT],
            mem: vec![0; depth.max(1)],
            wr_ptr: 0,
            rd_ptr: 0,
            count: 0,
            last_clk_wr: 0,
            last_clk_rd: 0,
            pattern: ResetPattern::Zeros,
            pristine: true,
            rng: StdRng::seed_from_u64(0),
            mutation: Mutation::None,
        };
        model.clear();
        model
    }

    /// Seeds the generator used for `ResetPattern::Random`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Fails for a bit flip outside the data width, which the output mask
    /// would silently undo.
    pub fn with_mutation(mut self, mutation: Mutation) -> TbResult<Self> {
        if let Mutation::FlipDataBit(bit) = mutation {
            if bit >= self.width.bits() {
                return Err(TbError::Config {
                    reason: format!("cannot flip bit {} of {} data", bit, self.width),
                });
            }
        }
        self.mutation = mutation;
        Ok(self)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of words currently stored.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn fill_value(&mut self) -> u32 {
        match self.pattern {
            ResetPattern::Zeros => 0,
            ResetPattern::Ones => self.width.mask(),
            ResetPattern::Random => self.rng.gen::<u32>() & self.width.mask(),
        }
    }

    fn scramble(&mut self) {
        for i in 0..self.mem.len() {
            self.mem[i] = self.fill_value();
        }
        self.pins[Pin::OData.index()] = self.fill_value();
    }

    fn clear(&mut self) {
        self.wr_ptr = 0;
        self.rd_ptr = 0;
        self.count = 0;
        self.scramble();
        self.pins[Pin::OFull.index()] = 0;
        self.pins[Pin::OEmpty.index()] = 1;
        self.pins[Pin::OOverflow.index()] = 0;
        self.pins[Pin::OUnderflow.index()] = 0;
        self.pins[Pin::FRdDone.index()] = 0;
    }

    fn pin(&self, pin: Pin) -> u32 {
        self.pins[pin.index()]
    }

    fn read_word(&mut self) -> u32 {
        let data = self.mem[self.rd_ptr];
        self.rd_ptr = (self.rd_ptr + 1) % self.depth;
        self.count -= 1;
        match self.mutation {
            Mutation::FlipDataBit(bit) => data ^ (1u32 << bit),
            _ => data,
        }
    }

    fn write_word(&mut self, data: u32) {
        self.mem[self.wr_ptr] = data & self.width.mask();
        self.wr_ptr = (self.wr_ptr + 1) % self.depth;
        self.count += 1;
    }
}

impl SimIf for FifoModel {
    fn set_value(&mut self, pin: Pin, value: u32) -> TbResult<()> {
        if !pin.is_modifiable() {
            return Err(TbError::ReadOnlyPin { pin });
        }
        self.pins[pin.index()] = value & pin.mask(self.width);
        Ok(())
    }

    fn get_value(&self, pin: Pin) -> u32 {
        self.pin(pin)
    }

    fn eval(&mut self) {
        self.pristine = false;
        let clk_wr = self.pin(Pin::IClkWr);
        let clk_rd = self.pin(Pin::IClkRd);
        let wr_edge = clk_wr == 1 && self.last_clk_wr == 0;
        let rd_edge = clk_rd == 1 && self.last_clk_rd == 0;
        self.last_clk_wr = clk_wr;
        self.last_clk_rd = clk_rd;
        if !wr_edge && !rd_edge {
            return;
        }

        if (wr_edge && self.pin(Pin::IRstWr) == 1) || (rd_edge && self.pin(Pin::IRstRd) == 1) {
            self.clear();
            return;
        }

        // both sides see the flags as they were before this edge
        let full = self.count == self.depth;
        let empty = self.count == 0;

        if rd_edge {
            let mut rd_done = 0;
            let mut underflow = 0;
            if self.pin(Pin::IRd) == 1 {
                if !empty {
                    let data = self.read_word();
                    self.pins[Pin::OData.index()] = data;
                    rd_done = 1;
                } else {
                    underflow = 1;
                    if self.mutation == Mutation::ReadDoneWhenEmpty {
                        rd_done = 1;
                    }
                }
            }
            self.pins[Pin::FRdDone.index()] = rd_done;
            self.pins[Pin::OUnderflow.index()] = underflow;
        }

        if wr_edge {
            let mut overflow = 0;
            if self.pin(Pin::IWr) == 1 {
                if !full {
                    let data = self.pin(Pin::IData);
                    self.write_word(data);
                } else {
                    overflow = 1;
                }
            }
            self.pins[Pin::OOverflow.index()] = overflow;
        }

        self.pins[Pin::OFull.index()] = (self.count == self.depth) as u32;
        self.pins[Pin::OEmpty.index()] = (self.count == 0) as u32;
    }

    fn rand_reset(&mut self, pattern: ResetPattern) {
        let changed = self.pattern != pattern;
        self.pattern = pattern;
        if self.pristine && changed {
            self.scramble();
        }
    }

    fn width(&self) -> DataWidth {
        self.width
    }

    fn fifo_depth(&self) -> Option<usize> {
        Some(self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(m: &mut FifoModel) {
        for _ in 0..2 {
            m.toggle(Pin::IClkWr).unwrap();
            m.toggle(Pin::IClkRd).unwrap();
            m.eval();
        }
    }

    fn reset(m: &mut FifoModel) {
        m.set_value(Pin::IRstWr, 1).unwrap();
        m.set_value(Pin::IRstRd, 1).unwrap();
        cycle(m);
        m.set_value(Pin::IRstWr, 0).unwrap();
        m.set_value(Pin::IRstRd, 0).unwrap();
    }

    fn push(m: &mut FifoModel, data: u32) {
        m.set_value(Pin::IData, data).unwrap();
        m.set_value(Pin::IWr, 1).unwrap();
        cycle(m);
        m.set_value(Pin::IWr, 0).unwrap();
    }

    fn pop(m: &mut FifoModel) -> Option<u32> {
        m.set_value(Pin::IRd, 1).unwrap();
        cycle(m);
        m.set_value(Pin::IRd, 0).unwrap();
        m.get_bool(Pin::FRdDone).then(|| m.get_value(Pin::OData))
    }

    #[test]
    fn outputs_are_read_only() {
        let mut m = FifoModel::new(DataWidth::new(4), 4);
        assert!(matches!(
            m.set_value(Pin::OEmpty, 0),
            Err(TbError::ReadOnlyPin { pin: Pin::OEmpty })
        ));
    }

    #[test]
    fn inputs_are_truncated_to_width() {
        let mut m = FifoModel::new(DataWidth::new(4), 4);
        m.set_value(Pin::IData, 0x1f3).unwrap();
        assert_eq!(m.get_value(Pin::IData), 0x3);
        m.set_value(Pin::IWr, 2).unwrap();
        assert_eq!(m.get_value(Pin::IWr), 0);
    }

    #[test]
    fn preserves_order() {
        let mut m = FifoModel::new(DataWidth::new(8), 8);
        reset(&mut m);
        for d in [3, 1, 4, 1, 5] {
            push(&mut m, d);
        }
        assert_eq!(m.len(), 5);
        let out: Vec<u32> = (0..5).filter_map(|_| pop(&mut m)).collect();
        assert_eq!(out, vec![3, 1, 4, 1, 5]);
        assert!(m.get_bool(Pin::OEmpty));
    }

    #[test]
    fn overflow_and_underflow_flags() {
        let mut m = FifoModel::new(DataWidth::new(4), 2);
        reset(&mut m);
        push(&mut m, 1);
        push(&mut m, 2);
        assert!(m.get_bool(Pin::OFull));
        assert!(!m.get_bool(Pin::OOverflow));
        push(&mut m, 3);
        assert!(m.get_bool(Pin::OOverflow));
        assert_eq!(m.len(), 2);

        assert_eq!(pop(&mut m), Some(1));
        assert_eq!(pop(&mut m), Some(2));
        assert!(!m.get_bool(Pin::OUnderflow));
        assert_eq!(pop(&mut m), None);
        assert!(m.get_bool(Pin::OUnderflow));
    }

    #[test]
    fn simultaneous_read_write_uses_pre_edge_flags() {
        let mut m = FifoModel::new(DataWidth::new(4), 1);
        reset(&mut m);
        push(&mut m, 7);
        // full: the read drains but the write is still rejected
        m.set_value(Pin::IData, 9).unwrap();
        m.set_value(Pin::IWr, 1).unwrap();
        m.set_value(Pin::IRd, 1).unwrap();
        cycle(&mut m);
        assert!(m.get_bool(Pin::FRdDone));
        assert_eq!(m.get_value(Pin::OData), 7);
        assert!(m.get_bool(Pin::OOverflow));
        assert!(m.is_empty());
    }

    #[test]
    fn reset_fill_pattern() {
        let mut m = FifoModel::new(DataWidth::new(4), 4);
        m.rand_reset(ResetPattern::Ones);
        assert_eq!(m.get_value(Pin::OData), 0xf);
        reset(&mut m);
        m.rand_reset(ResetPattern::Zeros);
        assert_eq!(m.get_value(Pin::OData), 0xf);
        assert!(m.get_bool(Pin::OEmpty));
    }

    #[test]
    fn flip_bit_mutation_corrupts_reads() {
        let mut m = FifoModel::new(DataWidth::new(4), 4)
            .with_mutation(Mutation::FlipDataBit(0))
            .unwrap();
        reset(&mut m);
        push(&mut m, 4);
        assert_eq!(pop(&mut m), Some(5));
    }

    #[test]
    fn read_done_when_empty_mutation() {
        let mut m = FifoModel::new(DataWidth::new(4), 4)
            .with_mutation(Mutation::ReadDoneWhenEmpty)
            .unwrap();
        reset(&mut m);
        assert!(pop(&mut m).is_some());
        assert!(m.get_bool(Pin::OUnderflow));
    }

    #[test]
    fn flip_bit_must_lie_inside_data_width() {
        let width = DataWidth::new(8);
        let err = FifoModel::new(width, 4)
            .with_mutation(Mutation::FlipDataBit(8))
            .err()
            .unwrap();
        assert!(matches!(err, TbError::Config { .. }));
        assert_eq!(err.exit_code(), 3);

        let mut m = FifoModel::new(width, 4)
            .with_mutation(Mutation::FlipDataBit(7))
            .unwrap();
        reset(&mut m);
        push(&mut m, 0x01);
        assert_eq!(pop(&mut m), Some(0x81));
    }

    #[test]
    fn reports_its_depth() {
        assert_eq!(FifoModel::new(DataWidth::new(4), 12).fifo_depth(), Some(12));
    }
}
