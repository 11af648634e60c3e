use crate::signal::Pin;
use crate::value::DataWidth;
use crate::TbResult;

/// First step at which both reset lines are asserted.
pub const RESET_START: u64 = 3;
/// First step at which stimulus is generated and pins are monitored.
pub const VERIF_START_TIME: u64 = 7;

/// Policy for state the DUT leaves undefined until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPattern {
    Zeros,
    Ones,
    #[default]
    Random,
}

/// Interface to the device under test.
///
/// The testbench only ever talks to the DUT through this trait, so a
/// generated simulator model and a behavioural model are interchangeable.
pub trait SimIf {
    /// Drives an input pin. Values are truncated to the pin width.
    fn set_value(&mut self, pin: Pin, value: u32) -> TbResult<()>;
    fn get_value(&self, pin: Pin) -> u32;
    /// Settles the design after inputs changed.
    fn eval(&mut self);
    /// Selects how don't-care state is filled the next time it is initialised.
    fn rand_reset(&mut self, pattern: ResetPattern);
    fn width(&self) -> DataWidth;
    /// Storage depth, for designs that can report it.
    fn fifo_depth(&self) -> Option<usize> {
        None
    }
    /// Called once when the run ends, on every exit path.
    fn finalize(&mut self) {}

    fn get_bool(&self, pin: Pin) -> bool {
        self.get_value(pin) != 0
    }
    fn set_bool(&mut self, pin: Pin, value: bool) -> TbResult<()> {
        self.set_value(pin, value as u32)
    }
    /// Inverts a one-bit pin and returns its new value.
    fn toggle(&mut self, pin: Pin) -> TbResult<u32> {
        let value = self.get_value(pin) ^ 1;
        self.set_value(pin, value)?;
        Ok(value)
    }
}

/// Simulation time in evaluation steps. One step is half a clock period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimTime(u64);

impl SimTime {
    pub fn new(step: u64) -> Self {
        Self(step)
    }

    pub fn step(&self) -> u64 {
        self.0
    }

    pub fn advance(&mut self) {
        self.0 += 1;
    }

    /// Reset is held for steps `[RESET_START, VERIF_START_TIME - 1)`.
    pub fn in_reset_window(&self) -> bool {
        (RESET_START..VERIF_START_TIME - 1).contains(&self.0)
    }

    pub fn past_warmup(&self) -> bool {
        self.0 >= VERIF_START_TIME
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
