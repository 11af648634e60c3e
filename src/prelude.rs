pub use crate::config::{TbConfig, Variant, DEFAULT_WATCHDOG};
pub use crate::coverage::{CoverageTracker, DataSet, Flag};
pub use crate::driver::Driver;
pub use crate::fifo_model::{FifoModel, Mutation};
pub use crate::monitor::{InputMonitor, OutputMonitor};
pub use crate::scoreboard::{ActualEvent, ExpectedEvent, Scoreboard};
pub use crate::sequence::{Sequence, SequencePhase, StimulusItem};
pub use crate::signal::Pin;
pub use crate::sim_if::{ResetPattern, SimIf, SimTime, VERIF_START_TIME};
pub use crate::testbench::{RunSummary, Testbench, Watchdog};
pub use crate::trace::{NullTrace, TraceSink, VcdTrace};
pub use crate::value::DataWidth;
pub use crate::{TbError, TbResult};
