//! Coverage-driven, closed-loop verification of synchronous FIFOs.
//!
//! A [`Testbench`](testbench::Testbench) clocks a DUT behind the
//! [`SimIf`](sim_if::SimIf) trait, feeds it random writes and reads biased
//! toward data values that have not been covered yet, checks every completed
//! read against an in-order scoreboard, and stops once the coverage goal of
//! the selected [`Variant`](config::Variant) is met or the watchdog fires.

pub mod config;
pub mod coverage;
pub mod driver;
pub mod error;
pub mod fifo_model;
mod junit;
pub mod monitor;
pub mod prelude;
pub mod scoreboard;
pub mod sequence;
pub mod signal;
pub mod sim_if;
pub mod testbench;
pub mod trace;
pub mod value;

pub use error::TbError;

pub type TbResult<T> = Result<T, TbError>;

pub use junit::write_report;
