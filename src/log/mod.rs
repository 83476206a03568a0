//! Reading and record types for the raw benchmark output files.

pub mod parse;
pub mod record;

pub use parse::{read_task_trace, read_timer_breakdown};
pub use record::{LatencySample, Phase, PhaseTotals};
