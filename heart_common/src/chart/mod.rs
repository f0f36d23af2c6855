//! Chart vocabulary shared between the state machine and its hosts.
//!
//! All enums use `#[repr(u8)]` and carry the numeric codes the simulation
//! host uses for activity and event broadcasts, so snapshots written by one
//! side can be read by the other.

pub mod event;
pub mod io;
pub mod state;

pub use event::{ChartEvent, FiredEvents};
pub use io::{ChartInputs, ChartOutputs, OutputPort, ReusableOutputs};
pub use state::ChartState;
