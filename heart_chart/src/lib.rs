//! # Heart Chart Library
//!
//! Event-driven cardiac-cycle chart for embedding in a block-diagram
//! simulation host. The host samples five event channels and the membrane
//! voltage `v` once per tick; the [`driver::StepDriver`] dispatches every
//! fired channel to the [`state::machine::HeartCycleMachine`] in a fixed
//! order and derives the `reset` resync pulse.
//!
//! ## Chart
//!
//! ```text
//!  resting ──pstim──► stimulated ──event2──► upstroke
//!   ▲  │  ◄─endpstim──────┘                     │
//!   │  └───────────────event2─────────────────► │
//!   │                                           │ event3
//!   └────────event1──────── plateau ◄───────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`state`] - Transition table, activity flags and the state machine
//! - [`driver`] - Per-tick dispatch and reset-pulse drain
//! - [`snapshot`] - Pause/resume snapshots and their persistence
//! - [`config`] - Instance-scoped chart configuration
//! - [`trace`] - Tick-trace files and replay
//! - [`error`] - Error types

#![deny(clippy::disallowed_types)]

pub mod config;
pub mod driver;
pub mod error;
pub mod snapshot;
pub mod state;
pub mod trace;

pub use crate::driver::{StepDriver, StepReport, StepStats};
pub use crate::error::ChartError;
pub use crate::snapshot::{ChartSnapshot, RestoreError, SideEffectInfo};
