//! Prelude module for common re-exports.
//!
//! ```rust
//! use heart_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── Chart Vocabulary ───────────────────────────────────────────────
pub use crate::chart::{
    ChartEvent, ChartInputs, ChartOutputs, ChartState, FiredEvents, OutputPort, ReusableOutputs,
};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{Q_MAX, Q_MIN, SNAPSHOT_ARITY};
