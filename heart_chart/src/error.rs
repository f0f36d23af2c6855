//! Error types of the heart chart.
//!
//! [`InvariantViolation`] is a programming error: the driver asserts on it in
//! debug builds. Everything else is recoverable and propagates to the caller.

use heart_common::chart::ChartState;
use heart_common::config::ConfigError;
use thiserror::Error;

use crate::snapshot::RestoreError;
use crate::snapshot::persist::PersistError;
use crate::trace::TraceError;

/// Internal inconsistency in the chart data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    /// `is_active` disagrees with the active state.
    #[error("chart activation flag {is_active} inconsistent with state {state}")]
    Activation { is_active: bool, state: ChartState },

    /// Activity flags do not mark exactly the active state.
    #[error("activity flags {flags:#04x} inconsistent with state {state}")]
    ActivityFlags { state: ChartState, flags: u8 },

    /// `q` does not carry the code of the active state.
    #[error("state code q = {q} does not match state {state}")]
    StateCode { state: ChartState, q: f64 },

    /// `q` outside `[1, 4]` while the chart is active.
    #[error("state code q = {0} outside [1, 4]")]
    StateCodeRange(f64),
}

/// Top-level error of the heart chart crate.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("snapshot restore failed: {0}")]
    Restore(#[from] RestoreError),

    #[error("snapshot persistence failed: {0}")]
    Persist(#[from] PersistError),

    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}
