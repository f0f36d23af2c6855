//! Workspace-wide constants.

/// Lowest valid value of the `q` state-code output.
pub const Q_MIN: f64 = 1.0;

/// Highest valid value of the `q` state-code output.
pub const Q_MAX: f64 = 4.0;

/// Number of cells in the host-shaped snapshot tuple
/// (`q, vno, vreset, vn, reset, resetEventCounter, isActive, currentState, sideEffectInfo`).
pub const SNAPSHOT_ARITY: usize = 9;

/// Version tag written into persisted snapshot files.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Number of input event channels sampled per tick.
pub const EVENT_CHANNELS: usize = 5;

/// Value an `endpstim` sample must hold for the channel to count as fired.
pub const ENDPSTIM_FIRED_LEVEL: i8 = -1;
