//! Tick traces: recorded host input sequences and their replay.
//!
//! A trace is a TOML file with one `[[tick]]` table per simulation step.
//! Channels left out of a table are quiet:
//!
//! ```toml
//! [[tick]]
//! v = -70.0
//! event1 = 1
//!
//! [[tick]]
//! v = -65.0
//! pstim = 1
//! ```

use std::path::Path;

use heart_common::chart::{ChartInputs, ChartOutputs, ChartState};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::driver::{StepDriver, StepStats};

/// Trace loading error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("failed to read trace {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse trace: {0}")]
    Parse(String),
}

/// Ordered tick inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickTrace {
    #[serde(default)]
    pub tick: Vec<ChartInputs>,
}

impl TickTrace {
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let content = std::fs::read_to_string(path).map_err(|e| TraceError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, TraceError> {
        toml::from_str(content).map_err(|e| TraceError::Parse(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tick.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tick.is_empty()
    }
}

/// Outputs and state after one replayed tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickRecord {
    pub tick: usize,
    pub state: ChartState,
    pub outputs: ChartOutputs,
    pub transitions: usize,
}

/// Result of replaying a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub ticks: usize,
    pub final_state: ChartState,
    pub final_outputs: ChartOutputs,
    pub reset_event_counter: u32,
    pub transitions: u64,
    pub reset_pulses: u64,
    pub records: Vec<TickRecord>,
}

/// Run every tick of `trace` through `driver`.
pub fn replay(driver: &mut StepDriver, trace: &TickTrace) -> ReplaySummary {
    let before: StepStats = driver.stats().clone();
    let mut records = Vec::with_capacity(trace.len());

    for (index, inputs) in trace.tick.iter().enumerate() {
        let report = driver.step(inputs);
        debug!(
            tick = index,
            state = %driver.state(),
            q = report.outputs.q,
            vreset = report.outputs.vreset,
            vno = report.outputs.vno,
            reset = report.outputs.reset,
            "tick"
        );
        records.push(TickRecord {
            tick: index,
            state: driver.state(),
            outputs: report.outputs,
            transitions: report.transitions(),
        });
    }

    let stats = driver.stats();
    let summary = ReplaySummary {
        ticks: trace.len(),
        final_state: driver.state(),
        final_outputs: driver.outputs(),
        reset_event_counter: driver.reset_event_counter(),
        transitions: stats.transitions - before.transitions,
        reset_pulses: stats.reset_pulses - before.reset_pulses,
        records,
    };
    info!(
        ticks = summary.ticks,
        transitions = summary.transitions,
        state = %summary.final_state,
        "Replay complete"
    );
    summary
}
