//! Step driver: one host tick → fired channels → chart dispatch → reset pulse.
//!
//! ## Tick Body
//! 1. Sample the five channels into a [`FiredEvents`] set.
//! 2. Dispatch each fired channel to the chart, in
//!    [`ChartEvent::DISPATCH_ORDER`]. Each dispatch completes, outputs
//!    included, before the next channel is looked at.
//! 3. If anything fired and the chart owes reset pulses, toggle `reset`
//!    and drain one unit of debt. At most one unit drains per tick, however
//!    many transitions the tick took.
//!
//! The step performs no heap allocation; the per-tick report uses a
//! fixed-capacity vector.

use heart_common::chart::{ChartEvent, ChartInputs, ChartOutputs, ChartState, FiredEvents};
use heart_common::consts::EVENT_CHANNELS;
use tracing::{error, info, trace};

use crate::config::ChartConfig;
use crate::snapshot::{ChartSnapshot, RestoreError, SideEffectInfo};
use crate::state::activity::ActiveStates;
use crate::state::machine::{HeartCycleMachine, StepOutcome};

// ─── Step Statistics ────────────────────────────────────────────────

/// Running counters over all ticks since the last initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Ticks executed.
    pub ticks: u64,
    /// Ticks in which at least one channel fired.
    pub active_ticks: u64,
    /// Events dispatched to the chart.
    pub events_dispatched: u64,
    /// Transitions taken, excluding chart entry.
    pub transitions: u64,
    /// Toggles of the `reset` output.
    pub reset_pulses: u64,
    /// Entries into each state, indexed by activity code.
    pub visits: [u64; 5],
}

impl StepStats {
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            active_ticks: 0,
            events_dispatched: 0,
            transitions: 0,
            reset_pulses: 0,
            visits: [0; 5],
        }
    }

    #[inline]
    fn record(&mut self, outcome: StepOutcome) {
        self.events_dispatched += 1;
        match outcome {
            StepOutcome::Entered => self.visits[ChartState::Resting as usize] += 1,
            StepOutcome::Transitioned { to, .. } => {
                self.transitions += 1;
                self.visits[to as usize] += 1;
            }
            StepOutcome::Ignored => {}
        }
    }

    /// Number of times `state` was entered.
    #[inline]
    pub fn visits_of(&self, state: ChartState) -> u64 {
        self.visits[state as usize]
    }
}

// ─── Step Report ────────────────────────────────────────────────────

/// One dispatch within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchRecord {
    pub event: ChartEvent,
    pub outcome: StepOutcome,
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub fired: FiredEvents,
    /// Dispatches in the order they ran.
    pub dispatched: heapless::Vec<DispatchRecord, EVENT_CHANNELS>,
    /// Whether `reset` was toggled at the end of the tick.
    pub reset_toggled: bool,
    /// Outputs after the tick.
    pub outputs: ChartOutputs,
}

impl StepReport {
    /// Transitions taken this tick, chart entry excluded.
    pub fn transitions(&self) -> usize {
        self.dispatched
            .iter()
            .filter(|d| matches!(d.outcome, StepOutcome::Transitioned { .. }))
            .count()
    }
}

// ─── Step Driver ────────────────────────────────────────────────────

/// Owner of one chart instance for the lifetime of a simulation.
///
/// The host serializes calls; the driver holds no locks.
#[derive(Debug, Clone)]
pub struct StepDriver {
    machine: HeartCycleMachine,
    config: ChartConfig,
    reset: bool,
    side_effect_info: Option<SideEffectInfo>,
    stats: StepStats,
}

impl StepDriver {
    /// Create and initialize a chart instance.
    pub fn new(config: ChartConfig) -> Self {
        let machine =
            HeartCycleMachine::new().with_conflict_check(config.transition_conflict_check);
        Self {
            machine,
            config,
            reset: false,
            side_effect_info: None,
            stats: StepStats::new(),
        }
    }

    /// Return to the start-of-simulation state.
    ///
    /// Reusable outputs keep their value; everything else is reset and the
    /// side-effect blob is dropped.
    pub fn initialize(&mut self) {
        self.machine.initialize(self.config.reusable());
        self.reset = false;
        self.side_effect_info = None;
        self.stats = StepStats::new();
        info!("Chart initialized");
    }

    /// Execute one tick.
    pub fn step(&mut self, inputs: &ChartInputs) -> StepReport {
        let fired = inputs.fired();
        let mut dispatched = heapless::Vec::new();

        for event in fired.in_dispatch_order() {
            trace!(%event, v = inputs.v, state = %self.machine.state(), "dispatch");
            let outcome = self.machine.handle_event(event, inputs.v);
            self.stats.record(outcome);
            // Capacity equals the channel count; each channel dispatches at most once.
            let _ = dispatched.push(DispatchRecord { event, outcome });
        }

        let mut reset_toggled = false;
        if !fired.is_empty() {
            self.stats.active_ticks += 1;
            if self.machine.take_reset_debt() {
                self.reset = !self.reset;
                reset_toggled = true;
                self.stats.reset_pulses += 1;
            }
        }
        self.stats.ticks += 1;

        if self.config.range_checks {
            if let Err(violation) = self.machine.check_invariants() {
                error!("Chart invariant violated: {violation}");
                debug_assert!(false, "chart invariant violated: {violation}");
            }
        }

        StepReport {
            fired,
            dispatched,
            reset_toggled,
            outputs: self.outputs(),
        }
    }

    // ── Accessors ──

    pub fn outputs(&self) -> ChartOutputs {
        ChartOutputs {
            q: self.machine.q(),
            vreset: self.machine.vreset(),
            vno: self.machine.vno(),
            reset: self.reset,
        }
    }

    #[inline]
    pub fn state(&self) -> ChartState {
        self.machine.state()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.machine.is_active()
    }

    #[inline]
    pub fn reset_event_counter(&self) -> u32 {
        self.machine.reset_event_counter()
    }

    #[inline]
    pub fn active_states(&self) -> ActiveStates {
        self.machine.active_states()
    }

    pub fn machine(&self) -> &HeartCycleMachine {
        &self.machine
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn stats(&self) -> &StepStats {
        &self.stats
    }

    pub fn side_effect_info(&self) -> Option<&SideEffectInfo> {
        self.side_effect_info.as_ref()
    }

    /// Attach the host's opaque side-effect payload.
    pub fn set_side_effect_info(&mut self, info: Option<SideEffectInfo>) {
        self.side_effect_info = info;
    }

    // ── Pause / resume ──

    /// Capture the complete chart state.
    pub fn snapshot(&self) -> ChartSnapshot {
        let fields = self.machine.fields();
        ChartSnapshot {
            q: fields.q,
            vno: fields.vno,
            vreset: fields.vreset,
            vn: fields.vn,
            reset: self.reset,
            reset_event_counter: fields.reset_event_counter,
            is_active: fields.is_active,
            current_state: fields.state,
            side_effect_info: self.side_effect_info.clone(),
        }
    }

    /// Replace the chart state with `snapshot`.
    ///
    /// On error nothing is modified.
    pub fn restore(&mut self, snapshot: &ChartSnapshot) -> Result<(), RestoreError> {
        snapshot.validate()?;
        self.machine.load_fields(snapshot.machine_fields());
        self.reset = snapshot.reset;
        self.side_effect_info = snapshot.side_effect_info.clone();
        info!(
            state = %snapshot.current_state,
            counter = snapshot.reset_event_counter,
            "Chart restored from snapshot"
        );
        Ok(())
    }

    /// Model termination. Hands the side-effect payload back to the host.
    pub fn terminate(self) -> Option<SideEffectInfo> {
        info!(ticks = self.stats.ticks, "Chart terminated");
        self.side_effect_info
    }
}
