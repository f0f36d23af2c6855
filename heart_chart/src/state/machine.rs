//! Heart-cycle state machine.
//!
//! Processes exactly one event per call. The first call after
//! initialization only enters the chart (`Inactive` → `Resting`), whatever
//! the event; every later call looks up the first matching row of
//! [`TRANSITIONS`](super::transition::TRANSITIONS) for the current state and
//! takes it, or does nothing.
//!
//! The state enum is the single source of truth: `q` is rewritten from
//! [`ChartState::q_code`] whenever a state is entered and has no setter.

use heart_common::chart::{ChartEvent, ChartState, ReusableOutputs};
use heart_common::consts::{Q_MAX, Q_MIN};
use tracing::{debug, warn};

use super::activity::ActiveStates;
use super::transition::{self, Transition};
use crate::error::InvariantViolation;

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// First dispatch: the chart was entered and rests in `Resting`.
    Entered,
    /// A transition fired.
    Transitioned { from: ChartState, to: ChartState },
    /// No guard of the current state accepted the event.
    Ignored,
}

/// Raw field values used to rebuild a machine from a validated snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MachineFields {
    pub state: ChartState,
    pub is_active: bool,
    pub reset_event_counter: u32,
    pub vn: f64,
    pub q: f64,
    pub vreset: f64,
    pub vno: f64,
}

/// Chart data and the active state.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartCycleMachine {
    state: ChartState,
    is_active: bool,
    reset_event_counter: u32,
    vn: f64,
    q: f64,
    vreset: f64,
    vno: f64,
    active: ActiveStates,
    conflict_check: bool,
}

impl Default for HeartCycleMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeartCycleMachine {
    /// Create a machine in its pre-entry state with all outputs reset.
    pub const fn new() -> Self {
        Self {
            state: ChartState::Inactive,
            is_active: false,
            reset_event_counter: 0,
            vn: 0.0,
            q: 1.0,
            vreset: 0.0,
            vno: 0.0,
            active: ActiveStates::empty(),
            conflict_check: false,
        }
    }

    /// Enable the transition-conflict diagnostic on every dispatch.
    pub fn with_conflict_check(mut self, enabled: bool) -> Self {
        self.conflict_check = enabled;
        self
    }

    /// Return to the pre-entry state.
    ///
    /// Outputs in `reusable` keep their current value; the others are reset
    /// (`q` to 1.0, `vreset` and `vno` to 0.0).
    pub fn initialize(&mut self, reusable: ReusableOutputs) {
        self.state = ChartState::Inactive;
        self.is_active = false;
        self.active = ActiveStates::empty();
        self.reset_event_counter = 0;
        self.vn = 0.0;
        if !reusable.contains(ReusableOutputs::Q) {
            self.q = 1.0;
        }
        if !reusable.contains(ReusableOutputs::VRESET) {
            self.vreset = 0.0;
        }
        if !reusable.contains(ReusableOutputs::VNO) {
            self.vno = 0.0;
        }
    }

    // ── Accessors ──

    #[inline]
    pub const fn state(&self) -> ChartState {
        self.state
    }

    #[inline]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    #[inline]
    pub const fn reset_event_counter(&self) -> u32 {
        self.reset_event_counter
    }

    /// Voltage captured on the last `Resting` → `Stimulated` transition.
    #[inline]
    pub const fn vn(&self) -> f64 {
        self.vn
    }

    #[inline]
    pub const fn q(&self) -> f64 {
        self.q
    }

    #[inline]
    pub const fn vreset(&self) -> f64 {
        self.vreset
    }

    #[inline]
    pub const fn vno(&self) -> f64 {
        self.vno
    }

    #[inline]
    pub const fn active_states(&self) -> ActiveStates {
        self.active
    }

    // ── Dispatch ──

    /// Process one event with the current voltage sample `v`.
    pub fn handle_event(&mut self, event: ChartEvent, v: f64) -> StepOutcome {
        if !self.is_active {
            self.is_active = true;
            self.enter(ChartState::Resting);
            debug!(%event, "chart entered, resting");
            return StepOutcome::Entered;
        }

        if self.conflict_check {
            self.report_conflicts(event);
        }

        match transition::first_match(self.state, event) {
            Some(row) => {
                let from = self.state;
                self.take(row, v);
                debug!(
                    %event, %from, to = %row.to,
                    q = self.q, vreset = self.vreset, counter = self.reset_event_counter,
                    "transition"
                );
                StepOutcome::Transitioned { from, to: row.to }
            }
            None => StepOutcome::Ignored,
        }
    }

    /// Consume one unit of reset debt. Returns `false` when there was none.
    pub(crate) fn take_reset_debt(&mut self) -> bool {
        if self.reset_event_counter > 0 {
            self.reset_event_counter -= 1;
            true
        } else {
            false
        }
    }

    fn take(&mut self, row: &Transition, v: f64) {
        self.active.remove(ActiveStates::for_state(self.state));
        self.vreset = v;
        if row.captures_vn {
            self.vn = v;
        }
        self.reset_event_counter = self.reset_event_counter.saturating_add(1);
        self.enter(row.to);
        if row.publishes_vno {
            self.vno = self.vn;
        }
    }

    fn enter(&mut self, state: ChartState) {
        self.state = state;
        self.active = ActiveStates::for_state(state);
        if let Some(code) = state.q_code() {
            self.q = code;
        }
    }

    fn report_conflicts(&self, event: ChartEvent) {
        let matching = transition::matching_guards(self.state, event);
        if matching > 1 {
            warn!(
                state = %self.state, %event, matching,
                "transition conflict: more than one guard accepts the event"
            );
        }
    }

    // ── Invariants ──

    /// Check the chart data for internal consistency.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.is_active != (self.state != ChartState::Inactive) {
            return Err(InvariantViolation::Activation {
                is_active: self.is_active,
                state: self.state,
            });
        }
        if !self.active.consistent_with(self.state) {
            return Err(InvariantViolation::ActivityFlags {
                state: self.state,
                flags: self.active.bits(),
            });
        }
        if let Some(code) = self.state.q_code() {
            if !(Q_MIN..=Q_MAX).contains(&self.q) {
                return Err(InvariantViolation::StateCodeRange(self.q));
            }
            if self.q != code {
                return Err(InvariantViolation::StateCode {
                    state: self.state,
                    q: self.q,
                });
            }
        }
        Ok(())
    }

    // ── Snapshot support ──

    pub(crate) fn fields(&self) -> MachineFields {
        MachineFields {
            state: self.state,
            is_active: self.is_active,
            reset_event_counter: self.reset_event_counter,
            vn: self.vn,
            q: self.q,
            vreset: self.vreset,
            vno: self.vno,
        }
    }

    /// Overwrite all chart data. Activity flags are re-derived from `state`.
    pub(crate) fn load_fields(&mut self, fields: MachineFields) {
        self.state = fields.state;
        self.is_active = fields.is_active;
        self.reset_event_counter = fields.reset_event_counter;
        self.vn = fields.vn;
        self.q = fields.q;
        self.vreset = fields.vreset;
        self.vno = fields.vno;
        self.active = ActiveStates::for_state(fields.state);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
