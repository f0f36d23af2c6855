//! Ordered transition table of the heart-cycle chart.
//!
//! Rows are grouped by source state and listed in guard priority order.
//! Evaluation is first-match-wins: once a row for the current state matches
//! the dispatched event, later rows for that state are not considered.

use heart_common::chart::{ChartEvent, ChartState};

/// One outgoing transition.
///
/// Every transition copies the current `v` into `vreset` and increments the
/// reset-event counter; the flags below select the extra actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ChartState,
    pub event: ChartEvent,
    pub to: ChartState,
    /// Capture `v` into `vn`.
    pub captures_vn: bool,
    /// Publish `vn` on the `vno` output after entering `to`.
    pub publishes_vno: bool,
}

impl Transition {
    const fn plain(from: ChartState, event: ChartEvent, to: ChartState) -> Self {
        Self {
            from,
            event,
            to,
            captures_vn: false,
            publishes_vno: false,
        }
    }
}

/// The chart, in priority order per source state.
pub static TRANSITIONS: [Transition; 6] = [
    Transition::plain(ChartState::Plateau, ChartEvent::Event1, ChartState::Resting),
    Transition {
        captures_vn: true,
        ..Transition::plain(ChartState::Resting, ChartEvent::Pstim, ChartState::Stimulated)
    },
    Transition::plain(ChartState::Resting, ChartEvent::Event2, ChartState::Upstroke),
    Transition::plain(ChartState::Stimulated, ChartEvent::Event2, ChartState::Upstroke),
    Transition::plain(ChartState::Stimulated, ChartEvent::Endpstim, ChartState::Resting),
    Transition {
        publishes_vno: true,
        ..Transition::plain(ChartState::Upstroke, ChartEvent::Event3, ChartState::Plateau)
    },
];

/// Outgoing transitions of `state`, in priority order.
pub fn guards_of(state: ChartState) -> impl Iterator<Item = &'static Transition> {
    TRANSITIONS.iter().filter(move |t| t.from == state)
}

/// First transition of `state` whose guard accepts `event`.
pub fn first_match(state: ChartState, event: ChartEvent) -> Option<&'static Transition> {
    guards_of(state).find(|t| t.event == event)
}

/// Number of guards of `state` that accept `event`.
///
/// Anything above one is a transition conflict: the table would be
/// order-dependent for that event.
pub fn matching_guards(state: ChartState, event: ChartEvent) -> usize {
    guards_of(state).filter(|t| t.event == event).count()
}
