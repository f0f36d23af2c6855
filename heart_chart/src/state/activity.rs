//! Per-state activity flags.
//!
//! The host's debugger animates the chart from one flag per state. They carry
//! no behaviour of their own but must stay consistent with the active state:
//! exactly one flag while the chart is entered, none before.

use bitflags::bitflags;
use heart_common::chart::ChartState;

bitflags! {
    /// Set of states currently marked active.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ActiveStates: u8 {
        const PLATEAU    = 0x01;
        const RESTING    = 0x02;
        const STIMULATED = 0x04;
        const UPSTROKE   = 0x08;
    }
}

impl ActiveStates {
    /// Flags matching a single active state. Empty for `Inactive`.
    #[inline]
    pub const fn for_state(state: ChartState) -> Self {
        match state {
            ChartState::Inactive => Self::empty(),
            ChartState::Plateau => Self::PLATEAU,
            ChartState::Resting => Self::RESTING,
            ChartState::Stimulated => Self::STIMULATED,
            ChartState::Upstroke => Self::UPSTROKE,
        }
    }

    /// Whether these flags describe exactly `state` and nothing else.
    #[inline]
    pub fn consistent_with(self, state: ChartState) -> bool {
        self == Self::for_state(state)
    }
}
