//! Input event channels and per-tick fired sets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::consts::ENDPSTIM_FIRED_LEVEL;

/// Event identity broadcast into the chart.
///
/// Discriminants are the host's broadcast numbers; `1` is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChartEvent {
    Event1 = 0,
    Event2 = 2,
    Event3 = 3,
    /// Pacing stimulus start.
    Pstim = 4,
    /// Pacing stimulus end, edge-encoded as `-1` on its port.
    Endpstim = 5,
}

impl ChartEvent {
    /// Order in which fired channels are dispatched within one tick.
    pub const DISPATCH_ORDER: [Self; 5] =
        [Self::Event1, Self::Event2, Self::Event3, Self::Pstim, Self::Endpstim];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Event1 => "event1",
            Self::Event2 => "event2",
            Self::Event3 => "event3",
            Self::Pstim => "pstim",
            Self::Endpstim => "endpstim",
        }
    }

    /// Whether a raw port sample counts as this channel firing.
    ///
    /// `endpstim` fires only on exactly `-1`; every other channel fires on
    /// any nonzero sample.
    #[inline]
    pub const fn fired(self, raw: i8) -> bool {
        match self {
            Self::Endpstim => raw == ENDPSTIM_FIRED_LEVEL,
            _ => raw != 0,
        }
    }

    /// Flag representing this channel in a [`FiredEvents`] set.
    #[inline]
    pub const fn flag(self) -> FiredEvents {
        match self {
            Self::Event1 => FiredEvents::EVENT1,
            Self::Event2 => FiredEvents::EVENT2,
            Self::Event3 => FiredEvents::EVENT3,
            Self::Pstim => FiredEvents::PSTIM,
            Self::Endpstim => FiredEvents::ENDPSTIM,
        }
    }
}

impl std::fmt::Display for ChartEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Channels that fired during one tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FiredEvents: u8 {
        const EVENT1   = 0x01;
        const EVENT2   = 0x02;
        const EVENT3   = 0x04;
        const PSTIM    = 0x08;
        const ENDPSTIM = 0x10;
    }
}

impl FiredEvents {
    /// Fired channels in dispatch order.
    pub fn in_dispatch_order(self) -> impl Iterator<Item = ChartEvent> {
        ChartEvent::DISPATCH_ORDER
            .into_iter()
            .filter(move |event| self.contains(event.flag()))
    }
}
