//! Chart state identities.

use serde::{Deserialize, Serialize};

/// Active child of the heart-cycle chart.
///
/// Discriminants follow the host's activity numbering (`0` = no active
/// child). The state-code output `q` uses a different numbering, see
/// [`ChartState::q_code`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChartState {
    /// Chart not yet entered.
    #[default]
    Inactive = 0,
    /// Action-potential plateau.
    Plateau = 1,
    /// Resting potential, initial state after entry.
    Resting = 2,
    /// Stimulus applied, waiting for upstroke or stimulus end.
    Stimulated = 3,
    /// Rapid depolarisation.
    Upstroke = 4,
}

impl ChartState {
    /// States the chart can occupy once entered.
    pub const ACTIVE: [Self; 4] = [Self::Resting, Self::Stimulated, Self::Upstroke, Self::Plateau];

    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Inactive),
            1 => Some(Self::Plateau),
            2 => Some(Self::Resting),
            3 => Some(Self::Stimulated),
            4 => Some(Self::Upstroke),
            _ => None,
        }
    }

    /// Value published on the `q` output while this state is active.
    ///
    /// `None` for [`ChartState::Inactive`], which has no state code.
    #[inline]
    pub const fn q_code(self) -> Option<f64> {
        match self {
            Self::Inactive => None,
            Self::Resting => Some(1.0),
            Self::Stimulated => Some(2.0),
            Self::Upstroke => Some(3.0),
            Self::Plateau => Some(4.0),
        }
    }

    /// Lower-case state name as drawn on the chart.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Plateau => "plateau",
            Self::Resting => "resting",
            Self::Stimulated => "stimulated",
            Self::Upstroke => "upstroke",
        }
    }
}

impl std::fmt::Display for ChartState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
