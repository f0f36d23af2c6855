//! Pause/resume snapshots.
//!
//! A snapshot is the ordered tuple
//! `(q, vno, vreset, vn, reset, resetEventCounter, isActive, currentState)`
//! followed by an opaque side-effect blob the host may attach. Snapshots are
//! taken whole from a [`StepDriver`](crate::driver::StepDriver) and restored
//! whole: validation runs before any field is assigned.
//!
//! Two encodings exist: the typed [`ChartSnapshot`] (serde, used by
//! [`persist`]) and the host-shaped cell array produced by
//! [`ChartSnapshot::to_cells`], a 9-element JSON array.

pub mod persist;

use heart_common::chart::ChartState;
use heart_common::consts::SNAPSHOT_ARITY;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::state::machine::MachineFields;

/// Opaque host payload carried through snapshots unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideEffectInfo(pub Vec<u8>);

impl SideEffectInfo {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Restore failure. The instance keeps its pre-restore state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    /// The cell form is not an array.
    #[error("snapshot is not a tuple")]
    NotATuple,

    /// Wrong number of cells.
    #[error("snapshot has {found} cells, expected {expected}")]
    Arity { expected: usize, found: usize },

    /// A cell holds the wrong type or an out-of-range value.
    #[error("snapshot cell {index} ({field}): expected {expected}")]
    FieldType {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },

    /// `currentState` is not a known activity code.
    #[error("unknown chart state code {0}")]
    UnknownState(u64),

    /// Fields are individually valid but contradict each other.
    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}

/// Complete chart state at a pause point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub q: f64,
    pub vno: f64,
    pub vreset: f64,
    pub vn: f64,
    pub reset: bool,
    pub reset_event_counter: u32,
    pub is_active: bool,
    pub current_state: ChartState,
    pub side_effect_info: Option<SideEffectInfo>,
}

const FIELD_NAMES: [&str; SNAPSHOT_ARITY] = [
    "q",
    "vno",
    "vreset",
    "vn",
    "reset",
    "resetEventCounter",
    "isActive",
    "currentState",
    "sideEffectInfo",
];

impl ChartSnapshot {
    /// Check cross-field consistency.
    ///
    /// An entered chart must sit in a real state whose code is on `q`; a
    /// chart that was never entered must hold the `Inactive` sentinel.
    pub fn validate(&self) -> Result<(), RestoreError> {
        match (self.is_active, self.current_state.q_code()) {
            (true, None) => Err(RestoreError::Inconsistent(
                "active chart without an active state".to_string(),
            )),
            (false, Some(_)) => Err(RestoreError::Inconsistent(format!(
                "inactive chart in state {}",
                self.current_state
            ))),
            (true, Some(code)) if code != self.q => Err(RestoreError::Inconsistent(format!(
                "q = {} but state {} has code {code}",
                self.q, self.current_state
            ))),
            _ => Ok(()),
        }
    }

    pub(crate) fn machine_fields(&self) -> MachineFields {
        MachineFields {
            state: self.current_state,
            is_active: self.is_active,
            reset_event_counter: self.reset_event_counter,
            vn: self.vn,
            q: self.q,
            vreset: self.vreset,
            vno: self.vno,
        }
    }

    /// Host-shaped cell form.
    ///
    /// `isActive` is written as `0`/`1` and `currentState` as its activity
    /// code; the blob is `null` or an array of byte values. Non-finite reals
    /// have no JSON number form and are written as `"NaN"`, `"Infinity"` or
    /// `"-Infinity"`.
    pub fn to_cells(&self) -> Value {
        let blob = match &self.side_effect_info {
            Some(info) => Value::from(info.as_bytes().to_vec()),
            None => Value::Null,
        };
        Value::Array(vec![
            real_cell(self.q),
            real_cell(self.vno),
            real_cell(self.vreset),
            real_cell(self.vn),
            Value::from(self.reset),
            Value::from(self.reset_event_counter),
            Value::from(u8::from(self.is_active)),
            Value::from(self.current_state as u8),
            blob,
        ])
    }

    /// Parse the host-shaped cell form and validate it.
    pub fn from_cells(cells: &Value) -> Result<Self, RestoreError> {
        let cells = cells.as_array().ok_or(RestoreError::NotATuple)?;
        if cells.len() != SNAPSHOT_ARITY {
            return Err(RestoreError::Arity {
                expected: SNAPSHOT_ARITY,
                found: cells.len(),
            });
        }

        let state_code = unsigned(cells, 7, u64::from(u8::MAX), "activity code")?;
        let current_state = u8::try_from(state_code)
            .ok()
            .and_then(ChartState::from_u8)
            .ok_or(RestoreError::UnknownState(state_code))?;

        let snapshot = Self {
            q: real(cells, 0)?,
            vno: real(cells, 1)?,
            vreset: real(cells, 2)?,
            vn: real(cells, 3)?,
            reset: cells[4].as_bool().ok_or_else(|| type_error(4, "boolean"))?,
            reset_event_counter: unsigned(cells, 5, u64::from(u32::MAX), "32-bit unsigned integer")?
                as u32,
            is_active: unsigned(cells, 6, 1, "0 or 1")? == 1,
            current_state,
            side_effect_info: blob(cells, 8)?,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}

fn type_error(index: usize, expected: &'static str) -> RestoreError {
    RestoreError::FieldType {
        index,
        field: FIELD_NAMES[index],
        expected,
    }
}

const NAN_CELL: &str = "NaN";
const INFINITY_CELL: &str = "Infinity";
const NEG_INFINITY_CELL: &str = "-Infinity";

fn real_cell(value: f64) -> Value {
    if value.is_nan() {
        Value::from(NAN_CELL)
    } else if value == f64::INFINITY {
        Value::from(INFINITY_CELL)
    } else if value == f64::NEG_INFINITY {
        Value::from(NEG_INFINITY_CELL)
    } else {
        Value::from(value)
    }
}

fn real(cells: &[Value], index: usize) -> Result<f64, RestoreError> {
    match &cells[index] {
        Value::String(text) => match text.as_str() {
            NAN_CELL => Some(f64::NAN),
            INFINITY_CELL => Some(f64::INFINITY),
            NEG_INFINITY_CELL => Some(f64::NEG_INFINITY),
            _ => None,
        },
        value => value.as_f64(),
    }
    .ok_or_else(|| type_error(index, "real number"))
}

fn unsigned(
    cells: &[Value],
    index: usize,
    max: u64,
    expected: &'static str,
) -> Result<u64, RestoreError> {
    let cell = &cells[index];
    cell.as_u64()
        .or_else(|| {
            // Hosts that write every number as a double.
            cell.as_f64()
                .filter(|value| *value >= 0.0 && value.fract() == 0.0 && *value <= max as f64)
                .map(|value| value as u64)
        })
        .filter(|value| *value <= max)
        .ok_or_else(|| type_error(index, expected))
}

fn blob(cells: &[Value], index: usize) -> Result<Option<SideEffectInfo>, RestoreError> {
    match &cells[index] {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|byte| u8::try_from(byte).ok())
                    .ok_or_else(|| type_error(index, "null or array of bytes"))
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(|bytes| Some(SideEffectInfo(bytes))),
        _ => Err(type_error(index, "null or array of bytes")),
    }
}
