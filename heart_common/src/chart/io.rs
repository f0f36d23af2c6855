//! Per-tick port records exchanged with the simulation host.
//!
//! Both records are `#[repr(C)]` plain data so a host can hand them across
//! an FFI or shared-memory boundary without conversion.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use super::event::{ChartEvent, FiredEvents};

/// Input samples for one tick.
///
/// Omitted fields deserialize as zero, so a trace file only lists the
/// channels that fire.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
#[repr(C)]
pub struct ChartInputs {
    /// Membrane voltage / driving signal.
    pub v: f64,
    pub event1: i8,
    pub event2: i8,
    pub event3: i8,
    pub pstim: i8,
    /// Fired only when exactly `-1`.
    pub endpstim: i8,
}

const_assert_eq!(core::mem::size_of::<ChartInputs>(), 16);

impl ChartInputs {
    /// Inputs with only `v` set and every channel quiet.
    pub const fn quiet(v: f64) -> Self {
        Self {
            v,
            event1: 0,
            event2: 0,
            event3: 0,
            pstim: 0,
            endpstim: 0,
        }
    }

    /// Raw sample on the port feeding `event`.
    #[inline]
    pub const fn raw(&self, event: ChartEvent) -> i8 {
        match event {
            ChartEvent::Event1 => self.event1,
            ChartEvent::Event2 => self.event2,
            ChartEvent::Event3 => self.event3,
            ChartEvent::Pstim => self.pstim,
            ChartEvent::Endpstim => self.endpstim,
        }
    }

    /// Set of channels that fired this tick.
    pub fn fired(&self) -> FiredEvents {
        ChartEvent::DISPATCH_ORDER
            .into_iter()
            .filter(|event| event.fired(self.raw(*event)))
            .fold(FiredEvents::empty(), |acc, event| acc | event.flag())
    }
}

/// Output values written back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct ChartOutputs {
    /// State code, 1..=4.
    pub q: f64,
    /// Voltage sampled when the last state was left.
    pub vreset: f64,
    /// Voltage captured at stimulation, published on plateau entry.
    pub vno: f64,
    /// Resync pulse, toggled by the step driver.
    pub reset: bool,
}

const_assert_eq!(core::mem::size_of::<ChartOutputs>(), 32);

impl Default for ChartOutputs {
    fn default() -> Self {
        Self {
            q: 1.0,
            vreset: 0.0,
            vno: 0.0,
            reset: false,
        }
    }
}

/// Real-valued output port, as named in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputPort {
    Q,
    Vreset,
    Vno,
}

bitflags! {
    /// Outputs the host marked reusable; initialization leaves them untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ReusableOutputs: u8 {
        const Q      = 0x01;
        const VRESET = 0x02;
        const VNO    = 0x04;
    }
}

impl ReusableOutputs {
    /// Build the flag set from a list of port names.
    pub fn from_ports(ports: &[OutputPort]) -> Self {
        ports.iter().fold(Self::empty(), |acc, port| {
            acc | match port {
                OutputPort::Q => Self::Q,
                OutputPort::Vreset => Self::VRESET,
                OutputPort::Vno => Self::VNO,
            }
        })
    }
}
