//! State machine module root.
//!
//! The chart is flat: four mutually exclusive states plus the inactive
//! sentinel held before the first dispatch.

pub mod activity;
pub mod machine;
pub mod transition;
