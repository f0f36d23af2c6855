//! Heart Common Library
//!
//! Shared vocabulary for the heart-cycle chart workspace: state and event
//! identities, per-tick input/output records, and TOML configuration loading.
//!
//! # Module Structure
//!
//! - [`chart`] - Chart states, event channels and port records
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Workspace-wide constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use heart_common::prelude::*;
//!
//! let inputs = ChartInputs { v: 5.0, pstim: 1, ..Default::default() };
//! assert!(inputs.fired().contains(FiredEvents::PSTIM));
//! ```

pub mod chart;
pub mod config;
pub mod consts;
pub mod prelude;
