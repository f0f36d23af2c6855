//! Chart and application configuration.
//!
//! [`ChartConfig`] is instance-scoped: the host builds one per chart and
//! hands it to [`StepDriver::new`](crate::driver::StepDriver::new). There is
//! no process-wide registry.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "heart-chart"
//!
//! [chart]
//! reusable_outputs = ["vno"]
//! transition_conflict_check = true
//! range_checks = true
//!
//! [driver]
//! snapshot_path = "state/heart_chart.snap"
//! ```

use std::path::{Path, PathBuf};

use heart_common::chart::{OutputPort, ReusableOutputs};
use heart_common::config::{ConfigError, ConfigLoader, SharedConfig};
use serde::{Deserialize, Serialize};

/// Per-instance chart options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Output ports the host reuses across runs; initialization keeps their value.
    #[serde(default)]
    pub reusable_outputs: Vec<OutputPort>,

    /// Evaluate every guard of the active state on each dispatch and warn
    /// when more than one accepts the event.
    #[serde(default)]
    pub transition_conflict_check: bool,

    /// Check chart invariants after every step.
    #[serde(default = "default_range_checks")]
    pub range_checks: bool,
}

fn default_range_checks() -> bool {
    true
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            reusable_outputs: Vec::new(),
            transition_conflict_check: false,
            range_checks: default_range_checks(),
        }
    }
}

impl ChartConfig {
    /// Reusable ports as a flag set.
    pub fn reusable(&self) -> ReusableOutputs {
        ReusableOutputs::from_ports(&self.reusable_outputs)
    }
}

/// Options of the replay driver binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Where pause/resume snapshots are stored.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

/// Complete configuration file of the `heart_chart` binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

impl AppConfig {
    /// Load from TOML and validate.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml_validated(content: &str) -> Result<Self, ConfigError> {
        let config = Self::from_toml_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        if let Some(path) = &self.driver.snapshot_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "driver.snapshot_path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
