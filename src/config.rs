//! Application constants and environment-driven calibration settings.

use thiserror::Error;

use crate::calibration::{LowFlowVariant, ToleranceTable};
use crate::models::enums::{FlowPhase, MeterConstructionClass};
use crate::models::ModelError;

/// Application-level constants
pub const APP_NAME: &str = "FlowCal";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound of the PD / Single-Jet low-flow band: `101.5` or `101.0`.
pub const ENV_PD_LOW_FLOW_MAX: &str = "FLOWCAL_PD_LOW_FLOW_MAX";
/// Construction class used when the operator has not picked one.
pub const ENV_DEFAULT_CLASS: &str = "FLOWCAL_DEFAULT_CLASS";
/// Flow phase used when the operator has not picked one.
pub const ENV_DEFAULT_PHASE: &str = "FLOWCAL_DEFAULT_PHASE";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "flowcal_lib=debug"
    } else {
        "flowcal_lib=info"
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid vocabulary value: {0}")]
    Vocabulary(#[from] ModelError),
}

/// Calibration settings and operator-selection defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationConfig {
    pub pd_low_flow: LowFlowVariant,
    pub default_class: MeterConstructionClass,
    pub default_phase: FlowPhase,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            pd_low_flow: LowFlowVariant::Standard,
            default_class: MeterConstructionClass::Other,
            default_phase: FlowPhase::Low,
        }
    }
}

impl CalibrationConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_PD_LOW_FLOW_MAX) {
            let value = raw.trim();
            config.pd_low_flow = match value {
                "101.5" => LowFlowVariant::Standard,
                "101.0" | "101" => LowFlowVariant::Narrow,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_PD_LOW_FLOW_MAX,
                        value: value.to_string(),
                    })
                }
            };
        }

        if let Some(raw) = lookup(ENV_DEFAULT_CLASS) {
            config.default_class = MeterConstructionClass::from_persisted(&raw);
        }

        if let Some(raw) = lookup(ENV_DEFAULT_PHASE) {
            config.default_phase = raw.trim().to_lowercase().parse()?;
        }

        tracing::debug!(
            pd_low_flow_max = config.pd_low_flow.max_percent(),
            default_class = config.default_class.as_str(),
            default_phase = config.default_phase.as_str(),
            "Calibration config loaded"
        );
        Ok(config)
    }

    pub fn tolerance_table(&self) -> ToleranceTable {
        ToleranceTable::new(self.pd_low_flow)
    }

    /// Operator selection, falling back to the configured defaults.
    pub fn resolve_selection(
        &self,
        class: Option<&str>,
        phase: Option<FlowPhase>,
    ) -> (MeterConstructionClass, FlowPhase) {
        (
            class.map_or(self.default_class, MeterConstructionClass::from_persisted),
            phase.unwrap_or(self.default_phase),
        )
    }
}
