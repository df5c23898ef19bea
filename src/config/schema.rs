//! Configuration file schema.
//!
//! Every section is optional; an empty mapping yields the built-in
//! five-phase catalog, a 1200 ms base interval and `medium`/`standard`
//! default parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::phase::{Phase, PhaseIcon, SimulationParams, TimingModel, builtin_phases};
use crate::phase::interval::BASE_INTERVAL;

/// Top-level simulator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Tick timing.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Parameters used when the caller does not supply them.
    #[serde(default)]
    pub defaults: SimulationParams,

    /// Custom phase catalog; the built-in catalog when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<Vec<PhaseDefinition>>,
}

/// Timing section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Base tick period in milliseconds.
    #[serde(default = "default_base_interval_ms")]
    pub base_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: default_base_interval_ms(),
        }
    }
}

fn default_base_interval_ms() -> u64 {
    u64::try_from(BASE_INTERVAL.as_millis()).unwrap_or(1200)
}

/// A phase entry in the config file. Indices follow list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseDefinition {
    /// Card title.
    pub title: String,

    /// Card description.
    #[serde(default)]
    pub description: String,

    /// Icon tag.
    pub icon: PhaseIcon,
}

impl SimulatorConfig {
    /// Resolves the phase catalog.
    #[must_use]
    pub fn phases(&self) -> Vec<Phase> {
        self.phases.as_ref().map_or_else(builtin_phases, |defs| {
            defs.iter()
                .enumerate()
                .map(|(index, def)| {
                    Phase::new(index, def.title.clone(), def.description.clone(), def.icon)
                })
                .collect()
        })
    }

    /// Builds the timing model from the timing section.
    #[must_use]
    pub const fn timing_model(&self) -> TimingModel {
        TimingModel::with_base(Duration::from_millis(self.timing.base_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{DataSize, PqcComplexity};

    #[test]
    fn test_empty_mapping_uses_defaults() {
        let config: SimulatorConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, SimulatorConfig::default());
        assert_eq!(config.timing.base_interval_ms, 1200);
        assert_eq!(config.phases().len(), 5);
        assert_eq!(config.timing_model(), TimingModel::default());
    }

    #[test]
    fn test_full_config() {
        let yaml = r"
timing:
  base_interval_ms: 250
defaults:
  data_size: large
  pqc_complexity: enhanced
phases:
  - title: Handshake
    description: Negotiate keys
    icon: key
  - title: Commit
    icon: cube
";
        let config: SimulatorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.timing_model().base(), Duration::from_millis(250));
        assert_eq!(
            config.defaults,
            SimulationParams::new(DataSize::Large, PqcComplexity::Enhanced)
        );

        let phases = config.phases();
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[1].index, 1);
        assert_eq!(phases[1].title, "Commit");
        assert_eq!(phases[1].description, "");
        assert_eq!(phases[1].icon, PhaseIcon::Cube);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<SimulatorConfig, _> = serde_yaml::from_str("tmiing: {}\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_icon_rejected() {
        let yaml = "phases:\n  - title: X\n    icon: rocket\n";
        let result: Result<SimulatorConfig, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_data_size_rejected() {
        let yaml = "defaults:\n  data_size: huge\n";
        let result: Result<SimulatorConfig, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }
}
