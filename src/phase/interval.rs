//! Run parameters and the tick interval model.
//!
//! The interval is a pure function of the parameters: a base period scaled
//! by one factor per parameter. Factors are kept as per-mille integers so
//! the product is exact (e.g. `large`/`paranoid` is exactly 4320 ms).

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default base tick period.
pub const BASE_INTERVAL: Duration = Duration::from_millis(1200);

/// Size class of the (simulated) genomic input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DataSize {
    /// Single sample panel.
    Small,
    /// Exome-scale input.
    #[default]
    Medium,
    /// Whole-genome input.
    Large,
}

impl DataSize {
    /// Scaling factor in thousandths.
    #[must_use]
    pub const fn factor_per_mille(self) -> u64 {
        match self {
            Self::Small => 1000,
            Self::Medium => 1500,
            Self::Large => 2000,
        }
    }

    /// Lowercase name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Strength class of the (simulated) post-quantum primitives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PqcComplexity {
    /// Baseline parameter set.
    #[default]
    Standard,
    /// Larger parameter set.
    Enhanced,
    /// Everything turned up.
    Paranoid,
}

impl PqcComplexity {
    /// Scaling factor in thousandths.
    #[must_use]
    pub const fn factor_per_mille(self) -> u64 {
        match self {
            Self::Standard => 1000,
            Self::Enhanced => 1300,
            Self::Paranoid => 1800,
        }
    }

    /// Lowercase name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Enhanced => "enhanced",
            Self::Paranoid => "paranoid",
        }
    }
}

impl std::fmt::Display for DataSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::fmt::Display for PqcComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Parameters for one simulation run.
///
/// Missing fields deserialize to their defaults (`medium`/`standard`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationParams {
    /// Input size class.
    pub data_size: DataSize,
    /// Cryptographic complexity class.
    pub pqc_complexity: PqcComplexity,
}

impl SimulationParams {
    /// Creates a parameter pair.
    #[must_use]
    pub const fn new(data_size: DataSize, pqc_complexity: PqcComplexity) -> Self {
        Self {
            data_size,
            pqc_complexity,
        }
    }
}

/// Maps run parameters to the per-phase tick interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingModel {
    base: Duration,
}

impl Default for TimingModel {
    fn default() -> Self {
        Self {
            base: BASE_INTERVAL,
        }
    }
}

impl TimingModel {
    /// Creates a model with a custom base period.
    #[must_use]
    pub const fn with_base(base: Duration) -> Self {
        Self { base }
    }

    /// Returns the base period.
    #[must_use]
    pub const fn base(&self) -> Duration {
        self.base
    }

    /// Computes the tick interval for the given parameters.
    ///
    /// `base * size_factor * complexity_factor`, computed in microseconds
    /// and never shorter than one microsecond.
    #[must_use]
    pub fn interval(&self, params: SimulationParams) -> Duration {
        let scaled = self.base.as_micros()
            * u128::from(params.data_size.factor_per_mille())
            * u128::from(params.pqc_complexity.factor_per_mille())
            / 1_000_000;
        Duration::from_micros(u64::try_from(scaled).unwrap_or(u64::MAX).max(1))
    }
}

/// Computes the tick interval with the default 1200 ms base.
#[must_use]
pub fn interval(params: SimulationParams) -> Duration {
    TimingModel::default().interval(params)
}
