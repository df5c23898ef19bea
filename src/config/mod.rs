//! Configuration module
//!
//! Loading and validation of optional YAML configuration: base timing,
//! default run parameters, and custom phase catalogs.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoaderOptions};
pub use schema::{PhaseDefinition, SimulatorConfig, TimingConfig};
pub use validation::{ValidationResult, Validator};
