//! Configuration validation
//!
//! Semantic checks on a deserialized [`SimulatorConfig`]. Validation
//! collects every issue rather than stopping at the first one.

use std::collections::HashSet;

use crate::config::loader::ConfigLimits;
use crate::config::schema::SimulatorConfig;
use crate::error::{Severity, ValidationIssue};

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational unless strict).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns the result.
    pub fn validate(&mut self, config: &SimulatorConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_timing(config, limits);
        self.validate_phases(config, limits);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_timing(&mut self, config: &SimulatorConfig, limits: &ConfigLimits) {
        let base = config.timing.base_interval_ms;
        if base == 0 {
            self.add_error("timing.base_interval_ms", "base interval must be greater than zero");
        } else if base > limits.max_base_interval_ms {
            self.add_error(
                "timing.base_interval_ms",
                &format!(
                    "base interval {base} ms exceeds limit of {} ms",
                    limits.max_base_interval_ms
                ),
            );
        }
    }

    fn validate_phases(&mut self, config: &SimulatorConfig, limits: &ConfigLimits) {
        let Some(phases) = &config.phases else {
            return;
        };

        if phases.is_empty() {
            self.add_error("phases", "at least one phase is required");
            return;
        }

        if phases.len() > limits.max_phases {
            self.add_error(
                "phases",
                &format!(
                    "{} phases exceeds limit of {}",
                    phases.len(),
                    limits.max_phases
                ),
            );
        }

        let mut seen = HashSet::new();
        for (i, phase) in phases.iter().enumerate() {
            let title = phase.title.trim();
            if title.is_empty() {
                self.add_error(&format!("phases[{i}].title"), "title must not be empty");
            } else if !seen.insert(title) {
                self.add_warning(
                    &format!("phases[{i}].title"),
                    &format!("duplicate phase title '{title}'"),
                );
            }

            if phase.description.trim().is_empty() {
                self.add_warning(&format!("phases[{i}].description"), "description is empty");
            }
        }
    }

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
