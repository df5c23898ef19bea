//! Configuration loader
//!
//! Loading pipeline:
//! 1. Size check and read
//! 2. YAML parsing
//! 3. Deserialization to typed config (unknown fields rejected)
//! 4. Validation
//! 5. Strict mode promotion of warnings

use std::path::Path;

use crate::config::schema::SimulatorConfig;
use crate::config::validation::Validator;
use crate::error::{ConfigError, Severity, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Limits for configuration contents.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of phases.
    pub max_phases: usize,

    /// Maximum base interval in milliseconds.
    pub max_base_interval_ms: u64,

    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_phases: env_or("PQCSIM_MAX_PHASES", 100),
            max_base_interval_ms: env_or("PQCSIM_MAX_BASE_INTERVAL_MS", 3_600_000),
            max_config_size: env_or("PQCSIM_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Options for the configuration loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Content limits.
    pub limits: ConfigLimits,

    /// Treat validation warnings as errors.
    pub strict: bool,
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: SimulatorConfig,

    /// Warnings encountered during loading.
    pub warnings: Vec<ValidationIssue>,
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Loads `path`, or returns the default configuration when `path` is `None`.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_or_default(&self, path: Option<&Path>) -> Result<LoadResult, ConfigError> {
        path.map_or_else(
            || {
                Ok(LoadResult {
                    config: SimulatorConfig::default(),
                    warnings: Vec::new(),
                })
            },
            |p| self.load(p),
        )
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - YAML parsing or deserialization fails
    /// - Validation fails (or produces warnings in strict mode)
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let limit = self.options.limits.max_config_size;
        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > limit {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {limit} bytes"),
            });
        }

        let raw_content = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        let raw_content = raw_content.strip_prefix('\u{feff}').unwrap_or(&raw_content);

        self.load_str(raw_content, path)
    }

    /// Parses and validates configuration text. `origin` is used in errors.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the file checks.
    pub fn load_str(&self, content: &str, origin: &Path) -> Result<LoadResult, ConfigError> {
        let root: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                path: origin.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        // An empty document means "all defaults".
        let config: SimulatorConfig = if root.is_null() {
            SimulatorConfig::default()
        } else {
            serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
                path: origin.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?
        };

        let mut validator = Validator::new();
        let result = validator.validate(&config, &self.options.limits);

        if result.has_errors() || (self.options.strict && !result.warnings.is_empty()) {
            let errors = result
                .errors
                .into_iter()
                .chain(result.warnings.into_iter().map(|mut w| {
                    w.severity = Severity::Error;
                    w
                }))
                .collect();
            return Err(ConfigError::ValidationError {
                path: origin.display().to_string(),
                errors,
            });
        }

        Ok(LoadResult {
            config,
            warnings: result.warnings,
        })
    }
}

/// Reads a limit from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
