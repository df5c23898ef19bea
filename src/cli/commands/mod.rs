//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod interval;
pub mod phases;
pub mod run;
pub mod validate;
pub mod version;

use std::time::Duration;

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigLimits, ConfigLoader, LoaderOptions, SimulatorConfig};
use crate::error::SimulatorError;
use crate::phase::TimingModel;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), SimulatorError> {
    match cli.command {
        Commands::Run(args) => run::run(&args, cli.quiet).await,
        Commands::Phases(args) => phases::run(&args),
        Commands::Interval(args) => interval::run(&args),
        Commands::Validate(args) => validate::run(&args, cli.quiet),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => version::run(&args),
    }
}

/// Loads the optional config file, logging any warnings.
pub(crate) fn load_config(
    path: Option<&std::path::Path>,
    strict: bool,
) -> Result<SimulatorConfig, SimulatorError> {
    let loader = ConfigLoader::new(LoaderOptions {
        strict,
        ..LoaderOptions::default()
    });
    let loaded = loader.load_or_default(path)?;
    for warning in &loaded.warnings {
        tracing::warn!(path = %warning.path, "{}", warning.message);
    }
    Ok(loaded.config)
}

/// Picks the timing model: `--base-interval` when given, else the config.
///
/// The flag is held to the same bounds as `timing.base_interval_ms`.
pub(crate) fn resolve_timing(
    base_interval: Option<Duration>,
    config: &SimulatorConfig,
    limits: &ConfigLimits,
) -> Result<TimingModel, SimulatorError> {
    let Some(base) = base_interval else {
        return Ok(config.timing_model());
    };
    if base.is_zero() {
        return Err(SimulatorError::Usage(
            "--base-interval must be greater than zero".to_owned(),
        ));
    }
    let max = Duration::from_millis(limits.max_base_interval_ms);
    if base > max {
        return Err(SimulatorError::Usage(format!(
            "--base-interval {} exceeds limit of {}",
            humantime::format_duration(base),
            humantime::format_duration(max)
        )));
    }
    Ok(TimingModel::with_base(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::error::ExitCode;

    fn config(base_interval_ms: u64) -> SimulatorConfig {
        SimulatorConfig {
            timing: TimingConfig { base_interval_ms },
            ..SimulatorConfig::default()
        }
    }

    #[test]
    fn test_timing_from_config_without_flag() {
        let timing = resolve_timing(None, &config(500), &ConfigLimits::default()).unwrap();
        assert_eq!(timing.base(), Duration::from_millis(500));
    }

    #[test]
    fn test_flag_overrides_config() {
        let timing = resolve_timing(
            Some(Duration::from_millis(20)),
            &config(500),
            &ConfigLimits::default(),
        )
        .unwrap();
        assert_eq!(timing.base(), Duration::from_millis(20));
    }

    #[test]
    fn test_zero_flag_rejected() {
        let err = resolve_timing(Some(Duration::ZERO), &config(500), &ConfigLimits::default())
            .unwrap_err();
        assert!(matches!(err, SimulatorError::Usage(_)));
        assert_eq!(err.exit_code(), ExitCode::USAGE_ERROR);
    }

    #[test]
    fn test_over_limit_flag_rejected() {
        let limits = ConfigLimits {
            max_base_interval_ms: 1000,
            ..ConfigLimits::default()
        };
        assert!(resolve_timing(Some(Duration::from_millis(1000)), &config(500), &limits).is_ok());
        let err = resolve_timing(Some(Duration::from_millis(1001)), &config(500), &limits)
            .unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::USAGE_ERROR);
    }
}
