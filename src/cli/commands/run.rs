//! `run` command: drive one simulated pipeline run to completion.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::artifact::SeededHashes;
use crate::cli::args::RunArgs;
use crate::cli::render::Renderer;
use crate::config::{ConfigLimits, SimulatorConfig};
use crate::error::{ExitCode, SimulatorError};
use crate::observability::{EventEmitter, init_metrics};
use crate::phase::snapshot::millis;
use crate::phase::{PipelineSimulator, SimulationParams};

use super::{load_config, resolve_timing};

/// Run the simulation and render its progress to stdout.
///
/// Ctrl+C or SIGTERM resets the simulator and ends the command with the
/// matching exit code.
///
/// # Errors
///
/// Returns an error if configuration loading fails, the event sink or
/// metrics exporter cannot be set up, output cannot be written, or the
/// run is interrupted by a signal.
pub async fn run(args: &RunArgs, quiet: bool) -> Result<(), SimulatorError> {
    let config = load_config(args.config.as_deref(), args.strict)?;
    let params = resolve_params(args, &config);
    let timing = resolve_timing(args.base_interval, &config, &ConfigLimits::default())?;

    if args.metrics_port.is_some() {
        init_metrics(args.metrics_port)?;
    }

    let mut builder = PipelineSimulator::builder(config.phases()).timing(timing);
    if let Some(seed) = args.seed {
        builder = builder.hashes(Box::new(SeededHashes::from_seed(seed)));
    }
    if let Some(path) = &args.events {
        builder = builder.emitter(Arc::new(open_events(path)?));
    }
    let sim = builder.build();

    let mut renderer = Renderer::new(std::io::stdout(), args.format, quiet);
    renderer.header(params, millis(timing.interval(params)))?;

    let mut rx = sim.subscribe();
    sim.start(params);
    let first = rx.borrow_and_update().clone();
    renderer.update(&first)?;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            code = &mut shutdown => {
                info!(code, "signal received, resetting simulation");
                sim.reset();
                return Err(SimulatorError::Interrupted(code));
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                renderer.update(&snapshot)?;
                if snapshot.is_complete() {
                    renderer.finish(&snapshot)?;
                    return Ok(());
                }
            }
        }
    }

    renderer.finish(&sim.snapshot())?;
    Ok(())
}

/// Command line beats environment beats config file beats built-in default.
/// Clap folds the environment into the argument values.
fn resolve_params(args: &RunArgs, config: &SimulatorConfig) -> SimulationParams {
    SimulationParams::new(
        args.data_size.unwrap_or(config.defaults.data_size),
        args.pqc_complexity.unwrap_or(config.defaults.pqc_complexity),
    )
}

fn open_events(path: &Path) -> Result<EventEmitter, SimulatorError> {
    if path == Path::new("-") {
        return Ok(EventEmitter::stderr());
    }
    Ok(EventEmitter::from_file(path)?)
}

/// Resolves with the exit code of the first shutdown signal.
///
/// A signal whose handler cannot be registered never fires.
async fn shutdown_signal() -> i32 {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => ExitCode::INTERRUPTED,
        () = terminate => ExitCode::TERMINATED,
    }
}
