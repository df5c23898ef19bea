//! Tick interval table.

use clap::ValueEnum;
use serde::Serialize;

use crate::cli::args::{IntervalArgs, OutputFormat};
use crate::config::ConfigLimits;
use crate::error::SimulatorError;
use crate::phase::snapshot::millis;
use crate::phase::{DataSize, PqcComplexity, SimulationParams, TimingModel};

use super::{load_config, resolve_timing};

#[derive(Debug, Serialize)]
struct IntervalRow {
    data_size: DataSize,
    pqc_complexity: PqcComplexity,
    interval_ms: u64,
}

/// Print the interval for the requested parameters, or for every
/// combination of the parameters left unset.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or JSON
/// serialization fails.
pub fn run(args: &IntervalArgs) -> Result<(), SimulatorError> {
    let config = load_config(args.config.as_deref(), false)?;
    let timing = resolve_timing(args.base_interval, &config, &ConfigLimits::default())?;

    let rows = table(timing, args.data_size, args.pqc_complexity);

    match args.format {
        OutputFormat::Human => {
            for row in &rows {
                let interval = std::time::Duration::from_millis(row.interval_ms);
                println!(
                    "{:<8} {:<10} {}",
                    row.data_size,
                    row.pqc_complexity,
                    humantime::format_duration(interval)
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

fn table(
    timing: TimingModel,
    data_size: Option<DataSize>,
    pqc_complexity: Option<PqcComplexity>,
) -> Vec<IntervalRow> {
    let sizes = data_size.map_or_else(|| DataSize::value_variants().to_vec(), |d| vec![d]);
    let levels = pqc_complexity.map_or_else(|| PqcComplexity::value_variants().to_vec(), |p| vec![p]);

    sizes
        .iter()
        .flat_map(|&data_size| {
            levels.iter().map(move |&pqc_complexity| IntervalRow {
                data_size,
                pqc_complexity,
                interval_ms: millis(timing.interval(SimulationParams::new(data_size, pqc_complexity))),
            })
        })
        .collect()
}
