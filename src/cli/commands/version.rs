//! Version information display.

use serde_json::json;

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::error::SimulatorError;

/// Print version and build information.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(args: &VersionArgs) -> Result<(), SimulatorError> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match args.format {
        OutputFormat::Human => println!("{name} {version}"),
        OutputFormat::Json => {
            let value = json!({ "name": name, "version": version });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}
