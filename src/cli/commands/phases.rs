//! Phase catalog listing.

use crate::cli::args::{OutputFormat, PhasesArgs};
use crate::error::SimulatorError;
use crate::phase::Phase;

use super::load_config;

/// Print the phase catalog in execution order.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or JSON
/// serialization fails.
pub fn run(args: &PhasesArgs) -> Result<(), SimulatorError> {
    let config = load_config(args.config.as_deref(), false)?;
    let phases = config.phases();

    match args.format {
        OutputFormat::Human => print!("{}", format_human(&phases)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&phases)?),
    }
    Ok(())
}

fn format_human(phases: &[Phase]) -> String {
    let mut out = String::new();
    for phase in phases {
        out.push_str(&format!(
            "{}. {} {}\n",
            phase.index + 1,
            phase.icon.glyph(),
            phase.title
        ));
        if !phase.description.is_empty() {
            out.push_str(&format!("   {}\n", phase.description));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{PhaseIcon, builtin_phases};

    #[test]
    fn test_format_builtin() {
        let out = format_human(&builtin_phases());
        assert!(out.starts_with("1. 🔑 Initialize PQC Environment\n"));
        assert!(out.contains("5. ⬢ Final Ledger Commitment\n"));
        assert_eq!(out.lines().count(), 10);
    }

    #[test]
    fn test_blank_description_omitted() {
        let out = format_human(&[Phase::new(0, "Only", "", PhaseIcon::Dna)]);
        assert_eq!(out, "1. 🧬 Only\n");
    }
}
