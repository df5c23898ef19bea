//! Terminal rendering of run snapshots.
//!
//! Human output prints one line per phase status change and a results
//! block at the end. JSON output prints only the final snapshot.

use std::io::{self, Write};

use crate::cli::args::OutputFormat;
use crate::phase::{PhaseSnapshot, PhaseStatus, RunSnapshot, SimulationParams};

/// Platform banner.
pub const TITLE: &str = "Secure Genomic Risk Scoring Platform";

/// Banner subtitle.
pub const SUBTITLE: &str = "A Visual Simulation of the Post-Quantum Cryptography Pipeline";

/// Incremental snapshot renderer.
pub struct Renderer<W: Write> {
    out: W,
    format: OutputFormat,
    quiet: bool,
    seen: Vec<PhaseStatus>,
}

impl<W: Write> Renderer<W> {
    /// Creates a renderer writing to `out`.
    pub const fn new(out: W, format: OutputFormat, quiet: bool) -> Self {
        Self {
            out,
            format,
            quiet,
            seen: Vec::new(),
        }
    }

    fn chatty(&self) -> bool {
        self.format == OutputFormat::Human && !self.quiet
    }

    /// Prints the banner and run parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn header(&mut self, params: SimulationParams, interval_ms: u64) -> io::Result<()> {
        if !self.chatty() {
            return Ok(());
        }
        writeln!(self.out, "{TITLE}")?;
        writeln!(self.out, "{SUBTITLE}")?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "data size: {}  pqc complexity: {}  interval: {interval_ms} ms",
            params.data_size, params.pqc_complexity
        )?;
        writeln!(self.out)
    }

    /// Prints every phase whose status changed since the last call.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn update(&mut self, snapshot: &RunSnapshot) -> io::Result<()> {
        if self.seen.len() != snapshot.phases.len() {
            self.seen = vec![PhaseStatus::Pending; snapshot.phases.len()];
        }
        let total = snapshot.phases.len();
        let chatty = self.chatty();
        for (seen, phase) in self.seen.iter_mut().zip(&snapshot.phases) {
            if *seen == phase.status {
                continue;
            }
            *seen = phase.status;
            if chatty {
                writeln!(self.out, "{}", phase_line(phase, total))?;
            }
        }
        self.out.flush()
    }

    /// Prints the final state.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or JSON serialization fails.
    pub fn finish(&mut self, snapshot: &RunSnapshot) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, snapshot)?;
                writeln!(self.out)?;
            }
            OutputFormat::Human => {
                let Some(result) = &snapshot.result else {
                    return self.out.flush();
                };
                if self.quiet {
                    writeln!(self.out, "{}", result.polygenic_risk_score)?;
                    writeln!(self.out, "{}", result.evidence_ledger)?;
                    writeln!(self.out, "{}", result.fes_metadata)?;
                } else {
                    writeln!(self.out)?;
                    writeln!(self.out, "Results")?;
                    writeln!(self.out, "  Polygenic risk score : {}", result.polygenic_risk_score)?;
                    writeln!(self.out, "  Evidence ledger      : {}", result.evidence_ledger)?;
                    writeln!(self.out, "  FES metadata         : {}", result.fes_metadata)?;
                    writeln!(self.out, "  Total                : {} ms", snapshot.total_ms())?;
                }
            }
        }
        self.out.flush()
    }

    /// Consumes the renderer and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Formats a phase status line, e.g. `[2/5] ⇪ Secure Data Upload ... complete (1800 ms)`.
#[must_use]
pub fn phase_line(phase: &PhaseSnapshot, total: usize) -> String {
    let mut line = format!(
        "[{}/{total}] {} {} ... {}",
        phase.index + 1,
        phase.icon.glyph(),
        phase.title,
        phase.status
    );
    if let Some(ms) = phase.duration_ms {
        line.push_str(&format!(" ({ms} ms)"));
    }
    line
}
