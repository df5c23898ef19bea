//! Static phase catalog.
//!
//! Phases are display-only descriptions of pipeline steps. The catalog is
//! fixed before a simulator is built and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Icon tag rendered next to a phase card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseIcon {
    /// Key exchange / key material.
    Key,
    /// Data upload.
    Upload,
    /// Genomic annotation.
    Dna,
    /// Enclave compute.
    Chip,
    /// Ledger block.
    Cube,
}

impl PhaseIcon {
    /// Returns the lowercase tag used in config files and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Upload => "upload",
            Self::Dna => "dna",
            Self::Chip => "chip",
            Self::Cube => "cube",
        }
    }

    /// Returns a single-glyph rendering for terminal output.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Key => "🔑",
            Self::Upload => "⇪",
            Self::Dna => "🧬",
            Self::Chip => "▣",
            Self::Cube => "⬢",
        }
    }
}

impl std::fmt::Display for PhaseIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the simulated pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    /// Zero-based ordinal position in the catalog.
    pub index: usize,
    /// Short title shown on the card.
    pub title: String,
    /// Longer description shown below the title.
    pub description: String,
    /// Icon tag.
    pub icon: PhaseIcon,
}

impl Phase {
    /// Creates a phase at the given ordinal position.
    #[must_use]
    pub fn new(
        index: usize,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: PhaseIcon,
    ) -> Self {
        Self {
            index,
            title: title.into(),
            description: description.into(),
            icon,
        }
    }
}

const BUILTIN: [(&str, &str, PhaseIcon); 5] = [
    (
        "Initialize PQC Environment",
        "Establishes foundational post-quantum cryptographic keys (Kyber & Dilithium) and a secure communication channel.",
        PhaseIcon::Key,
    ),
    (
        "Secure Data Ingestion",
        "Manages client-side encryption of raw genomic data (VCF) and server-side decryption, validation, and quality control.",
        PhaseIcon::Upload,
    ),
    (
        "PQC-Secured Annotation",
        "Enriches genomic data by securely querying external annotation databases over a post-quantum-protected channel.",
        PhaseIcon::Dna,
    ),
    (
        "Encrypted Model Processing",
        "Performs PRS computation within a hardware-secured Trusted Execution Environment (TEE) to protect model and data.",
        PhaseIcon::Chip,
    ),
    (
        "Final Ledger Commitment",
        "Commits the final proof of computation to an immutable blockchain ledger, creating a permanent, verifiable record.",
        PhaseIcon::Cube,
    ),
];

/// Returns the built-in five-phase pipeline in execution order.
#[must_use]
pub fn builtin_phases() -> Vec<Phase> {
    BUILTIN
        .iter()
        .enumerate()
        .map(|(index, (title, description, icon))| Phase::new(index, *title, *description, *icon))
        .collect()
}
