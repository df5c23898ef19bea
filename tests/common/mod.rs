//! Shared integration-test harness for running the `pqcsim` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Handle for invoking the compiled `pqcsim` binary.
pub struct PqcsimProcess;

impl PqcsimProcess {
    /// Runs the binary with `args` to completion and captures its output.
    ///
    /// `PQCSIM_*` variables from the outer environment are cleared so the
    /// test controls every input.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pqcsim"));
        for (key, _) in std::env::vars_os() {
            if key.to_string_lossy().starts_with("PQCSIM_") {
                cmd.env_remove(key);
            }
        }
        cmd.args(args).output().expect("failed to run pqcsim")
    }

    /// Returns the path of a file under `tests/fixtures`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }
}
