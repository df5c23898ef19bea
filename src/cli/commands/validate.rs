//! Configuration file validation.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoaderOptions};
use crate::error::{ConfigError, SimulatorError, ValidationIssue};

#[derive(Debug, Serialize)]
struct IssueReport {
    path: String,
    message: String,
}

impl From<&ValidationIssue> for IssueReport {
    fn from(issue: &ValidationIssue) -> Self {
        Self {
            path: issue.path.clone(),
            message: issue.message.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    errors: Vec<IssueReport>,
    warnings: Vec<IssueReport>,
}

#[derive(Debug, Serialize)]
struct Summary {
    total: usize,
    valid: usize,
    invalid: usize,
}

/// Validate each configuration file and report the outcome.
///
/// Every file is checked before returning, so one bad file does not hide
/// problems in the rest.
///
/// # Errors
///
/// Returns an I/O error if a file does not exist, otherwise the first
/// configuration error encountered.
pub fn run(args: &ValidateArgs, quiet: bool) -> Result<(), SimulatorError> {
    for path in &args.files {
        if !path.exists() {
            return Err(SimulatorError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )));
        }
    }

    let loader = ConfigLoader::new(LoaderOptions {
        strict: args.strict,
        ..LoaderOptions::default()
    });

    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_failure: Option<ConfigError> = None;
    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let (report, failure) = check(&loader, path);
        if failure.is_none() {
            tracing::info!(file = %path.display(), "configuration valid");
        }
        if first_failure.is_none() {
            first_failure = failure;
        }
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => print!("{}", format_human(&reports, quiet)),
        OutputFormat::Json => {
            let valid = reports.iter().filter(|r| r.valid).count();
            let summary = Summary {
                total: reports.len(),
                valid,
                invalid: reports.len() - valid,
            };
            let value = serde_json::json!({ "files": reports, "summary": summary });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    first_failure.map_or(Ok(()), |e| Err(e.into()))
}

fn check(loader: &ConfigLoader, path: &Path) -> (FileReport, Option<ConfigError>) {
    let file = path.display().to_string();
    match loader.load(path) {
        Ok(loaded) => {
            for warning in &loaded.warnings {
                tracing::warn!(path = %warning.path, "{}", warning.message);
            }
            let report = FileReport {
                file,
                valid: true,
                errors: Vec::new(),
                warnings: loaded.warnings.iter().map(IssueReport::from).collect(),
            };
            (report, None)
        }
        Err(err) => {
            let errors = match &err {
                ConfigError::ValidationError { errors, .. } => {
                    errors.iter().map(IssueReport::from).collect()
                }
                other => vec![IssueReport {
                    path: String::new(),
                    message: other.to_string(),
                }],
            };
            let report = FileReport {
                file,
                valid: false,
                errors,
                warnings: Vec::new(),
            };
            (report, Some(err))
        }
    }
}

fn format_human(reports: &[FileReport], quiet: bool) -> String {
    let mut out = String::new();
    for report in reports {
        if report.valid && quiet {
            continue;
        }
        let mark = if report.valid { "ok" } else { "FAILED" };
        out.push_str(&format!("{}: {mark}\n", report.file));
        for issue in &report.errors {
            out.push_str(&format_issue("error", issue));
        }
        for issue in &report.warnings {
            out.push_str(&format_issue("warning", issue));
        }
    }
    out
}

fn format_issue(level: &str, issue: &IssueReport) -> String {
    if issue.path.is_empty() {
        format!("  {level}: {}\n", issue.message)
    } else {
        format!("  {level}: {} at {}\n", issue.message, issue.path)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_check_valid_file_with_warning() {
        let file = write_config("phases:\n  - title: Solo\n    icon: key\n");
        let (report, failure) = check(&ConfigLoader::default(), file.path());
        assert!(failure.is_none());
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "phases[0].description");
    }

    #[test]
    fn test_check_invalid_file() {
        let file = write_config("timing:\n  base_interval_ms: 0\nphases: []\n");
        let (report, failure) = check(&ConfigLoader::default(), file.path());
        assert!(matches!(failure, Some(ConfigError::ValidationError { .. })));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_check_parse_error() {
        let file = write_config("timing: [\n");
        let (report, failure) = check(&ConfigLoader::default(), file.path());
        assert!(matches!(failure, Some(ConfigError::ParseError { .. })));
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].path.is_empty());
    }

    #[test]
    fn test_format_human_quiet_hides_valid() {
        let reports = vec![
            FileReport {
                file: "good.yaml".into(),
                valid: true,
                errors: Vec::new(),
                warnings: Vec::new(),
            },
            FileReport {
                file: "bad.yaml".into(),
                valid: false,
                errors: vec![IssueReport {
                    path: "phases".into(),
                    message: "at least one phase is required".into(),
                }],
                warnings: Vec::new(),
            },
        ];

        let loud = format_human(&reports, false);
        assert!(loud.contains("good.yaml: ok\n"));

        let quiet = format_human(&reports, true);
        assert_eq!(
            quiet,
            "bad.yaml: FAILED\n  error: at least one phase is required at phases\n"
        );
    }
}
