//! GitHub Actions workflow linter.
//!
//! Collects workflow files from the given paths, runs the rules over each,
//! prints grouped findings, and maps the worst severity to an exit code:
//! 2 for errors, 1 for warnings in strict mode, 0 otherwise.

pub mod findings;
pub mod remote;
pub mod rules;
pub mod workflow;

use crate::error::{Result, ToolboxError};
use crate::lint::findings::{Finding, Severity, max_severity};
use crate::lint::remote::ActionRegistry;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeSet;
use std::io::Write;

/// Options for one lint run.
#[derive(Debug, Clone, Copy, Default)]
pub struct LintOptions {
    /// Fail the run on warnings as well as errors.
    pub strict: bool,
}

/// Collects workflow files from files and directories.
///
/// Files are taken as given; directories are walked recursively for
/// `.yml`/`.yaml` files. The result is sorted and de-duplicated. Paths
/// that name neither a file nor a directory are ignored.
///
/// # Errors
///
/// Returns an I/O error when a directory walk fails partway.
pub fn workflow_files(paths: &[Utf8PathBuf]) -> Result<Vec<Utf8PathBuf>> {
    let mut collected = BTreeSet::new();

    for path in paths {
        if path.is_file() {
            collected.insert(path.clone());
        } else if path.is_dir() {
            collect_from_dir(path, &mut collected)?;
        }
    }

    Ok(collected.into_iter().collect())
}

fn collect_from_dir(dir: &Utf8Path, collected: &mut BTreeSet<Utf8PathBuf>) -> Result<()> {
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_from_dir(path, collected)?;
        } else if is_workflow_file(path) {
            collected.insert(path.to_owned());
        }
    }
    Ok(())
}

fn is_workflow_file(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
}

/// Lints every workflow file under `paths` and prints findings to `out`.
///
/// Returns the exit code for the run: 2 when any error-level finding was
/// produced, 1 for warning-level findings under strict mode, 0 otherwise.
///
/// # Errors
///
/// Returns [`ToolboxError::NoWorkflowFiles`] when no workflow file was
/// found, and read or parse errors for individual files.
pub fn run(
    paths: &[Utf8PathBuf],
    options: LintOptions,
    registry: Option<&dyn ActionRegistry>,
    out: &mut dyn Write,
) -> Result<i32> {
    let files = workflow_files(paths)?;
    if files.is_empty() {
        let input = paths
            .iter()
            .map(|path| path.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        return Err(ToolboxError::NoWorkflowFiles { input });
    }

    let mut worst: Option<Severity> = None;

    for file in files {
        let findings = lint_file(&file, registry)?;
        report(&file, &findings, out);
        worst = worst.max(max_severity(&findings));
    }

    Ok(match worst {
        Some(Severity::Error) => 2,
        Some(Severity::Warning) if options.strict => 1,
        _ => 0,
    })
}

/// Lints a single workflow file.
///
/// # Errors
///
/// Returns [`ToolboxError::WorkflowRead`] when the file cannot be read and
/// [`ToolboxError::InvalidWorkflow`] when it does not parse.
pub fn lint_file(
    path: &Utf8Path,
    registry: Option<&dyn ActionRegistry>,
) -> Result<Vec<Finding>> {
    let contents =
        std::fs::read_to_string(path.as_std_path()).map_err(|source| ToolboxError::WorkflowRead {
            path: path.to_owned(),
            source,
        })?;

    let parsed =
        workflow::parse_workflow(&contents).map_err(|err| ToolboxError::InvalidWorkflow {
            path: path.to_owned(),
            reason: err.to_string(),
        })?;

    Ok(rules::lint_workflow(&parsed, registry))
}

/// Prints one file's findings, grouped under the file name.
fn report(file: &Utf8Path, findings: &[Finding], out: &mut dyn Write) {
    if findings.is_empty() {
        return;
    }

    let _ = writeln!(out, "# {file}");
    for finding in findings {
        let _ = writeln!(
            out,
            "  - \x1b[{}{}\x1b[0m {}",
            finding.severity.colour_code(),
            finding.severity.label(),
            finding.message
        );
    }
    let _ = writeln!(out);
}
