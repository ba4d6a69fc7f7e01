//! Output formatting for the toolbox CLI.

use crate::config::ToolSpec;
use camino::Utf8Path;
use std::io::Write;

/// Writes one line to the given writer, swallowing write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress output; ignore write failures.
    }
}

/// Formats the success message printed after a completed bootstrap.
#[must_use]
pub fn bootstrap_success_message(package_id: &str, version: &str) -> String {
    format!("Successfully installed {package_id} {version} as a global tool")
}

/// Prints the resolved bootstrap configuration for dry-run mode.
pub fn print_dry_run_info(
    spec: &ToolSpec,
    checkout: &Utf8Path,
    version: &str,
    stderr: &mut dyn Write,
) {
    write_stderr_line(stderr, "Dry run - no commands will be executed");
    write_stderr_line(stderr, "");
    write_stderr_line(stderr, format!("Repository: {}", spec.repo_url));
    write_stderr_line(stderr, format!("Pinned commit: {}", spec.commit));
    write_stderr_line(stderr, format!("Package id: {}", spec.package_id));
    write_stderr_line(stderr, format!("SDK selector: {}", spec.sdk));
    write_stderr_line(stderr, format!("Checkout directory: {checkout}"));
    write_stderr_line(stderr, format!("Package version: {version}"));
}
