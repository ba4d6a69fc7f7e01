//! Platform guard for the bootstrap pipeline.
//!
//! The pinned tool only builds and signs on Windows runners, so the pipeline
//! refuses to start anywhere else. The check is a plain case-insensitive
//! string comparison against a known constant; CI exposes the runner family
//! through `RUNNER_OS`, and outside CI the compile-time OS identifier is
//! used instead.

use crate::error::{Result, ToolboxError};

/// The operating-system family the bootstrap pipeline supports.
pub const EXPECTED_OS: &str = "windows";

/// Environment variable set by CI runners to name the host OS family.
pub const RUNNER_OS_VAR: &str = "RUNNER_OS";

/// Returns the host operating-system identifier.
///
/// Prefers the CI-provided `RUNNER_OS` value (e.g. `Windows`, `Linux`) and
/// falls back to [`std::env::consts::OS`] when unset.
#[must_use]
pub fn host_os() -> String {
    std::env::var(RUNNER_OS_VAR).unwrap_or_else(|_| std::env::consts::OS.to_owned())
}

/// Verifies that `os` names a Windows host.
///
/// # Errors
///
/// Returns [`ToolboxError::UnsupportedPlatform`] for any other identifier.
pub fn ensure_windows(os: &str) -> Result<()> {
    if os.eq_ignore_ascii_case(EXPECTED_OS) {
        Ok(())
    } else {
        Err(ToolboxError::UnsupportedPlatform {
            actual: os.to_owned(),
        })
    }
}
