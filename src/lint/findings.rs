//! Lint finding representation.

use std::fmt;

/// Severity of a lint finding. Ordering follows impact, so the worst
/// finding in a run can be taken with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Style or hygiene problem; fails the run only in strict mode.
    Warning,
    /// Broken or unsafe workflow content; always fails the run.
    Error,
}

impl Severity {
    /// Returns the lowercase label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Returns the ANSI colour code for the label (yellow for warnings,
    /// red for errors).
    #[must_use]
    pub fn colour_code(self) -> &'static str {
        match self {
            Self::Warning => "33m",
            Self::Error => "31m",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One linting problem found in a workflow file.
#[derive(Debug, Clone)]
pub struct Finding {
    /// Human-readable description of the problem.
    pub message: String,
    /// How bad it is.
    pub severity: Severity,
}

impl Finding {
    /// Creates a warning-level finding.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Creates an error-level finding.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Returns the worst severity among `findings`, if any.
#[must_use]
pub fn max_severity(findings: &[Finding]) -> Option<Severity> {
    findings.iter().map(|finding| finding.severity).max()
}
