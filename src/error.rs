//! Error types for the toolbox CLI.
//!
//! This module defines semantic error variants that provide actionable
//! guidance when a bootstrap or lint run fails. Each error carries the
//! context a user needs to recover without reading source code.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while bootstrapping the pinned tool or linting
/// workflow files.
#[derive(Debug, Error)]
pub enum ToolboxError {
    /// The host is not the platform the bootstrap pipeline supports.
    #[error("unsupported platform: expected a Windows runner, found {actual:?}")]
    UnsupportedPlatform {
        /// The operating-system identifier that was detected.
        actual: String,
    },

    /// A pinned commit hash failed validation.
    #[error("invalid pinned commit {commit:?}: {reason}")]
    InvalidCommit {
        /// The rejected hash.
        commit: String,
        /// Why the hash was rejected.
        reason: &'static str,
    },

    /// An SDK version selector failed to parse.
    #[error("invalid SDK selector {selector:?}: {reason}")]
    InvalidSdkSelector {
        /// The rejected selector.
        selector: String,
        /// Why the selector was rejected.
        reason: &'static str,
    },

    /// The installed SDK set could not be determined.
    #[error("SDK detection failed: {reason}")]
    SdkDetection {
        /// Description of why detection failed.
        reason: String,
    },

    /// No installed .NET SDK matches the configured selector.
    #[error("no .NET SDK matching {selector} is installed; install one and re-run")]
    SdkNotInstalled {
        /// The selector that found no match.
        selector: String,
    },

    /// The invoking user's home directory could not be resolved.
    #[error("could not determine the home directory for the source checkout")]
    HomeDirUnavailable,

    /// A git operation failed.
    #[error("git {operation} failed: {message}")]
    Git {
        /// The git operation that failed (clone, checkout).
        operation: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// A dotnet step failed.
    #[error("dotnet {step} failed: {message}")]
    Dotnet {
        /// The dotnet step that failed (restore, pack, tool install, ...).
        step: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// The local package source has nothing to install from.
    #[error(
        "package source {path} is missing or contains no .nupkg; \
         refusing to install from a remote feed"
    )]
    PackageSourceMissing {
        /// The local package source directory that was checked.
        path: Utf8PathBuf,
    },

    /// A configuration file could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// The lint input matched no workflow files.
    #[error("no workflow files found under {input:?}")]
    NoWorkflowFiles {
        /// The path arguments as supplied on the command line.
        input: String,
    },

    /// A workflow file could not be read.
    #[error("failed to read workflow {path}")]
    WorkflowRead {
        /// Path to the unreadable file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A workflow file is not valid YAML for the expected shape.
    #[error("invalid workflow {path}: {reason}")]
    InvalidWorkflow {
        /// Path to the malformed file.
        path: Utf8PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`ToolboxError`].
pub type Result<T> = std::result::Result<T, ToolboxError>;
