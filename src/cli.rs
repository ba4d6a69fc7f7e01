//! CLI argument definitions for the toolbox.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// CI maintenance toolbox.
#[derive(Parser, Debug)]
#[command(name = "actions-toolbox")]
#[command(version, about)]
#[command(long_about = concat!(
    "CI maintenance toolbox.\n\n",
    "`bootstrap` builds a pinned commit of the configured dotnet tool from ",
    "source on a Windows runner and installs it as a global command, sourcing ",
    "the package from the local build output rather than a public registry.\n\n",
    "`lint` checks GitHub Actions workflow files for naming, runner pinning, ",
    "and action sha pinning problems, optionally consulting the GitHub API ",
    "for action existence and staleness.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install the pinned tool:\n",
    "    $ actions-toolbox bootstrap\n\n",
    "  Preview the resolved configuration:\n",
    "    $ actions-toolbox bootstrap --dry-run\n\n",
    "  Lint every workflow in a repository:\n",
    "    $ actions-toolbox lint .github/workflows\n\n",
    "  Treat warnings as failures, offline:\n",
    "    $ actions-toolbox lint --strict --no-remote .github/workflows\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build and install the pinned dotnet tool from source.
    Bootstrap(BootstrapArgs),

    /// Lint GitHub Actions workflow files.
    Lint(LintArgs),
}

/// Arguments for the bootstrap command.
#[derive(Args, Debug, Clone, Default)]
pub struct BootstrapArgs {
    /// Configuration file overriding the pinned tool [default: ./toolbox.toml when present].
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Override the repository URL to clone.
    #[arg(long, value_name = "URL")]
    pub repo: Option<String>,

    /// Override the pinned commit hash.
    #[arg(long, value_name = "SHA")]
    pub commit: Option<String>,

    /// Override the package id to pack and install.
    #[arg(long, value_name = "ID")]
    pub package: Option<String>,

    /// Override the SDK version selector (e.g. 3.1.x).
    #[arg(long, value_name = "RANGE")]
    pub sdk: Option<String>,

    /// Show the resolved configuration and exit without side effects.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the lint command.
#[derive(Args, Debug, Clone, Default)]
pub struct LintArgs {
    /// Workflow files or directories to lint.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<Utf8PathBuf>,

    /// Return a non-zero exit code on warnings as well as errors.
    #[arg(short, long)]
    pub strict: bool,

    /// Skip GitHub API existence and staleness checks.
    #[arg(long)]
    pub no_remote: bool,
}
