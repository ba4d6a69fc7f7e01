//! Bootstrap pipeline orchestration.
//!
//! One linear pipeline: platform guard, SDK gate, source fetch, package
//! build and install. Control flows strictly top to bottom; each step's
//! success is the next step's precondition, and the first failure aborts
//! the run. The guard runs before anything with a side effect, so a
//! wrong-platform invocation provisions nothing, clones nothing, and
//! installs nothing.

use crate::config::ToolSpec;
use crate::dirs::BaseDirs;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::output::{bootstrap_success_message, print_dry_run_info, write_stderr_line};
use crate::package::{PackagePlan, Packager};
use crate::{fetch, platform, sdk};
use std::io::Write;

/// Settings for one bootstrap run.
pub struct BootstrapContext<'a> {
    /// The tool to build and install.
    pub spec: &'a ToolSpec,
    /// Suppress progress output.
    pub quiet: bool,
    /// Resolve and print the configuration without side effects.
    pub dry_run: bool,
}

/// Runs the bootstrap pipeline against the detected host OS.
///
/// # Errors
///
/// Returns the first failing step's error; see [`run_bootstrap_on`].
pub fn run_bootstrap(
    context: &BootstrapContext<'_>,
    executor: &dyn CommandExecutor,
    dirs: &dyn BaseDirs,
    stderr: &mut dyn Write,
) -> Result<()> {
    let os = platform::host_os();
    run_bootstrap_on(context, &os, executor, dirs, stderr)
}

/// Runs the bootstrap pipeline for an explicit OS identifier.
///
/// # Errors
///
/// Returns an error when the platform guard rejects `os`, when no matching
/// SDK is installed, when the clone or detached checkout fails, or when a
/// restore, pack, or install step fails. No step after the failing one is
/// attempted.
pub fn run_bootstrap_on(
    context: &BootstrapContext<'_>,
    os: &str,
    executor: &dyn CommandExecutor,
    dirs: &dyn BaseDirs,
    stderr: &mut dyn Write,
) -> Result<()> {
    platform::ensure_windows(os)?;

    let spec = context.spec;
    let checkout = fetch::checkout_directory(dirs, &spec.package_id)?;
    let version = spec.commit.package_version();

    if context.dry_run {
        print_dry_run_info(spec, &checkout, &version, stderr);
        return Ok(());
    }

    let progress = |stderr: &mut dyn Write, message: String| {
        if !context.quiet {
            write_stderr_line(stderr, message);
        }
    };

    progress(
        stderr,
        format!("Checking for a .NET SDK matching {}...", spec.sdk),
    );
    sdk::ensure_sdk(executor, &spec.sdk)?;

    progress(
        stderr,
        format!("Fetching {} at {}...", spec.repo_url, spec.commit.short()),
    );
    fetch::fetch_pinned(executor, &spec.repo_url, &spec.commit, &checkout)?;

    let plan = PackagePlan {
        checkout,
        package_id: spec.package_id.clone(),
        version: version.clone(),
    };
    let packager = Packager::new(executor);

    progress(stderr, format!("Packing {} {version}...", spec.package_id));
    packager.restore(&plan.checkout)?;
    let source_dir = packager.pack(&plan)?;

    progress(
        stderr,
        format!("Installing {} as a global tool...", spec.package_id),
    );
    packager.install_global(&plan, &source_dir)?;

    progress(
        stderr,
        bootstrap_success_message(&spec.package_id, &version),
    );

    Ok(())
}
