//! Source fetching: clone and detached checkout of the pinned commit.
//!
//! Every run starts from a fresh clone. The checkout lives in a
//! deterministic directory under the user's home, and any pre-existing
//! checkout there is removed first, so the same pinned commit always yields
//! byte-identical source content regardless of when the step runs.

use crate::dirs::BaseDirs;
use crate::error::{Result, ToolboxError};
use crate::exec::{CommandExecutor, stderr_message};
use crate::pin::PinnedCommit;
use camino::{Utf8Path, Utf8PathBuf};

/// Returns the deterministic checkout directory for `package_id`.
///
/// # Errors
///
/// Returns [`ToolboxError::HomeDirUnavailable`] when the home directory
/// cannot be resolved.
pub fn checkout_directory(dirs: &dyn BaseDirs, package_id: &str) -> Result<Utf8PathBuf> {
    dirs.home_dir()
        .map(|home| home.join(package_id))
        .ok_or(ToolboxError::HomeDirUnavailable)
}

/// Produces a working copy of `repo_url` at `commit`, detached, inside
/// `checkout`.
///
/// Removes any existing directory at `checkout` before cloning; the pinned
/// source is never cached across runs.
///
/// # Errors
///
/// Returns [`ToolboxError::Git`] when the clone or checkout fails (network
/// error, unknown commit), and I/O errors when the stale checkout cannot be
/// removed.
pub fn fetch_pinned(
    executor: &dyn CommandExecutor,
    repo_url: &str,
    commit: &PinnedCommit,
    checkout: &Utf8Path,
) -> Result<()> {
    if checkout.exists() {
        log::debug!("removing stale checkout at {checkout}");
        std::fs::remove_dir_all(checkout.as_std_path())?;
    }

    if let Some(parent) = checkout.parent() {
        std::fs::create_dir_all(parent.as_std_path())?;
    }

    run_git(
        executor,
        &["clone", repo_url, checkout.as_str()],
        None,
        "clone",
    )?;
    run_git(
        executor,
        &["checkout", "--detach", commit.as_str()],
        Some(checkout),
        "checkout",
    )?;

    Ok(())
}

fn run_git(
    executor: &dyn CommandExecutor,
    args: &[&str],
    cwd: Option<&Utf8Path>,
    operation: &'static str,
) -> Result<()> {
    let output = executor
        .run("git", args, cwd)
        .map_err(|err| ToolboxError::Git {
            operation,
            message: err.to_string(),
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ToolboxError::Git {
            operation,
            message: stderr_message(&output),
        })
    }
}
