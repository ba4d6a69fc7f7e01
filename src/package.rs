//! Package build and global tool installation.
//!
//! Wraps the three dotnet steps the bootstrap needs: restore the checkout's
//! dependencies, pack it into a local NuGet package stamped with the
//! synthetic version, and install that package as a global tool. The
//! install sources the package exclusively from the local pack output; a
//! missing or empty output directory fails the run instead of silently
//! pulling a release from a remote feed.

use crate::error::{Result, ToolboxError};
use crate::exec::{CommandExecutor, stderr_message};
use camino::{Utf8Path, Utf8PathBuf};
use std::process::Output;

/// Name of the pack output directory inside the checkout.
pub const PACK_OUTPUT_DIR: &str = "nupkg";

/// What to build and install from an already fetched checkout.
#[derive(Debug, Clone)]
pub struct PackagePlan {
    /// Root of the source checkout.
    pub checkout: Utf8PathBuf,
    /// NuGet package id to pack and install.
    pub package_id: String,
    /// Synthetic version string stamped onto the package.
    pub version: String,
}

impl PackagePlan {
    /// Returns the local package source directory the pack step writes to.
    #[must_use]
    pub fn source_dir(&self) -> Utf8PathBuf {
        self.checkout.join(PACK_OUTPUT_DIR)
    }
}

/// Drives the dotnet build and install steps.
pub struct Packager<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> Packager<'a> {
    /// Creates a packager running commands through `executor`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }

    /// Resolves the checkout's declared dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::Dotnet`] when the restore fails.
    pub fn restore(&self, checkout: &Utf8Path) -> Result<()> {
        self.run_step("restore", &["restore"], Some(checkout))?;
        Ok(())
    }

    /// Packs the checkout into the local output directory, stamped with the
    /// plan's synthetic version, and returns that directory.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::Dotnet`] when the pack fails.
    pub fn pack(&self, plan: &PackagePlan) -> Result<Utf8PathBuf> {
        let source_dir = plan.source_dir();
        let version_arg = format!("-p:Version={}", plan.version);

        self.run_step(
            "pack",
            &["pack", "--output", source_dir.as_str(), &version_arg],
            Some(&plan.checkout),
        )?;

        Ok(source_dir)
    }

    /// Installs the packed tool globally, sourcing it from `source_dir`.
    ///
    /// A pre-existing global installation of the same package id is removed
    /// first so a re-run converges on the pinned version without duplicate
    /// state. Unreachable remote feeds are ignored; the local source is
    /// what the install resolves against.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::PackageSourceMissing`] when `source_dir`
    /// does not exist or holds no `.nupkg`, and [`ToolboxError::Dotnet`]
    /// when an install step fails.
    pub fn install_global(&self, plan: &PackagePlan, source_dir: &Utf8Path) -> Result<()> {
        verify_local_source(source_dir)?;

        if self.is_installed(&plan.package_id)? {
            log::debug!("removing existing global installation of {}", plan.package_id);
            self.run_step(
                "tool uninstall",
                &["tool", "uninstall", "--global", &plan.package_id],
                None,
            )?;
        }

        self.run_step(
            "tool install",
            &[
                "tool",
                "install",
                "--global",
                &plan.package_id,
                "--version",
                &plan.version,
                "--add-source",
                source_dir.as_str(),
                "--ignore-failed-sources",
            ],
            None,
        )?;

        Ok(())
    }

    /// Checks `dotnet tool list --global` for an existing installation.
    fn is_installed(&self, package_id: &str) -> Result<bool> {
        let output = self.run_step("tool list", &["tool", "list", "--global"], None)?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        // Output is a header, a separator line, then one row per tool with
        // the package id in the first column.
        let installed = stdout
            .lines()
            .skip(2)
            .filter_map(|line| line.split_whitespace().next())
            .any(|id| id.eq_ignore_ascii_case(package_id));

        Ok(installed)
    }

    fn run_step(
        &self,
        step: &'static str,
        args: &[&str],
        cwd: Option<&Utf8Path>,
    ) -> Result<Output> {
        let output = self
            .executor
            .run("dotnet", args, cwd)
            .map_err(|err| ToolboxError::Dotnet {
                step,
                message: err.to_string(),
            })?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(ToolboxError::Dotnet {
                step,
                message: stderr_message(&output),
            })
        }
    }
}

/// Verifies that `source_dir` exists and contains at least one `.nupkg`.
///
/// # Errors
///
/// Returns [`ToolboxError::PackageSourceMissing`] otherwise.
pub fn verify_local_source(source_dir: &Utf8Path) -> Result<()> {
    let missing = || ToolboxError::PackageSourceMissing {
        path: source_dir.to_owned(),
    };

    let entries = std::fs::read_dir(source_dir.as_std_path()).map_err(|_| missing())?;

    let has_package = entries.filter_map(std::result::Result::ok).any(|entry| {
        entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("nupkg"))
    });

    if has_package { Ok(()) } else { Err(missing()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        ExpectedCall, StubExecutor, failure_output, output_with_stdout, success_output,
    };

    const TOOL_LIST_WITHOUT_PACKAGE: &str = concat!(
        "Package Id         Version      Commands\n",
        "-------------------------------------\n",
        "dotnet-format      5.1.2       dotnet-format\n",
    );

    const TOOL_LIST_WITH_PACKAGE: &str = concat!(
        "Package Id         Version           Commands\n",
        "----------------------------------------------\n",
        "azuresigntool      0.0.0-gaaaaaaaaaa azuresigntool\n",
    );

    fn plan(checkout: &Utf8Path) -> PackagePlan {
        PackagePlan {
            checkout: checkout.to_owned(),
            package_id: "AzureSignTool".to_owned(),
            version: "0.0.0-gce87e84a58".to_owned(),
        }
    }

    fn temp_checkout() -> (tempfile::TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().expect("expected a tempdir");
        let checkout = Utf8PathBuf::from_path_buf(temp.path().join("tool"))
            .expect("expected UTF-8 temp path");
        std::fs::create_dir_all(&checkout).expect("expected to create the checkout");
        (temp, checkout)
    }

    fn seed_package(source_dir: &Utf8Path) {
        std::fs::create_dir_all(source_dir.as_std_path())
            .expect("expected to create the source dir");
        std::fs::write(
            source_dir.join("AzureSignTool.0.0.0-gce87e84a58.nupkg"),
            b"pkg",
        )
        .expect("expected to seed the package");
    }

    #[test]
    fn pack_stamps_the_synthetic_version_into_the_output_dir() {
        let (_temp, checkout) = temp_checkout();
        let plan = plan(&checkout);
        let source_dir = plan.source_dir();

        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "dotnet",
            &[
                "pack",
                "--output",
                source_dir.as_str(),
                "-p:Version=0.0.0-gce87e84a58",
            ],
            Ok(success_output()),
        )]);

        let returned = Packager::new(&executor)
            .pack(&plan)
            .expect("expected the pack to succeed");
        assert_eq!(returned, source_dir);
        executor.assert_finished();
    }

    #[test]
    fn restore_failure_carries_the_tool_message() {
        let (_temp, checkout) = temp_checkout();

        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "dotnet",
            &["restore"],
            Ok(failure_output("error NU1101: unable to find package")),
        )]);

        let err = Packager::new(&executor)
            .restore(&checkout)
            .expect_err("expected the restore to fail");
        assert!(matches!(
            err,
            ToolboxError::Dotnet { step: "restore", message } if message.contains("NU1101")
        ));
    }

    #[test]
    fn install_refuses_a_missing_local_source() {
        let (_temp, checkout) = temp_checkout();
        let plan = plan(&checkout);
        let source_dir = plan.source_dir();

        // No expectations: the install must fail before any dotnet call.
        let executor = StubExecutor::new(vec![]);

        let err = Packager::new(&executor)
            .install_global(&plan, &source_dir)
            .expect_err("expected the install to fail");
        assert!(matches!(err, ToolboxError::PackageSourceMissing { .. }));
        executor.assert_finished();
    }

    #[test]
    fn install_refuses_an_empty_local_source() {
        let (_temp, checkout) = temp_checkout();
        let plan = plan(&checkout);
        let source_dir = plan.source_dir();
        std::fs::create_dir_all(source_dir.as_std_path())
            .expect("expected to create the source dir");

        let executor = StubExecutor::new(vec![]);

        let err = Packager::new(&executor)
            .install_global(&plan, &source_dir)
            .expect_err("expected the install to fail");
        assert!(matches!(err, ToolboxError::PackageSourceMissing { .. }));
    }

    #[test]
    fn install_sources_the_local_package_only() {
        let (_temp, checkout) = temp_checkout();
        let plan = plan(&checkout);
        let source_dir = plan.source_dir();
        seed_package(&source_dir);

        let executor = StubExecutor::new(vec![
            ExpectedCall::new(
                "dotnet",
                &["tool", "list", "--global"],
                Ok(output_with_stdout(TOOL_LIST_WITHOUT_PACKAGE)),
            ),
            ExpectedCall::new(
                "dotnet",
                &[
                    "tool",
                    "install",
                    "--global",
                    "AzureSignTool",
                    "--version",
                    "0.0.0-gce87e84a58",
                    "--add-source",
                    source_dir.as_str(),
                    "--ignore-failed-sources",
                ],
                Ok(success_output()),
            ),
        ]);

        Packager::new(&executor)
            .install_global(&plan, &source_dir)
            .expect("expected the install to succeed");
        executor.assert_finished();
    }

    #[test]
    fn reinstall_converges_by_uninstalling_first() {
        let (_temp, checkout) = temp_checkout();
        let plan = plan(&checkout);
        let source_dir = plan.source_dir();
        seed_package(&source_dir);

        let executor = StubExecutor::new(vec![
            ExpectedCall::new(
                "dotnet",
                &["tool", "list", "--global"],
                Ok(output_with_stdout(TOOL_LIST_WITH_PACKAGE)),
            ),
            ExpectedCall::new(
                "dotnet",
                &["tool", "uninstall", "--global", "AzureSignTool"],
                Ok(success_output()),
            ),
            ExpectedCall::new(
                "dotnet",
                &[
                    "tool",
                    "install",
                    "--global",
                    "AzureSignTool",
                    "--version",
                    "0.0.0-gce87e84a58",
                    "--add-source",
                    source_dir.as_str(),
                    "--ignore-failed-sources",
                ],
                Ok(success_output()),
            ),
        ]);

        Packager::new(&executor)
            .install_global(&plan, &source_dir)
            .expect("expected the reinstall to succeed");
        executor.assert_finished();
    }
}
