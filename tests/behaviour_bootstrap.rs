//! Behaviour tests for the bootstrap pipeline.
//!
//! These tests drive the pipeline end to end with a stubbed command
//! executor and a fake home directory, checking the ordering guarantees:
//! the platform guard runs before any side effect, the SDK gate runs
//! before the fetch, a failed fetch stops the run before any build step,
//! and the install refuses to proceed without a local package.

use actions_toolbox::config::ToolSpec;
use actions_toolbox::dirs::BaseDirs;
use actions_toolbox::error::ToolboxError;
use actions_toolbox::pin::PinnedCommit;
use actions_toolbox::pipeline::{BootstrapContext, run_bootstrap_on};
use actions_toolbox::sdk::SdkSelector;
use actions_toolbox::test_utils::{
    ExpectedCall, StubExecutor, failure_output, output_with_stdout, success_output,
};
use camino::Utf8PathBuf;
use rstest::rstest;

const PIN: &str = "ce87e84a58dff318f62ffe5177bf3e179d815108";
const REPO: &str = "https://example.invalid/tool";
const LIST_SDKS_31: &str = "3.1.426 [C:\\Program Files\\dotnet\\sdk]\n";

struct FakeDirs {
    home: Utf8PathBuf,
}

impl BaseDirs for FakeDirs {
    fn home_dir(&self) -> Option<Utf8PathBuf> {
        Some(self.home.clone())
    }
}

struct Harness {
    _temp: tempfile::TempDir,
    spec: ToolSpec,
    dirs: FakeDirs,
    checkout: Utf8PathBuf,
}

fn harness() -> Harness {
    let temp = tempfile::tempdir().expect("expected a tempdir");
    let home =
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("expected UTF-8 temp path");
    let checkout = home.join("AzureSignTool");

    let spec = ToolSpec {
        repo_url: REPO.to_owned(),
        commit: PinnedCommit::new(PIN).expect("expected a valid hash"),
        package_id: "AzureSignTool".to_owned(),
        sdk: SdkSelector::parse("3.1.x").expect("expected a valid selector"),
    };

    Harness {
        _temp: temp,
        spec,
        dirs: FakeDirs { home },
        checkout,
    }
}

fn context(spec: &ToolSpec) -> BootstrapContext<'_> {
    BootstrapContext {
        spec,
        quiet: true,
        dry_run: false,
    }
}

#[rstest]
#[case::linux("Linux")]
#[case::macos("macOS")]
#[case::unknown("freebsd")]
fn non_windows_platforms_abort_with_no_side_effects(#[case] os: &str) {
    let harness = harness();
    let context = context(&harness.spec);
    // An empty stub panics on any invocation, so success here proves the
    // guard fired before any external command.
    let executor = StubExecutor::new(vec![]);
    let mut stderr = Vec::new();

    let err = run_bootstrap_on(&context, os, &executor, &harness.dirs, &mut stderr)
        .expect_err("expected the guard to abort");
    assert!(
        matches!(err, ToolboxError::UnsupportedPlatform { actual } if actual == os),
        "expected an unsupported platform error"
    );
    executor.assert_finished();
}

#[rstest]
#[case::canonical("Windows")]
#[case::lowercase("windows")]
#[case::uppercase("WINDOWS")]
fn platform_guard_accepts_windows_in_any_case(#[case] os: &str) {
    let harness = harness();
    let context = BootstrapContext {
        spec: &harness.spec,
        quiet: true,
        dry_run: true,
    };
    let executor = StubExecutor::new(vec![]);
    let mut stderr = Vec::new();

    run_bootstrap_on(&context, os, &executor, &harness.dirs, &mut stderr)
        .expect("expected the guard to pass");
}

#[test]
fn missing_sdk_stops_the_run_before_the_fetch() {
    let harness = harness();
    let context = context(&harness.spec);
    let executor = StubExecutor::new(vec![ExpectedCall::new(
        "dotnet",
        &["--list-sdks"],
        Ok(output_with_stdout("6.0.100 [C:\\Program Files\\dotnet\\sdk]\n")),
    )]);
    let mut stderr = Vec::new();

    let err = run_bootstrap_on(&context, "Windows", &executor, &harness.dirs, &mut stderr)
        .expect_err("expected the SDK gate to fail");
    assert!(matches!(
        err,
        ToolboxError::SdkNotInstalled { selector } if selector == "3.1.x"
    ));
    // No git or build commands were expected, so the run stopped at the gate.
    executor.assert_finished();
}

#[test]
fn unknown_commit_aborts_at_the_fetch_step() {
    let harness = harness();
    let context = context(&harness.spec);
    let executor = StubExecutor::new(vec![
        ExpectedCall::new(
            "dotnet",
            &["--list-sdks"],
            Ok(output_with_stdout(LIST_SDKS_31)),
        ),
        ExpectedCall::new(
            "git",
            &["clone", REPO, harness.checkout.as_str()],
            Ok(success_output()),
        ),
        ExpectedCall::new(
            "git",
            &["checkout", "--detach", PIN],
            Ok(failure_output("fatal: reference is not a tree")),
        ),
    ]);
    let mut stderr = Vec::new();

    let err = run_bootstrap_on(&context, "Windows", &executor, &harness.dirs, &mut stderr)
        .expect_err("expected the fetch to fail");
    assert!(matches!(
        err,
        ToolboxError::Git { operation: "checkout", .. }
    ));
    // No restore, pack, or install was expected after the failing fetch.
    executor.assert_finished();
}

#[test]
fn empty_pack_output_fails_the_install_instead_of_falling_back() {
    let harness = harness();
    let context = context(&harness.spec);
    let source_dir = harness.checkout.join("nupkg");
    // The stubbed pack step reports success but writes nothing, so the
    // local source check must reject the install. A remote feed is never
    // consulted.
    let executor = StubExecutor::new(vec![
        ExpectedCall::new(
            "dotnet",
            &["--list-sdks"],
            Ok(output_with_stdout(LIST_SDKS_31)),
        ),
        ExpectedCall::new(
            "git",
            &["clone", REPO, harness.checkout.as_str()],
            Ok(success_output()),
        ),
        ExpectedCall::new(
            "git",
            &["checkout", "--detach", PIN],
            Ok(success_output()),
        ),
        ExpectedCall::new("dotnet", &["restore"], Ok(success_output())),
        ExpectedCall::new(
            "dotnet",
            &[
                "pack",
                "--output",
                source_dir.as_str(),
                "-p:Version=0.0.0-gce87e84a58",
            ],
            Ok(success_output()),
        ),
    ]);
    let mut stderr = Vec::new();

    let err = run_bootstrap_on(&context, "Windows", &executor, &harness.dirs, &mut stderr)
        .expect_err("expected the install to fail");
    assert!(matches!(
        err,
        ToolboxError::PackageSourceMissing { path } if path == source_dir
    ));
    executor.assert_finished();
}

#[test]
fn dry_run_reports_the_derived_version_and_checkout() {
    let harness = harness();
    let context = BootstrapContext {
        spec: &harness.spec,
        quiet: false,
        dry_run: true,
    };
    let executor = StubExecutor::new(vec![]);
    let mut stderr = Vec::new();

    run_bootstrap_on(&context, "Windows", &executor, &harness.dirs, &mut stderr)
        .expect("expected the dry run to succeed");
    executor.assert_finished();

    let output = String::from_utf8(stderr).expect("stderr was not UTF-8");
    assert!(output.contains("0.0.0-gce87e84a58"));
    assert!(output.contains(harness.checkout.as_str()));
}
