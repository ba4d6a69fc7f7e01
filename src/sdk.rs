//! .NET SDK detection and verification.
//!
//! The build requires a specific SDK line (for example `3.1.x`). Installing
//! SDKs is the environment's job; this module is the gate that checks
//! `dotnet --list-sdks` for a match before any build step runs, and fails
//! the pipeline with an actionable message otherwise. Running the gate twice
//! is harmless.

use crate::error::{Result, ToolboxError};
use crate::exec::{CommandExecutor, stderr_message};

/// A version-range selector for an installed .NET SDK.
///
/// Accepts the `major.minor.x` wildcard form as well as an exact
/// `major.minor.patch` version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkSelector {
    major: u32,
    minor: u32,
    patch: Option<u32>,
    raw: String,
}

impl SdkSelector {
    /// Parses a selector such as `3.1.x` or `3.1.402`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::InvalidSdkSelector`] when the string is not
    /// three dot-separated components with numeric major and minor parts.
    pub fn parse(selector: &str) -> Result<Self> {
        let invalid = |reason: &'static str| ToolboxError::InvalidSdkSelector {
            selector: selector.to_owned(),
            reason,
        };

        let parts: Vec<&str> = selector.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(invalid("expected the form major.minor.patch or major.minor.x"));
        };

        let major: u32 = major
            .parse()
            .map_err(|_| invalid("major version is not a number"))?;
        let minor: u32 = minor
            .parse()
            .map_err(|_| invalid("minor version is not a number"))?;

        let patch = if patch.eq_ignore_ascii_case("x") {
            None
        } else {
            Some(
                patch
                    .parse()
                    .map_err(|_| invalid("patch version is not a number or 'x'"))?,
            )
        };

        Ok(Self {
            major,
            minor,
            patch,
            raw: selector.to_owned(),
        })
    }

    /// Returns the selector as originally written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Checks whether an installed SDK version satisfies this selector.
    ///
    /// Versions that fail to parse never match.
    #[must_use]
    pub fn matches(&self, version: &str) -> bool {
        let mut parts = version.split(['.', '-']);
        let major = parts.next().and_then(|p| p.parse::<u32>().ok());
        let minor = parts.next().and_then(|p| p.parse::<u32>().ok());
        let patch = parts.next().and_then(|p| p.parse::<u32>().ok());

        let (Some(major), Some(minor), Some(patch)) = (major, minor, patch) else {
            return false;
        };

        major == self.major
            && minor == self.minor
            && self.patch.is_none_or(|expected| expected == patch)
    }
}

impl std::fmt::Display for SdkSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Lists installed SDK versions by parsing `dotnet --list-sdks` output.
///
/// Each output line has the shape `3.1.426 [C:\Program Files\dotnet\sdk]`;
/// the leading token is the version.
///
/// # Errors
///
/// Returns [`ToolboxError::SdkDetection`] when `dotnet` cannot be run or
/// exits non-zero.
pub fn installed_sdk_versions(executor: &dyn CommandExecutor) -> Result<Vec<String>> {
    let output = executor
        .run("dotnet", &["--list-sdks"], None)
        .map_err(|err| ToolboxError::SdkDetection {
            reason: format!("failed to run dotnet: {err}"),
        })?;

    if !output.status.success() {
        return Err(ToolboxError::SdkDetection {
            reason: stderr_message(&output),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let versions = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_owned)
        .collect();

    Ok(versions)
}

/// Verifies that an installed SDK satisfies `selector`.
///
/// # Errors
///
/// Returns [`ToolboxError::SdkNotInstalled`] when no installed SDK matches,
/// or [`ToolboxError::SdkDetection`] when the installed set cannot be read.
pub fn ensure_sdk(executor: &dyn CommandExecutor, selector: &SdkSelector) -> Result<()> {
    let versions = installed_sdk_versions(executor)?;
    log::debug!("installed SDKs: {versions:?}");

    if versions.iter().any(|version| selector.matches(version)) {
        Ok(())
    } else {
        Err(ToolboxError::SdkNotInstalled {
            selector: selector.as_str().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, failure_output, output_with_stdout};
    use rstest::rstest;

    fn selector(raw: &str) -> SdkSelector {
        SdkSelector::parse(raw).expect("expected a valid selector")
    }

    #[rstest]
    #[case::wildcard_match("3.1.x", "3.1.426", true)]
    #[case::wildcard_other_patch("3.1.x", "3.1.0", true)]
    #[case::wrong_minor("3.1.x", "3.0.103", false)]
    #[case::wrong_major("3.1.x", "6.1.426", false)]
    #[case::exact_match("3.1.402", "3.1.402", true)]
    #[case::exact_mismatch("3.1.402", "3.1.426", false)]
    #[case::preview_suffix("6.0.x", "6.0.100-preview.7", true)]
    #[case::garbage("3.1.x", "not-a-version", false)]
    fn selector_matching(#[case] raw: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(selector(raw).matches(version), expected);
    }

    #[rstest]
    #[case::two_components("3.1")]
    #[case::words("three.one.x")]
    #[case::wildcard_minor("3.x.1")]
    #[case::empty("")]
    fn selector_rejects_malformed_input(#[case] raw: &str) {
        let err = SdkSelector::parse(raw).expect_err("expected rejection");
        assert!(matches!(err, ToolboxError::InvalidSdkSelector { .. }));
    }

    #[test]
    fn ensure_sdk_accepts_a_matching_installation() {
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "dotnet",
            &["--list-sdks"],
            Ok(output_with_stdout(
                "2.1.818 [C:\\Program Files\\dotnet\\sdk]\n3.1.426 [C:\\Program Files\\dotnet\\sdk]\n",
            )),
        )]);

        ensure_sdk(&executor, &selector("3.1.x")).expect("expected the gate to pass");
        executor.assert_finished();
    }

    #[test]
    fn ensure_sdk_fails_when_nothing_matches() {
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "dotnet",
            &["--list-sdks"],
            Ok(output_with_stdout("6.0.100 [C:\\Program Files\\dotnet\\sdk]\n")),
        )]);

        let err = ensure_sdk(&executor, &selector("3.1.x")).expect_err("expected a failure");
        assert!(matches!(
            err,
            ToolboxError::SdkNotInstalled { selector } if selector == "3.1.x"
        ));
    }

    #[test]
    fn ensure_sdk_surfaces_dotnet_failure() {
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "dotnet",
            &["--list-sdks"],
            Ok(failure_output("dotnet: command broke")),
        )]);

        let err = ensure_sdk(&executor, &selector("3.1.x")).expect_err("expected a failure");
        assert!(matches!(err, ToolboxError::SdkDetection { .. }));
    }
}
