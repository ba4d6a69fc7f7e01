//! Pinned-tool configuration.
//!
//! The tool to bootstrap is process-wide configuration: a repository URL, an
//! exact commit, a package id, and the SDK line the build needs. The values
//! live here as named constants rather than inline literals, so bumping the
//! pin is a one-line change. An optional `toolbox.toml` file and CLI flags
//! can override any of them; CLI flags win.

use crate::error::{Result, ToolboxError};
use crate::pin::PinnedCommit;
use crate::sdk::SdkSelector;
use camino::Utf8Path;
use serde::Deserialize;

/// Upstream repository of the tool to build.
pub const DEFAULT_REPO_URL: &str = "https://github.com/vcsjones/AzureSignTool";

/// The exact upstream commit the tool is built from.
///
/// Changing the installed tool's version means changing this pin (or
/// overriding it in `toolbox.toml`).
pub const DEFAULT_PINNED_COMMIT: &str = "ce87e84a58dff318f62ffe5177bf3e179d815108";

/// NuGet package id produced by `dotnet pack` and installed globally.
pub const DEFAULT_PACKAGE_ID: &str = "AzureSignTool";

/// SDK line required to build the pinned commit.
pub const DEFAULT_SDK_SELECTOR: &str = "3.1.x";

/// Default override file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "toolbox.toml";

/// The fully resolved description of the tool to bootstrap.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Repository URL to clone.
    pub repo_url: String,
    /// Exact commit to check out.
    pub commit: PinnedCommit,
    /// Package id to pack and install.
    pub package_id: String,
    /// SDK selector the build requires.
    pub sdk: SdkSelector,
}

/// Field-by-field overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct SpecOverrides {
    /// Replacement repository URL.
    pub repo_url: Option<String>,
    /// Replacement commit hash.
    pub commit: Option<String>,
    /// Replacement package id.
    pub package_id: Option<String>,
    /// Replacement SDK selector.
    pub sdk: Option<String>,
}

/// On-disk shape of `toolbox.toml`. All fields are optional; unknown fields
/// are rejected so typos surface instead of being ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpec {
    repo: Option<String>,
    commit: Option<String>,
    package: Option<String>,
    sdk: Option<String>,
}

impl ToolSpec {
    /// Resolves the effective configuration.
    ///
    /// Starts from the compiled-in pin, overlays `config_file` when given
    /// (the file must then exist), otherwise overlays `toolbox.toml` from
    /// the working directory when present, and finally applies CLI
    /// overrides. Validation of the commit hash and SDK selector happens
    /// last, so an invalid value is reported no matter where it came from.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::InvalidConfig`] for unreadable or malformed
    /// files, and [`ToolboxError::InvalidCommit`] or
    /// [`ToolboxError::InvalidSdkSelector`] for invalid values.
    pub fn resolve(config_file: Option<&Utf8Path>, overrides: &SpecOverrides) -> Result<Self> {
        let raw = match config_file {
            Some(path) => read_raw_spec(path)?,
            None => {
                let default_path = Utf8Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    read_raw_spec(default_path)?
                } else {
                    RawSpec::default()
                }
            }
        };

        let repo_url = overrides
            .repo_url
            .clone()
            .or(raw.repo)
            .unwrap_or_else(|| DEFAULT_REPO_URL.to_owned());
        let commit = overrides
            .commit
            .clone()
            .or(raw.commit)
            .unwrap_or_else(|| DEFAULT_PINNED_COMMIT.to_owned());
        let package_id = overrides
            .package_id
            .clone()
            .or(raw.package)
            .unwrap_or_else(|| DEFAULT_PACKAGE_ID.to_owned());
        let sdk = overrides
            .sdk
            .clone()
            .or(raw.sdk)
            .unwrap_or_else(|| DEFAULT_SDK_SELECTOR.to_owned());

        Ok(Self {
            repo_url,
            commit: PinnedCommit::new(commit)?,
            package_id,
            sdk: SdkSelector::parse(&sdk)?,
        })
    }
}

fn read_raw_spec(path: &Utf8Path) -> Result<RawSpec> {
    let contents = std::fs::read_to_string(path).map_err(|err| ToolboxError::InvalidConfig {
        path: path.to_owned(),
        reason: err.to_string(),
    })?;

    toml::from_str(&contents).map_err(|err| ToolboxError::InvalidConfig {
        path: path.to_owned(),
        reason: err.to_string(),
    })
}
