//! GitHub API checks for pinned action references.
//!
//! Two questions are asked per pinned action: does the repository still
//! exist, and is there a newer upstream release than the pinned commit.
//! Both go through the [`ActionRegistry`] trait so the lint rules can be
//! tested without network access. API failures such as rate limiting or
//! bad credentials are logged and reported as inconclusive rather than
//! surfacing as lint findings.

use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for GitHub API calls.
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every API request.
const USER_AGENT: &str = "actions-toolbox-linter";

/// Environment variable consulted for an API token.
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// A parsed `uses:` reference, `owner/repo[/path]@sha`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRef {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Path inside the repository, for actions not at the root.
    pub path: Option<String>,
    /// The pinned revision after the `@`.
    pub pinned: String,
}

impl ActionRef {
    /// Parses a `uses:` value.
    ///
    /// Returns `None` for local references (`./...`) and for values missing
    /// the `@` pin or an `owner/repo` path; those cases are handled by the
    /// offline rules.
    #[must_use]
    pub fn parse(uses: &str) -> Option<Self> {
        if uses.starts_with("./") {
            return None;
        }

        let (path_part, pinned) = uses.split_once('@')?;
        let mut segments = path_part.splitn(3, '/');
        let owner = segments.next()?.to_owned();
        let repo = segments.next()?.to_owned();
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        let path = segments.next().map(str::to_owned);

        Some(Self {
            owner,
            repo,
            path,
            pinned: pinned.to_owned(),
        })
    }
}

/// Answers existence and staleness questions about pinned actions.
///
/// `None` results mean the registry could not answer (offline, rate
/// limited); callers must not turn an unanswered question into a finding.
#[cfg_attr(test, mockall::automock)]
pub trait ActionRegistry {
    /// Whether `owner/repo` exists upstream.
    fn repo_exists(&self, owner: &str, repo: &str) -> Option<bool>;

    /// URL of a newer upstream commit than the pinned one, when the latest
    /// release points elsewhere.
    fn newer_commit(&self, action: &ActionRef) -> Option<String>;
}

/// Outcome of one GitHub API request.
enum ApiResponse {
    /// Parsed JSON payload.
    Json(Value),
    /// The resource does not exist.
    NotFound,
    /// The API could not be consulted conclusively.
    Inconclusive,
}

/// [`ActionRegistry`] backed by the GitHub REST API via `ureq`.
#[derive(Debug, Default)]
pub struct GithubRegistry {
    token: Option<String>,
}

impl GithubRegistry {
    /// Creates a registry, picking up `GITHUB_TOKEN` when set.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            token: std::env::var(GITHUB_TOKEN_VAR).ok(),
        }
    }

    fn get(&self, url: &str) -> ApiResponse {
        let mut request = http_agent().get(url).header("user-agent", USER_AGENT);
        if let Some(token) = &self.token {
            request = request.header("authorization", format!("Token {token}"));
        }

        match request.call() {
            Ok(response) => match response.into_body().read_to_string() {
                Ok(body) => match serde_json::from_str(&body) {
                    Ok(json) => ApiResponse::Json(json),
                    Err(err) => {
                        log::error!("malformed GitHub API payload from {url}: {err}");
                        ApiResponse::Inconclusive
                    }
                },
                Err(err) => {
                    log::error!("failed to read GitHub API response from {url}: {err}");
                    ApiResponse::Inconclusive
                }
            },
            Err(ureq::Error::StatusCode(404)) => ApiResponse::NotFound,
            Err(ureq::Error::StatusCode(status @ (401 | 403))) => {
                log::error!("GitHub API request to {url} rejected with status {status}");
                ApiResponse::Inconclusive
            }
            Err(err) => {
                log::error!("GitHub API request to {url} failed: {err}");
                ApiResponse::Inconclusive
            }
        }
    }

    /// Resolves the commit sha the latest release of `owner/repo` points at.
    fn latest_release_sha(&self, owner: &str, repo: &str) -> Option<String> {
        let ApiResponse::Json(release) = self.get(&format!(
            "https://api.github.com/repos/{owner}/{repo}/releases/latest"
        )) else {
            return None;
        };
        let tag = release.get("tag_name")?.as_str()?.to_owned();

        let ApiResponse::Json(reference) = self.get(&format!(
            "https://api.github.com/repos/{owner}/{repo}/git/ref/tags/{tag}"
        )) else {
            return None;
        };
        let object = reference.get("object")?;

        if object.get("type")?.as_str()? == "commit" {
            return Some(object.get("sha")?.as_str()?.to_owned());
        }

        // Annotated tag: follow the tag object once to reach the commit.
        let ApiResponse::Json(tag_object) = self.get(object.get("url")?.as_str()?) else {
            return None;
        };
        Some(tag_object.get("object")?.get("sha")?.as_str()?.to_owned())
    }
}

impl ActionRegistry for GithubRegistry {
    fn repo_exists(&self, owner: &str, repo: &str) -> Option<bool> {
        match self.get(&format!("https://api.github.com/repos/{owner}/{repo}")) {
            ApiResponse::Json(_) => Some(true),
            ApiResponse::NotFound => Some(false),
            ApiResponse::Inconclusive => None,
        }
    }

    fn newer_commit(&self, action: &ActionRef) -> Option<String> {
        let sha = self.latest_release_sha(&action.owner, &action.repo)?;
        if sha == action.pinned {
            None
        } else {
            Some(format!(
                "https://github.com/{}/{}/commit/{sha}",
                action.owner, action.repo
            ))
        }
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(API_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}
