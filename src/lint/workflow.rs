//! Typed model of a GitHub Actions workflow file.
//!
//! Only the keys the lint rules inspect are modelled; everything else in
//! the file is ignored during deserialisation.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A workflow file as the linter sees it.
#[derive(Debug, Deserialize)]
pub struct Workflow {
    /// Display name of the workflow.
    pub name: Option<String>,
    /// Jobs keyed by job id.
    #[serde(default)]
    pub jobs: BTreeMap<String, Job>,
}

/// One job within a workflow.
#[derive(Debug, Deserialize)]
pub struct Job {
    /// Display name of the job.
    pub name: Option<String>,
    /// Runner label or labels.
    #[serde(rename = "runs-on")]
    pub runs_on: Option<RunsOn>,
    /// Job-level environment variables.
    #[serde(default)]
    pub env: BTreeMap<String, serde_yaml::Value>,
    /// The job's steps, in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// `runs-on` accepts a single label or a list of labels.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RunsOn {
    /// A single runner label.
    One(String),
    /// Multiple runner labels.
    Many(Vec<String>),
}

impl RunsOn {
    /// Returns the runner labels in declaration order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::One(label) => vec![label.as_str()],
            Self::Many(labels) => labels.iter().map(String::as_str).collect(),
        }
    }
}

/// One step within a job.
#[derive(Debug, Deserialize)]
pub struct Step {
    /// Display name of the step.
    pub name: Option<String>,
    /// Action reference (`owner/repo[/path]@sha`), if the step uses one.
    pub uses: Option<String>,
    /// Inline script, if the step runs one.
    pub run: Option<String>,
}

/// Parses workflow YAML.
///
/// # Errors
///
/// Returns the underlying YAML error when the content does not deserialise
/// into the workflow shape.
pub fn parse_workflow(contents: &str) -> Result<Workflow, serde_yaml::Error> {
    serde_yaml::from_str(contents)
}
