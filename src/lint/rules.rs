//! The workflow lint rules.
//!
//! Offline rules cover naming, runner pinning, environment-variable
//! hygiene, and action sha pinning. When a registry is supplied, pinned
//! actions are additionally checked for existence and staleness upstream.

use crate::lint::findings::Finding;
use crate::lint::remote::{ActionRef, ActionRegistry};
use crate::lint::workflow::{Job, Step, Workflow};

/// Length of a full commit sha in an action pin.
const PIN_LEN: usize = 40;

/// Lints one parsed workflow, returning all findings in document order.
#[must_use]
pub fn lint_workflow(workflow: &Workflow, registry: Option<&dyn ActionRegistry>) -> Vec<Finding> {
    let mut findings = Vec::new();

    match &workflow.name {
        None => findings.push(Finding::warning("Name key missing for workflow.")),
        Some(name) if !starts_uppercase(name) => findings.push(Finding::warning(format!(
            "Name value for workflow is not capitalized. [{name}]"
        ))),
        Some(_) => {}
    }

    for (job_key, job) in &workflow.jobs {
        lint_job(job_key, job, registry, &mut findings);
    }

    findings
}

fn lint_job(
    job_key: &str,
    job: &Job,
    registry: Option<&dyn ActionRegistry>,
    findings: &mut Vec<Finding>,
) {
    if let Some(runs_on) = &job.runs_on {
        for label in runs_on.labels() {
            if label.contains("-latest") {
                findings.push(Finding::warning(format!(
                    "Runner version is set to '{label}', but needs to be pinned to a version."
                )));
            }
        }
    }

    match &job.name {
        None => findings.push(Finding::warning(format!(
            "Name key missing for job key '{job_key}'."
        ))),
        Some(name) if !starts_uppercase(name) => findings.push(Finding::warning(format!(
            "Name value of job key '{job_key}' is not capitalized. [{name}]"
        ))),
        Some(_) => {}
    }

    for key in job.env.keys() {
        if !key.starts_with('_') {
            findings.push(Finding::warning(format!(
                "Environment variable '{key}' of job key '{job_key}' does not start with an underscore."
            )));
        }
    }

    for (index, step) in job.steps.iter().enumerate() {
        lint_step(job_key, index + 1, step, registry, findings);
    }
}

fn lint_step(
    job_key: &str,
    index: usize,
    step: &Step,
    registry: Option<&dyn ActionRegistry>,
    findings: &mut Vec<Finding>,
) {
    match &step.name {
        None => findings.push(Finding::warning(format!(
            "Name key missing for step {index} of job key '{job_key}'."
        ))),
        Some(name) if !starts_uppercase(name) => findings.push(Finding::warning(format!(
            "Name value in step {index} of job key '{job_key}' is not capitalized. [{name}]"
        ))),
        Some(_) => {}
    }

    if let Some(uses) = &step.uses {
        lint_uses(job_key, index, uses, registry, findings);
    }

    // A run block of exactly two lines should collapse to one.
    if let Some(run) = &step.run {
        if run.matches('\n').count() == 1 {
            findings.push(Finding::warning(format!(
                "Run in step {index} of job key '{job_key}' should be a single line."
            )));
        }
    }
}

fn lint_uses(
    job_key: &str,
    index: usize,
    uses: &str,
    registry: Option<&dyn ActionRegistry>,
    findings: &mut Vec<Finding>,
) {
    // Local composite actions have no pin to check.
    if uses.starts_with("./") {
        return;
    }

    let Some((path, pin)) = uses.split_once('@') else {
        findings.push(Finding::error(format!(
            "Step {index} of job key '{job_key}' does not have a valid action hash. \
             (missing '@' character)"
        )));
        return;
    };

    let mut pin_valid = true;
    if pin.len() != PIN_LEN {
        pin_valid = false;
        findings.push(Finding::error(format!(
            "Step {index} of job key '{job_key}' does not have a valid action hash. \
             (not 40 characters)"
        )));
    }
    if !pin.chars().all(|c| c.is_ascii_hexdigit()) {
        pin_valid = false;
        findings.push(Finding::error(format!(
            "Step {index} of job key '{job_key}' does not have a valid action hash. \
             (not all hexadecimal characters)"
        )));
    }

    if path.split('/').filter(|segment| !segment.is_empty()).count() < 2 {
        findings.push(Finding::error(format!(
            "Step {index} of job key '{job_key}' does not have a valid action path. \
             (missing workflow name or the workflow author)"
        )));
        return;
    }

    // Remote checks only apply to a well-formed sha pin: existence and
    // staleness are questions about a specific pinned commit, and the
    // malformed pin already errored above.
    if !pin_valid {
        return;
    }

    let (Some(registry), Some(action)) = (registry, ActionRef::parse(uses)) else {
        return;
    };

    if registry.repo_exists(&action.owner, &action.repo) == Some(false) {
        findings.push(Finding::error(format!(
            "Step {index} of job key '{job_key}' uses a non-existing action: {uses}."
        )));
        return;
    }

    if let Some(url) = registry.newer_commit(&action) {
        findings.push(Finding::warning(format!(
            "Step {index} of job key '{job_key}' uses an outdated action, \
             consider updating it '{url}'."
        )));
    }
}

fn starts_uppercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}
