//! Label reconciliation against a desired label set.
//!
//! [`plan`] is a pure diff of actual against desired labels; [`apply`] sends
//! one gateway call per label to carry the plan out. Nothing is batched or
//! rolled back, so a failure part-way leaves the earlier calls applied.

mod desired;
mod pull_request;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use tracing::info;

use crate::github::error::SweepError;
use crate::github::gateway::LabelGateway;
use crate::github::locator::RepositoryLocator;
use crate::github::models::Label;

pub use desired::{DEFAULT_LABELS, default_labels, load_labels};
pub use pull_request::{REBASE_LABEL, RebaseLabelAction, has_label, rebase_comment, sync_rebase_label};

/// Operations needed to turn a repository's labels into the desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPlan {
    /// Desired labels absent from the repository.
    pub missing: Vec<Label>,
    /// Existing labels with the wrong colour, carrying the desired colour.
    pub incorrect: Vec<Label>,
    /// Names of existing labels that are not desired.
    pub extra: Vec<String>,
}

impl LabelPlan {
    /// Returns true when the repository already matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.incorrect.is_empty() && self.extra.is_empty()
    }
}

/// Desired labels whose name is absent from `actual`.
#[must_use]
pub fn missing(actual: &[Label], desired: &[Label]) -> Vec<Label> {
    desired
        .iter()
        .filter(|wanted| !actual.iter().any(|label| label.name == wanted.name))
        .cloned()
        .collect()
}

/// Labels in `actual` whose name is desired with another colour. The result
/// carries the desired colour.
#[must_use]
pub fn incorrect(actual: &[Label], desired: &[Label]) -> Vec<Label> {
    let wanted: HashMap<&str, &str> = desired
        .iter()
        .map(|label| (label.name.as_str(), label.color.as_str()))
        .collect();
    actual
        .iter()
        .filter_map(|label| {
            wanted
                .get(label.name.as_str())
                .filter(|colour| **colour != label.color.as_str())
                .map(|colour| Label {
                    name: label.name.clone(),
                    color: (*colour).to_owned(),
                })
        })
        .collect()
}

/// Names in `actual` that are not desired.
#[must_use]
pub fn extra(actual: &[Label], desired: &[Label]) -> Vec<String> {
    actual
        .iter()
        .filter(|label| !desired.iter().any(|wanted| wanted.name == label.name))
        .map(|label| label.name.clone())
        .collect()
}

/// Computes the full plan in one pass over the inputs.
#[must_use]
pub fn plan(actual: &[Label], desired: &[Label]) -> LabelPlan {
    LabelPlan {
        missing: missing(actual, desired),
        incorrect: incorrect(actual, desired),
        extra: extra(actual, desired),
    }
}

/// Fetches the repository's labels and diffs them against `desired`.
///
/// # Errors
///
/// Returns the gateway error from the label listing.
pub async fn plan_for<G>(
    gateway: &G,
    repository: &RepositoryLocator,
    desired: &[Label],
) -> Result<LabelPlan, SweepError>
where
    G: LabelGateway + ?Sized,
{
    let actual = gateway.labels(repository).await?;
    Ok(plan(&actual, desired))
}

/// Desired labels missing from the repository.
///
/// # Errors
///
/// Returns the gateway error from the label listing.
pub async fn missing_labels<G>(
    gateway: &G,
    repository: &RepositoryLocator,
    desired: &[Label],
) -> Result<Vec<Label>, SweepError>
where
    G: LabelGateway + ?Sized,
{
    Ok(missing(&gateway.labels(repository).await?, desired))
}

/// Repository labels with the wrong colour.
///
/// # Errors
///
/// Returns the gateway error from the label listing.
pub async fn incorrect_labels<G>(
    gateway: &G,
    repository: &RepositoryLocator,
    desired: &[Label],
) -> Result<Vec<Label>, SweepError>
where
    G: LabelGateway + ?Sized,
{
    Ok(incorrect(&gateway.labels(repository).await?, desired))
}

/// Repository labels that are not desired.
///
/// # Errors
///
/// Returns the gateway error from the label listing.
pub async fn extra_labels<G>(
    gateway: &G,
    repository: &RepositoryLocator,
    desired: &[Label],
) -> Result<Vec<String>, SweepError>
where
    G: LabelGateway + ?Sized,
{
    Ok(extra(&gateway.labels(repository).await?, desired))
}

/// Which parts of a plan [`apply`] carries out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyScope {
    /// Delete labels that are not desired.
    pub prune: bool,
}

/// Deletes extra labels (when pruning), fixes colours, then adds missing
/// labels.
///
/// # Errors
///
/// Stops at and returns the first failing gateway call.
pub async fn apply<G>(
    gateway: &G,
    repository: &RepositoryLocator,
    plan: &LabelPlan,
    scope: ApplyScope,
) -> Result<(), SweepError>
where
    G: LabelGateway + ?Sized,
{
    if scope.prune {
        for name in &plan.extra {
            gateway.delete_label(repository, name).await?;
        }
    }
    for label in &plan.incorrect {
        gateway.update_label(repository, label).await?;
    }
    for label in &plan.missing {
        gateway.add_label(repository, label).await?;
    }
    info!(
        %repository,
        added = plan.missing.len(),
        updated = plan.incorrect.len(),
        deleted = if scope.prune { plan.extra.len() } else { 0 },
        "reconciled labels"
    );
    Ok(())
}
