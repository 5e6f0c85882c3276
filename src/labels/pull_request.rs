//! Keeps the rebase label on a pull request in step with its mergeability.

use tracing::debug;

use crate::github::error::SweepError;
use crate::github::gateway::IssueGateway;
use crate::github::locator::RepositoryLocator;
use crate::github::models::PullRequest;

/// Label applied to pull requests with merge conflicts.
pub const REBASE_LABEL: &str = "needs-rebase";

/// Comment posted when the rebase label is first applied.
#[must_use]
pub fn rebase_comment(author: Option<&str>) -> String {
    let greeting = author.map_or_else(|| "Thanks".to_owned(), |login| format!("Thanks @{login}"));
    format!(
        "{greeting} for your work, but this can't be merged as it has conflicts. \
         Please rebase on the current default branch, fix the conflicts and push again. \
         https://git-scm.com/book/en/v2/Git-Branching-Rebasing"
    )
}

/// What [`sync_rebase_label`] did, or would do in no-op mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebaseLabelAction {
    /// Conflicting and unlabelled: commented and labelled.
    Labelled,
    /// Conflicting and already labelled.
    AlreadyLabelled,
    /// Mergeable but labelled: label removed.
    Unlabelled,
    /// Mergeable and unlabelled.
    Clean,
    /// GitHub has not computed mergeability yet.
    Unknown,
}

/// Returns true when issue `number` carries the label `name`.
///
/// # Errors
///
/// Returns the gateway error from the issue label listing.
pub async fn has_label<G>(
    gateway: &G,
    repository: &RepositoryLocator,
    number: u64,
    name: &str,
) -> Result<bool, SweepError>
where
    G: IssueGateway + ?Sized,
{
    let labels = gateway.issue_labels(repository, number).await?;
    Ok(labels.iter().any(|label| label.name == name))
}

/// Adds or removes [`REBASE_LABEL`] on `pull` according to its
/// mergeability. `pull` must come from the single pull request endpoint,
/// which is the only one reporting mergeability.
///
/// With `no_op` set nothing is written and the returned action says what
/// would have happened.
///
/// # Errors
///
/// Returns the first failing gateway call.
pub async fn sync_rebase_label<G>(
    gateway: &G,
    repository: &RepositoryLocator,
    pull: &PullRequest,
    no_op: bool,
) -> Result<RebaseLabelAction, SweepError>
where
    G: IssueGateway + ?Sized,
{
    let Some(mergeable) = pull.mergeable else {
        return Ok(RebaseLabelAction::Unknown);
    };
    let number = pull.number;
    let labelled = has_label(gateway, repository, number, REBASE_LABEL).await?;

    let action = match (mergeable, labelled) {
        (false, false) => {
            if !no_op {
                let body = rebase_comment(pull.author.as_deref());
                gateway.add_issue_comment(repository, number, &body).await?;
                gateway
                    .add_issue_label(repository, number, REBASE_LABEL)
                    .await?;
            }
            RebaseLabelAction::Labelled
        }
        (false, true) => RebaseLabelAction::AlreadyLabelled,
        (true, true) => {
            if !no_op {
                gateway
                    .remove_issue_label(repository, number, REBASE_LABEL)
                    .await?;
            }
            RebaseLabelAction::Unlabelled
        }
        (true, false) => RebaseLabelAction::Clean,
    };
    debug!(%repository, number, ?action, no_op, "synchronised rebase label");
    Ok(action)
}
