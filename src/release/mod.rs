//! Release readiness from the newest tag and the commits since it.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::github::error::SweepError;
use crate::github::gateway::RepositoryGateway;
use crate::github::listing::fetch_tags;
use crate::github::locator::RepositoryLocator;

/// When a repository counts as due for a release.
///
/// With both thresholds set a release is due only when both are exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseThresholds {
    commits: Option<u64>,
    days: Option<i64>,
}

impl ReleaseThresholds {
    /// Validates that at least one threshold is set.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidArgument`] when both are `None`.
    pub fn new(commits: Option<u64>, days: Option<i64>) -> Result<Self, SweepError> {
        if commits.is_none() && days.is_none() {
            return Err(SweepError::InvalidArgument {
                message: "a commit or a time threshold is required".to_owned(),
            });
        }
        Ok(Self { commits, days })
    }

    /// Applies the thresholds to a tag date and commit count.
    #[must_use]
    pub fn is_due(&self, tagged_at: DateTime<Utc>, commits_since: u64, now: DateTime<Utc>) -> bool {
        let by_commits = self.commits.map(|limit| commits_since > limit);
        let by_time = self
            .days
            .map(|days| tagged_at < now - Duration::days(days));
        match (by_commits, by_time) {
            (Some(commits), Some(time)) => commits && time,
            (Some(due), None) | (None, Some(due)) => due,
            (None, None) => false,
        }
    }
}

/// Release state of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseStatus {
    /// `owner/name`.
    pub repository: String,
    /// Newest tag by version.
    pub tag: String,
    /// Author date of the tagged commit.
    pub tagged_at: Option<DateTime<Utc>>,
    /// Commits on the default branch since the tag.
    pub commits_since: u64,
    /// Whether the thresholds call for a release.
    pub due: bool,
}

/// Checks one repository against the thresholds.
///
/// Returns `Ok(None)` when no tag matches `tag_pattern`.
///
/// # Errors
///
/// Returns an invalid pattern error or the first failing gateway call.
pub async fn check_release<G>(
    gateway: &G,
    repository: &RepositoryLocator,
    tag_pattern: Option<&str>,
    thresholds: ReleaseThresholds,
    now: DateTime<Utc>,
) -> Result<Option<ReleaseStatus>, SweepError>
where
    G: RepositoryGateway + ?Sized,
{
    let Some(newest) = fetch_tags(gateway, repository, tag_pattern)
        .await?
        .into_iter()
        .next()
    else {
        debug!(%repository, "no matching tags");
        return Ok(None);
    };

    let commit = gateway.commit(repository, &newest.commit_sha).await?;
    let Some(tagged_at) = commit.authored_at else {
        debug!(%repository, tag = %newest.name, "tagged commit has no author date");
        return Ok(Some(ReleaseStatus {
            repository: repository.to_string(),
            tag: newest.name,
            tagged_at: None,
            commits_since: 0,
            due: false,
        }));
    };
    let commits = gateway.commits_since(repository, tagged_at).await?;
    let commits_since = u64::try_from(commits.len()).unwrap_or(u64::MAX);

    Ok(Some(ReleaseStatus {
        repository: repository.to_string(),
        tag: newest.name,
        tagged_at: Some(tagged_at),
        commits_since,
        due: thresholds.is_due(tagged_at, commits_since, now),
    }))
}
