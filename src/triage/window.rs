//! Updated-at time windows over an explicit or fetched pull request list.

use chrono::{DateTime, Utc};

use crate::github::error::SweepError;
use crate::github::gateway::{PullRequestGateway, PullRequestQuery};
use crate::github::locator::RepositoryLocator;
use crate::github::models::PullRequest;

/// Where a time window takes its pull requests from.
///
/// An explicit list wins over the repository. Supplying neither is a caller
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullSource {
    /// Pull requests already in hand.
    pub pulls: Option<Vec<PullRequest>>,
    /// Repository whose open pull requests are listed otherwise.
    pub repository: Option<RepositoryLocator>,
}

impl PullSource {
    /// Source backed by an explicit list.
    #[must_use]
    pub const fn from_pulls(pulls: Vec<PullRequest>) -> Self {
        Self {
            pulls: Some(pulls),
            repository: None,
        }
    }

    /// Source backed by the open pull requests of a repository.
    #[must_use]
    pub const fn from_repository(repository: RepositoryLocator) -> Self {
        Self {
            pulls: None,
            repository: Some(repository),
        }
    }

    async fn resolve<G>(self, gateway: &G) -> Result<Vec<PullRequest>, SweepError>
    where
        G: PullRequestGateway + ?Sized,
    {
        match self {
            Self {
                pulls: Some(pulls), ..
            } => Ok(pulls),
            Self {
                repository: Some(repository),
                ..
            } => {
                gateway
                    .list_pull_requests(&repository, &PullRequestQuery::open())
                    .await
            }
            Self { .. } => Err(SweepError::InvalidArgument {
                message: "a pull request list or a repository must be given".to_owned(),
            }),
        }
    }
}

async fn select<G, F>(gateway: &G, source: PullSource, keep: F) -> Result<Vec<PullRequest>, SweepError>
where
    G: PullRequestGateway + ?Sized,
    F: Fn(DateTime<Utc>) -> bool + Send,
{
    let mut pulls = source.resolve(gateway).await?;
    pulls.retain(|pull| pull.updated_at.is_some_and(&keep));
    Ok(pulls)
}

/// Pull requests updated strictly after `time`.
///
/// # Errors
///
/// Returns [`SweepError::InvalidArgument`] when the source is empty, or the
/// gateway error from listing.
pub async fn pulls_newer_than<G>(
    gateway: &G,
    time: DateTime<Utc>,
    source: PullSource,
) -> Result<Vec<PullRequest>, SweepError>
where
    G: PullRequestGateway + ?Sized,
{
    select(gateway, source, |updated| updated > time).await
}

/// Pull requests updated strictly before `time`.
///
/// # Errors
///
/// As [`pulls_newer_than`].
pub async fn pulls_older_than<G>(
    gateway: &G,
    time: DateTime<Utc>,
    source: PullSource,
) -> Result<Vec<PullRequest>, SweepError>
where
    G: PullRequestGateway + ?Sized,
{
    select(gateway, source, |updated| updated < time).await
}

/// Pull requests updated strictly between `start` and `end`.
///
/// # Errors
///
/// As [`pulls_newer_than`].
pub async fn pulls_in_range<G>(
    gateway: &G,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    source: PullSource,
) -> Result<Vec<PullRequest>, SweepError>
where
    G: PullRequestGateway + ?Sized,
{
    select(gateway, source, |updated| updated > start && updated < end).await
}
