//! Per-run memo for pull request listings.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::github::error::SweepError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{CommitStatus, IssueComment, PullRequest, PullRequestCommit};

use super::{PullRequestGateway, PullRequestQuery};

type ListingKey = (RepositoryLocator, PullRequestQuery);

/// Wraps a gateway so that identical listing calls within one run hit the
/// remote API once.
///
/// The memo lives as long as the wrapper; nothing is persisted. The lock is
/// held while a missing entry is fetched so concurrent callers asking for the
/// same listing wait for the first result instead of issuing a duplicate.
/// Per-pull-request lookups are forwarded unchanged.
pub struct MemoizingGateway<G> {
    inner: G,
    listings: Mutex<HashMap<ListingKey, Vec<PullRequest>>>,
}

impl<G> MemoizingGateway<G> {
    /// Wraps `inner` with an empty memo.
    #[must_use]
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            listings: Mutex::new(HashMap::new()),
        }
    }

    /// Borrows the wrapped gateway for calls that are not memoised.
    #[must_use]
    pub const fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: PullRequestGateway> PullRequestGateway for MemoizingGateway<G> {
    async fn list_pull_requests(
        &self,
        repository: &RepositoryLocator,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>, SweepError> {
        let key = (repository.clone(), *query);
        let mut listings = self.listings.lock().await;
        if let Some(cached) = listings.get(&key) {
            debug!(%repository, ?query, "reusing memoised pull request listing");
            return Ok(cached.clone());
        }
        let pulls = self.inner.list_pull_requests(repository, query).await?;
        listings.insert(key, pulls.clone());
        Ok(pulls)
    }

    async fn pull_request(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<PullRequest, SweepError> {
        self.inner.pull_request(repository, number).await
    }

    async fn pull_request_commits(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<PullRequestCommit>, SweepError> {
        self.inner.pull_request_commits(repository, number).await
    }

    async fn issue_comments(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<IssueComment>, SweepError> {
        self.inner.issue_comments(repository, number).await
    }

    async fn commit_statuses(
        &self,
        repository: &RepositoryLocator,
        sha: &str,
    ) -> Result<Vec<CommitStatus>, SweepError> {
        self.inner.commit_statuses(repository, sha).await
    }
}
