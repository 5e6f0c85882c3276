//! Worker pool that drains a shared queue of pull requests.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::github::error::SweepError;
use crate::github::gateway::PullRequestGateway;
use crate::github::locator::RepositoryLocator;
use crate::github::models::PullRequest;

use super::{EnrichedPullRequest, EnrichmentRequest, FailurePolicy, FetchFilter};

/// Pool size used unless overridden.
pub const DEFAULT_WORKERS: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(workers) => workers,
    None => NonZeroUsize::MIN,
};

type Queue = Mutex<Vec<PullRequest>>;
type Results = Mutex<Vec<EnrichedPullRequest>>;

/// Fans detail calls for many pull requests out over a fixed worker pool.
///
/// The gateway is shared by every worker, so it must be `Send + Sync` and
/// owned for `'static`.
pub struct EnrichmentFetcher<G: ?Sized> {
    gateway: Arc<G>,
    workers: NonZeroUsize,
    policy: FailurePolicy,
}

impl<G> EnrichmentFetcher<G>
where
    G: PullRequestGateway + ?Sized + 'static,
{
    /// Creates a fetcher with [`DEFAULT_WORKERS`] workers that fails fast.
    #[must_use]
    pub const fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            workers: DEFAULT_WORKERS,
            policy: FailurePolicy::FailFast,
        }
    }

    /// Sets the pool size.
    #[must_use]
    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Borrows the shared gateway.
    #[must_use]
    pub const fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Lists the repository's pull requests, applies the recency limit and
    /// enriches what remains.
    ///
    /// # Errors
    ///
    /// Returns the listing error, or under [`FailurePolicy::FailFast`] the
    /// first detail error any worker hits. A worker that panics yields
    /// [`SweepError::Worker`] regardless of policy.
    pub async fn fetch(
        &self,
        request: &EnrichmentRequest,
    ) -> Result<Vec<EnrichedPullRequest>, SweepError> {
        let listed = self
            .gateway
            .list_pull_requests(&request.repository, &request.query)
            .await?;
        let listed_count = listed.len();
        let retained = match request.limit {
            Some(limit) => limit.apply(listed),
            None => listed,
        };
        debug!(
            repository = %request.repository,
            listed = listed_count,
            retained = retained.len(),
            "listed pull requests for enrichment"
        );
        self.enrich(&request.repository, retained, request.filter)
            .await
    }

    /// Enriches an already listed set of pull requests.
    ///
    /// Every input appears exactly once in the output unless it was skipped
    /// under [`FailurePolicy::BestEffort`]. Output order is unspecified.
    ///
    /// # Errors
    ///
    /// See [`EnrichmentFetcher::fetch`].
    pub async fn enrich(
        &self,
        repository: &RepositoryLocator,
        pulls: Vec<PullRequest>,
        filter: FetchFilter,
    ) -> Result<Vec<EnrichedPullRequest>, SweepError> {
        let started = Instant::now();
        let total = pulls.len();
        let queue: Arc<Queue> = Arc::new(Mutex::new(pulls));
        let results: Arc<Results> = Arc::new(Mutex::new(Vec::with_capacity(total)));

        let mut workers = JoinSet::new();
        for worker in 0..self.workers.get() {
            let gateway = Arc::clone(&self.gateway);
            let queue = Arc::clone(&queue);
            let results = Arc::clone(&results);
            let repository = repository.clone();
            let policy = self.policy;
            workers.spawn(async move {
                drain(
                    worker,
                    &*gateway,
                    &repository,
                    filter,
                    policy,
                    &queue,
                    &results,
                )
                .await
            });
        }

        while let Some(joined) = workers.join_next().await {
            let outcome = joined.map_err(|error| SweepError::Worker {
                message: error.to_string(),
            });
            if let Err(error) = outcome.and_then(|drained| drained) {
                workers.abort_all();
                return Err(error);
            }
        }

        let enriched = std::mem::take(&mut *lock(&results));
        info!(
            %repository,
            requested = total,
            enriched = enriched.len(),
            workers = self.workers.get(),
            elapsed = ?started.elapsed(),
            "enriched pull requests"
        );
        Ok(enriched)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn pop(queue: &Queue) -> Option<PullRequest> {
    lock(queue).pop()
}

fn push(results: &Results, enriched: EnrichedPullRequest) {
    lock(results).push(enriched);
}

async fn drain<G>(
    worker: usize,
    gateway: &G,
    repository: &RepositoryLocator,
    filter: FetchFilter,
    policy: FailurePolicy,
    queue: &Queue,
    results: &Results,
) -> Result<(), SweepError>
where
    G: PullRequestGateway + ?Sized,
{
    let mut handled = 0_usize;
    while let Some(pull) = pop(queue) {
        let number = pull.number;
        match enrich_one(gateway, repository, pull, filter).await {
            Ok(enriched) => {
                push(results, enriched);
                handled += 1;
            }
            Err(error) => match policy {
                FailurePolicy::FailFast => return Err(error),
                FailurePolicy::BestEffort => {
                    warn!(%repository, number, %error, "skipping pull request");
                }
            },
        }
    }
    debug!(%repository, worker, handled, "worker drained queue");
    Ok(())
}

async fn enrich_one<G>(
    gateway: &G,
    repository: &RepositoryLocator,
    pull: PullRequest,
    filter: FetchFilter,
) -> Result<EnrichedPullRequest, SweepError>
where
    G: PullRequestGateway + ?Sized,
{
    let number = pull.number;
    let statuses = match pull.head_sha.as_deref() {
        Some(sha) if filter.contains(FetchFilter::STATUSES) => {
            Some(gateway.commit_statuses(repository, sha).await?)
        }
        _ => None,
    };
    let commits = if filter.contains(FetchFilter::COMMITS) {
        Some(gateway.pull_request_commits(repository, number).await?)
    } else {
        None
    };
    let comments = if filter.contains(FetchFilter::COMMENTS) {
        Some(gateway.issue_comments(repository, number).await?)
    } else {
        None
    };
    let detail = if filter.contains(FetchFilter::DETAIL) {
        Some(gateway.pull_request(repository, number).await?)
    } else {
        None
    };

    Ok(EnrichedPullRequest {
        pull,
        statuses,
        commits,
        comments,
        detail,
    })
}
