//! Concurrent enrichment of pull requests with statuses, commits, comments
//! and full detail.
//!
//! [`EnrichmentFetcher`] lists the pull requests of a repository, applies an
//! optional [`RecencyLimit`], and then drains the retained pull requests
//! through a fixed pool of workers. Each worker pops one pull request at a
//! time from a shared queue, issues the detail calls selected by the
//! [`FetchFilter`], and appends the assembled [`EnrichedPullRequest`] to a
//! shared result collection. Neither lock is held across a network call.
//!
//! Output order depends on scheduling; sort with
//! [`crate::triage::sort_pulls`] when a stable order is needed.

mod fetcher;


use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::github::gateway::PullRequestQuery;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{CommitStatus, IssueComment, PullRequest, PullRequestCommit};

pub use fetcher::{DEFAULT_WORKERS, EnrichmentFetcher};

bitflags! {
    /// Detail kinds the fetcher retrieves for every pull request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FetchFilter: u8 {
        /// Commit statuses of the head commit.
        const STATUSES = 0b0001;
        /// Commits on the pull request.
        const COMMITS = 0b0010;
        /// Issue comments on the pull request.
        const COMMENTS = 0b0100;
        /// The single pull request resource, which carries mergeability.
        const DETAIL = 0b1000;
    }
}

impl Default for FetchFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// Timestamp on a pull request that a [`RecencyLimit`] compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampAttribute {
    /// `created_at`
    CreatedAt,
    /// `updated_at`
    UpdatedAt,
    /// `closed_at`
    ClosedAt,
    /// `merged_at`
    MergedAt,
}

impl TimestampAttribute {
    /// Reads the attribute from a pull request.
    #[must_use]
    pub const fn of(self, pull: &PullRequest) -> Option<DateTime<Utc>> {
        match self {
            Self::CreatedAt => Some(pull.created_at),
            Self::UpdatedAt => pull.updated_at,
            Self::ClosedAt => pull.closed_at,
            Self::MergedAt => pull.merged_at,
        }
    }
}

/// Bounds the working set before enrichment.
///
/// A pull request is retained only when the named timestamp is present and
/// strictly after the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyLimit {
    /// Attribute to compare.
    pub attribute: TimestampAttribute,
    /// Exclusive lower bound.
    pub cutoff: DateTime<Utc>,
}

impl RecencyLimit {
    /// Creates a limit on `attribute` after `cutoff`.
    #[must_use]
    pub const fn new(attribute: TimestampAttribute, cutoff: DateTime<Utc>) -> Self {
        Self { attribute, cutoff }
    }

    /// Returns true when `pull` falls inside the limit.
    #[must_use]
    pub fn admits(&self, pull: &PullRequest) -> bool {
        self.attribute
            .of(pull)
            .is_some_and(|timestamp| timestamp > self.cutoff)
    }

    /// Retains the pull requests inside the limit, preserving order.
    #[must_use]
    pub fn apply(&self, mut pulls: Vec<PullRequest>) -> Vec<PullRequest> {
        pulls.retain(|pull| self.admits(pull));
        pulls
    }
}

/// What the fetcher does when a detail call for one pull request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort remaining work and return the first error.
    #[default]
    FailFast,
    /// Log the failure, skip that pull request and keep going.
    BestEffort,
}

/// A pull request together with the detail collections that were requested.
///
/// `None` means the collection was not requested (or, for statuses, that
/// the pull request has no head commit); `Some(vec![])` means it was fetched
/// and is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichedPullRequest {
    /// The listed pull request.
    pub pull: PullRequest,
    /// Head commit statuses, most recent first.
    pub statuses: Option<Vec<CommitStatus>>,
    /// Commits in order.
    pub commits: Option<Vec<PullRequestCommit>>,
    /// Issue comments, oldest first.
    pub comments: Option<Vec<IssueComment>>,
    /// Full pull request resource including mergeability.
    pub detail: Option<PullRequest>,
}

impl EnrichedPullRequest {
    /// Wraps a pull request with no detail attached.
    #[must_use]
    pub fn bare(pull: PullRequest) -> Self {
        Self {
            pull,
            ..Self::default()
        }
    }

    /// Most recent comment, when comments were fetched and exist.
    #[must_use]
    pub fn last_comment(&self) -> Option<&IssueComment> {
        self.comments.as_deref().and_then(<[IssueComment]>::last)
    }
}

impl AsRef<PullRequest> for EnrichedPullRequest {
    fn as_ref(&self) -> &PullRequest {
        &self.pull
    }
}

/// Everything needed to enrich the pull requests of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRequest {
    /// Repository to list.
    pub repository: RepositoryLocator,
    /// State and sort of the listing.
    pub query: PullRequestQuery,
    /// Detail kinds to fetch per pull request.
    pub filter: FetchFilter,
    /// Optional cutoff applied before enrichment.
    pub limit: Option<RecencyLimit>,
}

impl EnrichmentRequest {
    /// Requests every detail kind for the open pull requests of
    /// `repository`.
    #[must_use]
    pub fn open(repository: RepositoryLocator) -> Self {
        Self {
            repository,
            query: PullRequestQuery::open(),
            filter: FetchFilter::all(),
            limit: None,
        }
    }

    /// Replaces the detail kinds.
    #[must_use]
    pub fn with_filter(mut self, filter: FetchFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replaces the listing query.
    #[must_use]
    pub fn with_query(mut self, query: PullRequestQuery) -> Self {
        self.query = query;
        self
    }

    /// Sets a recency limit.
    #[must_use]
    pub fn with_limit(mut self, limit: RecencyLimit) -> Self {
        self.limit = Some(limit);
        self
    }
}
