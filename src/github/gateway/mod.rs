//! Gateways for talking to the GitHub REST API through Octocrab.
//!
//! The traits split the remote surface by concern so that each consumer can
//! be tested against a mock of only the calls it makes. [`OctocrabGateway`]
//! implements all of them and exhausts pagination before returning, so every
//! listing call yields the complete result set rather than a single page.

mod client;
mod error_mapping;
mod labels;
mod memo;
mod paging;
mod pull_request;
mod repository;


pub use memo::MemoizingGateway;
pub use pull_request::OctocrabGateway;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::github::error::SweepError;
use crate::github::locator::{RepositoryLocator, RepositoryOwner};
use crate::github::models::{
    CommitStatus, CommitSummary, IssueComment, Label, PullRequest, PullRequestCommit, Tag,
};

/// Pull request state filter for listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StateFilter {
    /// Only open pull requests.
    #[default]
    Open,
    /// Only closed pull requests.
    Closed,
    /// All pull requests regardless of state.
    All,
}

impl StateFilter {
    /// Returns the API parameter value for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// Sort key accepted by the pull request listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    /// Creation time.
    Created,
    /// Last update time.
    #[default]
    Updated,
    /// Number of comments.
    Popularity,
    /// Age filtered by activity.
    LongRunning,
}

impl SortField {
    /// Returns the API parameter value for this sort key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Popularity => "popularity",
            Self::LongRunning => "long-running",
        }
    }
}

/// Query options for listing pull requests.
///
/// The value is hashable so that it can key the per-run listing memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PullRequestQuery {
    /// Which states to include. Defaults to open.
    pub state: StateFilter,
    /// Sort order. Defaults to most recently updated.
    pub sort: SortField,
}

impl PullRequestQuery {
    /// Open pull requests, most recently updated first.
    #[must_use]
    pub const fn open() -> Self {
        Self {
            state: StateFilter::Open,
            sort: SortField::Updated,
        }
    }

    /// Closed pull requests, most recently updated first.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            state: StateFilter::Closed,
            sort: SortField::Updated,
        }
    }
}

/// Gateway for pull request listing and per-pull-request detail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// List every pull request matching the query.
    async fn list_pull_requests(
        &self,
        repository: &RepositoryLocator,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>, SweepError>;

    /// Fetch a single pull request, including its mergeability.
    async fn pull_request(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<PullRequest, SweepError>;

    /// Fetch the commits of a pull request in order.
    async fn pull_request_commits(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<PullRequestCommit>, SweepError>;

    /// Fetch all issue comments for the pull request, oldest first.
    async fn issue_comments(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<IssueComment>, SweepError>;

    /// Fetch the statuses reported for a commit, most recent first.
    async fn commit_statuses(
        &self,
        repository: &RepositoryLocator,
        sha: &str,
    ) -> Result<Vec<CommitStatus>, SweepError>;
}

/// Gateway for account- and repository-level lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Login of the account the token belongs to.
    async fn authenticated_login(&self) -> Result<String, SweepError>;

    /// Names of every repository owned by the account.
    async fn repository_names(&self, owner: &RepositoryOwner) -> Result<Vec<String>, SweepError>;

    /// Logins of every member of an organisation.
    async fn organization_members(&self, organization: &str) -> Result<Vec<String>, SweepError>;

    /// Tags of a repository in the order GitHub returns them.
    async fn tags(&self, repository: &RepositoryLocator) -> Result<Vec<Tag>, SweepError>;

    /// Look up a single commit.
    async fn commit(
        &self,
        repository: &RepositoryLocator,
        sha: &str,
    ) -> Result<CommitSummary, SweepError>;

    /// Commits on the default branch since the given instant.
    async fn commits_since(
        &self,
        repository: &RepositoryLocator,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitSummary>, SweepError>;
}

/// Gateway for repository label management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelGateway: Send + Sync {
    /// Every label defined on the repository.
    async fn labels(&self, repository: &RepositoryLocator) -> Result<Vec<Label>, SweepError>;

    /// Create a label with the given name and colour.
    async fn add_label(&self, repository: &RepositoryLocator, label: &Label)
    -> Result<(), SweepError>;

    /// Change the colour of an existing label.
    async fn update_label(
        &self,
        repository: &RepositoryLocator,
        label: &Label,
    ) -> Result<(), SweepError>;

    /// Delete a label by name.
    async fn delete_label(&self, repository: &RepositoryLocator, name: &str)
    -> Result<(), SweepError>;
}

/// Gateway for labels and comments on individual issues and pull requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueGateway: Send + Sync {
    /// Labels currently applied to the issue.
    async fn issue_labels(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<Label>, SweepError>;

    /// Apply an existing repository label to the issue.
    async fn add_issue_label(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        name: &str,
    ) -> Result<(), SweepError>;

    /// Remove a label from the issue.
    async fn remove_issue_label(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        name: &str,
    ) -> Result<(), SweepError>;

    /// Post a discussion comment on the issue.
    async fn add_issue_comment(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        body: &str,
    ) -> Result<(), SweepError>;
}
