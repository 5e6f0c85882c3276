//! Data models for pull requests and the records attached to them.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into the public domain types. Every domain record is an immutable
//! snapshot of what GitHub returned for one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "test-support")]
pub mod test_support;

/// Kind of account owning a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum OwnerKind {
    /// A personal account.
    User,
    /// An organisation with its own member list.
    #[default]
    Organization,
}

impl OwnerKind {
    fn from_api(kind: Option<&str>) -> Self {
        match kind {
            Some("User" | "Bot") => Self::User,
            _ => Self::Organization,
        }
    }
}

/// Base repository a pull request targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryRef {
    /// Login of the owning account.
    pub owner: String,
    /// Whether the owner is a user or an organisation.
    pub owner_kind: OwnerKind,
    /// Repository name without the owner prefix.
    pub name: String,
}

impl RepositoryRef {
    /// Returns `owner/name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// Accepting review and changes.
    #[default]
    Open,
    /// Closed, possibly merged.
    Closed,
}

/// Pull request snapshot as listed or fetched from GitHub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    /// Pull request number, unique within the repository.
    pub number: u64,
    /// Base repository the pull request targets.
    pub repository: RepositoryRef,
    /// Title of the pull request.
    pub title: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
    /// Author login if present.
    pub author: Option<String>,
    /// Open or closed.
    pub state: PullRequestState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Close timestamp, set for closed pull requests.
    pub closed_at: Option<DateTime<Utc>>,
    /// Merge timestamp, set only when the pull request was merged.
    pub merged_at: Option<DateTime<Utc>>,
    /// SHA of the head commit.
    pub head_sha: Option<String>,
    /// Mergeability; `None` until GitHub has computed it.
    ///
    /// Listing endpoints never populate this, only the single pull request
    /// endpoint does.
    pub mergeable: Option<bool>,
}

impl PullRequest {
    /// Returns true when the pull request has been merged.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }
}

impl AsRef<Self> for PullRequest {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Outcome recorded by a commit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    /// Checks passed.
    Success,
    /// Checks are still running.
    Pending,
    /// Checks failed.
    Failure,
    /// Checks could not run.
    Error,
    /// Any state this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// A commit status entry. GitHub lists these most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitStatus {
    /// Reported state.
    pub state: StatusState,
    /// Name of the reporting check.
    pub context: Option<String>,
    /// When the status was created.
    pub created_at: Option<DateTime<Utc>>,
}

/// A commit belonging to a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestCommit {
    /// Commit SHA.
    pub sha: String,
    /// GitHub login of the author, when linked to an account.
    pub author: Option<String>,
    /// Commit message.
    pub message: Option<String>,
    /// Author date.
    pub authored_at: Option<DateTime<Utc>>,
}

/// Pull request issue comment (general discussion, not a review comment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueComment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body.
    pub body: Option<String>,
    /// Author login.
    pub author: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last edit timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Repository label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Hex colour without the leading `#`.
    pub color: String,
}

/// Repository tag and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// Tag name, e.g. `v1.2.3`.
    pub name: String,
    /// SHA of the tagged commit.
    pub commit_sha: String,
}

/// Commit lookup result used by release checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    /// Commit SHA.
    pub sha: String,
    /// Author date.
    pub authored_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiOwner {
    pub(crate) login: String,
    #[serde(rename = "type")]
    pub(crate) kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) name: String,
    pub(crate) owner: Option<ApiOwner>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranch {
    pub(crate) sha: Option<String>,
    pub(crate) repo: Option<ApiRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) html_url: Option<String>,
    pub(crate) user: Option<ApiUser>,
    #[serde(default)]
    pub(crate) state: PullRequestState,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
    pub(crate) closed_at: Option<DateTime<Utc>>,
    pub(crate) merged_at: Option<DateTime<Utc>>,
    pub(crate) head: Option<ApiBranch>,
    pub(crate) base: Option<ApiBranch>,
    pub(crate) mergeable: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiStatus {
    pub(crate) state: StatusState,
    pub(crate) context: Option<String>,
    pub(crate) created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitActor {
    pub(crate) date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitCommit {
    pub(crate) author: Option<ApiGitActor>,
    pub(crate) message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommit {
    pub(crate) sha: String,
    pub(crate) commit: ApiGitCommit,
    pub(crate) author: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiComment {
    pub(crate) id: u64,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) created_at: Option<DateTime<Utc>>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTagCommit {
    pub(crate) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTag {
    pub(crate) name: String,
    pub(crate) commit: ApiTagCommit,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepositorySummary {
    pub(crate) name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMember {
    pub(crate) login: String,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        let base_repo = value.base.and_then(|base| base.repo);
        let repository = base_repo.map_or_else(RepositoryRef::default, |repo| {
            let (owner, owner_kind) = repo.owner.map_or_else(
                || (String::new(), OwnerKind::default()),
                |owner| {
                    let kind = OwnerKind::from_api(owner.kind.as_deref());
                    (owner.login, kind)
                },
            );
            RepositoryRef {
                owner,
                owner_kind,
                name: repo.name,
            }
        });

        Self {
            number: value.number,
            repository,
            title: value.title,
            html_url: value.html_url,
            author: value.user.and_then(|user| user.login),
            state: value.state,
            created_at: value.created_at,
            updated_at: value.updated_at,
            closed_at: value.closed_at,
            merged_at: value.merged_at,
            head_sha: value.head.and_then(|head| head.sha),
            mergeable: value.mergeable,
        }
    }
}

impl From<ApiStatus> for CommitStatus {
    fn from(value: ApiStatus) -> Self {
        Self {
            state: value.state,
            context: value.context,
            created_at: value.created_at,
        }
    }
}

impl From<ApiCommit> for PullRequestCommit {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            author: value.author.and_then(|author| author.login),
            message: value.commit.message,
            authored_at: value.commit.author.and_then(|author| author.date),
        }
    }
}

impl From<ApiCommit> for CommitSummary {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            authored_at: value.commit.author.and_then(|author| author.date),
        }
    }
}

impl From<ApiComment> for IssueComment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            body: value.body,
            author: value.user.and_then(|user| user.login),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<ApiTag> for Tag {
    fn from(value: ApiTag) -> Self {
        Self {
            name: value.name,
            commit_sha: value.commit.sha,
        }
    }
}
