//! Test helpers for constructing pull request fixtures.
//!
//! # Examples
//!
//! ```
//! use prsweep::github::models::test_support::{comment_by, open_pull};
//!
//! let pull = open_pull("acme", "widgets", 3);
//! assert_eq!(pull.repository.full_name(), "acme/widgets");
//!
//! let comment = comment_by(1, "alice", "LGTM");
//! assert_eq!(comment.author.as_deref(), Some("alice"));
//! ```

use chrono::{DateTime, TimeZone, Utc};

use super::{
    CommitStatus, IssueComment, OwnerKind, PullRequest, PullRequestCommit, PullRequestState,
    RepositoryRef, StatusState,
};

/// Fixed instant used as the creation time of fixture pull requests.
#[must_use]
pub fn fixture_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Constructs an open pull request in an organisation-owned repository.
///
/// The head SHA is derived from the number so that status lookups can be
/// told apart.
#[must_use]
pub fn open_pull(owner: &str, repo: &str, number: u64) -> PullRequest {
    PullRequest {
        number,
        repository: RepositoryRef {
            owner: owner.to_owned(),
            owner_kind: OwnerKind::Organization,
            name: repo.to_owned(),
        },
        title: Some(format!("Pull request {number}")),
        html_url: Some(format!("https://github.com/{owner}/{repo}/pull/{number}")),
        author: Some("contributor".to_owned()),
        state: PullRequestState::Open,
        created_at: fixture_epoch(),
        updated_at: Some(fixture_epoch()),
        head_sha: Some(format!("sha-{number}")),
        ..Default::default()
    }
}

/// Constructs a pull request owned by a personal account.
#[must_use]
pub fn user_owned_pull(owner: &str, repo: &str, number: u64) -> PullRequest {
    let mut pull = open_pull(owner, repo, number);
    pull.repository.owner_kind = OwnerKind::User;
    pull
}

/// Constructs a closed pull request with the given close time.
#[must_use]
pub fn closed_pull(owner: &str, repo: &str, number: u64, closed_at: DateTime<Utc>) -> PullRequest {
    PullRequest {
        state: PullRequestState::Closed,
        closed_at: Some(closed_at),
        updated_at: Some(closed_at),
        ..open_pull(owner, repo, number)
    }
}

/// Constructs an issue comment with author and body.
#[must_use]
pub fn comment_by(id: u64, author: &str, body: &str) -> IssueComment {
    IssueComment {
        id,
        body: Some(body.to_owned()),
        author: Some(author.to_owned()),
        created_at: Some(fixture_epoch()),
        updated_at: Some(fixture_epoch()),
    }
}

/// Constructs a commit with only a SHA.
#[must_use]
pub fn commit_with_sha(sha: &str) -> PullRequestCommit {
    PullRequestCommit {
        sha: sha.to_owned(),
        author: None,
        message: None,
        authored_at: None,
    }
}

/// Constructs a commit status in the given state.
#[must_use]
pub const fn status_of(state: StatusState) -> CommitStatus {
    CommitStatus {
        state,
        context: None,
        created_at: None,
    }
}
