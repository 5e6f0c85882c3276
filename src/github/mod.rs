//! GitHub access: identity types, domain models and the gateways.
//!
//! The gateways wrap Octocrab, exhaust pagination and map failures into
//! [`SweepError`] so that callers never see Octocrab internals. Listing
//! helpers layer repository selection and tag ordering on top.

pub mod error;
pub mod gateway;
pub mod listing;
pub mod locator;
pub mod models;

pub use error::SweepError;
pub use gateway::{
    IssueGateway, LabelGateway, MemoizingGateway, OctocrabGateway, PullRequestGateway,
    PullRequestQuery, RepositoryGateway, SortField, StateFilter,
};
pub use listing::{compile_pattern, fetch_tags, list_repositories, sort_tags};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{
    CommitStatus, CommitSummary, IssueComment, Label, OwnerKind, PullRequest, PullRequestCommit,
    PullRequestState, RepositoryRef, StatusState, Tag,
};

#[cfg(test)]
pub use gateway::{
    MockIssueGateway, MockLabelGateway, MockPullRequestGateway, MockRepositoryGateway,
};
