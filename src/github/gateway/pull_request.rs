//! Octocrab implementation of the pull request gateway.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;

use crate::github::error::SweepError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};
use crate::github::models::{
    ApiComment, ApiCommit, ApiPullRequest, ApiStatus, CommitStatus, IssueComment, OwnerKind,
    PullRequest, PullRequestCommit, RepositoryRef,
};

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;
use super::paging::{NoQuery, fetch_all};
use super::{PullRequestGateway, PullRequestQuery};

/// Octocrab-backed gateway implementing every GitHub trait.
pub struct OctocrabGateway {
    pub(super) client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::InvalidUrl` when the base URI cannot be parsed or
    /// `SweepError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, SweepError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[derive(Serialize)]
struct ListQuery {
    state: &'static str,
    sort: &'static str,
    direction: &'static str,
}

impl From<&PullRequestQuery> for ListQuery {
    fn from(query: &PullRequestQuery) -> Self {
        Self {
            state: query.state.as_str(),
            sort: query.sort.as_str(),
            direction: "desc",
        }
    }
}

/// GitHub omits the base repository for pull requests from deleted forks;
/// the locator the listing was made against is authoritative then.
fn with_repository(mut pull: PullRequest, repository: &RepositoryLocator) -> PullRequest {
    if pull.repository.name.is_empty() {
        pull.repository = RepositoryRef {
            owner: repository.owner().as_str().to_owned(),
            owner_kind: OwnerKind::default(),
            name: repository.repository().as_str().to_owned(),
        };
    }
    pull
}

#[async_trait]
impl PullRequestGateway for OctocrabGateway {
    async fn list_pull_requests(
        &self,
        repository: &RepositoryLocator,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>, SweepError> {
        let pulls: Vec<ApiPullRequest> = fetch_all(
            &self.client,
            "list pull requests",
            &repository.pulls_path(),
            &ListQuery::from(query),
        )
        .await?;
        Ok(pulls
            .into_iter()
            .map(|pull| with_repository(pull.into(), repository))
            .collect())
    }

    async fn pull_request(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<PullRequest, SweepError> {
        self.client
            .get::<ApiPullRequest, _, _>(repository.pull_request_path(number), None::<&()>)
            .await
            .map(|pull| with_repository(pull.into(), repository))
            .map_err(|error| map_octocrab_error("pull request", &error))
    }

    async fn pull_request_commits(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<PullRequestCommit>, SweepError> {
        let route = format!("{}/commits", repository.pull_request_path(number));
        let commits: Vec<ApiCommit> =
            fetch_all(&self.client, "pull request commits", &route, &NoQuery {}).await?;
        Ok(commits.into_iter().map(ApiCommit::into).collect())
    }

    async fn issue_comments(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<IssueComment>, SweepError> {
        let route = format!("{}/comments", repository.issue_path(number));
        let comments: Vec<ApiComment> =
            fetch_all(&self.client, "issue comments", &route, &NoQuery {}).await?;
        Ok(comments.into_iter().map(ApiComment::into).collect())
    }

    async fn commit_statuses(
        &self,
        repository: &RepositoryLocator,
        sha: &str,
    ) -> Result<Vec<CommitStatus>, SweepError> {
        let route = format!("{}/commits/{sha}/statuses", repository.repo_path());
        let statuses: Vec<ApiStatus> =
            fetch_all(&self.client, "commit statuses", &route, &NoQuery {}).await?;
        Ok(statuses.into_iter().map(ApiStatus::into).collect())
    }
}
