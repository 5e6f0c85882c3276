//! Octocrab implementation of account and repository lookups.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

use crate::github::error::SweepError;
use crate::github::locator::{RepositoryLocator, RepositoryOwner};
use crate::github::models::{
    ApiCommit, ApiMember, ApiRepositorySummary, ApiTag, ApiUser, CommitSummary, Tag,
};

use super::error_mapping::map_octocrab_error;
use super::paging::{NoQuery, fetch_all};
use super::{OctocrabGateway, RepositoryGateway};

#[derive(Serialize)]
struct SinceQuery {
    since: String,
}

#[async_trait]
impl RepositoryGateway for OctocrabGateway {
    async fn authenticated_login(&self) -> Result<String, SweepError> {
        let user = self
            .client
            .get::<ApiUser, _, _>("/user", None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("authenticated user", &error))?;
        user.login.ok_or_else(|| SweepError::Authentication {
            message: "authenticated user has no login".to_owned(),
        })
    }

    async fn repository_names(&self, owner: &RepositoryOwner) -> Result<Vec<String>, SweepError> {
        let org_route = format!("/orgs/{owner}/repos");
        let listing: Result<Vec<ApiRepositorySummary>, SweepError> =
            fetch_all(&self.client, "organisation repositories", &org_route, &NoQuery {}).await;
        let repositories = match listing {
            Ok(repositories) => repositories,
            Err(error) if error.is_not_found() => {
                debug!(%owner, "owner is not an organisation; listing user repositories");
                let user_route = format!("/users/{owner}/repos");
                fetch_all(&self.client, "user repositories", &user_route, &NoQuery {}).await?
            }
            Err(error) => return Err(error),
        };
        Ok(repositories.into_iter().map(|repo| repo.name).collect())
    }

    async fn organization_members(&self, organization: &str) -> Result<Vec<String>, SweepError> {
        let route = format!("/orgs/{organization}/members");
        let members: Vec<ApiMember> =
            fetch_all(&self.client, "organisation members", &route, &NoQuery {}).await?;
        Ok(members.into_iter().map(|member| member.login).collect())
    }

    async fn tags(&self, repository: &RepositoryLocator) -> Result<Vec<Tag>, SweepError> {
        let route = format!("{}/tags", repository.repo_path());
        let tags: Vec<ApiTag> = fetch_all(&self.client, "tags", &route, &NoQuery {}).await?;
        Ok(tags.into_iter().map(ApiTag::into).collect())
    }

    async fn commit(
        &self,
        repository: &RepositoryLocator,
        sha: &str,
    ) -> Result<CommitSummary, SweepError> {
        let route = format!("{}/commits/{sha}", repository.repo_path());
        self.client
            .get::<ApiCommit, _, _>(route, None::<&()>)
            .await
            .map(ApiCommit::into)
            .map_err(|error| map_octocrab_error("commit", &error))
    }

    async fn commits_since(
        &self,
        repository: &RepositoryLocator,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitSummary>, SweepError> {
        let route = format!("{}/commits", repository.repo_path());
        let query = SinceQuery {
            since: since.to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        let commits: Vec<ApiCommit> =
            fetch_all(&self.client, "commits since", &route, &query).await?;
        Ok(commits.into_iter().map(ApiCommit::into).collect())
    }
}
