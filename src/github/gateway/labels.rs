//! Octocrab implementation of repository and issue label management.

use async_trait::async_trait;
use http::Uri;
use serde::Serialize;

use crate::github::error::SweepError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::Label;

use super::error_mapping::{map_http_error, map_octocrab_error};
use super::paging::{NoQuery, fetch_all};
use super::{IssueGateway, LabelGateway, OctocrabGateway};

#[derive(Serialize)]
struct ColourUpdate<'a> {
    color: &'a str,
}

#[derive(Serialize)]
struct IssueLabels<'a> {
    labels: [&'a str; 1],
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

fn label_path(repository: &RepositoryLocator, name: &str) -> String {
    format!(
        "{}/labels/{}",
        repository.repo_path(),
        urlencoding::encode(name)
    )
}

impl OctocrabGateway {
    async fn post_json<B: Serialize + Sync>(
        &self,
        operation: &str,
        route: String,
        body: &B,
    ) -> Result<(), SweepError> {
        let _created: serde_json::Value = self
            .client
            .post(route, Some(body))
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;
        Ok(())
    }

    /// Sends a DELETE and accepts any success status; GitHub answers these
    /// with an empty 204 or a JSON listing depending on the endpoint.
    async fn delete_route(&self, operation: &str, route: &str) -> Result<(), SweepError> {
        let uri: Uri = route
            .parse::<Uri>()
            .map_err(|error| SweepError::InvalidUrl(format!("{route}: {error}")))?;
        let response = self
            .client
            ._delete(uri, None::<&()>)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = self
            .client
            .body_to_string(response)
            .await
            .unwrap_or_else(|_| String::new());
        Err(map_http_error(operation, status, &body))
    }
}

#[async_trait]
impl LabelGateway for OctocrabGateway {
    async fn labels(&self, repository: &RepositoryLocator) -> Result<Vec<Label>, SweepError> {
        let route = format!("{}/labels", repository.repo_path());
        fetch_all(&self.client, "labels", &route, &NoQuery {}).await
    }

    async fn add_label(
        &self,
        repository: &RepositoryLocator,
        label: &Label,
    ) -> Result<(), SweepError> {
        let route = format!("{}/labels", repository.repo_path());
        self.post_json("add label", route, label).await
    }

    async fn update_label(
        &self,
        repository: &RepositoryLocator,
        label: &Label,
    ) -> Result<(), SweepError> {
        let body = ColourUpdate {
            color: &label.color,
        };
        let _updated: serde_json::Value = self
            .client
            .patch(label_path(repository, &label.name), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("update label", &error))?;
        Ok(())
    }

    async fn delete_label(
        &self,
        repository: &RepositoryLocator,
        name: &str,
    ) -> Result<(), SweepError> {
        self.delete_route("delete label", &label_path(repository, name))
            .await
    }
}

#[async_trait]
impl IssueGateway for OctocrabGateway {
    async fn issue_labels(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<Label>, SweepError> {
        let route = format!("{}/labels", repository.issue_path(number));
        fetch_all(&self.client, "issue labels", &route, &NoQuery {}).await
    }

    async fn add_issue_label(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        name: &str,
    ) -> Result<(), SweepError> {
        let route = format!("{}/labels", repository.issue_path(number));
        self.post_json("add issue label", route, &IssueLabels { labels: [name] })
            .await
    }

    async fn remove_issue_label(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        name: &str,
    ) -> Result<(), SweepError> {
        let route = format!(
            "{}/labels/{}",
            repository.issue_path(number),
            urlencoding::encode(name)
        );
        match self.delete_route("remove issue label", &route).await {
            Err(error) if error.is_not_found() => Ok(()),
            other => other,
        }
    }

    async fn add_issue_comment(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        body: &str,
    ) -> Result<(), SweepError> {
        let route = format!("{}/comments", repository.issue_path(number));
        self.post_json("add issue comment", route, &CommentBody { body })
            .await
    }
}
