//! Shared test utilities for CLI tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use prsweep::github::{
    CommitStatus, CommitSummary, IssueComment, IssueGateway, Label, LabelGateway,
    PullRequestCommit, PullRequestGateway, PullRequestQuery, PullRequestState, RepositoryGateway,
    RepositoryOwner, StateFilter, Tag,
};
use prsweep::{PullRequest, RepositoryLocator, SweepError};

/// In-memory GitHub that serves fixed data and records writes.
///
/// Clones share the mutable label and write state, so a test can keep one
/// handle while the run consumes another.
#[derive(Debug, Default, Clone)]
pub struct FakeGitHub {
    /// Repository names returned for any owner.
    pub repositories: Vec<String>,
    /// Organisation member logins.
    pub members: Vec<String>,
    /// Pull requests of every repository.
    pub pulls: Vec<PullRequest>,
    /// Issue comments by pull request number.
    pub comments: HashMap<u64, Vec<IssueComment>>,
    /// Commits by pull request number.
    pub commits: HashMap<u64, Vec<PullRequestCommit>>,
    /// Tags of every repository.
    pub tags: Vec<Tag>,
    /// Author date of tagged commits by SHA.
    pub commit_dates: HashMap<String, DateTime<Utc>>,
    /// Number of commits reported since any instant.
    pub commits_since: usize,
    /// Full names of repositories whose pull request listing fails.
    pub failing: Vec<String>,
    /// Repository labels, updated by label writes.
    pub labels: Arc<Mutex<Vec<Label>>>,
    /// Label names by issue number, updated by issue label writes.
    pub issue_labels: Arc<Mutex<HashMap<u64, Vec<String>>>>,
    /// Description of every write, in order.
    pub writes: Arc<Mutex<Vec<String>>>,
}

impl FakeGitHub {
    /// Current repository labels.
    pub fn current_labels(&self) -> Vec<Label> {
        self.labels
            .lock()
            .expect("labels mutex should be available")
            .clone()
    }

    /// Writes recorded so far.
    pub fn recorded_writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .expect("writes mutex should be available")
            .clone()
    }

    fn record(&self, write: String) {
        self.writes
            .lock()
            .expect("writes mutex should be available")
            .push(write);
    }

    fn in_repository<'a>(
        &'a self,
        repository: &'a RepositoryLocator,
    ) -> impl Iterator<Item = &'a PullRequest> {
        let full_name = repository.to_string();
        self.pulls
            .iter()
            .filter(move |pull| pull.repository.full_name() == full_name)
    }
}

#[async_trait]
impl PullRequestGateway for FakeGitHub {
    async fn list_pull_requests(
        &self,
        repository: &RepositoryLocator,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>, SweepError> {
        if self.failing.contains(&repository.to_string()) {
            return Err(SweepError::Network {
                message: "connection reset".to_owned(),
            });
        }
        Ok(self
            .in_repository(repository)
            .filter(|pull| match query.state {
                StateFilter::Open => pull.state == PullRequestState::Open,
                StateFilter::Closed => pull.state == PullRequestState::Closed,
                StateFilter::All => true,
            })
            .cloned()
            .collect())
    }

    async fn pull_request(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<PullRequest, SweepError> {
        self.in_repository(repository)
            .find(|pull| pull.number == number)
            .cloned()
            .ok_or_else(|| SweepError::NotFound {
                message: format!("pull request {number}"),
            })
    }

    async fn pull_request_commits(
        &self,
        _repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<PullRequestCommit>, SweepError> {
        Ok(self.commits.get(&number).cloned().unwrap_or_default())
    }

    async fn issue_comments(
        &self,
        _repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<IssueComment>, SweepError> {
        Ok(self.comments.get(&number).cloned().unwrap_or_default())
    }

    async fn commit_statuses(
        &self,
        _repository: &RepositoryLocator,
        _sha: &str,
    ) -> Result<Vec<CommitStatus>, SweepError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl RepositoryGateway for FakeGitHub {
    async fn authenticated_login(&self) -> Result<String, SweepError> {
        Ok("octocat".to_owned())
    }

    async fn repository_names(&self, _owner: &RepositoryOwner) -> Result<Vec<String>, SweepError> {
        Ok(self.repositories.clone())
    }

    async fn organization_members(&self, _organization: &str) -> Result<Vec<String>, SweepError> {
        Ok(self.members.clone())
    }

    async fn tags(&self, _repository: &RepositoryLocator) -> Result<Vec<Tag>, SweepError> {
        Ok(self.tags.clone())
    }

    async fn commit(
        &self,
        _repository: &RepositoryLocator,
        sha: &str,
    ) -> Result<CommitSummary, SweepError> {
        Ok(CommitSummary {
            sha: sha.to_owned(),
            authored_at: self.commit_dates.get(sha).copied(),
        })
    }

    async fn commits_since(
        &self,
        _repository: &RepositoryLocator,
        _since: DateTime<Utc>,
    ) -> Result<Vec<CommitSummary>, SweepError> {
        Ok((0..self.commits_since)
            .map(|index| CommitSummary {
                sha: format!("since-{index}"),
                authored_at: None,
            })
            .collect())
    }
}

#[async_trait]
impl LabelGateway for FakeGitHub {
    async fn labels(&self, _repository: &RepositoryLocator) -> Result<Vec<Label>, SweepError> {
        Ok(self
            .labels
            .lock()
            .expect("labels mutex should be available")
            .clone())
    }

    async fn add_label(
        &self,
        repository: &RepositoryLocator,
        label: &Label,
    ) -> Result<(), SweepError> {
        self.labels
            .lock()
            .expect("labels mutex should be available")
            .push(label.clone());
        self.record(format!("{repository}: add label {}", label.name));
        Ok(())
    }

    async fn update_label(
        &self,
        repository: &RepositoryLocator,
        label: &Label,
    ) -> Result<(), SweepError> {
        let mut labels = self.labels.lock().expect("labels mutex should be available");
        for existing in labels.iter_mut().filter(|existing| existing.name == label.name) {
            existing.color.clone_from(&label.color);
        }
        drop(labels);
        self.record(format!("{repository}: update label {}", label.name));
        Ok(())
    }

    async fn delete_label(
        &self,
        repository: &RepositoryLocator,
        name: &str,
    ) -> Result<(), SweepError> {
        self.labels
            .lock()
            .expect("labels mutex should be available")
            .retain(|existing| existing.name != name);
        self.record(format!("{repository}: delete label {name}"));
        Ok(())
    }
}

#[async_trait]
impl IssueGateway for FakeGitHub {
    async fn issue_labels(
        &self,
        _repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<Label>, SweepError> {
        let names = self
            .issue_labels
            .lock()
            .expect("issue labels mutex should be available")
            .get(&number)
            .cloned()
            .unwrap_or_default();
        Ok(names
            .into_iter()
            .map(|name| Label {
                name,
                color: "ededed".to_owned(),
            })
            .collect())
    }

    async fn add_issue_label(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        name: &str,
    ) -> Result<(), SweepError> {
        self.issue_labels
            .lock()
            .expect("issue labels mutex should be available")
            .entry(number)
            .or_default()
            .push(name.to_owned());
        self.record(format!("{repository}#{number}: add label {name}"));
        Ok(())
    }

    async fn remove_issue_label(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        name: &str,
    ) -> Result<(), SweepError> {
        if let Some(names) = self
            .issue_labels
            .lock()
            .expect("issue labels mutex should be available")
            .get_mut(&number)
        {
            names.retain(|existing| existing != name);
        }
        self.record(format!("{repository}#{number}: remove label {name}"));
        Ok(())
    }

    async fn add_issue_comment(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        _body: &str,
    ) -> Result<(), SweepError> {
        self.record(format!("{repository}#{number}: comment"));
        Ok(())
    }
}
