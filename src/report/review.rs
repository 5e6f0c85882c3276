//! Rows of the open pull request review table.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::enrich::EnrichedPullRequest;
use crate::triage::{Membership, mentioned_logins};

/// One open pull request as shown in the review report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    /// `owner/name` of the repository.
    pub repository: String,
    /// Pull request number.
    pub number: u64,
    /// Browser URL, when GitHub returned one.
    pub url: Option<String>,
    /// Whole days since the pull request was opened.
    pub age_days: i64,
    /// Author login.
    pub author: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Body of the latest comment.
    pub last_comment: Option<String>,
    /// Author of the latest comment.
    pub last_comment_by: Option<String>,
    /// Whole days since the latest comment.
    pub last_comment_age_days: Option<i64>,
    /// Number of issue comments.
    pub comment_count: usize,
    /// No member has commented yet.
    pub no_member_comment: bool,
    /// The latest comment mentions a member.
    pub mentions_member: bool,
}

/// Builds one row per pull request, keeping input order.
#[must_use]
pub fn review_rows(
    items: &[EnrichedPullRequest],
    membership: &Membership,
    now: DateTime<Utc>,
) -> Vec<ReviewRow> {
    items
        .iter()
        .map(|item| row(item, membership, now))
        .collect()
}

fn row(item: &EnrichedPullRequest, membership: &Membership, now: DateTime<Utc>) -> ReviewRow {
    let pull = &item.pull;
    let comments = item.comments.as_deref().unwrap_or_default();
    let last = item.last_comment();
    let is_member = |login: Option<&str>| login.is_some_and(|author| membership.contains(author));

    ReviewRow {
        repository: pull.repository.full_name(),
        number: pull.number,
        url: pull.html_url.clone(),
        age_days: (now - pull.created_at).num_days(),
        author: pull.author.clone(),
        title: pull.title.clone(),
        last_comment: last.and_then(|comment| comment.body.clone()),
        last_comment_by: last.and_then(|comment| comment.author.clone()),
        last_comment_age_days: last
            .and_then(|comment| comment.created_at)
            .map(|at| (now - at).num_days()),
        comment_count: comments.len(),
        no_member_comment: !comments
            .iter()
            .any(|comment| is_member(comment.author.as_deref())),
        mentions_member: last
            .and_then(|comment| comment.body.as_deref())
            .is_some_and(|body| {
                mentioned_logins(body)
                    .iter()
                    .any(|login| membership.contains(login))
            }),
    }
}
