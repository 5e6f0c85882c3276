//! Triage statistics over every selected repository.
//!
//! A [`StatsReport`] is fed one repository at a time and yields the summary
//! rows of `overview.csv` and `totals.csv` together with the tables of pull
//! requests that need attention.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::enrich::EnrichedPullRequest;
use crate::github::models::PullRequest;
use crate::triage::{self, DEFAULT_STALE_DAYS, Membership};

/// Days after a member's last comment before the author should be pinged.
pub const NEEDS_PING_DAYS: i64 = 15;

/// Days after a member's last comment before the pull request should be
/// closed.
pub const NEEDS_CLOSING_DAYS: i64 = 30;

/// Open pull request counts by triage state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    /// Last comment by a member and no activity for a month.
    #[serde(rename = "needs closed")]
    pub needs_closing: usize,
    /// Cannot be merged cleanly, labelled or not.
    #[serde(rename = "needs rebase")]
    pub needs_rebase: usize,
    /// Latest status is not a success.
    #[serde(rename = "fails tests")]
    pub fails_tests: usize,
    /// More than one commit.
    #[serde(rename = "needs squashed")]
    pub needs_squash: usize,
    /// Every open pull request.
    #[serde(rename = "total PRs")]
    pub total: usize,
    /// No comments at all.
    pub uncommented: usize,
}

/// Lifetime pull request counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Closed without merging.
    #[serde(rename = "total unmerged PRs")]
    pub unmerged: usize,
    /// Merged.
    #[serde(rename = "total merged PRs")]
    pub merged: usize,
    /// Still open.
    #[serde(rename = "total open PRs")]
    pub open: usize,
    /// Still open and without comments.
    #[serde(rename = "total uncommented open PRs")]
    pub uncommented: usize,
}

/// One pull request listed in a stats table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsEntry {
    /// `owner/name` of the repository.
    pub repository: String,
    /// Pull request number.
    pub number: u64,
    /// Browser URL, when GitHub returned one.
    pub url: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Author login.
    pub author: Option<String>,
}

impl From<&PullRequest> for StatsEntry {
    fn from(pull: &PullRequest) -> Self {
        Self {
            repository: pull.repository.full_name(),
            number: pull.number,
            url: pull.html_url.clone(),
            title: pull.title.clone(),
            author: pull.author.clone(),
        }
    }
}

/// A titled table of pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSection {
    /// Heading shown above the table.
    pub title: &'static str,
    /// Pull requests, ordered by repository name and number.
    pub pulls: Vec<StatsEntry>,
}

/// What was fetched for one repository.
#[derive(Debug, Clone, Copy)]
pub struct RepositoryActivity<'a> {
    /// Open pull requests with comments, commits, statuses and detail.
    pub open: &'a [EnrichedPullRequest],
    /// Closed pull requests.
    pub closed: &'a [PullRequest],
    /// Numbers of open pull requests that need a rebase but are not
    /// labelled for it.
    pub unlabelled_rebase: &'a [u64],
}

/// Per-repository counts printed as the run progresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositorySummary {
    /// Last comment by a member and no activity for a month.
    pub needs_closing: usize,
    /// Cannot be merged cleanly.
    pub needs_rebase: usize,
    /// Latest status is not a success.
    pub fails_tests: usize,
    /// More than one commit.
    pub needs_squash: usize,
    /// No comments at all.
    pub uncommented: usize,
    /// Open pull requests.
    pub open: usize,
    /// Last comment mentions a member.
    pub mentions_member: usize,
    /// No activity for the stale threshold.
    pub no_activity: usize,
}

const TITLES: [&str; 7] = [
    "Pull requests with no comments",
    "Last comment from a member, no response for 15 days (needs ping)",
    "Last comment from a member, no response for 30 days (needs closing)",
    "Pull requests not yet commented on by a member",
    "Pull requests where the last comment mentions a member",
    "Pull requests that need a rebase and lack the needs-rebase label",
    "Pull requests with no activity for 40 days",
];

fn owned<'a>(items: impl IntoIterator<Item = &'a EnrichedPullRequest>) -> Vec<PullRequest> {
    items.into_iter().map(|item| item.pull.clone()).collect()
}

/// Running totals and tables across repositories.
#[derive(Debug, Clone, Default)]
pub struct StatsReport {
    overview: Overview,
    totals: Totals,
    tables: [Vec<PullRequest>; 7],
}

impl StatsReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one repository and returns its own counts.
    pub fn add(
        &mut self,
        activity: RepositoryActivity<'_>,
        membership: &Membership,
        now: DateTime<Utc>,
    ) -> RepositorySummary {
        let open = activity.open;
        let answered = triage::last_comment_by_member(open, membership);
        let needs_ping = triage::stale_no_activity(&answered, now, NEEDS_PING_DAYS);
        let needs_closing = triage::stale_no_activity(&answered, now, NEEDS_CLOSING_DAYS);
        let uncommented = triage::uncommented(open);
        let rebase = triage::needs_rebase(open);
        let mentioned = triage::mentions_member(open, membership);
        let no_activity = triage::stale_no_activity(open, now, DEFAULT_STALE_DAYS);
        let summary = RepositorySummary {
            needs_closing: needs_closing.len(),
            needs_rebase: rebase.len(),
            fails_tests: triage::bad_status(open).len(),
            needs_squash: triage::needs_squash(open).len(),
            uncommented: uncommented.len(),
            open: open.len(),
            mentions_member: mentioned.len(),
            no_activity: no_activity.len(),
        };

        let unlabelled = rebase
            .iter()
            .copied()
            .filter(|item| activity.unlabelled_rebase.contains(&item.pull.number));
        let found = [
            owned(uncommented.iter().copied()),
            owned(needs_ping.into_iter().copied()),
            owned(needs_closing.into_iter().copied()),
            owned(triage::no_member_comments(open, membership)),
            owned(mentioned.iter().copied()),
            owned(unlabelled),
            owned(no_activity.iter().copied()),
        ];
        for (table, pulls) in self.tables.iter_mut().zip(found) {
            table.extend(pulls);
        }

        self.overview.needs_closing += summary.needs_closing;
        self.overview.needs_rebase += summary.needs_rebase;
        self.overview.fails_tests += summary.fails_tests;
        self.overview.needs_squash += summary.needs_squash;
        self.overview.total += summary.open;
        self.overview.uncommented += summary.uncommented;
        self.totals.unmerged += triage::unmerged(activity.closed).len();
        self.totals.merged += triage::merged(activity.closed).len();
        self.totals.open += summary.open;
        self.totals.uncommented += summary.uncommented;
        summary
    }

    /// Summed triage counts.
    #[must_use]
    pub const fn overview(&self) -> Overview {
        self.overview
    }

    /// Summed lifetime counts.
    #[must_use]
    pub const fn totals(&self) -> Totals {
        self.totals
    }

    /// The seven tables, each sorted by repository name and number.
    #[must_use]
    pub fn sections(&self) -> Vec<StatsSection> {
        TITLES
            .iter()
            .zip(&self.tables)
            .map(|(title, pulls)| {
                let mut pulls = pulls.clone();
                triage::sort_pulls(&mut pulls);
                StatsSection {
                    title,
                    pulls: pulls.iter().map(StatsEntry::from).collect(),
                }
            })
            .collect()
    }
}
