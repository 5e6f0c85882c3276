//! Per-day open and created pull request counts.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::github::models::{PullRequest, PullRequestState};
use crate::triage::Membership;

/// Pull requests open on one day, split by author membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyOpenRow {
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// Opened by non-members.
    pub community: usize,
    /// Opened by members.
    pub member: usize,
    /// Sum of both.
    pub total: usize,
}

/// Pull requests created on one day, split by author membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatedRow {
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// Created by members.
    pub member: usize,
    /// Created by non-members.
    pub community: usize,
}

fn days(end: NaiveDate, window_days: u32) -> impl Iterator<Item = NaiveDate> {
    let start = end - Duration::days(i64::from(window_days));
    start.iter_days().take_while(move |day| *day <= end)
}

fn is_member(pull: &PullRequest, membership: &Membership) -> bool {
    pull.author
        .as_deref()
        .is_some_and(|author| membership.contains(author))
}

fn open_on(pull: &PullRequest, day: NaiveDate) -> bool {
    if pull.created_at.date_naive() > day {
        return false;
    }
    match pull.state {
        PullRequestState::Open => true,
        PullRequestState::Closed => pull
            .closed_at
            .is_some_and(|closed| closed.date_naive() >= day),
    }
}

/// Counts, for each day from `end - window_days` to `end` inclusive, the
/// pull requests that were open at some point that day.
#[must_use]
pub fn daily_open_counts(
    pulls: &[PullRequest],
    membership: &Membership,
    end: NaiveDate,
    window_days: u32,
) -> Vec<DailyOpenRow> {
    days(end, window_days)
        .map(|date| {
            let (member, community) = pulls
                .iter()
                .filter(|pull| open_on(pull, date))
                .fold((0, 0), |(member, community), pull| {
                    if is_member(pull, membership) {
                        (member + 1, community)
                    } else {
                        (member, community + 1)
                    }
                });
            DailyOpenRow {
                date,
                community,
                member,
                total: member + community,
            }
        })
        .collect()
}

/// Counts pull requests created on each day of the same window as
/// [`daily_open_counts`].
#[must_use]
pub fn created_per_day(
    pulls: &[PullRequest],
    membership: &Membership,
    end: NaiveDate,
    window_days: u32,
) -> Vec<CreatedRow> {
    days(end, window_days)
        .map(|date| {
            let created = pulls
                .iter()
                .filter(|pull| pull.created_at.date_naive() == date);
            let member = created
                .clone()
                .filter(|pull| is_member(pull, membership))
                .count();
            let community = created.count() - member;
            CreatedRow {
                date,
                member,
                community,
            }
        })
        .collect()
}
