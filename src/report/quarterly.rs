//! Community pull request activity inside a date range.

use std::ops::AddAssign;

use chrono::NaiveDate;
use serde::Serialize;

use crate::github::models::PullRequest;
use crate::triage::Membership;

use super::{midnight, strictly_within};

/// Community pull requests created, merged and closed between `since` and
/// `until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuarterRow {
    /// First day of the range.
    pub since: NaiveDate,
    /// Last day of the range.
    pub until: NaiveDate,
    /// Pull requests opened in the range.
    pub created: usize,
    /// Pull requests merged in the range.
    pub merged: usize,
    /// Pull requests closed without merging in the range.
    pub closed: usize,
}

impl QuarterRow {
    /// A row with every count at zero.
    #[must_use]
    pub const fn empty(since: NaiveDate, until: NaiveDate) -> Self {
        Self {
            since,
            until,
            created: 0,
            merged: 0,
            closed: 0,
        }
    }
}

impl AddAssign for QuarterRow {
    fn add_assign(&mut self, other: Self) {
        self.created += other.created;
        self.merged += other.merged;
        self.closed += other.closed;
    }
}

/// Counts the pull requests of authors outside `membership`.
///
/// Both ends of the range are taken at midnight UTC and excluded. A merged
/// pull request is counted by its merge time only, never as closed.
#[must_use]
pub fn community_activity<T: AsRef<PullRequest>>(
    pulls: &[T],
    membership: &Membership,
    since: NaiveDate,
    until: NaiveDate,
) -> QuarterRow {
    let (left, right) = (midnight(since), midnight(until));
    let inside = |at| strictly_within(at, left, right);

    pulls
        .iter()
        .map(AsRef::as_ref)
        .filter(|pull| {
            !pull
                .author
                .as_deref()
                .is_some_and(|author| membership.contains(author))
        })
        .fold(QuarterRow::empty(since, until), |mut row, pull| {
            if inside(pull.created_at) {
                row.created += 1;
            }
            match (pull.merged_at, pull.closed_at) {
                (Some(merged_at), _) if inside(merged_at) => row.merged += 1,
                (None, Some(closed_at)) if inside(closed_at) => row.closed += 1,
                _ => {}
            }
            row
        })
}
