//! Weekly tallies of closed, merged and member-commented pull requests.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::Serialize;

use crate::enrich::EnrichedPullRequest;
use crate::triage::Membership;

use super::{midnight, strictly_within};

/// Work done in the week ending on `week_ending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekRow {
    /// Last day of the week (exclusive boundary at midnight UTC).
    #[serde(rename = "week ending on")]
    pub week_ending: NaiveDate,
    /// Pull requests closed without merging.
    pub closed: usize,
    /// Comments written by members.
    pub commented: usize,
    /// Pull requests merged.
    pub merged: usize,
}

/// The first Wednesday strictly after `today`.
#[must_use]
pub fn next_wednesday(today: NaiveDate) -> NaiveDate {
    let ahead = (7 + Weekday::Wed.num_days_from_monday() - today.weekday().num_days_from_monday())
        % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    today + Duration::days(i64::from(ahead))
}

/// Instant at which the oldest of `weeks` weeks ending on `last_week_end`
/// starts. Use it as a closed-at recency cutoff.
#[must_use]
pub fn window_start(last_week_end: NaiveDate, weeks: u32) -> DateTime<Utc> {
    midnight(last_week_end - Duration::weeks(i64::from(weeks)))
}

/// Buckets closed pull requests into `weeks` weeks, newest first, the first
/// of which ends on `last_week_end`.
///
/// A timestamp counts towards a week when it lies strictly between the
/// week's boundaries.
#[must_use]
pub fn weekly_work_done(
    closed: &[EnrichedPullRequest],
    membership: &Membership,
    last_week_end: NaiveDate,
    weeks: u32,
) -> Vec<WeekRow> {
    let member_comment_times: Vec<DateTime<Utc>> = closed
        .iter()
        .filter_map(|item| item.comments.as_deref())
        .flatten()
        .filter(|comment| {
            comment
                .author
                .as_deref()
                .is_some_and(|author| membership.contains(author))
        })
        .filter_map(|comment| comment.created_at)
        .collect();

    (0..weeks)
        .map(|week| {
            let right_day = last_week_end - Duration::weeks(i64::from(week));
            let right = midnight(right_day);
            let left = right - Duration::weeks(1);
            let inside = |at: &DateTime<Utc>| strictly_within(*at, left, right);

            let (merged, closed_unmerged) = closed
                .iter()
                .filter(|item| item.pull.closed_at.as_ref().is_some_and(inside))
                .fold((0, 0), |(merged, unmerged), item| {
                    if item.pull.is_merged() {
                        (merged + 1, unmerged)
                    } else {
                        (merged, unmerged + 1)
                    }
                });
            WeekRow {
                week_ending: right_day,
                closed: closed_unmerged,
                commented: member_comment_times.iter().filter(|at| inside(at)).count(),
                merged,
            }
        })
        .collect()
}
