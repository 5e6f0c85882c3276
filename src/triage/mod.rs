//! Pure classifiers over listed and enriched pull requests.
//!
//! Every classifier returns the matching subset in input order and is total:
//! empty input gives empty output. A detail collection that was never
//! fetched, or a field GitHub left unset, never satisfies a predicate.

mod membership;
mod mentions;
mod window;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Duration, Utc};

use crate::enrich::EnrichedPullRequest;
use crate::github::models::{PullRequest, StatusState};

pub use membership::{MemberRole, Membership, MembershipCache, membership_of};
pub use mentions::mentioned_logins;
pub use window::{PullSource, pulls_in_range, pulls_newer_than, pulls_older_than};

/// Inactivity threshold, in days, used when none is given.
pub const DEFAULT_STALE_DAYS: i64 = 40;

/// Pull requests whose full detail reports they cannot be merged cleanly.
///
/// Unknown mergeability is not a rebase need.
#[must_use]
pub fn needs_rebase(items: &[EnrichedPullRequest]) -> Vec<&EnrichedPullRequest> {
    items
        .iter()
        .filter(|item| {
            item.detail
                .as_ref()
                .is_some_and(|detail| detail.mergeable == Some(false))
        })
        .collect()
}

/// Pull requests carrying more than one commit.
#[must_use]
pub fn needs_squash(items: &[EnrichedPullRequest]) -> Vec<&EnrichedPullRequest> {
    items
        .iter()
        .filter(|item| item.commits.as_ref().is_some_and(|commits| commits.len() > 1))
        .collect()
}

/// Pull requests whose most recent status is anything but success.
#[must_use]
pub fn bad_status(items: &[EnrichedPullRequest]) -> Vec<&EnrichedPullRequest> {
    items
        .iter()
        .filter(|item| {
            item.statuses
                .as_deref()
                .and_then(<[_]>::first)
                .is_some_and(|status| status.state != StatusState::Success)
        })
        .collect()
}

/// Pull requests with no issue comments.
#[must_use]
pub fn uncommented(items: &[EnrichedPullRequest]) -> Vec<&EnrichedPullRequest> {
    items
        .iter()
        .filter(|item| item.comments.as_ref().is_some_and(Vec::is_empty))
        .collect()
}

/// Pull requests with a merge timestamp.
#[must_use]
pub fn merged<T: AsRef<PullRequest>>(items: &[T]) -> Vec<&T> {
    items
        .iter()
        .filter(|item| item.as_ref().is_merged())
        .collect()
}

/// Pull requests without a merge timestamp.
#[must_use]
pub fn unmerged<T: AsRef<PullRequest>>(items: &[T]) -> Vec<&T> {
    items
        .iter()
        .filter(|item| !item.as_ref().is_merged())
        .collect()
}

/// Pull requests last updated more than `days` days before `now`.
#[must_use]
pub fn stale_no_activity<T: AsRef<PullRequest>>(
    items: &[T],
    now: DateTime<Utc>,
    days: i64,
) -> Vec<&T> {
    let cutoff = now - Duration::days(days);
    items
        .iter()
        .filter(|item| {
            item.as_ref()
                .updated_at
                .is_some_and(|updated| updated < cutoff)
        })
        .collect()
}

/// Pull requests whose latest comment was written by a member.
#[must_use]
pub fn last_comment_by_member<'a>(
    items: &'a [EnrichedPullRequest],
    membership: &Membership,
) -> Vec<&'a EnrichedPullRequest> {
    items
        .iter()
        .filter(|item| {
            item.last_comment()
                .and_then(|comment| comment.author.as_deref())
                .is_some_and(|author| membership.contains(author))
        })
        .collect()
}

/// Pull requests where no member has commented at all.
#[must_use]
pub fn no_member_comments<'a>(
    items: &'a [EnrichedPullRequest],
    membership: &Membership,
) -> Vec<&'a EnrichedPullRequest> {
    items
        .iter()
        .filter(|item| {
            item.comments.as_ref().is_some_and(|comments| {
                !comments.iter().any(|comment| {
                    comment
                        .author
                        .as_deref()
                        .is_some_and(|author| membership.contains(author))
                })
            })
        })
        .collect()
}

/// Pull requests whose latest comment mentions a member with `@login`.
#[must_use]
pub fn mentions_member<'a>(
    items: &'a [EnrichedPullRequest],
    membership: &Membership,
) -> Vec<&'a EnrichedPullRequest> {
    items
        .iter()
        .filter(|item| {
            item.last_comment()
                .and_then(|comment| comment.body.as_deref())
                .is_some_and(|body| {
                    mentioned_logins(body)
                        .iter()
                        .any(|login| membership.contains(login))
                })
        })
        .collect()
}

/// Sorts by repository name, then pull request number.
pub fn sort_pulls<T: AsRef<PullRequest>>(items: &mut [T]) {
    items.sort_by(|left, right| {
        let (left, right) = (left.as_ref(), right.as_ref());
        left.repository
            .name
            .cmp(&right.repository.name)
            .then(left.number.cmp(&right.number))
    });
}
