//! Triage listing of open pull requests, one section per repository.

use std::cmp::Reverse;
use std::io::Write;

use chrono::Duration;

use prsweep::github::{PullRequestGateway, PullRequestQuery};
use prsweep::triage::{
    self, MembershipCache, PullSource, pulls_newer_than, pulls_older_than, sort_pulls,
};
use prsweep::{EnrichedPullRequest, FetchFilter, RepositoryLocator, Selector, SweepError};

use super::output::{line, pull_summary};
use super::{GitHub, Run, skip};

/// Days without activity after which a member-answered pull request should
/// be closed.
const CLOSING_DAYS: i64 = 30;

const fn filter_for(selector: Selector) -> FetchFilter {
    match selector {
        Selector::All => FetchFilter::empty(),
        Selector::BadStatus => FetchFilter::STATUSES,
        Selector::NeedsSquash => FetchFilter::COMMITS,
        Selector::NeedsRebase => FetchFilter::DETAIL,
        Selector::NoComments | Selector::NoMemberComments | Selector::NeedsClosing => {
            FetchFilter::COMMENTS
        }
    }
}

/// Lists the selected pull requests of every repository.
///
/// # Errors
///
/// Returns an unknown selector or an output error.
pub async fn run<G: GitHub, W: Write>(run: &Run<'_, G>, writer: &mut W) -> Result<(), SweepError> {
    let selector = run.config.selector()?;
    let mut memberships = MembershipCache::new();
    let mut sections = Vec::new();
    for repository in &run.repositories {
        match select(run, &mut memberships, repository, selector).await {
            Ok(pulls) => sections.push((repository, pulls)),
            Err(error) => skip(repository, &error),
        }
    }
    if run.config.sort_by_count {
        sections.sort_by_key(|(_, pulls)| Reverse(pulls.len()));
    }

    let mut total = 0;
    for (repository, pulls) in &sections {
        total += pulls.len();
        if pulls.is_empty() && !run.config.show_empty {
            continue;
        }
        line(writer, format_args!("{repository}: {}", pulls.len()))?;
        if run.config.count_only {
            continue;
        }
        for item in pulls {
            line(writer, pull_summary(&item.pull))?;
        }
    }
    line(writer, format_args!("total: {total}"))
}

async fn select<G: GitHub>(
    run: &Run<'_, G>,
    memberships: &mut MembershipCache,
    repository: &RepositoryLocator,
    selector: Selector,
) -> Result<Vec<EnrichedPullRequest>, SweepError> {
    let gateway = &*run.gateway;
    let source = PullSource::from_repository(repository.clone());
    let pulls = match (run.config.before_days, run.config.after_days) {
        (Some(days), _) => {
            pulls_older_than(gateway, run.now - Duration::days(days.into()), source).await?
        }
        (None, Some(days)) => {
            pulls_newer_than(gateway, run.now - Duration::days(days.into()), source).await?
        }
        (None, None) => {
            gateway
                .list_pull_requests(repository, &PullRequestQuery::open())
                .await?
        }
    };
    let enriched = run
        .fetcher()
        .enrich(repository, pulls, filter_for(selector))
        .await?;

    let mut selected: Vec<EnrichedPullRequest> = match selector {
        Selector::All => enriched,
        Selector::BadStatus => cloned(triage::bad_status(&enriched)),
        Selector::NeedsSquash => cloned(triage::needs_squash(&enriched)),
        Selector::NeedsRebase => cloned(triage::needs_rebase(&enriched)),
        Selector::NoComments => cloned(triage::uncommented(&enriched)),
        Selector::NoMemberComments => {
            let membership = memberships.membership_for(run.github(), &enriched).await?;
            cloned(triage::no_member_comments(&enriched, &membership))
        }
        Selector::NeedsClosing => {
            let membership = memberships.membership_for(run.github(), &enriched).await?;
            let answered = triage::last_comment_by_member(&enriched, &membership);
            triage::stale_no_activity(&answered, run.now, CLOSING_DAYS)
                .into_iter()
                .map(|item| (*item).clone())
                .collect()
        }
    };
    sort_pulls(&mut selected);
    Ok(selected)
}

fn cloned(items: Vec<&EnrichedPullRequest>) -> Vec<EnrichedPullRequest> {
    items.into_iter().cloned().collect()
}
