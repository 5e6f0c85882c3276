//! Weekly closed, merged and commented tallies, summed over repositories.

use std::io::Write;

use prsweep::github::PullRequestQuery;
use prsweep::report::{WeekRow, next_wednesday, weekly_work_done, window_start, write_csv};
use prsweep::triage::MembershipCache;
use prsweep::{
    EnrichmentRequest, FetchFilter, RecencyLimit, RepositoryLocator, SweepError,
    TimestampAttribute,
};

use super::output::{create_output, line};
use super::{GitHub, Run, skip};

/// Writes `work_done.csv` for the configured number of weeks, the newest
/// of which ends on the next Wednesday.
///
/// # Errors
///
/// Returns an output error; repository failures are skipped.
pub async fn run<G: GitHub, W: Write>(run: &Run<'_, G>, writer: &mut W) -> Result<(), SweepError> {
    let mut memberships = MembershipCache::new();
    let mut totals: Vec<WeekRow> = Vec::new();

    for repository in &run.repositories {
        let rows = match repository_weeks(run, &mut memberships, repository).await {
            Ok(rows) => rows,
            Err(error) => {
                skip(repository, &error);
                continue;
            }
        };
        if totals.is_empty() {
            totals = rows;
            continue;
        }
        for (total, row) in totals.iter_mut().zip(rows) {
            total.closed += row.closed;
            total.commented += row.commented;
            total.merged += row.merged;
        }
    }

    let (path, file) = create_output(run.config, "work_done.csv")?;
    write_csv(file, &totals)?;
    line(writer, format_args!("wrote {} weeks to {}", totals.len(), path.display()))
}

async fn repository_weeks<G: GitHub>(
    run: &Run<'_, G>,
    memberships: &mut MembershipCache,
    repository: &RepositoryLocator,
) -> Result<Vec<WeekRow>, SweepError> {
    let last_week_end = next_wednesday(run.now.date_naive());
    let cutoff = window_start(last_week_end, run.config.weeks);
    let request = EnrichmentRequest::open(repository.clone())
        .with_query(PullRequestQuery::closed())
        .with_filter(FetchFilter::COMMENTS)
        .with_limit(RecencyLimit::new(TimestampAttribute::ClosedAt, cutoff));
    let closed = run.fetcher().fetch(&request).await?;
    let membership = memberships.membership_for(run.github(), &closed).await?;
    Ok(weekly_work_done(
        &closed,
        &membership,
        last_week_end,
        run.config.weeks,
    ))
}
