//! Daily open and created pull request counts, summed over repositories.

use std::io::Write;

use prsweep::github::{PullRequestQuery, SortField, StateFilter};
use prsweep::report::{CreatedRow, DailyOpenRow, created_per_day, daily_open_counts, write_csv};
use prsweep::triage::MembershipCache;
use prsweep::{EnrichmentRequest, FetchFilter, PullRequest, RepositoryLocator, SweepError};

use super::output::{create_output, line};
use super::{GitHub, Run, skip};

const DAILY_OPEN_FILE: &str = "daily_open_prs.csv";
const CREATED_FILE: &str = "created_per_day.csv";

/// Writes `daily_open_prs.csv` and `created_per_day.csv` covering the
/// configured window up to today.
///
/// # Errors
///
/// Returns an output error; repository failures are skipped.
pub async fn run<G: GitHub, W: Write>(run: &Run<'_, G>, writer: &mut W) -> Result<(), SweepError> {
    let end = run.now.date_naive();
    let window = run.config.window_days;
    let mut memberships = MembershipCache::new();
    let mut open_totals: Vec<DailyOpenRow> = Vec::new();
    let mut created_totals: Vec<CreatedRow> = Vec::new();

    for repository in &run.repositories {
        let (pulls, membership) = match every_pull(run, &mut memberships, repository).await {
            Ok(found) => found,
            Err(error) => {
                skip(repository, &error);
                continue;
            }
        };
        let open = daily_open_counts(&pulls, &membership, end, window);
        let created = created_per_day(&pulls, &membership, end, window);
        if open_totals.is_empty() {
            open_totals = open;
            created_totals = created;
            continue;
        }
        for (total, row) in open_totals.iter_mut().zip(open) {
            total.community += row.community;
            total.member += row.member;
            total.total += row.total;
        }
        for (total, row) in created_totals.iter_mut().zip(created) {
            total.member += row.member;
            total.community += row.community;
        }
    }

    let (open_path, open_file) = create_output(run.config, DAILY_OPEN_FILE)?;
    write_csv(open_file, &open_totals)?;
    let (created_path, created_file) = create_output(run.config, CREATED_FILE)?;
    write_csv(created_file, &created_totals)?;
    line(
        writer,
        format_args!(
            "wrote {} and {}",
            open_path.display(),
            created_path.display()
        ),
    )
}

async fn every_pull<G: GitHub>(
    run: &Run<'_, G>,
    memberships: &mut MembershipCache,
    repository: &RepositoryLocator,
) -> Result<(Vec<PullRequest>, prsweep::Membership), SweepError> {
    let query = PullRequestQuery {
        state: StateFilter::All,
        sort: SortField::Created,
    };
    let request = EnrichmentRequest::open(repository.clone())
        .with_query(query)
        .with_filter(FetchFilter::empty());
    let listed = run.fetcher().fetch(&request).await?;
    let membership = memberships.membership_for(run.github(), &listed).await?;
    Ok((listed.into_iter().map(|item| item.pull).collect(), membership))
}
