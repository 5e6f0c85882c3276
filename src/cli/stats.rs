//! Triage statistics and the pull requests that need attention.

use std::io::Write;

use prsweep::github::{PullRequestGateway, PullRequestQuery};
use prsweep::labels::{REBASE_LABEL, has_label};
use prsweep::report::{
    RepositoryActivity, RepositorySummary, StatsReport, write_csv, write_stats_html,
};
use prsweep::triage::{self, MembershipCache};
use prsweep::{EnrichmentRequest, FetchFilter, RepositoryLocator, SweepError};

use super::output::{create_output, line};
use super::{GitHub, Run, skip};

/// Prints one summary line per repository, then writes `overview.csv`,
/// `totals.csv` and `report.html` summed over every repository.
///
/// # Errors
///
/// Returns an output error; repository failures are skipped.
pub async fn run<G: GitHub, W: Write>(run: &Run<'_, G>, writer: &mut W) -> Result<(), SweepError> {
    let mut memberships = MembershipCache::new();
    let mut report = StatsReport::new();

    for repository in &run.repositories {
        match add_repository(run, &mut memberships, &mut report, repository).await {
            Ok(summary) => line(writer, describe(repository, &summary))?,
            Err(error) => skip(repository, &error),
        }
    }

    let (overview_path, overview) = create_output(run.config, "overview.csv")?;
    write_csv(overview, &[report.overview()])?;
    let (totals_path, totals) = create_output(run.config, "totals.csv")?;
    write_csv(totals, &[report.totals()])?;
    let (html_path, html) = create_output(run.config, "report.html")?;
    write_stats_html(
        html,
        &report.overview(),
        &report.totals(),
        &report.sections(),
        run.now,
    )?;
    for path in [overview_path, totals_path, html_path] {
        line(writer, format_args!("wrote {}", path.display()))?;
    }
    Ok(())
}

async fn add_repository<G: GitHub>(
    run: &Run<'_, G>,
    memberships: &mut MembershipCache,
    report: &mut StatsReport,
    repository: &RepositoryLocator,
) -> Result<RepositorySummary, SweepError> {
    let request = EnrichmentRequest::open(repository.clone()).with_filter(FetchFilter::all());
    let open = run.fetcher().fetch(&request).await?;
    let closed = run
        .gateway
        .list_pull_requests(repository, &PullRequestQuery::closed())
        .await?;
    let membership = memberships.membership_for(run.github(), &open).await?;

    let mut unlabelled = Vec::new();
    for item in triage::needs_rebase(&open) {
        let number = item.pull.number;
        if !has_label(run.github(), repository, number, REBASE_LABEL).await? {
            unlabelled.push(number);
        }
    }

    Ok(report.add(
        RepositoryActivity {
            open: &open,
            closed: &closed,
            unlabelled_rebase: &unlabelled,
        },
        &membership,
        run.now,
    ))
}

fn describe(repository: &RepositoryLocator, summary: &RepositorySummary) -> String {
    format!(
        "{repository}: {} needs closing, {} needs rebase, {} fails tests, {} needs squash, \
         {} uncommented, {} open, {} mentions member, {} no activity",
        summary.needs_closing,
        summary.needs_rebase,
        summary.fails_tests,
        summary.needs_squash,
        summary.uncommented,
        summary.open,
        summary.mentions_member,
        summary.no_activity,
    )
}
