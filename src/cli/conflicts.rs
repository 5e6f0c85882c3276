//! Keeps the needs-rebase label in step with mergeability.

use std::io::Write;

use prsweep::labels::{REBASE_LABEL, RebaseLabelAction, sync_rebase_label};
use prsweep::triage::sort_pulls;
use prsweep::{EnrichmentRequest, FetchFilter, RepositoryLocator, SweepError};

use super::output::line;
use super::{GitHub, Run, skip};

/// Labels conflicting open pull requests and unlabels resolved ones,
/// printing one line per change. `--no-op` reports without writing.
///
/// # Errors
///
/// Returns an output error; repository failures are skipped.
pub async fn run<G: GitHub, W: Write>(run: &Run<'_, G>, writer: &mut W) -> Result<(), SweepError> {
    let suffix = if run.config.no_op { " (no-op)" } else { "" };
    for repository in &run.repositories {
        match sync_repository(run, repository).await {
            Ok(changes) => {
                for (number, action) in changes {
                    let verb = match action {
                        RebaseLabelAction::Labelled => "labelled",
                        RebaseLabelAction::Unlabelled => "removed",
                        _ => continue,
                    };
                    line(
                        writer,
                        format_args!("{repository}#{number}: {verb} {REBASE_LABEL}{suffix}"),
                    )?;
                }
            }
            Err(error) => skip(repository, &error),
        }
    }
    Ok(())
}

async fn sync_repository<G: GitHub>(
    run: &Run<'_, G>,
    repository: &RepositoryLocator,
) -> Result<Vec<(u64, RebaseLabelAction)>, SweepError> {
    let request = EnrichmentRequest::open(repository.clone()).with_filter(FetchFilter::DETAIL);
    let mut enriched = run.fetcher().fetch(&request).await?;
    sort_pulls(&mut enriched);

    let mut actions = Vec::with_capacity(enriched.len());
    for item in &enriched {
        let pull = item.detail.as_ref().unwrap_or(&item.pull);
        let action = sync_rebase_label(run.github(), repository, pull, run.config.no_op).await?;
        actions.push((pull.number, action));
    }
    Ok(actions)
}
