//! Review table of open pull requests across repositories.

use std::io::Write;

use prsweep::report::{ReviewRow, review_rows, write_json, write_review_html};
use prsweep::triage::{MembershipCache, sort_pulls};
use prsweep::{EnrichmentRequest, FetchFilter, RepositoryLocator, SweepError};

use super::output::{create_output, line};
use super::{GitHub, Run, skip};

/// Writes `review.html` and `review.json` to the output directory.
///
/// # Errors
///
/// Returns an output error; repository failures are skipped.
pub async fn run<G: GitHub, W: Write>(run: &Run<'_, G>, writer: &mut W) -> Result<(), SweepError> {
    let mut memberships = MembershipCache::new();
    let mut rows = Vec::new();
    for repository in &run.repositories {
        match repository_rows(run, &mut memberships, repository).await {
            Ok(found) => rows.extend(found),
            Err(error) => skip(repository, &error),
        }
    }

    let (html_path, html) = create_output(run.config, "review.html")?;
    write_review_html(html, &rows, run.now)?;
    let (json_path, json) = create_output(run.config, "review.json")?;
    write_json(json, &rows)?;
    line(
        writer,
        format_args!(
            "wrote {} pull requests to {} and {}",
            rows.len(),
            html_path.display(),
            json_path.display()
        ),
    )
}

async fn repository_rows<G: GitHub>(
    run: &Run<'_, G>,
    memberships: &mut MembershipCache,
    repository: &RepositoryLocator,
) -> Result<Vec<ReviewRow>, SweepError> {
    let request = EnrichmentRequest::open(repository.clone()).with_filter(FetchFilter::COMMENTS);
    let mut enriched = run.fetcher().fetch(&request).await?;
    sort_pulls(&mut enriched);
    let membership = memberships.membership_for(run.github(), &enriched).await?;
    Ok(review_rows(&enriched, &membership, run.now))
}
