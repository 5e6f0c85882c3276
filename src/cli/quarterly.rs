//! Community pull requests created, merged and closed in a date range.

use std::io::Write;

use chrono::NaiveDate;

use prsweep::github::{PullRequestGateway, PullRequestQuery};
use prsweep::report::{QuarterRow, community_activity, write_csv};
use prsweep::triage::MembershipCache;
use prsweep::{RepositoryLocator, SweepError};

use super::output::{create_output, line};
use super::{GitHub, Run, skip};

/// Prints the community counts for the configured range, summed over
/// repositories, and writes `quarterly.csv` when an output directory is
/// configured.
///
/// # Errors
///
/// Returns a missing or invalid range, or an output error; repository
/// failures are skipped.
pub async fn run<G: GitHub, W: Write>(run: &Run<'_, G>, writer: &mut W) -> Result<(), SweepError> {
    let (since, until) = run.config.quarter()?;
    let mut memberships = MembershipCache::new();
    let mut total = QuarterRow::empty(since, until);

    for repository in &run.repositories {
        match repository_activity(run, &mut memberships, repository, (since, until)).await {
            Ok(row) => total += row,
            Err(error) => skip(repository, &error),
        }
    }

    line(
        writer,
        format_args!(
            "{since} to {until}: {} created, {} merged, {} closed",
            total.created, total.merged, total.closed
        ),
    )?;
    if run.config.output_dir.is_some() {
        let (path, file) = create_output(run.config, "quarterly.csv")?;
        write_csv(file, &[total])?;
        line(writer, format_args!("wrote {}", path.display()))?;
    }
    Ok(())
}

async fn repository_activity<G: GitHub>(
    run: &Run<'_, G>,
    memberships: &mut MembershipCache,
    repository: &RepositoryLocator,
    (since, until): (NaiveDate, NaiveDate),
) -> Result<QuarterRow, SweepError> {
    let mut pulls = run
        .gateway
        .list_pull_requests(repository, &PullRequestQuery::open())
        .await?;
    pulls.extend(
        run.gateway
            .list_pull_requests(repository, &PullRequestQuery::closed())
            .await?,
    );
    let membership = memberships.membership_for(run.github(), &pulls).await?;
    Ok(community_activity(&pulls, &membership, since, until))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    use prsweep::github::models::test_support::{closed_pull, open_pull};
    use prsweep::{PullRequest, SweepConfig, SweepError};

    use crate::cli::run_with_gateway;
    use crate::cli::test_utils::FakeGitHub;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn gateway() -> FakeGitHub {
        let created_in_range = PullRequest {
            created_at: at(2024, 2, 1),
            ..open_pull("acme", "widgets", 1)
        };
        let merged = PullRequest {
            merged_at: Some(at(2024, 3, 1)),
            ..closed_pull("acme", "widgets", 2, at(2024, 3, 1))
        };
        let closed_late = closed_pull("acme", "widgets", 3, at(2024, 4, 2));
        let by_member = PullRequest {
            author: Some("staff".to_owned()),
            created_at: at(2024, 2, 2),
            ..closed_pull("acme", "gadgets", 4, at(2024, 2, 3))
        };
        FakeGitHub {
            repositories: vec!["widgets".to_owned(), "gadgets".to_owned()],
            members: vec!["staff".to_owned()],
            pulls: vec![created_in_range, merged, closed_late, by_member],
            ..FakeGitHub::default()
        }
    }

    fn config(output_dir: Option<&std::path::Path>) -> SweepConfig {
        SweepConfig {
            namespace: Some("acme".to_owned()),
            mode: "quarterly".to_owned(),
            since: Some("2024-01-01".to_owned()),
            until: Some("2024-04-01".to_owned()),
            output_dir: output_dir.map(std::path::Path::to_path_buf),
            ..Default::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn counts_community_activity_across_repositories() {
        let mut buffer = Vec::new();

        run_with_gateway(&config(None), gateway(), &mut buffer, at(2024, 6, 1))
            .await
            .expect("quarterly mode should succeed");

        assert_eq!(
            String::from_utf8(buffer).expect("output should be UTF-8"),
            "2024-01-01 to 2024-04-01: 1 created, 1 merged, 0 closed\n"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn writes_counts_to_output_directory() {
        let directory = tempfile::tempdir().expect("temp dir");
        let mut buffer = Vec::new();

        run_with_gateway(
            &config(Some(directory.path())),
            gateway(),
            &mut buffer,
            at(2024, 6, 1),
        )
        .await
        .expect("quarterly mode should succeed");

        let written =
            fs::read_to_string(directory.path().join("quarterly.csv")).expect("quarterly.csv");
        assert_eq!(
            written,
            "since,until,created,merged,closed\n2024-01-01,2024-04-01,1,1,0\n"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn range_is_required() {
        let config = SweepConfig {
            until: None,
            ..config(None)
        };
        let mut buffer = Vec::new();

        let result = run_with_gateway(&config, gateway(), &mut buffer, at(2024, 6, 1)).await;

        assert!(matches!(result, Err(SweepError::InvalidArgument { .. })));
    }
}
