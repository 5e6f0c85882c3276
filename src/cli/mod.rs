//! Report mode handlers.
//!
//! [`run`] builds the Octocrab gateway from configuration and hands it to
//! [`run_with_gateway`], which checks the token's identity, selects the
//! repositories and dispatches to one module per mode:
//! - [`pulls`]: triage listing of open pull requests
//! - [`review`]: HTML and JSON review table
//! - [`labels`]: label reconciliation
//! - [`release`]: release readiness
//! - [`daily_open`]: daily open and created counts
//! - [`work_done`]: weekly closed, merged and commented tallies
//! - [`conflicts`]: needs-rebase label sync
//! - [`stats`]: triage counts and tables of pull requests needing attention
//! - [`quarterly`]: community activity inside a date range
//!
//! A repository whose processing fails is logged and skipped; the batch
//! carries on with the next one.

use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use prsweep::github::{IssueGateway, LabelGateway, PullRequestGateway, RepositoryGateway};
use prsweep::{
    EnrichmentFetcher, MemoizingGateway, OctocrabGateway, PersonalAccessToken, ReportMode,
    RepositoryLocator, SweepConfig, SweepError,
};

pub mod conflicts;
pub mod daily_open;
pub mod labels;
pub mod output;
pub mod pulls;
pub mod quarterly;
pub mod release;
pub mod review;
pub mod selection;
pub mod stats;
pub mod work_done;

#[cfg(test)]
pub mod test_utils;

/// Every gateway concern a report mode may need.
pub trait GitHub:
    PullRequestGateway + RepositoryGateway + LabelGateway + IssueGateway + 'static
{
}

impl<T> GitHub for T where
    T: PullRequestGateway + RepositoryGateway + LabelGateway + IssueGateway + 'static
{
}

/// State shared by the handlers of one invocation.
pub struct Run<'a, G> {
    /// Merged configuration.
    pub config: &'a SweepConfig,
    /// Gateway with per-run listing memo.
    pub gateway: Arc<MemoizingGateway<G>>,
    /// Repositories selected for this run, sorted.
    pub repositories: Vec<RepositoryLocator>,
    /// Reference instant for every age and window.
    pub now: DateTime<Utc>,
}

impl<G: GitHub> Run<'_, G> {
    /// Gateway for calls that are not memoised.
    pub fn github(&self) -> &G {
        self.gateway.inner()
    }

    /// Enrichment fetcher configured from the worker and policy options.
    pub fn fetcher(&self) -> EnrichmentFetcher<MemoizingGateway<G>> {
        EnrichmentFetcher::new(Arc::clone(&self.gateway))
            .with_workers(self.config.worker_count())
            .with_policy(self.config.failure_policy())
    }
}

/// Runs the configured report mode against GitHub.
///
/// # Errors
///
/// Returns token, gateway construction, identity check, repository selection
/// or output errors. Failures of a single repository are logged instead.
pub async fn run<W: Write>(config: &SweepConfig, writer: &mut W) -> Result<(), SweepError> {
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let gateway = OctocrabGateway::for_token(&token, &config.api_url)?;
    run_with_gateway(config, gateway, writer, Utc::now()).await
}

/// Runs the configured report mode using a caller-supplied gateway.
///
/// This function is exposed for testing with fake gateways.
///
/// # Errors
///
/// See [`run`].
pub async fn run_with_gateway<G, W>(
    config: &SweepConfig,
    gateway: G,
    writer: &mut W,
    now: DateTime<Utc>,
) -> Result<(), SweepError>
where
    G: GitHub,
    W: Write,
{
    let mode = config.report_mode()?;
    let login = gateway.authenticated_login().await?;
    info!(%login, %mode, "authenticated");

    let repositories = selection::select_repositories(&gateway, config).await?;
    info!(repositories = repositories.len(), "selected repositories");

    let run = Run {
        config,
        gateway: Arc::new(MemoizingGateway::new(gateway)),
        repositories,
        now,
    };
    match mode {
        ReportMode::Pulls => pulls::run(&run, writer).await,
        ReportMode::Review => review::run(&run, writer).await,
        ReportMode::Labels => labels::run(&run, writer).await,
        ReportMode::Release => release::run(&run, writer).await,
        ReportMode::DailyOpen => daily_open::run(&run, writer).await,
        ReportMode::WorkDone => work_done::run(&run, writer).await,
        ReportMode::Conflicts => conflicts::run(&run, writer).await,
        ReportMode::Stats => stats::run(&run, writer).await,
        ReportMode::Quarterly => quarterly::run(&run, writer).await,
    }
}

/// Logs a repository that is left out of the report.
pub fn skip(repository: &RepositoryLocator, error: &SweepError) {
    warn!(%repository, %error, "skipping repository");
}
