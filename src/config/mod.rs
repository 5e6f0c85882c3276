//! Application configuration loaded from CLI, environment, and files.
//!
//! A single [`SweepConfig`] is merged once at start-up using ortho-config's
//! layered approach and then passed by reference into each report mode.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prsweep.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRSWEEP_*`, with `GITHUB_TOKEN` and
//!    `GITHUB_COMMUNITY_TOKEN` as token fallbacks
//! 4. **Command-line arguments** – e.g. `--namespace`/`-n`, `--token`/`-t`
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! namespace = "acme"
//! repo_regex = "^widget"
//! mode = "review"
//! output_dir = "reports"
//! ```

use std::env;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::enrich::{DEFAULT_WORKERS, FailurePolicy};
use crate::github::error::SweepError;
use crate::release::ReleaseThresholds;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Days covered by the daily open report unless overridden.
pub const DEFAULT_WINDOW_DAYS: u32 = 20;

/// Weeks covered by the work done report unless overridden.
pub const DEFAULT_WEEKS: u32 = 10;

/// Report produced by one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Per-repository triage listing of open pull requests.
    #[default]
    Pulls,
    /// Review table of open pull requests.
    Review,
    /// Label reconciliation.
    Labels,
    /// Release readiness.
    Release,
    /// Daily open and created counts.
    DailyOpen,
    /// Weekly closed, merged and commented tallies.
    WorkDone,
    /// Sync of the needs-rebase label with mergeability.
    Conflicts,
    /// Triage counts and the pull requests that need attention.
    Stats,
    /// Community activity inside a date range.
    Quarterly,
}

impl ReportMode {
    /// Name used on the command line and in configuration files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pulls => "pulls",
            Self::Review => "review",
            Self::Labels => "labels",
            Self::Release => "release",
            Self::DailyOpen => "daily-open",
            Self::WorkDone => "work-done",
            Self::Conflicts => "conflicts",
            Self::Stats => "stats",
            Self::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ReportMode {
    type Err = SweepError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pulls" => Ok(Self::Pulls),
            "review" => Ok(Self::Review),
            "labels" => Ok(Self::Labels),
            "release" => Ok(Self::Release),
            "daily-open" => Ok(Self::DailyOpen),
            "work-done" => Ok(Self::WorkDone),
            "conflicts" => Ok(Self::Conflicts),
            "stats" => Ok(Self::Stats),
            "quarterly" => Ok(Self::Quarterly),
            other => Err(SweepError::Configuration {
                message: format!(
                    "unknown mode `{other}` (expected pulls, review, labels, release, \
                     daily-open, work-done, conflicts, stats or quarterly)"
                ),
            }),
        }
    }
}

/// Subset of open pull requests shown by the triage listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selector {
    /// Every open pull request.
    #[default]
    All,
    /// Latest commit status is not a success.
    BadStatus,
    /// More than one commit.
    NeedsSquash,
    /// Cannot be merged cleanly.
    NeedsRebase,
    /// Nobody has commented.
    NoComments,
    /// No member has commented.
    NoMemberComments,
    /// Last comment is from a member and nothing has happened for a month.
    NeedsClosing,
}

impl FromStr for Selector {
    type Err = SweepError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "bad-status" => Ok(Self::BadStatus),
            "needs-squash" => Ok(Self::NeedsSquash),
            "needs-rebase" => Ok(Self::NeedsRebase),
            "no-comments" => Ok(Self::NoComments),
            "no-member-comments" => Ok(Self::NoMemberComments),
            "needs-closing" => Ok(Self::NeedsClosing),
            other => Err(SweepError::Configuration {
                message: format!("unknown selector `{other}`"),
            }),
        }
    }
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use prsweep::SweepConfig;
///
/// let config = SweepConfig::load().expect("failed to load configuration");
/// config.validate().expect("configuration should be consistent");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRSWEEP",
    discovery(
        dotfile_name = ".prsweep.toml",
        config_file_name = "prsweep.toml",
        app_name = "prsweep"
    )
)]
pub struct SweepConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Falls back to `GITHUB_TOKEN`, then `GITHUB_COMMUNITY_TOKEN`.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API.
    #[ortho_config(cli_short = 'u')]
    pub api_url: String,

    /// Organisation or user whose repositories are processed.
    #[ortho_config(cli_short = 'n')]
    pub namespace: Option<String>,

    /// Regular expression a repository name must match.
    #[ortho_config(cli_short = 'r')]
    pub repo_regex: Option<String>,

    /// JSON file listing `{github_namespace, repo_name}` entries to process
    /// instead of a namespace scan.
    #[ortho_config(cli_short = 'f')]
    pub modules_file: Option<PathBuf>,

    /// Report to produce: `pulls`, `review`, `labels`, `release`,
    /// `daily-open`, `work-done`, `conflicts`, `stats` or `quarterly`.
    #[ortho_config(cli_short = 'M')]
    pub mode: String,

    /// Triage selector used by the `pulls` mode.
    #[ortho_config(cli_short = 's')]
    pub selector: String,

    /// Only pull requests updated more than this many days ago.
    #[ortho_config(cli_short = 'b')]
    pub before_days: Option<u32>,

    /// Only pull requests updated within this many days.
    #[ortho_config(cli_short = 'a')]
    pub after_days: Option<u32>,

    /// Print counts instead of individual pull requests.
    #[ortho_config(cli_short = 'C')]
    pub count_only: bool,

    /// Include repositories with nothing to report.
    #[ortho_config(cli_short = 'e')]
    pub show_empty: bool,

    /// Order repositories by their number of matches.
    #[ortho_config(cli_short = 'S')]
    pub sort_by_count: bool,

    /// Size of the enrichment worker pool.
    #[ortho_config(cli_short = 'w')]
    pub workers: usize,

    /// Skip pull requests whose detail cannot be fetched instead of
    /// failing the repository.
    #[ortho_config(cli_short = 'B')]
    pub best_effort: bool,

    /// JSON file with the desired `{name, color}` labels.
    #[ortho_config(cli_short = 'l')]
    pub labels_file: Option<PathBuf>,

    /// Add missing labels and correct colours.
    #[ortho_config(cli_short = 'x')]
    pub fix_labels: bool,

    /// Also delete labels that are not desired.
    #[ortho_config(cli_short = 'p')]
    pub prune_labels: bool,

    /// Regular expression a release tag must match.
    #[ortho_config(cli_short = 'g')]
    pub tag_regex: Option<String>,

    /// Release once more than this many commits landed since the last tag.
    #[ortho_config(cli_short = 'c')]
    pub commit_threshold: Option<u64>,

    /// Release once the last tag is older than this many days.
    #[ortho_config(cli_short = 'm')]
    pub time_threshold_days: Option<u32>,

    /// Directory receiving CSV, JSON and HTML files.
    #[ortho_config(cli_short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Days covered by the daily open report.
    #[ortho_config(cli_short = 'd')]
    pub window_days: u32,

    /// Weeks covered by the work done report.
    #[ortho_config(cli_short = 'k')]
    pub weeks: u32,

    /// First day (`YYYY-MM-DD`) of the quarterly report range.
    #[ortho_config(cli_short = 'F')]
    pub since: Option<String>,

    /// Last day (`YYYY-MM-DD`) of the quarterly report range.
    #[ortho_config(cli_short = 'U')]
    pub until: Option<String>,

    /// Report what would change without writing to GitHub.
    #[ortho_config(cli_short = 'N')]
    pub no_op: bool,

    /// Log at debug level.
    #[ortho_config(cli_short = 'v')]
    pub verbose: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_owned(),
            namespace: None,
            repo_regex: None,
            modules_file: None,
            mode: ReportMode::default().as_str().to_owned(),
            selector: "all".to_owned(),
            before_days: None,
            after_days: None,
            count_only: false,
            show_empty: false,
            sort_by_count: false,
            workers: DEFAULT_WORKERS.get(),
            best_effort: false,
            labels_file: None,
            fix_labels: false,
            prune_labels: false,
            tag_regex: None,
            commit_threshold: None,
            time_threshold_days: None,
            output_dir: None,
            window_days: DEFAULT_WINDOW_DAYS,
            weeks: DEFAULT_WEEKS,
            since: None,
            until: None,
            no_op: false,
            verbose: false,
        }
    }
}

impl SweepConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN` and
    /// `GITHUB_COMMUNITY_TOKEN` environment variables, in that order.
    /// Blank values are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::MissingToken`] when no source provides a value.
    pub fn resolve_token(&self) -> Result<String, SweepError> {
        let present = |token: &String| !token.trim().is_empty();
        self.token
            .clone()
            .filter(present)
            .or_else(|| env::var("GITHUB_TOKEN").ok().filter(present))
            .or_else(|| env::var("GITHUB_COMMUNITY_TOKEN").ok().filter(present))
            .ok_or(SweepError::MissingToken)
    }

    /// Parses the configured report mode.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Configuration`] for an unknown mode.
    pub fn report_mode(&self) -> Result<ReportMode, SweepError> {
        self.mode.parse()
    }

    /// Parses the configured triage selector.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Configuration`] for an unknown selector.
    pub fn selector(&self) -> Result<Selector, SweepError> {
        self.selector.parse()
    }

    /// Worker pool size, never zero.
    #[must_use]
    pub fn worker_count(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.workers).unwrap_or(DEFAULT_WORKERS)
    }

    /// Failure policy of the enrichment fetcher.
    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        if self.best_effort {
            FailurePolicy::BestEffort
        } else {
            FailurePolicy::FailFast
        }
    }

    /// Release thresholds from the commit and time options.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidArgument`] when neither is set.
    pub fn release_thresholds(&self) -> Result<ReleaseThresholds, SweepError> {
        ReleaseThresholds::new(
            self.commit_threshold,
            self.time_threshold_days.map(i64::from),
        )
    }

    /// Date range of the quarterly report.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidArgument`] when either date is missing,
    /// or [`SweepError::Configuration`] when a date does not parse or the
    /// range is empty.
    pub fn quarter(&self) -> Result<(NaiveDate, NaiveDate), SweepError> {
        let (Some(since), Some(until)) = (self.since.as_deref(), self.until.as_deref()) else {
            return Err(SweepError::InvalidArgument {
                message: "the quarterly report needs --since and --until".to_owned(),
            });
        };
        let (since, until) = (parse_date("since", since)?, parse_date("until", until)?);
        if since >= until {
            return Err(SweepError::Configuration {
                message: format!("--since {since} must be before --until {until}"),
            });
        }
        Ok((since, until))
    }

    /// Collects every required option the chosen mode is missing.
    ///
    /// A repository selection needs either a namespace or a modules file.
    /// The release mode also needs at least one threshold and the quarterly
    /// mode both ends of its range.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::MissingOptions`] listing the flags to supply,
    /// or [`SweepError::Configuration`] for an unknown mode.
    pub fn missing_options(&self) -> Result<(), SweepError> {
        let mode = self.report_mode()?;
        let mut options = Vec::new();
        if self.namespace.is_none() && self.modules_file.is_none() {
            options.push("-n".to_owned());
        }
        if self.resolve_token().is_err() {
            options.push("-t".to_owned());
        }
        if mode == ReportMode::Release
            && self.commit_threshold.is_none()
            && self.time_threshold_days.is_none()
        {
            options.push("-m or -c".to_owned());
        }
        if mode == ReportMode::Quarterly {
            if self.since.is_none() {
                options.push("-F".to_owned());
            }
            if self.until.is_none() {
                options.push("-U".to_owned());
            }
        }
        if options.is_empty() {
            Ok(())
        } else {
            Err(SweepError::MissingOptions { options })
        }
    }

    /// Validates that mutually exclusive options are not combined.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Configuration`] when both `before_days` and
    /// `after_days` are set, when `workers` is zero, when the mode or
    /// selector is unknown, or when a quarterly date does not parse.
    pub fn validate(&self) -> Result<(), SweepError> {
        self.report_mode()?;
        self.selector()?;
        if let Some(since) = self.since.as_deref() {
            parse_date("since", since)?;
        }
        if let Some(until) = self.until.as_deref() {
            parse_date("until", until)?;
        }
        if self.workers == 0 {
            return Err(SweepError::Configuration {
                message: "--workers must be at least 1".to_owned(),
            });
        }
        if self.before_days.is_some() && self.after_days.is_some() {
            return Err(SweepError::Configuration {
                message: "--before-days and --after-days cannot be combined".to_owned(),
            });
        }
        Ok(())
    }
}

fn parse_date(option: &str, value: &str) -> Result<NaiveDate, SweepError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|error| SweepError::Configuration {
        message: format!("--{option} `{value}` is not a YYYY-MM-DD date: {error}"),
    })
}

#[cfg(test)]
mod tests;
