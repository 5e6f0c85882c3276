//! Pull request reporting toolkit for GitHub organisations.
//!
//! The library lists repositories and pull requests through an Octocrab
//! gateway, enriches pull requests with statuses, commits and comments on a
//! bounded worker pool, classifies the results, reconciles repository labels
//! and aggregates the rows behind the `prsweep` report modes.

pub mod config;
pub mod enrich;
pub mod github;
pub mod labels;
pub mod release;
pub mod report;
pub mod telemetry;
pub mod triage;

pub use config::{ReportMode, Selector, SweepConfig};
pub use enrich::{
    EnrichedPullRequest, EnrichmentFetcher, EnrichmentRequest, FailurePolicy, FetchFilter,
    RecencyLimit, TimestampAttribute,
};
pub use github::{
    MemoizingGateway, OctocrabGateway, PersonalAccessToken, PullRequest, RepositoryLocator,
    SweepError,
};
pub use triage::Membership;
