//! Error types exposed by the GitHub gateway and the layers built on it.

use thiserror::Error;

/// Errors surfaced while configuring a run or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SweepError {
    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// One or more required options were not supplied.
    #[error("missing options: {}", options.join(", "))]
    MissingOptions {
        /// The flags that still need values, e.g. `-n`.
        options: Vec<String>,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// A caller broke the contract of an operation.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the violated contract.
        message: String,
    },

    /// A repository or tag pattern is not a valid regular expression.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Compiler diagnostic from the regex engine.
        message: String,
    },

    /// A repository identifier could not be parsed.
    #[error("repository must look like owner/name: {0}")]
    InvalidRepository(String),

    /// The API base URL could not be parsed.
    #[error("API URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The requested resource does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Operation and GitHub message describing the missing resource.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Pull requests passed to a membership lookup belong to different
    /// owners.
    #[error("pull requests span several owners: expected {expected}, found {found}")]
    MixedOwners {
        /// Owner of the first pull request.
        expected: String,
        /// The first differing owner encountered.
        found: String,
    },

    /// An enrichment worker stopped without reporting a result.
    #[error("enrichment worker failed: {message}")]
    Worker {
        /// Join error detail.
        message: String,
    },
}

impl SweepError {
    /// Returns true when the error reports a missing remote resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
