//! Identity wrappers for repositories and tokens.

use std::fmt;

use super::error::SweepError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner login is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidRepository`] for a blank owner.
    pub fn new(value: &str) -> Result<Self, SweepError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SweepError::InvalidRepository(value.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryOwner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, SweepError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SweepError::InvalidRepository(value.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A repository addressed by owner and name.
///
/// # Example
///
/// ```
/// use prsweep::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("acme/widgets")
///     .expect("should parse full name");
/// assert_eq!(locator.owner().as_str(), "acme");
/// assert_eq!(locator.repository().as_str(), "widgets");
/// assert_eq!(locator.to_string(), "acme/widgets");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryLocator {
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a repository locator from owner and repository name strings.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidRepository`] when owner or repo is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, SweepError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// Parses a repository full name in the form `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidRepository`] when the input does not
    /// contain exactly one `/` separating two non-empty segments.
    pub fn parse(full_name: &str) -> Result<Self, SweepError> {
        let invalid = || SweepError::InvalidRepository(full_name.to_owned());
        let (owner, repo) = full_name.split_once('/').ok_or_else(invalid)?;
        if repo.contains('/') {
            return Err(invalid());
        }
        Self::from_owner_repo(owner, repo).map_err(|_| invalid())
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Returns the `/repos/{owner}/{name}` API prefix.
    pub(crate) fn repo_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("{}/pulls", self.repo_path())
    }

    pub(crate) fn pull_request_path(&self, number: u64) -> String {
        format!("{}/pulls/{number}", self.repo_path())
    }

    pub(crate) fn issue_path(&self, number: u64) -> String {
        format!("{}/issues/{number}", self.repo_path())
    }
}

impl fmt::Display for RepositoryLocator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::MissingToken`] when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, SweepError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SweepError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}
