//! Repository selection from a namespace scan or a modules file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use prsweep::github::{RepositoryGateway, RepositoryOwner, compile_pattern, list_repositories};
use prsweep::{RepositoryLocator, SweepConfig, SweepError};

#[derive(Debug, Deserialize)]
struct ModuleEntry {
    github_namespace: String,
    repo_name: String,
}

/// Reads a JSON array of `{ "github_namespace": ..., "repo_name": ... }`.
///
/// # Errors
///
/// Returns [`SweepError::Io`] when the file cannot be read,
/// [`SweepError::Configuration`] when it is not a module list, or
/// [`SweepError::InvalidRepository`] for an empty namespace or name.
pub fn load_modules(path: &Path) -> Result<Vec<RepositoryLocator>, SweepError> {
    let contents = fs::read_to_string(path).map_err(|error| SweepError::Io {
        message: format!("read {}: {error}", path.display()),
    })?;
    let entries: Vec<ModuleEntry> =
        serde_json::from_str(&contents).map_err(|error| SweepError::Configuration {
            message: format!("{} is not a module list: {error}", path.display()),
        })?;
    entries
        .iter()
        .map(|entry| RepositoryLocator::from_owner_repo(&entry.github_namespace, &entry.repo_name))
        .collect()
}

/// Repositories the run operates on, sorted and without duplicates.
///
/// A modules file takes precedence over a namespace scan. The repository
/// pattern filters either source by name.
///
/// # Errors
///
/// Returns [`SweepError::MissingOptions`] when neither source is configured,
/// an invalid pattern error, a modules file error, or the listing error.
pub async fn select_repositories<G>(
    gateway: &G,
    config: &SweepConfig,
) -> Result<Vec<RepositoryLocator>, SweepError>
where
    G: RepositoryGateway + ?Sized,
{
    let pattern = config.repo_regex.as_deref();
    if let Some(path) = config.modules_file.as_deref() {
        let matcher = pattern.map(compile_pattern).transpose()?;
        let mut selected = load_modules(path)?;
        selected.retain(|repository| {
            matcher
                .as_ref()
                .is_none_or(|regex| regex.is_match(repository.repository().as_str()))
        });
        selected.sort();
        selected.dedup();
        return Ok(selected);
    }

    let namespace = config
        .namespace
        .as_deref()
        .ok_or_else(|| SweepError::MissingOptions {
            options: vec!["-n".to_owned()],
        })?;
    let owner = RepositoryOwner::new(namespace)?;
    list_repositories(gateway, &owner, pattern).await
}
