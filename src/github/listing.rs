//! Repository selection and tag ordering on top of the gateway.

use std::cmp::Reverse;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::error::SweepError;
use super::gateway::RepositoryGateway;
use super::locator::{RepositoryLocator, RepositoryOwner};
use super::models::Tag;

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal and covered by tests"
)]
static SEMVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)").expect("semantic version pattern should compile")
});

/// Compiles a user-supplied pattern, reporting the pattern on failure.
///
/// # Errors
///
/// Returns [`SweepError::InvalidPattern`] when the pattern does not compile.
pub fn compile_pattern(pattern: &str) -> Result<Regex, SweepError> {
    Regex::new(pattern).map_err(|error| SweepError::InvalidPattern {
        pattern: pattern.to_owned(),
        message: error.to_string(),
    })
}

/// Lists repositories of `owner` whose name matches `pattern`.
///
/// No pattern matches every repository. The result is sorted and free of
/// duplicates.
///
/// # Errors
///
/// Returns [`SweepError::InvalidPattern`] for a bad pattern, or whatever the
/// gateway reports for the listing call.
pub async fn list_repositories<G>(
    gateway: &G,
    owner: &RepositoryOwner,
    pattern: Option<&str>,
) -> Result<Vec<RepositoryLocator>, SweepError>
where
    G: RepositoryGateway + ?Sized,
{
    let matcher = pattern.map(compile_pattern).transpose()?;
    let mut names = gateway.repository_names(owner).await?;
    names.retain(|name| matcher.as_ref().is_none_or(|regex| regex.is_match(name)));
    names.sort();
    names.dedup();
    debug!(%owner, count = names.len(), "selected repositories");

    names
        .iter()
        .map(|name| RepositoryLocator::from_owner_repo(owner.as_str(), name))
        .collect()
}

/// Parses the leading `major.minor.patch` of a tag name, with an optional
/// `v` prefix.
#[must_use]
pub fn semantic_version(name: &str) -> Option<(u64, u64, u64)> {
    let captures = SEMVER.captures(name)?;
    let part = |index: usize| captures.get(index)?.as_str().parse::<u64>().ok();
    Some((part(1)?, part(2)?, part(3)?))
}

/// Orders tags newest version first. Tags without a version keep their
/// relative order after every versioned tag.
#[must_use]
pub fn sort_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let (mut versioned, unversioned): (Vec<_>, Vec<_>) = tags
        .into_iter()
        .map(|tag| (semantic_version(&tag.name), tag))
        .partition(|(version, _)| version.is_some());
    versioned.sort_by_key(|(version, _)| Reverse(*version));
    versioned
        .into_iter()
        .chain(unversioned)
        .map(|(_, tag)| tag)
        .collect()
}

/// Fetches the tags of `repository` matching `pattern`, newest version
/// first.
///
/// # Errors
///
/// Returns [`SweepError::InvalidPattern`] for a bad pattern, or whatever the
/// gateway reports for the listing call.
pub async fn fetch_tags<G>(
    gateway: &G,
    repository: &RepositoryLocator,
    pattern: Option<&str>,
) -> Result<Vec<Tag>, SweepError>
where
    G: RepositoryGateway + ?Sized,
{
    let matcher = pattern.map(compile_pattern).transpose()?;
    let mut tags = gateway.tags(repository).await?;
    tags.retain(|tag| matcher.as_ref().is_none_or(|regex| regex.is_match(&tag.name)));
    Ok(sort_tags(tags))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{fetch_tags, list_repositories, semantic_version, sort_tags};
    use crate::github::error::SweepError;
    use crate::github::gateway::MockRepositoryGateway;
    use crate::github::locator::{RepositoryLocator, RepositoryOwner};
    use crate::github::models::Tag;

    fn tag(name: &str) -> Tag {
        Tag {
            name: name.to_owned(),
            commit_sha: format!("sha-{name}"),
        }
    }

    fn names(tags: &[Tag]) -> Vec<&str> {
        tags.iter().map(|tag| tag.name.as_str()).collect()
    }

    #[rstest]
    #[case("v1.2.3", Some((1, 2, 3)))]
    #[case("10.0.1", Some((10, 0, 1)))]
    #[case("2.0.0-rc1", Some((2, 0, 0)))]
    #[case("release-2024", None)]
    #[case("v1.2", None)]
    fn parses_semantic_versions(#[case] name: &str, #[case] expected: Option<(u64, u64, u64)>) {
        assert_eq!(semantic_version(name), expected);
    }

    #[rstest]
    fn sorts_numerically_and_keeps_unversioned_last() {
        let sorted = sort_tags(vec![
            tag("v1.9.0"),
            tag("nightly"),
            tag("v1.10.0"),
            tag("legacy"),
            tag("0.9.9"),
        ]);
        assert_eq!(
            names(&sorted),
            vec!["v1.10.0", "v1.9.0", "0.9.9", "nightly", "legacy"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn repositories_are_filtered_sorted_and_deduplicated() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_repository_names().returning(|_| {
            Ok(vec![
                "puppetlabs-ntp".to_owned(),
                "docs".to_owned(),
                "puppetlabs-apache".to_owned(),
                "puppetlabs-ntp".to_owned(),
            ])
        });
        let owner = RepositoryOwner::new("puppetlabs").expect("valid owner");

        let selected = list_repositories(&gateway, &owner, Some("^puppetlabs-"))
            .await
            .expect("listing should succeed");

        let expected = vec![
            RepositoryLocator::parse("puppetlabs/puppetlabs-apache").expect("valid"),
            RepositoryLocator::parse("puppetlabs/puppetlabs-ntp").expect("valid"),
        ];
        assert_eq!(selected, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_pattern_matches_everything() {
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_repository_names()
            .returning(|_| Ok(vec!["b".to_owned(), "a".to_owned()]));
        let owner = RepositoryOwner::new("acme").expect("valid owner");

        let selected = list_repositories(&gateway, &owner, None)
            .await
            .expect("listing should succeed");

        assert_eq!(selected.len(), 2);
        assert_eq!(
            selected.first().map(ToString::to_string).as_deref(),
            Some("acme/a")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_pattern_is_rejected_before_any_call() {
        let gateway = MockRepositoryGateway::new();
        let owner = RepositoryOwner::new("acme").expect("valid owner");

        let result = list_repositories(&gateway, &owner, Some("(unclosed")).await;

        assert!(matches!(result, Err(SweepError::InvalidPattern { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn tags_are_filtered_then_sorted() {
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_tags()
            .returning(|_| Ok(vec![tag("v0.1.0"), tag("docs-1"), tag("v0.3.0")]));
        let repository = RepositoryLocator::parse("acme/widgets").expect("valid");

        let tags = fetch_tags(&gateway, &repository, Some("^v"))
            .await
            .expect("tags should load");

        assert_eq!(names(&tags), vec!["v0.3.0", "v0.1.0"]);
    }
}
