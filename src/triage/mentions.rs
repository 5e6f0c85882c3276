//! `@login` mention extraction from comment bodies.

use std::sync::LazyLock;

use regex::Regex;

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal and covered by tests"
)]
static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([A-Za-z0-9][A-Za-z0-9-]*)").expect("mention pattern should compile")
});

/// Logins mentioned in `body`, in order of appearance.
///
/// Trailing hyphens are dropped because GitHub logins cannot end with one.
#[must_use]
pub fn mentioned_logins(body: &str) -> Vec<String> {
    MENTION
        .captures_iter(body)
        .filter_map(|captures| captures.get(1))
        .map(|login| login.as_str().trim_end_matches('-').to_owned())
        .collect()
}
