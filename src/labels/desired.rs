//! Desired label sets: the built-in default and JSON files.

use std::fs;
use std::path::Path;

use crate::github::error::SweepError;
use crate::github::models::Label;

/// Triage labels every repository is expected to carry, as name and colour.
pub const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("needs-squash", "bfe5bf"),
    ("needs-rebase", "207de5"),
    ("needs-tests", "f7c6c7"),
    ("needs-docs", "006b75"),
    ("bugfix", "009800"),
    ("feature", "0052cc"),
    ("tests-fail", "e11d21"),
    ("backwards-incompatible", "eb6420"),
];

/// [`DEFAULT_LABELS`] as owned labels.
#[must_use]
pub fn default_labels() -> Vec<Label> {
    DEFAULT_LABELS
        .iter()
        .map(|(name, color)| Label {
            name: (*name).to_owned(),
            color: (*color).to_owned(),
        })
        .collect()
}

/// Reads a JSON array of `{ "name": ..., "color": ... }` objects.
///
/// # Errors
///
/// Returns [`SweepError::Io`] when the file cannot be read and
/// [`SweepError::Configuration`] when it is not a label list.
pub fn load_labels(path: &Path) -> Result<Vec<Label>, SweepError> {
    let contents = fs::read_to_string(path).map_err(|error| SweepError::Io {
        message: format!("read {}: {error}", path.display()),
    })?;
    serde_json::from_str(&contents).map_err(|error| SweepError::Configuration {
        message: format!("{} is not a label list: {error}", path.display()),
    })
}
