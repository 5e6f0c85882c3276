//! Output formatting utilities for CLI operations.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use prsweep::{PullRequest, SweepConfig, SweepError};

/// Converts an I/O error to an [`SweepError::Io`].
#[must_use]
pub fn io_error(error: &std::io::Error) -> SweepError {
    SweepError::Io {
        message: error.to_string(),
    }
}

/// Writes one line to the report output.
pub fn line<W: Write>(writer: &mut W, text: impl Display) -> Result<(), SweepError> {
    writeln!(writer, "{text}").map_err(|e| io_error(&e))
}

/// Path of `file_name` inside the output directory, which defaults to the
/// working directory.
#[must_use]
pub fn output_path(config: &SweepConfig, file_name: &str) -> PathBuf {
    config
        .output_dir
        .as_deref()
        .unwrap_or_else(|| Path::new("."))
        .join(file_name)
}

/// Creates `file_name` in the output directory, creating the directory when
/// needed.
pub fn create_output(
    config: &SweepConfig,
    file_name: &str,
) -> Result<(PathBuf, BufWriter<File>), SweepError> {
    let path = output_path(config, file_name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| SweepError::Io {
            message: format!("create {}: {error}", parent.display()),
        })?;
    }
    let file = File::create(&path).map_err(|error| SweepError::Io {
        message: format!("create {}: {error}", path.display()),
    })?;
    Ok((path, BufWriter::new(file)))
}

/// One-line summary of a pull request.
#[must_use]
pub fn pull_summary(pull: &PullRequest) -> String {
    let title = pull.title.as_deref().unwrap_or("(no title)");
    let author = pull.author.as_deref().unwrap_or("unknown");
    let url = pull.html_url.as_deref().unwrap_or("no HTML URL provided");
    format!("  #{} {title} (@{author}) {url}", pull.number)
}
