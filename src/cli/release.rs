//! Release readiness of every selected repository.

use std::io::Write;

use prsweep::SweepError;
use prsweep::release::{ReleaseStatus, check_release};
use prsweep::report::{write_json, write_release_html};

use super::output::{create_output, line};
use super::{GitHub, Run, skip};

/// Prints one line per repository saying whether a release is due.
///
/// With an output directory configured the statuses are also written to
/// `release.json` and rendered as a table in `release.html`.
///
/// # Errors
///
/// Returns a missing threshold, an invalid tag pattern or an output error;
/// repository failures are skipped.
pub async fn run<G: GitHub, W: Write>(run: &Run<'_, G>, writer: &mut W) -> Result<(), SweepError> {
    let thresholds = run.config.release_thresholds()?;
    if let Some(pattern) = run.config.tag_regex.as_deref() {
        prsweep::github::compile_pattern(pattern)?;
    }

    let mut statuses = Vec::new();
    for repository in &run.repositories {
        let checked = check_release(
            run.github(),
            repository,
            run.config.tag_regex.as_deref(),
            thresholds,
            run.now,
        )
        .await;
        match checked {
            Ok(Some(status)) => {
                line(writer, describe(&status))?;
                statuses.push(status);
            }
            Ok(None) => line(writer, format_args!("{repository}: no matching tags"))?,
            Err(error) => skip(repository, &error),
        }
    }

    if run.config.output_dir.is_some() {
        let (json_path, json) = create_output(run.config, "release.json")?;
        write_json(json, &statuses)?;
        let (html_path, html) = create_output(run.config, "release.html")?;
        write_release_html(html, &statuses, run.now)?;
        for path in [json_path, html_path] {
            line(writer, format_args!("wrote {}", path.display()))?;
        }
    }
    Ok(())
}

fn describe(status: &ReleaseStatus) -> String {
    let Some(tagged_at) = status.tagged_at else {
        return format!("{} {}: tag date unknown", status.repository, status.tag);
    };
    let verdict = if status.due {
        "release due"
    } else {
        "up to date"
    };
    format!(
        "{} {} tagged {} with {} commits since: {verdict}",
        status.repository,
        status.tag,
        tagged_at.date_naive(),
        status.commits_since
    )
}
