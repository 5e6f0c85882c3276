//! Output writers for report rows.

use std::io::Write;

use chrono::{DateTime, Utc};
use minijinja::{Environment, Value, context};
use serde::Serialize;

use crate::github::error::SweepError;
use crate::release::ReleaseStatus;

use super::{Overview, ReviewRow, StatsSection, Totals, io_error};

const REVIEW_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Open pull requests</title>
</head>
<body>
<h1>Open pull requests</h1>
<p>Generated {{ generated_at }}</p>
<table>
<tr><th>Repository</th><th>PR</th><th>Age (days)</th><th>Author</th><th>Title</th><th>Comments</th><th>Last comment</th><th>By</th><th>Age (days)</th><th>No member comment</th><th>Mentions member</th></tr>
{% for row in rows %}<tr>
<td>{{ row.repository }}</td>
<td>{% if row.url %}<a href="{{ row.url }}">#{{ row.number }}</a>{% else %}#{{ row.number }}{% endif %}</td>
<td>{{ row.age_days }}</td>
<td>{{ row.author or "" }}</td>
<td>{{ row.title or "" }}</td>
<td>{{ row.comment_count }}</td>
<td>{{ row.last_comment or "" }}</td>
<td>{{ row.last_comment_by or "" }}</td>
<td>{{ row.last_comment_age_days if row.last_comment_age_days is not none else "" }}</td>
<td>{{ "yes" if row.no_member_comment else "" }}</td>
<td>{{ "yes" if row.mentions_member else "" }}</td>
</tr>
{% endfor %}</table>
</body>
</html>
"#;

const RELEASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Release readiness</title>
</head>
<body>
<h1>Release readiness</h1>
<p>Generated {{ generated_at }}</p>
<table>
<tr><th>Repository</th><th>Tag</th><th>Tagged</th><th>Commits since</th><th>Release due</th></tr>
{% for status in statuses %}<tr>
<td>{{ status.repository }}</td>
<td>{{ status.tag }}</td>
<td>{{ status.tagged_at[:10] if status.tagged_at else "unknown" }}</td>
<td>{{ status.commits_since }}</td>
<td>{{ "yes" if status.due else "no" }}</td>
</tr>
{% endfor %}</table>
</body>
</html>
"#;

const STATS_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Pull requests that need triage</title>
</head>
<body>
<h1>Pull requests that need triage</h1>
<p>Generated {{ generated_at }}</p>
<table>
<tr>{% for name in overview %}<th>{{ name }}</th>{% endfor %}</tr>
<tr>{% for name in overview %}<td>{{ overview[name] }}</td>{% endfor %}</tr>
</table>
<table>
<tr>{% for name in totals %}<th>{{ name }}</th>{% endfor %}</tr>
<tr>{% for name in totals %}<td>{{ totals[name] }}</td>{% endfor %}</tr>
</table>
{% for section in sections %}<h2>{{ section.title }} ({{ section.pulls | length }})</h2>
<table>
<tr><th>Title</th><th>Author</th><th>Repository</th></tr>
{% for pull in section.pulls %}<tr>
<td>{% if pull.url %}<a href="{{ pull.url }}">{{ pull.title or "#" ~ pull.number }}</a>{% else %}{{ pull.title or "#" ~ pull.number }}{% endif %}</td>
<td>{{ pull.author or "" }}</td>
<td>{{ pull.repository }}</td>
</tr>
{% endfor %}</table>
{% endfor %}</body>
</html>
"##;

/// Writes `rows` as CSV with a header row taken from the field names.
///
/// # Errors
///
/// Returns [`SweepError::Io`] when serialisation or writing fails.
pub fn write_csv<W: Write, R: Serialize>(writer: W, rows: &[R]) -> Result<(), SweepError> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(row).map_err(|e| SweepError::Io {
            message: format!("CSV serialisation failed: {e}"),
        })?;
    }
    out.flush().map_err(|e| io_error(&e))
}

/// Writes `value` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns [`SweepError::Io`] when serialisation or writing fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    value: &T,
) -> Result<(), SweepError> {
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| SweepError::Io {
        message: format!("JSON serialisation failed: {e}"),
    })?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writer.flush().map_err(|e| io_error(&e))
}

/// Renders the review table as an HTML page.
///
/// Text from GitHub is HTML-escaped.
///
/// # Errors
///
/// Returns [`SweepError::Io`] when rendering or writing fails.
pub fn write_review_html<W: Write>(
    writer: W,
    rows: &[ReviewRow],
    generated_at: DateTime<Utc>,
) -> Result<(), SweepError> {
    render_html(
        writer,
        "review.html",
        REVIEW_TEMPLATE,
        context! {
            generated_at => generated_at.to_rfc3339(),
            rows => rows,
        },
    )
}

/// Renders release statuses as an HTML table.
///
/// # Errors
///
/// Returns [`SweepError::Io`] when rendering or writing fails.
pub fn write_release_html<W: Write>(
    writer: W,
    statuses: &[ReleaseStatus],
    generated_at: DateTime<Utc>,
) -> Result<(), SweepError> {
    render_html(
        writer,
        "release.html",
        RELEASE_TEMPLATE,
        context! {
            generated_at => generated_at.to_rfc3339(),
            statuses => statuses,
        },
    )
}

/// Renders the stats summary and its pull request tables as an HTML page.
///
/// # Errors
///
/// Returns [`SweepError::Io`] when rendering or writing fails.
pub fn write_stats_html<W: Write>(
    writer: W,
    overview: &Overview,
    totals: &Totals,
    sections: &[StatsSection],
    generated_at: DateTime<Utc>,
) -> Result<(), SweepError> {
    render_html(
        writer,
        "report.html",
        STATS_TEMPLATE,
        context! {
            generated_at => generated_at.to_rfc3339(),
            overview => overview,
            totals => totals,
            sections => sections,
        },
    )
}

fn render_html<W: Write>(
    mut writer: W,
    name: &str,
    source: &str,
    context: Value,
) -> Result<(), SweepError> {
    let mut env = Environment::new();
    env.add_template(name, source).map_err(|e| SweepError::Io {
        message: format!("invalid template {name}: {e}"),
    })?;
    let template = env.get_template(name).map_err(|e| SweepError::Io {
        message: format!("failed to retrieve template: {e}"),
    })?;
    let output = template.render(context).map_err(|e| SweepError::Io {
        message: format!("template rendering failed: {e}"),
    })?;

    writer
        .write_all(output.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| io_error(&e))
}
