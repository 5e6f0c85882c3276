//! Maps Octocrab failures onto [`SweepError`] variants.

use http::StatusCode;

use crate::github::error::SweepError;

const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Rate limiting is reported as 403 or 429 with a message or documentation
/// link naming the limit.
fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> SweepError {
    if let octocrab::Error::GitHub { source, .. } = error {
        let status = source.status_code;
        let message = &source.message;
        if is_rate_limit_error(source) {
            return SweepError::Api {
                message: format!("{operation} failed: rate limit exceeded ({message})"),
            };
        }
        if is_auth_failure(status) {
            return SweepError::Authentication {
                message: format!("{operation} failed: GitHub returned {status} {message}"),
            };
        }
        if status == StatusCode::NOT_FOUND {
            return SweepError::NotFound {
                message: format!("{operation}: {message}"),
            };
        }
        return SweepError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        };
    }

    if is_network_error(error) {
        return SweepError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    SweepError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps a non-success status from a raw response, using the GitHub
/// `message` field when the body carries one.
pub(super) fn map_http_error(operation: &str, status: StatusCode, body: &str) -> SweepError {
    let message = extract_github_message(body).unwrap_or_else(|| "unknown error".to_owned());
    if is_auth_failure(status) {
        SweepError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else if status == StatusCode::NOT_FOUND {
        SweepError::NotFound {
            message: format!("{operation}: {message}"),
        }
    } else {
        SweepError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
