//! Maps Google API failures onto `RemoteError`.

use medalcal_core::RemoteError;
use serde::Deserialize;

/// Reasons Google uses for quota exhaustion.
const RATE_LIMIT_REASONS: &[&str] = &["rateLimitExceeded", "userRateLimitExceeded"];

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
}

/// Classify an error response by status and the `reason` in its JSON body.
pub fn classify(status: u16, body: &str) -> RemoteError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();

    let message = parsed
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    let rate_limited = parsed.as_ref().is_some_and(|e| {
        e.error
            .errors
            .iter()
            .any(|d| RATE_LIMIT_REASONS.contains(&d.reason.as_str()))
    });

    match status {
        429 => RemoteError::RateLimited(message),
        403 if rate_limited => RemoteError::RateLimited(message),
        401 => RemoteError::Unauthorized(message),
        403 => RemoteError::Forbidden(message),
        404 | 410 => RemoteError::NotFound(message),
        _ => RemoteError::Http { status, message },
    }
}

pub fn transport(err: reqwest::Error) -> RemoteError {
    if err.is_decode() {
        RemoteError::Malformed(err.to_string())
    } else {
        RemoteError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE_LIMIT_BODY: &str = r#"{
      "error": {
        "errors": [{ "domain": "usageLimits", "reason": "rateLimitExceeded", "message": "Rate Limit Exceeded" }],
        "code": 403,
        "message": "Rate Limit Exceeded"
      }
    }"#;

    #[test]
    fn forbidden_with_rate_limit_reason_is_rate_limited() {
        assert_eq!(
            classify(403, RATE_LIMIT_BODY),
            RemoteError::RateLimited("Rate Limit Exceeded".into())
        );
    }

    #[test]
    fn plain_forbidden_is_not_retried() {
        let body = r#"{"error":{"errors":[{"reason":"forbidden"}],"code":403,"message":"Forbidden"}}"#;
        assert_eq!(classify(403, body), RemoteError::Forbidden("Forbidden".into()));
    }

    #[test]
    fn too_many_requests_is_rate_limited_without_body() {
        assert!(classify(429, "").is_rate_limited());
    }

    #[test]
    fn other_statuses() {
        assert!(matches!(classify(404, "{}"), RemoteError::NotFound(_)));
        assert!(matches!(classify(401, "nope"), RemoteError::Unauthorized(m) if m == "nope"));
        assert_eq!(
            classify(500, "boom"),
            RemoteError::Http {
                status: 500,
                message: "boom".into()
            }
        );
    }
}
