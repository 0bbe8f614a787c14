//! Error types for medalcal.

use thiserror::Error;

/// Errors raised by a calendar or light transport.
///
/// Transports classify their failures into these variants at the boundary,
/// so callers can match on `RateLimited` instead of inspecting messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

impl RemoteError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RemoteError::RateLimited(_))
    }

    /// Failures that may clear up on their own by the next attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::RateLimited(_) | RemoteError::Transport(_))
    }
}

/// Errors that can occur in medalcal operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Failure from the light transport. `Remote` is the calendar's.
    #[error("Lights: {0}")]
    Lights(RemoteError),

    #[error("No baseline counterpart for event '{0}'")]
    MissingBaseline(String),

    #[error("Event '{0}' appears more than once in the baseline")]
    DuplicateBaseline(String),

    #[error("Unknown color name: '{0}'")]
    UnknownColor(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for medalcal operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rate_limits_and_transport_failures_are_transient() {
        assert!(RemoteError::RateLimited("slow down".into()).is_transient());
        assert!(RemoteError::Transport("reset".into()).is_transient());
        assert!(!RemoteError::Forbidden("no".into()).is_transient());
        assert!(!RemoteError::Unauthorized("expired".into()).is_transient());
    }
}
