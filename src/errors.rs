//! Domain error types for cellmate.
//!
//! Token accounting, provider transport, and configuration each get a typed
//! enum, so callers can match on failure modes instead of parsing strings.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Token accounting errors
// ---------------------------------------------------------------------------

/// Errors from token estimation and window trimming.
///
/// These are hard failures by contract: an unrecognised model must never be
/// silently priced or given a default budget, and mandatory ("keep") content
/// that cannot fit is a configuration error, not something to drop quietly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token counting is not implemented for model {0}")]
    UnsupportedModel(String),

    #[error("no context limit is known for model {0}")]
    UnknownContextLimit(String),

    #[error("too much mandatory content: keep-marked messages need {required} tokens but the budget is {budget}")]
    MandatoryOverflow { required: usize, budget: usize },
}

// ---------------------------------------------------------------------------
// Provider errors
// ---------------------------------------------------------------------------

/// Errors from completion API operations.
///
/// Embedded in `anyhow::Error` so the `CompletionClient` trait signature
/// (`-> anyhow::Result<...>`) stays unchanged while callers can downcast:
/// `e.downcast_ref::<ProviderError>()`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Failed to read response body: {0}")]
    ResponseReadError(String),

    #[error("Failed to parse response JSON: {0}")]
    JsonParseError(String),

    #[error("Authentication failed (status {status}): {message}")]
    AuthError { status: u16, message: String },

    #[error("Server error (status {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Response contained no completion content")]
    MissingContent,
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors raised while assembling client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Please set the OPENAI_API_KEY environment variable")]
    MissingApiKey,
}

// ---------------------------------------------------------------------------
// Exception kind classification
// ---------------------------------------------------------------------------

/// Exception kinds that signal deliberate interruption rather than a bug.
///
/// The suggestion pipeline must pass these through untouched instead of
/// treating them as errors to diagnose.
const INTERRUPT_KINDS: &[&str] = &["KeyboardInterrupt", "SystemExit", "GeneratorExit"];

/// Returns true if an exception kind names an interrupt/exit signal.
pub fn is_interrupt_kind(kind: &str) -> bool {
    INTERRUPT_KINDS.contains(&kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- TokenError tests --

    #[test]
    fn test_unsupported_model_display() {
        let e = TokenError::UnsupportedModel("gpt-7".into());
        assert_eq!(
            e.to_string(),
            "token counting is not implemented for model gpt-7"
        );
    }

    #[test]
    fn test_mandatory_overflow_display() {
        let e = TokenError::MandatoryOverflow {
            required: 900,
            budget: 500,
        };
        assert!(e.to_string().contains("too much mandatory content"));
        assert!(e.to_string().contains("900"));
        assert!(e.to_string().contains("500"));
    }

    // -- ProviderError tests --

    #[test]
    fn test_http_failure_reports_its_cause() {
        let e = ProviderError::HttpError("dns lookup timed out".into());
        assert_eq!(e.to_string(), "HTTP request failed: dns lookup timed out");
    }

    #[test]
    fn test_auth_failure_survives_anyhow_wrapping() {
        let wrapped: anyhow::Error = ProviderError::AuthError {
            status: 403,
            message: "key revoked".into(),
        }
        .into();
        let recovered = wrapped.downcast_ref::<ProviderError>();
        assert!(matches!(
            recovered,
            Some(ProviderError::AuthError { status: 403, .. })
        ));
    }

    // -- ConfigError tests --

    #[test]
    fn test_missing_api_key_names_the_variable() {
        let e = ConfigError::MissingApiKey;
        assert!(e.to_string().contains("OPENAI_API_KEY"));
    }

    // -- interrupt classification tests --

    #[test]
    fn test_keyboard_interrupt_is_interrupt() {
        assert!(is_interrupt_kind("KeyboardInterrupt"));
    }

    #[test]
    fn test_system_exit_is_interrupt() {
        assert!(is_interrupt_kind("SystemExit"));
    }

    #[test]
    fn test_ordinary_error_is_not_interrupt() {
        assert!(!is_interrupt_kind("ValueError"));
        assert!(!is_interrupt_kind("ZeroDivisionError"));
    }
}
