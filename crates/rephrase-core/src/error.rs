use thiserror::Error;

/// Message shown when the network call itself fails or the body is not JSON.
pub const TRANSPORT_ERROR_MESSAGE: &str =
    "Could not reach the server. Please check your connection and try again.";

/// Message shown for a failure response without an `error` field.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Message shown when a success response cannot be rendered.
pub const INVALID_RESULT_MESSAGE: &str = "The server returned an invalid result.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Input is empty")]
    Empty,

    #[error("Input has {count} words, limit is {limit}")]
    OverLimit { count: usize, limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("A request is already in progress")]
    Busy,

    #[error("Transport error: {0}")]
    Transport(String),

    /// Failure reported by the backend, carrying its `error` text
    #[error("{0}")]
    Application(String),

    #[error("Invalid {kind} result: {reason}")]
    InvalidResult { kind: String, reason: String },

    #[error("Unrecognized result kind: {0}")]
    UnknownKind(String),

    #[error("Response has no result kind")]
    MissingKind,

    #[error("Markdown conversion failed: {0}")]
    Markdown(String),
}

impl ClientError {
    pub fn invalid_result(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        ClientError::InvalidResult {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Plain text for the error message element.
    ///
    /// Backend error text is shown verbatim; everything else maps to a
    /// fixed message so internal details never reach the page.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(ValidationError::Empty) => {
                "Please enter some text first.".to_string()
            }
            ClientError::Validation(ValidationError::OverLimit { limit, .. }) => {
                format!("Input text exceeds the {}-word limit.", limit)
            }
            ClientError::Busy => "Please wait for the current request to finish.".to_string(),
            ClientError::Transport(_) => TRANSPORT_ERROR_MESSAGE.to_string(),
            ClientError::Application(message) if message.trim().is_empty() => {
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
            ClientError::Application(message) => message.clone(),
            ClientError::InvalidResult { .. }
            | ClientError::UnknownKind(_)
            | ClientError::MissingKind
            | ClientError::Markdown(_) => INVALID_RESULT_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_is_verbatim() {
        let err = ClientError::Application("Input text exceeds the 200-word limit.".into());
        assert_eq!(err.user_message(), "Input text exceeds the 200-word limit.");
    }

    #[test]
    fn test_blank_application_error_uses_fallback() {
        let err = ClientError::Application("  ".into());
        assert_eq!(err.user_message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_internal_errors_are_generic() {
        assert_eq!(
            ClientError::Transport("TypeError: Failed to fetch".into()).user_message(),
            TRANSPORT_ERROR_MESSAGE
        );
        assert_eq!(
            ClientError::invalid_result("detect", "missing field `overall_score`").user_message(),
            INVALID_RESULT_MESSAGE
        );
        assert_eq!(
            ClientError::UnknownKind("summarize".into()).user_message(),
            INVALID_RESULT_MESSAGE
        );
    }

    #[test]
    fn test_validation_converts() {
        let err: ClientError = ValidationError::Empty.into();
        assert!(matches!(err, ClientError::Validation(ValidationError::Empty)));
    }
}
