//! Error types for gatecheck.
//!
//! This module defines all error types used throughout the gatecheck crate,
//! providing detailed context for debugging and user-friendly error messages.

use thiserror::Error;

/// The main error type for gatecheck operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Catalog Errors ===
    /// A catalog was built with two questions sharing a key.
    #[error("duplicate question key '{key}' in catalog")]
    DuplicateQuestionKey {
        /// The offending key.
        key: String,
    },

    /// An answer was addressed to a key the catalog does not define.
    #[error("unknown question key '{key}'")]
    UnknownQuestion {
        /// The offending key.
        key: String,
    },

    // === Answer Store Errors ===
    /// An answer was set on a dependent question whose prerequisite is
    /// still unanswered.
    #[error("question '{key}' is inactive: prerequisite '{prerequisite}' is unanswered")]
    QuestionInactive {
        /// The dependent question's key.
        key: String,
        /// The unanswered prerequisite's key.
        prerequisite: String,
    },

    /// An answer value is outside the question's permitted domain.
    #[error("answer '{value}' is not permitted for question '{key}'")]
    AnswerNotPermitted {
        /// The question's key.
        key: String,
        /// The rejected value.
        value: String,
    },

    // === Submission Errors ===
    /// A payload was assembled from an invalid form. Unreachable when the
    /// caller gates submission on the validation engine.
    #[error("form is not valid: {reason}")]
    ValidationBlocked {
        /// What is missing or too short.
        reason: String,
    },

    /// The backend was unreachable or returned a non-success status.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O & Serialization Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for gatecheck operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a duplicate question key error.
    #[must_use]
    pub fn duplicate_question_key(key: impl Into<String>) -> Self {
        Self::DuplicateQuestionKey { key: key.into() }
    }

    /// Create an unknown question error.
    #[must_use]
    pub fn unknown_question(key: impl Into<String>) -> Self {
        Self::UnknownQuestion { key: key.into() }
    }

    /// Create a question inactive error.
    #[must_use]
    pub fn question_inactive(key: impl Into<String>, prerequisite: impl Into<String>) -> Self {
        Self::QuestionInactive {
            key: key.into(),
            prerequisite: prerequisite.into(),
        }
    }

    /// Create an answer-not-permitted error.
    #[must_use]
    pub fn answer_not_permitted(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AnswerNotPermitted {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a validation blocked error.
    #[must_use]
    pub fn validation_blocked(reason: impl Into<String>) -> Self {
        Self::ValidationBlocked {
            reason: reason.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error indicates the form was not valid.
    #[must_use]
    pub fn is_validation_blocked(&self) -> bool {
        matches!(self, Self::ValidationBlocked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_question_key_display() {
        let err = Error::duplicate_question_key("gateEntryPojo");
        assert_eq!(
            err.to_string(),
            "duplicate question key 'gateEntryPojo' in catalog"
        );
    }

    #[test]
    fn test_unknown_question_display() {
        let err = Error::unknown_question("bogus");
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_question_inactive_display() {
        let err = Error::question_inactive("reason", "gate");
        let msg = err.to_string();
        assert!(msg.contains("reason"));
        assert!(msg.contains("gate"));
    }

    #[test]
    fn test_answer_not_permitted_display() {
        let err = Error::answer_not_permitted("gate", "sideways");
        let msg = err.to_string();
        assert!(msg.contains("gate"));
        assert!(msg.contains("sideways"));
    }

    #[test]
    fn test_validation_blocked_display() {
        let err = Error::validation_blocked("remarks too short");
        assert!(err.to_string().contains("remarks too short"));
        assert!(err.is_validation_blocked());
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "base_url must not be empty".to_string(),
        };
        assert!(err.to_string().contains("base_url"));
    }
}
