//! Error types for the Tutorius domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Tutorius operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Completion service errors ---
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    // --- Progress store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Caller-facing tutor errors ---
    #[error("Tutor error: {0}")]
    Tutor(#[from] TutorError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures surfaced by a [`crate::CompletionService`] implementation.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures surfaced by a [`crate::ProgressStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// Errors surfaced to the caller of the tutoring operations.
///
/// `InvalidInput` is returned before any store or network access is
/// attempted. `TutorUnavailable` carries the localized (Lithuanian)
/// message selected by the engine's upstream-failure classification;
/// retry is left to the caller.
#[derive(Debug, Clone, Error)]
pub enum TutorError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{message}")]
    TutorUnavailable { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_error_displays_correctly() {
        let err = Error::Completion(CompletionError::Api {
            status_code: 502,
            message: "Bad gateway".into(),
        });
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("Bad gateway"));
    }

    #[test]
    fn tutor_unavailable_displays_message_verbatim() {
        let err = TutorError::TutorUnavailable {
            message: "AI tutorius šiuo metu perkrautas.".into(),
        };
        assert_eq!(err.to_string(), "AI tutorius šiuo metu perkrautas.");
    }

    #[test]
    fn invalid_input_names_the_field() {
        let err = TutorError::InvalidInput("message".into());
        assert!(err.to_string().contains("message"));
    }
}
