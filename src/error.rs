//! Error types for the job board.

use crate::jobs::JobId;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Failures of a single backend call.
///
/// The `Display` text is what the user sees: the transport error message for
/// `Transport`, and the bare status code for `Status`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Status(u16),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Requested Job could not be Found")]
    NotFound,
}

impl ApiError {
    /// HTTP status code, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Errors raised by the page container and row controllers.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Job {id} is not on the board")]
    UnknownJob { id: JobId },

    #[error("Job {id} is already being edited")]
    AlreadyEditing { id: JobId },

    #[error("Job {id} is not being edited")]
    NotEditing { id: JobId },

    #[error("Job has no identifier")]
    MissingId,

    #[error("Invalid Form Values: {0}")]
    InvalidForm(String),

    #[error("Job list response arrived after a newer reload and was dropped")]
    Superseded,

    #[error(transparent)]
    Api(#[from] ApiError),
}
