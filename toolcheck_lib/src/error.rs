use thiserror::Error as ThisError;

/// Library errors.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Transport error.
    #[error("Failed to call provider API: {0}")]
    LLMCallError(#[from] reqwest::Error),

    /// JSON (de)serialization error.
    #[error("Failed to process JSON: {0}")]
    LLMJsonError(#[from] serde_json::Error),

    /// Unexpected response layout.
    #[error("Failed to parse provider response: {0}")]
    LLMResponseError(&'static str),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Provider responded with an error object.
    #[error("Provider responded with error: {0}")]
    LLMErrorMessage(String),

    /// File system error.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// General error.
    #[error("{0}")]
    Error(String),
}

impl Error {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::Io { path: path.as_ref().display().to_string(), source }
    }
}
