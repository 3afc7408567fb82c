use thiserror::Error;

/// Errors surfaced by the journal, its backends and the auth calls.
///
/// Everything propagates with `?` up to the command layer or the TUI, which
/// turns it into a printed message or a toast. Nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A field-presence or length check failed before any request was made.
    #[error("{0}")]
    Validation(String),

    #[error("Please sign in first (run `faye login`)")]
    NotSignedIn,

    #[error("{table} record {id} not found")]
    NotFound { table: String, id: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
