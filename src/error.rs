//! Error taxonomy shared by the board, the remote clients and the dialogue engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised anywhere in the application.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Language \"{locale}\" doesn't have its lang file ({})", path.display())]
    MissingLanguage { locale: String, path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unrecognised model reply: {0}")]
    Parse(String),

    #[error("{0}")]
    Validation(String),

    #[error("Card {0} not found")]
    NotFound(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error came from talking to a remote endpoint.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Api { .. } | Error::InvalidResponse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
