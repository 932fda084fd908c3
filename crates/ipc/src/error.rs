//! Errors from decoding shell traffic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IpcError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// A script was valid JSON but not an array; carries the JSON kind found
    #[error("Expected a JSON array of commands, found {0}")]
    NotAScript(&'static str),

    #[error("Unknown language code {0:?}")]
    UnknownLanguage(String),
}
