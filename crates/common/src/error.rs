//! Unified error type for the Vireo crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid game state: {0}")]
    InvalidGameState(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown recommendation label: {0}")]
    UnknownLabel(String),

    #[error("Dataset error at line {line}: {message}")]
    Dataset { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
