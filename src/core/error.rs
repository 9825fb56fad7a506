//! Error types for the voxelamming engine

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument `{name}`: {value:?}")]
    InvalidArgument { name: &'static str, value: String },

    #[error("Command `{command}` is not available on the {surface} surface")]
    Unsupported {
        command: &'static str,
        surface: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timestamp error: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Link error: {0}")]
    Link(#[from] voxelamming_link::LinkError),
}
