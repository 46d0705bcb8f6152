//! Error type shared by the configuration, maze and asset layers.
//!
//! The per-tick core (motion and collision) has no failure modes; everything here
//! comes from I/O at the edges of the system.

use std::path::PathBuf;

/// Errors produced while loading configuration, maze files or obstacle models.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Maze dimensions must be odd and at least 5 in both directions.
    #[error("invalid maze size {width}x{height}: both sides must be odd and >= 5")]
    InvalidMazeSize { width: usize, height: usize },

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("malformed maze text at line {line}: {reason}")]
    MazeParse { line: usize, reason: String },

    #[error("failed to load obstacle model {path:?}: {reason}")]
    AssetLoad { path: PathBuf, reason: String },

    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
