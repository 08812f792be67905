use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::notify::DispatchError;

#[derive(Error, Debug)]
pub enum ReelwatchError {
    #[error("Fetch failed for {locator}: {reason}")]
    Fetch { locator: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read/write {path}: {source}")]
    Document {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Feed not found: {0}")]
    FeedNotFound(String),

    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    #[error("Invalid rewrite pattern: {0}")]
    Rewrite(#[from] crate::rewrite::RewriteError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ReelwatchError>;
