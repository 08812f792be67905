pub mod feeds;
pub mod seen;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app::{ReelwatchError, Result};

pub use feeds::FeedStore;
pub use seen::{JsonSeenStore, SeenState};

/// Durable record of which videos already produced a notification.
pub trait SeenStore {
    fn load(&self) -> Result<SeenState>;
    fn save(&self, state: &SeenState) -> Result<()>;
}

/// Reads a JSON document, returning `T::default()` when the file does not exist.
pub(crate) fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&content).map_err(|source| ReelwatchError::Document {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a JSON document through a sibling temp file so readers never see a
/// half-written file.
pub(crate) fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value).map_err(|source| ReelwatchError::Document {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
