use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::Result;
use crate::store::{read_document, write_document, SeenStore};

/// Feed locator to the ids already notified for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenState {
    feeds: BTreeMap<String, BTreeSet<String>>,
}

impl SeenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Working copy of one feed's seen set.
    pub fn ids(&self, locator: &str) -> BTreeSet<String> {
        self.feeds.get(locator).cloned().unwrap_or_default()
    }

    pub fn contains(&self, locator: &str, id: &str) -> bool {
        self.feeds
            .get(locator)
            .is_some_and(|ids| ids.contains(id))
    }

    /// Overwrites the feed's bucket.
    pub fn replace(&mut self, locator: &str, ids: BTreeSet<String>) {
        self.feeds.insert(locator.to_string(), ids);
    }

    pub fn feed_count(&self) -> usize {
        self.feeds.len()
    }
}

pub struct JsonSeenStore {
    path: PathBuf,
}

impl JsonSeenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeenStore for JsonSeenStore {
    fn load(&self) -> Result<SeenState> {
        read_document(&self.path)
    }

    fn save(&self, state: &SeenState) -> Result<()> {
        write_document(&self.path, state)
    }
}
