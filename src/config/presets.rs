use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{ReelwatchError, Result};
use crate::domain::UrlRewrite;
use crate::rewrite;
use crate::store::{read_document, write_document};

/// Named URL rewrites that can be attached to any feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetLibrary {
    presets: BTreeMap<String, UrlRewrite>,
}

impl PresetLibrary {
    pub fn load(path: &Path) -> Result<Self> {
        read_document(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_document(path, self)
    }

    pub fn get(&self, name: &str) -> Result<&UrlRewrite> {
        self.presets
            .get(name)
            .ok_or_else(|| ReelwatchError::PresetNotFound(name.to_string()))
    }

    /// Adds or replaces a preset after checking its pattern compiles.
    pub fn insert(&mut self, name: &str, rule: UrlRewrite) -> Result<()> {
        rewrite::validate(&rule.pattern)?;
        self.presets.insert(name.to_string(), rule);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<UrlRewrite> {
        self.presets
            .remove(name)
            .ok_or_else(|| ReelwatchError::PresetNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UrlRewrite)> {
        self.presets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
