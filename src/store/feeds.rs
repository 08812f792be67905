use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::app::{ReelwatchError, Result};
use crate::domain::Feed;
use crate::store::{read_document, write_document};

/// The channel list document. Always sorted by locator; a locator listed twice
/// keeps its last entry.
pub struct FeedStore {
    path: PathBuf,
}

impl FeedStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<Vec<Feed>> {
        let feeds: Vec<Feed> = read_document(&self.path)?;
        Ok(normalize(feeds))
    }

    pub fn save(&self, feeds: Vec<Feed>) -> Result<()> {
        write_document(&self.path, &normalize(feeds))
    }

    pub fn get(&self, url: &str) -> Result<Option<Feed>> {
        Ok(self.load()?.into_iter().find(|f| f.url == url))
    }

    /// Inserts or replaces the feed with the same locator.
    pub fn upsert(&self, feed: Feed) -> Result<()> {
        let mut feeds = self.load()?;
        feeds.retain(|f| f.url != feed.url);
        feeds.push(feed);
        self.save(feeds)
    }

    pub fn remove(&self, url: &str) -> Result<Feed> {
        let mut feeds = self.load()?;
        let pos = feeds
            .iter()
            .position(|f| f.url == url)
            .ok_or_else(|| ReelwatchError::FeedNotFound(url.to_string()))?;
        let removed = feeds.remove(pos);
        self.save(feeds)?;
        Ok(removed)
    }
}

fn normalize(feeds: Vec<Feed>) -> Vec<Feed> {
    let mut by_url = BTreeMap::new();
    for feed in feeds {
        if feed.url.trim().is_empty() {
            continue;
        }
        by_url.insert(feed.url.clone(), feed);
    }
    by_url.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedEdit;

    #[test]
    fn test_save_sorts_by_locator() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedStore::new(dir.path().join("channels.json"));

        store
            .save(vec![
                Feed::new("https://www.youtube.com/@c"),
                Feed::new("https://www.youtube.com/@a"),
                Feed::new("https://www.youtube.com/@b"),
            ])
            .unwrap();

        let urls: Vec<String> = store.load().unwrap().into_iter().map(|f| f.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://www.youtube.com/@a",
                "https://www.youtube.com/@b",
                "https://www.youtube.com/@c"
            ]
        );
    }

    #[test]
    fn test_duplicate_locator_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.json");
        std::fs::write(
            &path,
            r#"[
                {"url": "https://www.youtube.com/@a", "limit": 5},
                {"url": "https://www.youtube.com/@a", "limit": 9},
                {"url": ""}
            ]"#,
        )
        .unwrap();

        let feeds = FeedStore::new(&path).load().unwrap();
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].limit, 9);
    }

    #[test]
    fn test_upsert_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedStore::new(dir.path().join("channels.json"));
        let url = "https://www.youtube.com/@a";

        store.upsert(Feed::new(url)).unwrap();
        let edited = store
            .get(url)
            .unwrap()
            .unwrap()
            .apply(&[FeedEdit::SetMinLength(90)]);
        store.upsert(edited).unwrap();

        let feeds = store.load().unwrap();
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].criteria.min_length_seconds, 90);

        store.remove(url).unwrap();
        assert!(store.load().unwrap().is_empty());
        assert!(matches!(
            store.remove(url),
            Err(ReelwatchError::FeedNotFound(_))
        ));
    }
}
