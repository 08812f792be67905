use serde::{Deserialize, Serialize};

/// One video discovered on a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Length in seconds, 0 when the extractor did not report one.
    pub duration: u64,
    pub url: String,
    /// `YYYYMMDD`, filled in lazily when the flat listing omits it.
    pub upload_date: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            url: Self::watch_url(&id),
            id,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_upload_date(mut self, date: impl Into<String>) -> Self {
        self.upload_date = Some(date.into());
        self
    }

    /// Canonical watch page for a video id.
    pub fn watch_url(id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", id)
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_uses_watch_url() {
        let item = Item::new("dQw4w9WgXcQ", "Title");
        assert_eq!(item.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(item.duration, 0);
        assert!(item.upload_date.is_none());
    }

    #[test]
    fn test_display_title_without_title() {
        let item = Item::new("a", "");
        assert_eq!(item.display_title(), "(Untitled)");
    }
}
