pub mod ytdlp;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::Item;

/// Result of listing a channel.
#[derive(Debug, Clone, Default)]
pub struct FetchedFeed {
    /// Display name reported by the extractor, if any.
    pub channel: Option<String>,
    /// Items in the extractor's native order.
    pub items: Vec<Item>,
}

#[async_trait]
pub trait Fetcher {
    /// Lists at most `limit` recent items of the channel at `locator`.
    async fn fetch(&self, locator: &str, limit: usize) -> Result<FetchedFeed>;

    /// Looks up the `YYYYMMDD` upload date of a single video.
    async fn resolve_upload_date(&self, url: &str) -> Result<String>;
}
