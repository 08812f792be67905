pub mod edit;
pub mod feed;
pub mod item;
pub mod notification;

pub use edit::{FeedEdit, KeywordField};
pub use feed::{Criteria, Feed, UrlRewrite, DEFAULT_FETCH_LIMIT};
pub use item::Item;
pub use notification::{DateCode, PendingNotification};
