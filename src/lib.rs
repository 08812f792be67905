//! # Reelwatch
//!
//! Watches video channels and sends a Telegram message for every new video
//! that passes the channel's filters. Each video is announced at most once.
//!
//! ## Architecture
//!
//! ```text
//! Monitor → Scanner → (Fetcher, Filter, Rewrite) → Dispatcher → Transport
//!              ↕
//!          SeenStore
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Store Telegram credentials
//! reelwatch config --bot-token 123:abc --chat-id @me
//!
//! # Watch a channel for long launch videos
//! reelwatch add https://www.youtube.com/@rockets/videos \
//!     --title-include launch --min-length 60
//!
//! # See what would be sent
//! reelwatch dry-run
//!
//! # Check every six hours
//! reelwatch run --interval-hours 6
//! ```

/// Run context and error types.
pub mod app;

/// Command-line interface using clap.
///
/// - `run` / `dry-run` - scan and notify
/// - `add` / `edit` / `remove` / `list` - manage channels
/// - `preview` - show filter verdicts for recent videos
/// - `preset` - named URL rewrites
/// - `config` - Telegram credentials
pub mod cli;

/// Telegram credentials and the regex preset library.
pub mod config;

/// Core domain models.
///
/// - [`Feed`](domain::Feed) and [`Criteria`](domain::Criteria)
/// - [`Item`](domain::Item): one video
/// - [`PendingNotification`](domain::PendingNotification) and [`DateCode`](domain::DateCode)
/// - [`FeedEdit`](domain::FeedEdit): configuration changes applied to a feed snapshot
pub mod domain;

/// Channel listing through `yt-dlp`.
pub mod fetcher;

/// Criteria evaluation and rejection reasons.
pub mod filter;

/// Scan loop with interval repeat and signal handling.
pub mod monitor;

/// Delivery through the Telegram Bot API with rate-limit retry.
pub mod notify;

/// Regex URL rewriting.
pub mod rewrite;

/// Per-channel scan.
pub mod scanner;

/// JSON documents: channel list and seen-state.
pub mod store;
