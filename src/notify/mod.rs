//! Outbound notifications.
//!
//! - [`Transport`]: one delivery attempt against a chat
//! - [`TelegramTransport`](telegram::TelegramTransport): Bot API implementation
//! - [`Dispatcher`](dispatcher::Dispatcher): ordered queue with rate-limit retry

pub mod dispatcher;
pub mod telegram;

use async_trait::async_trait;
use thiserror::Error;

pub use dispatcher::{DispatchPolicy, Dispatcher, FlushReport};
pub use telegram::TelegramTransport;

/// What the messaging API said about one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    /// HTTP 429; `retry_after` is the server-provided delay in seconds.
    RateLimited { retry_after: Option<u64> },
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Transport {
    async fn send(&self, text: &str) -> Result<SendOutcome, DispatchError>;
}

/// Failures that stop a dispatch pass.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("rate limited without a retry_after value")]
    MissingRetryAfter,

    #[error("asked to wait {secs}s before retrying, longer than allowed")]
    RetryAfterTooLong { secs: u64 },

    #[error("still rate limited after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("message rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("no messaging credentials configured")]
    NoTransport,

    #[error("interrupted while waiting to retry")]
    Cancelled,

    /// Built with the request URL stripped, since it carries the bot token.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
}
