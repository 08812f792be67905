use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::notify::{DispatchError, SendOutcome, Transport};

const API_BASE: &str = "https://api.telegram.org";

/// Sends plain-text messages through the Telegram Bot API.
pub struct TelegramTransport {
    client: Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramTransport {
    pub fn new(bot_token: &str, chat_id: &str) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("reelwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DispatchError::Transport(e.without_url()))?;

        Ok(Self {
            client,
            base_url: API_BASE.to_string(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.base_url.trim_end_matches('/'),
            self.bot_token
        )
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(&self, text: &str) -> Result<SendOutcome, DispatchError> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_web_page_preview": false,
        });

        let response = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.without_url()))?;
        let status = response.status();

        if status == StatusCode::OK {
            return Ok(SendOutcome::Delivered);
        }

        let header_delay = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(&body).or(header_delay);
            return Ok(SendOutcome::RateLimited { retry_after });
        }

        Ok(SendOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Pulls `retry_after` out of a Bot API error body.
///
/// Telegram nests it under `parameters`; a top-level value is accepted too.
pub fn parse_retry_after(body: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("parameters")
        .and_then(|p| p.get("retry_after"))
        .or_else(|| value.get("retry_after"))
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.ceil() as u64)))
}
