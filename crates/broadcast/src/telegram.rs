//! Telegram delivery backend.

use crate::SendError;
use serde::Serialize;
use std::future::Future;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// The outbound messaging seam.
///
/// Production uses [`TelegramSender`]; tests substitute their own
/// implementations to drive the engine without network access.
pub trait Sender: Send + Sync {
    fn send(
        &self,
        chat_id: i64,
        text: &str,
    ) -> impl Future<Output = Result<(), SendError>> + Send;
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
}

/// Sends messages through the Telegram Bot API.
pub struct TelegramSender {
    client: reqwest::Client,
    token: String,
}

impl TelegramSender {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
        }
    }

    fn send_url(&self) -> String {
        format!("{TELEGRAM_API_URL}/bot{}/sendMessage", self.token)
    }
}

impl Sender for TelegramSender {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), SendError> {
        let response = self
            .client
            .post(self.send_url())
            .json(&SendMessage {
                chat_id,
                text,
                parse_mode: "Markdown",
            })
            .send()
            .await
            .map_err(|e| SendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Status { status, body });
        }

        Ok(())
    }
}
