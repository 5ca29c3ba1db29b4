//! Telegram notification module
//!
//! Delivers the rendered digest (and failure notices) to a Telegram chat.


use crate::config::TelegramConfig;
use crate::error::{DigestError, Result};
use crate::types::Report;
use reqwest::Client;
use serde::Serialize;

/// Telegram notifier
#[derive(Clone)]
pub struct Notifier {
    http: Client,
    bot_token: String,
    chat_id: String,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct TelegramMessage {
    chat_id: String,
    text: String,
    parse_mode: String,
}

impl Notifier {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            http: Client::new(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            enabled: true,
        }
    }

    /// Create a disabled notifier (for tests and dry runs).
    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            bot_token: String::new(),
            chat_id: String::new(),
            enabled: false,
        }
    }

    /// Send a raw message (HTML format).
    pub async fn send(&self, text: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let msg = TelegramMessage {
            chat_id: self.chat_id.clone(),
            text: text.to_string(),
            parse_mode: "HTML".to_string(),
        };

        let response = self.http.post(&url).json(&msg).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Telegram send failed ({}): {}", status, error_text);
            return Err(DigestError::Delivery(format!(
                "Telegram returned {}",
                status
            )));
        }

        Ok(())
    }

    /// Deliver the rendered digest.
    pub async fn send_report(&self, report: &Report) -> Result<()> {
        self.send(&report.to_text()).await
    }

    /// Deliver a short fallback notice when digest generation failed.
    pub async fn send_failure(&self, context: &str, error: &str) -> Result<()> {
        let text = format!(
            "⚠️ <b>Digest failed</b>\n\n\
            Context: {}\n\
            Error: <code>{}</code>",
            context,
            truncate(error, 200),
        );

        self.send(&text).await
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() > max_len {
        format!("{}...", &s[..max_len])
    } else {
        s.to_string()
    }
}
