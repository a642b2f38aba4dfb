//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Settings;
use crate::io::HttpClient;
use crate::notifier::Notifier;
use crate::BotError;

/// Envelope of every Bot API reply
#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to one chat through the Telegram Bot API
pub struct TelegramNotifier {
    send_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(settings: &Settings, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!(
            "Created TelegramNotifier for chat {}",
            settings.telegram_chat_id
        );

        Self {
            send_url: format!(
                "{}/bot{}/sendMessage",
                settings.telegram_api_url, settings.telegram_token
            ),
            chat_id: settings.telegram_chat_id.clone(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, text: &str) -> crate::Result<()> {
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        tracing::debug!("Sending Telegram message to chat {}", self.chat_id);

        let response = self
            .http
            .post_json(&self.send_url, &payload)
            .await
            .map_err(|e| match e {
                BotError::Http(cause) => BotError::Delivery(cause),
                other => other,
            })?;

        let reply = serde_json::from_str::<BotApiReply>(&response.body).ok();

        if response.status != 200 || !reply.as_ref().is_some_and(|r| r.ok) {
            let description = reply
                .and_then(|r| r.description)
                .unwrap_or(response.body);
            return Err(BotError::Delivery(format!(
                "Telegram API returned status {}: {}",
                response.status, description
            )));
        }

        tracing::debug!("Message sent to chat {}", self.chat_id);
        Ok(())
    }
}
