use super::{Error, Notifier};
use crate::model::Notification;
use axum::async_trait;
use serde::Deserialize;
use serde_json::json;

#[derive(Clone)]
pub struct TelegramNotifierConfig {
    pub bot_token: String,
}

///
/// Bot API transport for the telegram channel.
///
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(config: TelegramNotifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_token: config.bot_token,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), Error> {
        let Some(chat_id) = notification.chat_id else {
            return Err(Error::MissingRecipient(notification.channel));
        };

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let text = format!("*{}*\n\n{}", notification.subject, notification.message);
        let payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .json::<SendMessageResponse>()
            .await?;

        if !response.ok {
            return Err(Error::TelegramRejected(
                response.description.unwrap_or_default(),
            ));
        }

        tracing::info!(id = %notification.id, chat_id, "telegram message sent");

        Ok(())
    }
}
