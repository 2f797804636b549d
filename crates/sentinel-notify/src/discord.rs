//! Discord REST sink.
//!
//! Renders a `Notification` as one embed and posts it with a bot token via
//! `POST /channels/{id}/messages`. No gateway connection: the monitor only
//! writes outbound, so plain REST is enough.

use crate::error::{NotifyError, NotifyResult};
use crate::payload::Notification;
use crate::sink::{BoxFuture, NotificationSink};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for Discord API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default REST base.
const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Request body for creating a channel message.
#[derive(Debug, Serialize)]
struct CreateMessageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<u32>,
    fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<EmbedFooter>,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: String,
    value: String,
    inline: bool,
}

#[derive(Debug, Serialize)]
struct EmbedFooter {
    text: String,
}

fn to_request(notification: Notification) -> CreateMessageRequest {
    CreateMessageRequest {
        content: notification
            .mention_everyone
            .then(|| "@everyone".to_string()),
        embeds: vec![Embed {
            title: notification.title,
            color: notification.color,
            fields: notification
                .fields
                .into_iter()
                .map(|f| EmbedField {
                    name: f.name,
                    value: f.value,
                    inline: false,
                })
                .collect(),
            footer: notification.footer_text.map(|text| EmbedFooter { text }),
        }],
    }
}

/// Sink posting notifications to Discord channels.
pub struct DiscordSink {
    http: Client,
    api_base: String,
    bot_token: String,
}

impl DiscordSink {
    /// Create a sink using the public API base.
    pub fn new(bot_token: impl Into<String>) -> NotifyResult<Self> {
        Self::with_api_base(bot_token, DEFAULT_API_BASE)
    }

    /// Create a sink against a specific API base (tests, proxies).
    pub fn with_api_base(
        bot_token: impl Into<String>,
        api_base: impl Into<String>,
    ) -> NotifyResult<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(NotifyError::Transport)?;

        Ok(Self {
            http,
            api_base: api_base.into(),
            bot_token: bot_token.into(),
        })
    }
}

impl NotificationSink for DiscordSink {
    fn deliver(&self, channel_id: u64, notification: Notification) -> BoxFuture<'_, NotifyResult<()>> {
        Box::pin(async move {
            let url = format!(
                "{}/channels/{channel_id}/messages",
                self.api_base.trim_end_matches('/')
            );
            let request = to_request(notification);

            let response = self
                .http
                .post(&url)
                .header("Authorization", format!("Bot {}", self.bot_token))
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                warn!(channel_id, %status, body = %body, "Discord rejected notification");
                return Err(NotifyError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            debug!(channel_id, "Notification delivered");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_mapping() {
        let notification = Notification::new("New order")
            .field("Buyer", "buyer01")
            .field("Total", "123.45 PLN")
            .footer("Order 101")
            .color(0x2ecc71);

        let request = to_request(notification);
        assert!(request.content.is_none());
        assert_eq!(request.embeds.len(), 1);

        let embed = &request.embeds[0];
        assert_eq!(embed.title, "New order");
        assert_eq!(embed.color, Some(0x2ecc71));
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[0].name, "Buyer");
        assert!(!embed.fields[0].inline);
        assert_eq!(embed.footer.as_ref().unwrap().text, "Order 101");
    }

    #[test]
    fn test_mention_everyone_sets_content() {
        let request = to_request(Notification::new("New message").mention_everyone(true));
        assert_eq!(request.content.as_deref(), Some("@everyone"));
    }

    #[test]
    fn test_request_serializes_without_empty_options() {
        let request = to_request(Notification::new("t"));
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("content").is_none());
        assert!(body["embeds"][0].get("color").is_none());
        assert!(body["embeds"][0].get("footer").is_none());
    }
}
