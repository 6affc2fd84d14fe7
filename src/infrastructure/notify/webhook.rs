use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::{
    entities::submission::Submission,
    errors::NotificationError,
    repositories::notifier::{DeliveryOutcome, Notifier},
};

const BOT_USERNAME: &str = "Portfolio Bot";
const EMBED_TITLE: &str = "📬 New Contact Form Submission";
const EMBED_COLOR: u32 = 0x9fef00;
const FOOTER_TEXT: &str = "Portfolio Contact Form";
const MAX_MESSAGE_CHARS: usize = 1000;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize, PartialEq)]
pub struct WebhookPayload {
    pub username: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
}

fn field(name: &str, value: impl Into<String>, inline: bool) -> EmbedField {
    EmbedField {
        name: name.to_string(),
        value: value.into(),
        inline,
    }
}

impl WebhookPayload {
    pub fn for_submission(submission: &Submission) -> Self {
        let subject = submission
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("No subject");
        let message: String = submission.message.chars().take(MAX_MESSAGE_CHARS).collect();

        let embed = Embed {
            title: EMBED_TITLE.to_string(),
            color: EMBED_COLOR,
            fields: vec![
                field("👤 Name", submission.name.as_str(), true),
                field("📧 Email", submission.email.as_str(), true),
                field("📝 Subject", subject, false),
                field("💬 Message", message, false),
                field("🕐 Submitted", submission.submitted_at.format(TIMESTAMP_FORMAT).to_string(), true),
                field("🌐 IP Address", submission.client_ip.as_deref().unwrap_or("Unknown"), true),
            ],
            footer: EmbedFooter { text: FOOTER_TEXT.to_string() },
        };

        WebhookPayload {
            username: BOT_USERNAME.to_string(),
            embeds: vec![embed],
        }
    }
}

/// Posts submissions to a chat webhook. Without a URL every delivery is skipped.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: Option<Url>,
}

impl WebhookNotifier {
    pub fn new(url: Option<Url>, timeout: Duration) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::Client(e.to_string()))?;

        Ok(WebhookNotifier { client, url })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, submission: &Submission) -> Result<DeliveryOutcome, NotificationError> {
        let Some(url) = &self.url else {
            return Ok(DeliveryOutcome::Skipped);
        };

        self.client
            .post(url.clone())
            .json(&WebhookPayload::for_submission(submission))
            .send()
            .await?
            .error_for_status()?;

        Ok(DeliveryOutcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn submission(subject: Option<&str>, message: &str, ip: Option<&str>) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: subject.map(String::from),
            message: message.into(),
            submitted_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            client_ip: ip.map(String::from),
            user_agent: String::new(),
            read: false,
            replied: false,
        }
    }

    fn value_of<'a>(payload: &'a WebhookPayload, name: &str) -> &'a str {
        payload.embeds[0]
            .fields
            .iter()
            .find(|f| f.name.ends_with(name))
            .map(|f| f.value.as_str())
            .unwrap()
    }

    #[test]
    fn payload_uses_placeholders_for_missing_values() {
        let payload = WebhookPayload::for_submission(&submission(None, "Hello there!", None));

        assert_eq!(payload.username, "Portfolio Bot");
        assert_eq!(value_of(&payload, "Subject"), "No subject");
        assert_eq!(value_of(&payload, "IP Address"), "Unknown");
        assert_eq!(value_of(&payload, "Submitted"), "2025-03-14 09:26:53");
    }

    #[test]
    fn payload_truncates_long_messages_by_character() {
        let long = "ü".repeat(1500);
        let payload = WebhookPayload::for_submission(&submission(Some("Hi"), &long, Some("203.0.113.7")));

        assert_eq!(value_of(&payload, "Message").chars().count(), 1000);
        assert_eq!(value_of(&payload, "Subject"), "Hi");
        assert_eq!(value_of(&payload, "IP Address"), "203.0.113.7");
    }

    #[test]
    fn payload_serializes_as_discord_embed() {
        let payload = WebhookPayload::for_submission(&submission(None, "Hello there!", None));
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["embeds"][0]["color"], 0x9fef00);
        assert_eq!(json["embeds"][0]["fields"].as_array().unwrap().len(), 6);
        assert_eq!(json["embeds"][0]["footer"]["text"], "Portfolio Contact Form");
    }

    #[tokio::test]
    async fn missing_url_skips_delivery() {
        let notifier = WebhookNotifier::new(None, Duration::from_secs(10)).unwrap();
        let outcome = notifier.notify(&submission(None, "Hello there!", None)).await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Skipped);
    }
}
