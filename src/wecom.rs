use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::types::Config;

/// errcode returned when the robot behind the webhook no longer exists.
pub const INVALID_WEBHOOK_ERRCODE: i64 = 93000;

/// Everyone in the group, for `mentioned_list`.
pub const MENTION_ALL: &str = "@all";

/// Group-robot message, tagged by `msgtype` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum WebhookMessage {
    Markdown { markdown: MarkdownContent },
    Text { text: TextContent },
    News { news: serde_json::Value },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkdownContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TextContent {
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mentioned_list: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mentioned_mobile_list: Vec<String>,
}

impl From<&str> for TextContent {
    fn from(content: &str) -> Self {
        Self { content: content.to_string(), ..Default::default() }
    }
}

impl From<String> for TextContent {
    fn from(content: String) -> Self {
        Self { content, ..Default::default() }
    }
}

impl WebhookMessage {
    pub fn markdown(content: impl Into<String>) -> Self {
        WebhookMessage::Markdown {
            markdown: MarkdownContent { content: content.into() },
        }
    }

    /// Plain text; extra mentions are appended to whatever `content` already carries.
    pub fn text(
        content: impl Into<TextContent>,
        mentioned: &[&str],
        mentioned_mobiles: &[&str],
    ) -> Self {
        let mut text = content.into();
        text.mentioned_list.extend(mentioned.iter().map(|s| s.to_string()));
        text.mentioned_mobile_list
            .extend(mentioned_mobiles.iter().map(|s| s.to_string()));
        WebhookMessage::Text { text }
    }

    pub fn news(articles: serde_json::Value) -> Self {
        WebhookMessage::News { news: articles }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WebhookMessage::Markdown { .. } => "markdown",
            WebhookMessage::Text { .. } => "text",
            WebhookMessage::News { .. } => "news",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookAck {
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: Option<String>,
}

impl WebhookAck {
    pub fn is_ok(&self) -> bool {
        self.errcode == 0
    }
}

/// Anything that can deliver a chat message. `None` means nothing usable came back.
#[allow(async_fn_in_trait)]
pub trait MessageSink {
    async fn deliver(&self, message: &WebhookMessage) -> Option<WebhookAck>;
}

pub struct WeComNotifier {
    http: reqwest::Client,
    webhook_url: String,
    timeout: Duration,
}

impl WeComNotifier {
    pub fn new(cfg: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url: cfg.webhook_url.clone(),
            timeout: cfg.notify_timeout,
        }
    }

    /// Post once, no retry. Transport and decode failures are logged and swallowed.
    pub async fn send(&self, message: &WebhookMessage) -> Option<WebhookAck> {
        info!("Sending {} message to WeCom", message.kind());
        match self.post(message).await {
            Ok(ack) => {
                if ack.is_ok() {
                    info!("WeCom message delivered");
                } else {
                    warn!(
                        "WeCom rejected message: errcode {} ({})",
                        ack.errcode,
                        ack.errmsg.as_deref().unwrap_or("no errmsg")
                    );
                    if ack.errcode == INVALID_WEBHOOK_ERRCODE {
                        warn!("Webhook looks invalid; recreate the group robot and update the secret");
                    }
                }
                Some(ack)
            }
            Err(e) => {
                error!("Failed to send WeCom message: {:#}", e);
                None
            }
        }
    }

    async fn post(&self, message: &WebhookMessage) -> Result<WebhookAck> {
        let res = self
            .http
            .post(&self.webhook_url)
            .json(message)
            .timeout(self.timeout)
            .send()
            .await
            .context("Failed to send WeCom request")?;
        info!("WeCom response status: {}", res.status());
        res.json::<WebhookAck>()
            .await
            .context("Failed to decode WeCom acknowledgement")
    }
}

impl MessageSink for WeComNotifier {
    async fn deliver(&self, message: &WebhookMessage) -> Option<WebhookAck> {
        self.send(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_markdown_payload_shape() {
        let v = serde_json::to_value(WebhookMessage::markdown("## hi")).unwrap();
        assert_eq!(v, json!({"msgtype": "markdown", "markdown": {"content": "## hi"}}));
    }

    #[test]
    fn test_text_payload_wraps_bare_string() {
        let msg = WebhookMessage::text("停电预警", &[MENTION_ALL], &["13800000000"]);
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            v,
            json!({
                "msgtype": "text",
                "text": {
                    "content": "停电预警",
                    "mentioned_list": ["@all"],
                    "mentioned_mobile_list": ["13800000000"]
                }
            })
        );
    }

    #[test]
    fn test_text_payload_omits_empty_mentions() {
        let v = serde_json::to_value(WebhookMessage::text("plain", &[], &[])).unwrap();
        assert_eq!(v, json!({"msgtype": "text", "text": {"content": "plain"}}));
    }

    #[test]
    fn test_text_payload_from_structured_content() {
        let content = TextContent {
            content: "x".to_string(),
            mentioned_list: vec!["zhangsan".to_string()],
            mentioned_mobile_list: Vec::new(),
        };
        let msg = WebhookMessage::text(content, &[MENTION_ALL], &[]);
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["text"]["mentioned_list"], json!(["zhangsan", "@all"]));
    }

    #[test]
    fn test_news_passes_through() {
        let articles = json!({"articles": [{"title": "t", "url": "https://example.com"}]});
        let v = serde_json::to_value(WebhookMessage::news(articles.clone())).unwrap();
        assert_eq!(v["msgtype"], "news");
        assert_eq!(v["news"], articles);
    }

    #[test]
    fn test_ack_decoding() {
        let ack: WebhookAck = serde_json::from_str(r#"{"errcode":0,"errmsg":"ok"}"#).unwrap();
        assert!(ack.is_ok());
        let ack: WebhookAck = serde_json::from_str(r#"{"errcode":93000}"#).unwrap();
        assert!(!ack.is_ok());
        assert_eq!(ack.errmsg, None);
    }
}
