use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// A single content block inside a message or the system field.
///
/// Only `text` blocks carry prompt text. Other block kinds (images, tool results, ...)
/// are accepted so a request does not fail to parse, but they contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Message content: either a plain string or an array of content blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// Flatten to plain text. Text blocks are joined with a newline.
    pub fn to_text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    ContentBlock::Other => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

/// One entry of the inbound `messages` array.
///
/// `role` is carried for logging only; the prompt is built from `content` alone.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<MessageContent>,
}

impl InboundMessage {
    pub fn text(content: &str) -> Self {
        Self {
            role: Some("user".into()),
            content: Some(content.into()),
        }
    }
}

/// Inbound Messages request (the subset the generator can honour).
///
/// Unknown fields such as `max_tokens`, `temperature` or `stream` are ignored.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesRequest {
    /// Requested model name. Logged, never used for selection.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub system: Option<MessageContent>,
    /// Absent or null is equivalent to an empty list.
    #[serde(default)]
    pub messages: Option<Vec<InboundMessage>>,
}

impl MessagesRequest {
    /// Non-empty system text, if any.
    pub fn system_text(&self) -> Option<String> {
        self.system
            .as_ref()
            .map(MessageContent::to_text)
            .filter(|s| !s.is_empty())
    }

    pub fn messages(&self) -> &[InboundMessage] {
        self.messages.as_deref().unwrap_or_default()
    }
}
