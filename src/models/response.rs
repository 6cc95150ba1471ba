use serde::{Deserialize, Serialize};

/// Model identifier reported on every response. The generator is opaque, so this is fixed.
pub const MODEL_ID: &str = "claude-cli";

/// Content block of a generated message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBlock {
    Text { text: String },
}

/// Approximate usage accounting.
///
/// Both counts are whitespace-delimited word counts, not tokenizer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// Messages response returned by `POST /v1/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub role: String,
    pub content: Vec<ResponseBlock>,
    pub model: String,
    pub stop_reason: String,
    pub usage: Usage,
}

impl MessagesResponse {
    /// Wrap generated text as a single-block assistant message.
    pub fn from_text(text: String, usage: Usage) -> Self {
        Self {
            id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
            kind: "message".into(),
            role: "assistant".into(),
            content: vec![ResponseBlock::Text { text }],
            model: MODEL_ID.into(),
            stop_reason: "end_turn".into(),
            usage,
        }
    }

    /// Concatenated text of all blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|b| match b {
                ResponseBlock::Text { text } => text.as_str(),
            })
            .collect()
    }
}

/// Error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_wire_shape() {
        let resp = MessagesResponse::from_text(
            "Hello".into(),
            Usage {
                input_tokens: 3,
                output_tokens: 1,
            },
        );
        let v = serde_json::to_value(&resp).unwrap();

        assert_eq!(v["content"], json!([{"type": "text", "text": "Hello"}]));
        assert_eq!(v["model"], "claude-cli");
        assert_eq!(v["type"], "message");
        assert_eq!(v["role"], "assistant");
        assert_eq!(v["usage"], json!({"input_tokens": 3, "output_tokens": 1}));
        assert!(v["id"].as_str().unwrap().starts_with("msg_"));
    }

    #[test]
    fn error_body_shape() {
        let v = serde_json::to_value(ErrorBody::new("boom")).unwrap();
        assert_eq!(v, json!({"error": {"message": "boom"}}));
    }
}
