//! Anthropic Messages API data models
//!
//! Defines the request and response structures exchanged with the provider

use serde::{Deserialize, Serialize};

/// Messages API request structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    /// Model name
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Message list
    pub messages: Vec<Message>,
}

/// Message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role (user/assistant)
    pub role: String,
    /// Message content
    pub content: String,
}

/// Content block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Text block
    #[serde(rename = "text")]
    Text { text: String },
    /// Anything else the provider may add later
    #[serde(other)]
    Unsupported,
}

/// Messages API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    /// Response ID
    #[serde(default)]
    pub id: String,
    /// Response content
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Model used
    #[serde(default)]
    pub model: String,
    /// Stop reason
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Usage statistics
    pub usage: Usage,
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Input token count
    pub input_tokens: u64,
    /// Output token count
    pub output_tokens: u64,
}

/// Error envelope; every field is optional so a malformed body still parses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl MessagesRequest {
    /// A request carrying a single user prompt
    pub fn single_prompt(model: impl Into<String>, max_tokens: u32, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.into(),
            }],
        }
    }
}

impl MessagesResponse {
    /// Concatenated text of all text blocks, `None` when there is none
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Unsupported => None,
            })
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl ErrorEnvelope {
    /// Parse an error body leniently
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn message(&self) -> Option<String> {
        self.error.as_ref().and_then(|e| e.message.clone())
    }

    pub fn error_type(&self) -> Option<String> {
        self.error.as_ref().and_then(|e| e.error_type.clone())
    }
}
