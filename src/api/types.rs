//! Request and response bodies, shared with the terminal client.

use serde::{Deserialize, Serialize};

use crate::conversation::Message;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// The email island posts this as `topic`.
    #[serde(alias = "topic")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Kept as raw JSON so a non-array gets a precise 400 instead of a
/// generic deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleRequest {
    #[serde(default)]
    pub messages: serde_json::Value,
}

impl TitleRequest {
    pub fn new(messages: &[Message]) -> Self {
        Self {
            messages: serde_json::to_value(messages).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleResponse {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
