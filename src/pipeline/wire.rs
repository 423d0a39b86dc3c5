//! Request and response envelope for the remote analysis endpoint.
//!
//! The HTTP client that carries these lives outside the crate; these
//! types pin down the JSON it exchanges so the canonical payload drops
//! straight into the outbound body and the answer text comes straight
//! back out.

use serde::{Deserialize, Serialize};

use super::types::EncodedImage;

/// Default extraction prompt sent alongside a report image.
pub const REPORT_ANALYSIS_PROMPT: &str = "\
Analyze this medical report image. Extract the findings, the measured \
values with their reference ranges, and summarize what the report states \
in plain language. If any part of the document is not readable, say so \
explicitly.";

/// Outbound chat-style request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub messages: Vec<ChatMessage>,
}

impl AnalysisRequest {
    /// Single user message carrying the prompt and the canonical payload.
    pub fn for_document(image: &EncodedImage, prompt: &str) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::Image {
                        media_type: image.media_type.clone(),
                        payload: image.payload.clone(),
                    },
                ],
            }],
        }
    }
}

/// One chat message in the outbound request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

/// A text or image part of a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        media_type: String,
        payload: String,
    },
}

/// Inbound response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

impl AnalysisResponse {
    /// Parse the endpoint's JSON body.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Free text of the first choice, if the endpoint returned one.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}
