//! Request, response, and wire types.
//!
//! Wire structs mirror the Gemini `generateContent` REST shapes (camelCase
//! field names, optional fields skipped when absent). Domain types
//! ([`CompletionRequest`], [`ParsedProof`]) are the values the rest of the
//! crate passes around; they are immutable once constructed.

use serde::{Deserialize, Serialize};

/// A fully built completion request: frozen system instruction plus the
/// formatted user prompt. Constructed fresh per submission, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System instruction text sent as `systemInstruction`
    pub system_instruction: String,
    /// User prompt (`Formula: <input>`)
    pub prompt: String,
}

impl CompletionRequest {
    /// Convert to the Gemini wire representation
    pub fn to_wire(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(self.prompt.clone()),
                }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: Some(self.system_instruction.clone()),
                }],
            }),
        }
    }
}

/// The two segments of a parsed completion.
///
/// `thinking_steps` is empty when the model omitted the separator token.
/// `latex` is free of surrounding code-fence markers; it may be empty, which
/// downstream renderers must treat as "nothing to render".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProof {
    /// Free-form reasoning trace preceding the separator token
    pub thinking_steps: String,
    /// Sanitized bussproofs LaTeX markup
    pub latex: String,
}

/// Gemini Generate Content Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    /// The content of the current conversation with the model.
    pub contents: Vec<Content>,
    /// Developer set system instructions.
    #[serde(skip_serializing_if = "Option::is_none", rename = "systemInstruction")]
    pub system_instruction: Option<Content>,
}

/// Gemini Generate Content Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    /// Candidate responses from the model.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Output only. Metadata on the generation requests' token usage.
    #[serde(skip_serializing_if = "Option::is_none", rename = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
    /// Output only. The model version used to generate the response.
    #[serde(skip_serializing_if = "Option::is_none", rename = "modelVersion")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    ///
    /// Non-text parts are skipped; a response without candidates yields an
    /// empty string.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// A single generated candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Generated content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Reason the model stopped generating
    #[serde(skip_serializing_if = "Option::is_none", rename = "finishReason")]
    pub finish_reason: Option<String>,
}

/// Structured content: an ordered list of parts with an optional role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Producer of the content (`user` or `model`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part; only text parts are meaningful here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Inline text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Metadata on the generation requests' token usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Number of tokens in the prompt.
    #[serde(skip_serializing_if = "Option::is_none", rename = "promptTokenCount")]
    pub prompt_token_count: Option<i32>,
    /// Number of tokens in the response candidate.
    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "candidatesTokenCount"
    )]
    pub candidates_token_count: Option<i32>,
    /// Total token count for the generation request.
    #[serde(skip_serializing_if = "Option::is_none", rename = "totalTokenCount")]
    pub total_token_count: Option<i32>,
}
