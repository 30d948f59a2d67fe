//! Gemini Completion Client
//!
//! One network round-trip per call, no retry: a failure surfaces immediately
//! and the caller decides whether to resubmit. The [`CompletionCapability`]
//! trait is the seam the orchestrator depends on, so it can be exercised
//! without a network in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ProofGenError, Result};
use crate::headers::build_gemini_headers;
use crate::types::{CompletionRequest, GenerateContentResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-pro-exp-03-25";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Completion transport abstraction.
///
/// The credential is passed per call rather than held by the client; there is
/// no session with the remote service.
#[async_trait]
pub trait CompletionCapability: Send + Sync {
    /// Send one completion request and return the raw response text
    async fn complete(&self, api_key: &SecretString, request: &CompletionRequest)
    -> Result<String>;
}

/// Gemini client configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// HTTP timeout in seconds
    pub timeout: Option<u64>,
    /// Extra headers merged into every request
    pub extra_headers: std::collections::HashMap<String, String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT_SECS),
            extra_headers: std::collections::HashMap::new(),
        }
    }
}

impl GeminiConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set HTTP timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout.as_secs());
        self
    }
}

/// Gemini client for the `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: HttpClient,
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let http_client = HttpClient::builder().timeout(timeout).build().map_err(|e| {
            ProofGenError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
        })?;
        Ok(Self::with_http_client(config, http_client))
    }

    /// Create a new Gemini client with a custom HTTP client
    pub fn with_http_client(config: GeminiConfig, http_client: HttpClient) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl CompletionCapability for GeminiClient {
    async fn complete(
        &self,
        api_key: &SecretString,
        request: &CompletionRequest,
    ) -> Result<String> {
        let url = self.generate_content_url();
        let headers = build_gemini_headers(api_key.expose_secret(), &self.config.extra_headers)?;

        tracing::debug!(
            target: "proofgen::http",
            url = %url,
            model = %self.config.model,
            "sending generateContent request"
        );

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request.to_wire())
            .send()
            .await
            .map_err(|e| ProofGenError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_error(
                status.as_u16(),
                &body,
                status.canonical_reason(),
            ));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProofGenError::JsonError(e.to_string()))?;

        let text = body.text();
        if text.trim().is_empty() {
            return Err(ProofGenError::EmptyResponse);
        }

        tracing::debug!(
            target: "proofgen::http",
            model_version = body.model_version.as_deref().unwrap_or(""),
            chars = text.len(),
            "response received"
        );
        Ok(text)
    }
}

/// Map a non-2xx response to the library error taxonomy.
///
/// 401/403 are credential rejections; everything else is a generic API error.
/// The message comes from the Gemini error body when it parses, otherwise
/// from the status reason.
pub(crate) fn classify_http_error(
    status: u16,
    body_text: &str,
    fallback_message: Option<&str>,
) -> ProofGenError {
    let message = serde_json::from_str::<serde_json::Value>(body_text)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| fallback_message.unwrap_or("Unknown API error").to_string());

    match status {
        401 | 403 => ProofGenError::AuthenticationError(message),
        _ => ProofGenError::ApiError {
            code: status,
            message,
        },
    }
}
