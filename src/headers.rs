//! Gemini HTTP header helpers.
//!
//! Centralizes header construction for Gemini API requests.
//! Behavior:
//! - Always include `Content-Type: application/json`
//! - If `custom_headers` already contains `Authorization` (case-insensitive), do not inject `x-goog-api-key`
//! - Otherwise, if `api_key` is non-empty, inject `x-goog-api-key` (marked sensitive)
//! - Always merge `custom_headers` (custom headers win when names collide)

use std::collections::HashMap;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::error::{ProofGenError, Result};

pub fn build_gemini_headers(
    api_key: &str,
    custom_headers: &HashMap<String, String>,
) -> Result<HeaderMap> {
    let has_authorization = custom_headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case("authorization"));

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if !has_authorization && !api_key.is_empty() {
        let mut value = HeaderValue::from_str(api_key).map_err(|e| {
            ProofGenError::ConfigurationError(format!("Invalid API key header value: {e}"))
        })?;
        value.set_sensitive(true);
        headers.insert("x-goog-api-key", value);
    }

    for (name, value) in custom_headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ProofGenError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            ProofGenError::ConfigurationError(format!("Invalid header value for '{name:?}': {e}"))
        })?;
        headers.insert(name, value);
    }

    Ok(headers)
}
