//! Error types for proofgen
//!
//! One flat taxonomy for the whole request pipeline: input validation errors
//! (`MissingApiKey`, `MissingInput`), remote-service errors
//! (`AuthenticationError`, `ApiError`, `HttpError`, `EmptyResponse`), and
//! local configuration/decoding failures. Every variant carries a
//! human-readable message; nothing here is fatal, a caller recovers by
//! resubmitting.

use thiserror::Error;

/// Errors that can occur while generating a proof
#[derive(Error, Debug)]
pub enum ProofGenError {
    /// No API key was provided for the request
    #[error("API key is missing.")]
    MissingApiKey,

    /// No formula input was provided for the request
    #[error("Formula input is missing.")]
    MissingInput,

    /// The remote service rejected the credential (HTTP 401/403)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Any other non-2xx response from the remote service
    #[error("API error {code}: {message}")]
    ApiError {
        /// HTTP status code
        code: u16,
        /// Message extracted from the error body, or the status reason
        message: String,
    },

    /// Network-level failure (connect, send, read)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The remote service answered 2xx but the extracted text was empty
    #[error("Empty response received from API.")]
    EmptyResponse,

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Client-side configuration problem (bad header value, bad timeout)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type for proofgen operations
pub type Result<T> = std::result::Result<T, ProofGenError>;
