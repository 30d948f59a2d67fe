//! proofgen
//!
//! Client library for generating natural deduction proof trees with Google
//! Gemini. Given a formula (premises and a conclusion), the library builds a
//! `generateContent` request carrying a frozen system instruction, sends it to
//! the Gemini API, and splits the raw completion into a plain-text reasoning
//! trace and sanitized bussproofs LaTeX ready for a math-typesetting renderer.
//!
//! The crate exposes three layers:
//! - [`prompt`] / [`parser`]: the pure request-building and response-contract
//!   parsing logic
//! - [`client`]: the Gemini HTTP transport (one attempt per call, no retry)
//! - [`service`]: the orchestrator tying them together behind an explicit
//!   request-lifecycle state machine for UI consumers
#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod headers;
pub mod keystore;
pub mod parser;
pub mod prompt;
pub mod service;
pub mod types;

pub use client::{CompletionCapability, GeminiClient, GeminiConfig};
pub use error::{ProofGenError, Result};
pub use keystore::{ApiKeyStore, MemoryKeyStore};
pub use parser::parse_completion;
pub use prompt::{SYSTEM_INSTRUCTION, THINKING_STEPS_SEPARATOR, build_completion_request};
pub use service::{ProofService, RequestState, RequestStateCell};
pub use types::{CompletionRequest, ParsedProof};
