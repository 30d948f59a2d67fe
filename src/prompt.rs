//! Request Builder: frozen prompt contract for the proof-generation model.
//!
//! The system instruction below is a frozen constant. Model behavior has been
//! tuned against this exact wording (the separator line, the
//! `\begin{prooftree}`/`\end{prooftree}` delimiters, the command restrictions);
//! edit it only together with [`crate::parser`].

use crate::error::{ProofGenError, Result};
use crate::types::CompletionRequest;

/// Literal token the model emits between its reasoning steps and the LaTeX.
pub const THINKING_STEPS_SEPARATOR: &str = "---THINKING_STEPS_END---";

/// Frozen system instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a specialized agent designed to receive premises and a conclusion and your job is to prove it using natural deduction. \
First write out your reasoning steps in plain text. \
When the reasoning is complete, output the exact line ---THINKING_STEPS_END--- with nothing else on it. \
After that line, output ONLY the tree shaped representation of the proof written in LaTeX representation. \
Do not include any explanatory text, greetings, context, or markdown formatting such as backticks (`) before or after the LaTeX code. Just output the raw LaTeX string required to render the formula. \
Start the latex directly in the \\begin{prooftree} and end it in \\end{prooftree}. do not add anything else. \
Do not use \\hypo or \\infer only use things like \\Axiom.";

const PROMPT_PREFIX: &str = "Formula: ";

/// Validate inputs and build an immutable [`CompletionRequest`].
///
/// Fails with [`ProofGenError::MissingApiKey`] on an empty key and
/// [`ProofGenError::MissingInput`] on an empty formula, in that order.
/// Persisting the key is the caller's concern, not this function's.
pub fn build_completion_request(api_key: &str, formula: &str) -> Result<CompletionRequest> {
    if api_key.is_empty() {
        return Err(ProofGenError::MissingApiKey);
    }
    if formula.is_empty() {
        return Err(ProofGenError::MissingInput);
    }
    Ok(CompletionRequest {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        prompt: format!("{PROMPT_PREFIX}{formula}"),
    })
}
