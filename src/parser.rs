//! Response Parser: split the raw completion into reasoning trace and LaTeX.
//!
//! The model contract is textual and fragile, so parsing is a tolerant
//! two-phase scan rather than a strict grammar:
//! 1. split at the first occurrence of [`THINKING_STEPS_SEPARATOR`]; a
//!    missing separator is a valid degraded variant (empty trace), not an
//!    error;
//! 2. strip one layer of markdown code fences from the LaTeX segment, only at
//!    the true start and end of the string.
//!
//! Pure and deterministic; the only side effect is a `warn` log on the
//! missing-separator path.

use crate::prompt::THINKING_STEPS_SEPARATOR;
use crate::types::ParsedProof;

/// Split a raw completion into `{thinking_steps, latex}`.
///
/// Only the first separator occurrence delimits; any later occurrence stays
/// in the LaTeX segment verbatim. Both segments are trimmed, and the LaTeX
/// segment is fence-stripped. Never fails: an empty or fence-only input
/// yields an empty `latex`, which downstream consumers render as nothing.
pub fn parse_completion(raw: &str) -> ParsedProof {
    match raw.split_once(THINKING_STEPS_SEPARATOR) {
        Some((steps, rest)) => ParsedProof {
            thinking_steps: steps.trim().to_string(),
            latex: strip_code_fences(rest.trim()).to_string(),
        },
        None => {
            tracing::warn!(
                target: "proofgen::parser",
                "separator token missing from model response, treating entire text as LaTeX"
            );
            ParsedProof {
                thinking_steps: String::new(),
                latex: strip_code_fences(raw.trim()).to_string(),
            }
        }
    }
}

/// Remove an optional leading ```` ```latex ```` (or bare ```` ``` ````)
/// marker and an optional trailing ```` ``` ```` marker.
///
/// Matches only at the start/end of the string: a leading fence may be
/// followed by a `latex` language tag and at most one newline, a trailing
/// fence may be preceded by at most one newline. Idempotent.
pub fn strip_code_fences(s: &str) -> &str {
    let mut out = s;
    if let Some(rest) = out.strip_prefix("```") {
        let rest = rest.strip_prefix("latex").unwrap_or(rest);
        out = rest.strip_prefix('\n').unwrap_or(rest);
    }
    if let Some(rest) = out.strip_suffix("```") {
        out = rest.strip_suffix('\n').unwrap_or(rest);
    }
    out
}
