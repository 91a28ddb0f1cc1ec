//! Parsing of the model's reply.
//!
//! Models often wrap JSON in a Markdown code fence even when told not to, so
//! a leading ```` ```json ```` (or bare ```` ``` ````) and a trailing
//! ```` ``` ```` are stripped before parsing.

use serde_json::Value;

use crate::error::EcoError;

const FENCE: &str = "```";

/// Removes a surrounding Markdown code fence, if any.
#[must_use]
pub fn strip_code_fence(reply: &str) -> &str {
    let mut body = reply.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        // Drop the info string (`json`, `JSON`, ...) up to the end of the line.
        body = match rest.find('\n') {
            Some(newline) if rest[..newline].trim().chars().all(char::is_alphanumeric) => {
                &rest[newline + 1..]
            }
            _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest;
    }

    body.trim()
}

/// Strips any code fence and parses the reply as JSON.
///
/// # Errors
///
/// Returns [`EcoError::Parse`] if what remains is not valid JSON.
pub fn parse_model_json(reply: &str) -> Result<Value, EcoError> {
    let body = strip_code_fence(reply);
    serde_json::from_str(body).map_err(|source| EcoError::Parse {
        payload: reply.to_owned(),
        source,
    })
}
