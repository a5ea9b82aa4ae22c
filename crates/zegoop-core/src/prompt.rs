//! Prompt construction.

use zegoop_protocols::{RequestType, SystemPrompts};

/// Prompt sent by the options page "Test API Connection" button.
pub const TEST_PROMPT: &str = "Hello, this is a test. Please respond with \"Test successful\".";

/// Token limit for the connection test.
pub const TEST_MAX_TOKENS: u32 = 50;

/// The English template for a request type with `text` embedded.
///
/// Unrecognised types use the explain template.
pub fn base_prompt(text: &str, request_type: &RequestType) -> String {
    match request_type {
        RequestType::Simplify => format!(
            "Please simplify and rephrase the following text to make it easier to understand: \"{}\"",
            text
        ),
        RequestType::Define => format!("Please provide a clear definition of: \"{}\"", text),
        RequestType::Translate => {
            format!("Please translate the following text to English: \"{}\"", text)
        }
        RequestType::Tooltip => format!(
            "Provide a brief, concise definition of the word \"{}\" in one sentence. Keep it under 20 words.",
            text
        ),
        RequestType::Explain | RequestType::Other(_) => format!(
            "Please explain the meaning of the following text in simple terms: \"{}\"",
            text
        ),
    }
}

/// Build the full prompt, prefixed with the applicable system prompt.
pub fn build_prompt(text: &str, request_type: &RequestType, prompts: &SystemPrompts) -> String {
    let base = base_prompt(text, request_type);
    match prompts.for_request(request_type) {
        Some(system) => format!("{}\n\n{}", system, base),
        None => base,
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
