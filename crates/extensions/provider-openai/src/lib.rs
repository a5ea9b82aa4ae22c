//! OpenAI chat completions provider for Zegoop.

mod api;
mod provider;

pub use provider::{OpenAIProvider, DEFAULT_API_URL, DEFAULT_MODEL};
