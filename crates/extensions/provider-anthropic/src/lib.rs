//! Anthropic messages provider for Zegoop.
//!
//! Shown to users as "Claude".

mod api;
mod provider;

pub use provider::{AnthropicProvider, API_VERSION, DEFAULT_API_URL, DEFAULT_MODEL};
