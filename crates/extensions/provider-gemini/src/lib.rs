//! Google Gemini provider for Zegoop.
//!
//! Calls `{base}/{model}:generateContent`, passing the credential as the
//! `key` query parameter.

mod client;
mod provider;
mod types;

pub use client::{GeminiClient, DEFAULT_BASE_URL};
pub use provider::{GeminiProvider, DEFAULT_MODEL};
