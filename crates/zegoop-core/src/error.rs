//! Coordinator errors.
//!
//! Every variant is rendered into a `{error}` reply at the coordinator
//! boundary; none of them is fatal.

use thiserror::Error;

use zegoop_protocols::{ProviderError, StoreError};

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("No LLM provider selected. Please configure in extension settings.")]
    NoProviderSelected,

    #[error("No API key configured for {0}. Please add your API key in extension settings.")]
    NoCredential(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}
