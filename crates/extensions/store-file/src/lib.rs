//! JSON file settings store for Zegoop.
//!
//! The whole settings record lives in one pretty-printed JSON object:
//!
//! ```json
//! {
//!   "aiMode": false,
//!   "apiKeys": {},
//!   "selectedLLM": "openai"
//! }
//! ```
//!
//! Reads are served from an in-memory copy. Every write replaces the file
//! through a temporary sibling and a rename, so a crash never leaves a
//! half-written record behind.

mod error;
mod store;

pub use error::FileStoreError;
pub use store::JsonFileStore;
