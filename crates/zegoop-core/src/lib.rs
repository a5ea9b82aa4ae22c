//! # Zegoop Core
//!
//! The background coordinator and the registries it routes through.
//!
//! ## Components
//!
//! - [`Coordinator`] - Mode state, command handling, context-menu actions
//! - [`CoordinatorService`] - Mailbox that runs every command on its own task
//! - [`ProviderRegistry`] - The LLM gateway: provider id to vendor adapter
//! - [`SurfaceRegistry`] - Live surfaces and best-effort broadcast
//! - [`MemorySettingsStore`] - Volatile settings store

pub mod coordinator;
pub mod error;
pub mod menu;
pub mod prompt;
pub mod registry;
pub mod service;
pub mod store;

pub use coordinator::{Coordinator, Mode};
pub use error::CoordinatorError;
pub use menu::MenuItem;
pub use registry::{ProviderRegistry, SurfaceRegistry};
pub use service::{CoordinatorHandle, CoordinatorService, SurfaceClient};
pub use store::MemorySettingsStore;
