//! # Zegoop Protocols
//!
//! Core protocol definitions for the Zegoop coordinator and its surfaces.
//! Contains only interface definitions and wire contracts - no I/O.
//!
//! ## Core Traits
//!
//! - [`LLMProvider`] - One vendor endpoint behind the uniform gateway contract
//! - [`SettingsStore`] - Persisted key/value settings record
//! - [`Surface`] - A live UI context that receives push notifications
//! - [`CoordinatorClient`] - The request side of the cross-surface channel
//!
//! ## Wire Contract
//!
//! - [`Command`] - Requests sent by surfaces to the coordinator
//! - [`Reply`] - The coordinator's answer to exactly one command
//! - [`Notification`] - Pushes fanned out to surfaces

pub mod error;
pub mod message;
pub mod provider;
pub mod request;
pub mod settings;
pub mod store;
pub mod surface;

pub use error::{ExtensionError, ProviderError, StoreError, SurfaceError};
pub use message::{Command, Notification, Reply};
pub use provider::{
    CompletionRequest, CompletionResponse, LLMProvider, ProviderKind, NO_RESPONSE_FALLBACK,
};
pub use request::RequestType;
pub use settings::{
    keys, BehaviorSettings, IndicatorPosition, Privacy, Settings, SettingsMap, Shortcuts,
    SystemPrompts,
};
pub use store::SettingsStore;
pub use surface::{CoordinatorClient, Surface, SurfaceId, SurfaceKind};
