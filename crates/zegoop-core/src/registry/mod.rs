//! Registries for LLM providers and live surfaces.

mod base;
mod provider;
mod surface;

pub use base::{BaseRegistry, Registerable};
pub use provider::ProviderRegistry;
pub use surface::SurfaceRegistry;
