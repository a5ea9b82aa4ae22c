//! Error types for the Zegoop protocol layer.

mod extension;
mod provider;
mod store;
mod surface;

pub use extension::*;
pub use provider::*;
pub use store::*;
pub use surface::*;
