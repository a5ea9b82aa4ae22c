//! Built-in settings stores.

mod memory;

pub use memory::MemorySettingsStore;
