//! # Zegoop Surfaces
//!
//! In-process controllers for the three UI contexts that talk to the
//! coordinator.
//!
//! Every controller owns a [`SettingsCache`], turns user gestures into one
//! event enum handled by a single `dispatch`, and draws through a [`View`].
//! Pushes from the coordinator arrive as events too, through a
//! [`ChannelSurface`] registered with the coordinator's surface registry.
//!
//! - [`ContentController`] - hover tooltips, selection actions, mode indicator
//! - [`PopupController`] - mode switch and provider status
//! - [`OptionsController`] - settings form, reset, connection test

pub mod cache;
pub mod channel;
pub mod content;
pub mod error;
pub mod geometry;
pub mod options;
pub mod popup;
pub mod view;

#[cfg(test)]
mod testing;

pub use cache::SettingsCache;
pub use channel::ChannelSurface;
pub use content::{ContentController, ContentEvent, ContentTimings, ContentUpdate, ModalView};
pub use error::RequestError;
pub use geometry::{Point, Size, Viewport};
pub use options::{OptionsController, OptionsEvent, OptionsForm, OptionsUpdate, ToastKind};
pub use popup::{PopupController, PopupEvent, PopupStatus, PopupUpdate};
pub use view::{NullView, View};
