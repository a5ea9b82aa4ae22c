//! Rendering seam between controllers and whatever draws them.

/// Something that can draw `U`.
///
/// Controllers never read back from a view; every state change they want
/// shown is pushed as one update value.
pub trait View<U>: Send + Sync {
    fn render(&self, update: U);
}

/// A view that draws nothing.
pub struct NullView;

impl<U> View<U> for NullView {
    fn render(&self, _update: U) {}
}
