//! Context-menu entries registered by the coordinator.

/// A context-menu entry the user can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// "Explain with AI", shown on a selection.
    Explain,
    /// "Simplify with AI", shown on a selection.
    Simplify,
    /// "Toggle AI Cursor Mode", shown on the page.
    ToggleMode,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Explain, MenuItem::Simplify, MenuItem::ToggleMode];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Explain => "ai-explain",
            Self::Simplify => "ai-simplify",
            Self::ToggleMode => "toggle-ai-mode",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Explain => "Explain with AI",
            Self::Simplify => "Simplify with AI",
            Self::ToggleMode => "Toggle AI Cursor Mode",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.id() == id)
    }
}
