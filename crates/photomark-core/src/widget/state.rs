//! Widget state definitions.

/// How the user is currently interacting with one scene object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WidgetState {
    #[default]
    Normal,
    /// Pointer is over the object.
    Hovered,
    /// Object is part of the active selection.
    Selected,
    /// Textbox has edit focus.
    Editing,
}

impl WidgetState {
    /// Selected, or selected and being edited.
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Editing)
    }
}
