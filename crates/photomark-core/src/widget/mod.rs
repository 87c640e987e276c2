//! Per-object UI state: selection, hover and text-edit focus.
//!
//! Shapes remain pure data. The widget manager tracks how the user is
//! interacting with them.

mod manager;
mod state;

pub use manager::WidgetManager;
pub use state::WidgetState;
