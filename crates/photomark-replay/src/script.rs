//! Replay scripts: a surface size and a list of host events.

use crate::error::ReplayError;
use kurbo::Point;
use photomark_core::{AnnotationEngine, KeyEvent, Modifiers};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Surface dimensions the host would report on mount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub w: f64,
    pub h: f64,
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Activate,
    Deactivate,
    Tool {
        name: String,
    },
    Color {
        value: String,
    },
    Resize {
        w: f64,
        h: f64,
    },
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up,
    #[serde(rename = "dblclick")]
    DoubleClick {
        x: f64,
        y: f64,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Whole-text update of the open edit.
    Type {
        text: String,
    },
    ExitEdit,
    Undo,
    Redo,
    Delete,
}

impl Event {
    /// Feed this event to the engine.
    pub fn apply(&self, engine: &mut AnnotationEngine) {
        match self {
            Event::Activate => engine.activate(),
            Event::Deactivate => engine.deactivate(),
            Event::Tool { name } => engine.set_tool_name(name),
            Event::Color { value } => {
                // rejected colors are logged by the engine
                let _ = engine.set_color(value);
            }
            Event::Resize { w, h } => engine.resize(*w, *h),
            Event::Down { x, y, modifiers } => engine.pointer_down(Point::new(*x, *y), *modifiers),
            Event::Move { x, y } => {
                engine.pointer_move(Point::new(*x, *y));
            }
            Event::Up => engine.pointer_up(),
            Event::DoubleClick { x, y } => engine.double_click(Point::new(*x, *y)),
            Event::Key { key, modifiers } => {
                engine.handle_key(&KeyEvent::named(key, *modifiers));
            }
            Event::Type { text } => {
                engine.set_editing_text(text);
            }
            Event::ExitEdit => {
                engine.exit_text_editing();
            }
            Event::Undo => {
                engine.undo();
            }
            Event::Redo => {
                engine.redo();
            }
            Event::Delete => {
                engine.delete_selected();
            }
        }
    }
}

/// A recorded session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub surface: Option<SurfaceSize>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a script file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ReplayError::io(path, e))?;
        Self::from_json(&json)
    }
}
