//! Photomark Core Library
//!
//! Platform-agnostic scene model, drawing tools and undo history for marking
//! up photos with arrows, shapes, revision clouds, text and leader-lines.

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod input;
pub mod leader;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod text_edit;
pub mod tools;
pub mod widget;

pub use config::EngineConfig;
pub use engine::{AnnotationEngine, AnnotationObserver, NoopObserver, SnapshotRenderer};
pub use error::{ColorParseError, ConfigError, LeaderError, SnapshotError};
pub use history::History;
pub use input::{Key, KeyEvent, Modifiers};
pub use leader::{LeaderParts, LeaderState};
pub use scene::{Scene, SceneSnapshot};
pub use shapes::{CompositeKind, Interaction, SerializableColor, Shape, ShapeId, ShapeStyle};
pub use surface::{Cursor, InteractionMode, Surface};
pub use text_edit::{TextEditResult, TextEditState};
pub use tools::{ToolKind, ToolMachine};
pub use widget::{WidgetManager, WidgetState};
