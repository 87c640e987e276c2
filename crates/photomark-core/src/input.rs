//! Keyboard and modifier input as delivered by the host.

use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Whether the shortcut modifier is held (Ctrl, or Cmd on macOS hosts).
    pub fn action_mod(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key, named the way browsers report `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Character(String),
    Backspace,
    Delete,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Escape,
    Tab,
    /// Any other named key (`Shift`, `F5`, `PageUp`, ...). Never inserts text.
    Named(String),
}

impl Key {
    /// Map a DOM key name (`"Delete"`, `"ArrowLeft"`, `"z"`) to a key.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Backspace" => Key::Backspace,
            "Delete" | "Del" => Key::Delete,
            "Enter" | "Return" => Key::Enter,
            "ArrowLeft" | "Left" => Key::Left,
            "ArrowRight" | "Right" => Key::Right,
            "ArrowUp" | "Up" => Key::Up,
            "ArrowDown" | "Down" => Key::Down,
            "Home" => Key::Home,
            "End" => Key::End,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            "Space" | "Spacebar" => Key::Character(" ".to_string()),
            other if is_key_name(other) => Key::Named(other.to_string()),
            other => Key::Character(other.to_string()),
        }
    }

    /// True for a character key matching `c` in either case.
    pub fn is_char(&self, c: char) -> bool {
        match self {
            Key::Character(s) => {
                let mut chars = s.chars();
                matches!((chars.next(), chars.next()), (Some(k), None) if k.eq_ignore_ascii_case(&c))
            }
            _ => false,
        }
    }
}

/// DOM named-key values are multi-char ASCII identifiers starting with an
/// uppercase letter. Printable keys report the text they produce instead.
fn is_key_name(name: &str) -> bool {
    name.len() > 1
        && name.starts_with(|c: char| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// A key press with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Build from a DOM key name.
    pub fn named(name: &str, modifiers: Modifiers) -> Self {
        Self::new(Key::from_name(name), modifiers)
    }
}
