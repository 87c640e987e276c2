//! Text editing state using Parley's PlainEditor.

use crate::input::{Key, KeyEvent};
use parley::editing::{PlainEditor, PlainEditorDriver};
use parley::{FontContext, GenericFamily, LayoutContext, StyleProperty};
use peniko::Brush;
use std::fmt;

/// Result of handling a text editing event.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEditResult {
    /// Event was handled, text may have changed.
    Handled,
    /// Event was handled, user wants to exit editing.
    ExitEdit,
    /// Event was not handled (pass to other handlers).
    NotHandled,
}

/// Editor for the textbox currently in edit mode.
///
/// Caret movement and deletion work on layout clusters, so combining marks
/// and emoji sequences are never split.
pub struct TextEditState {
    editor: PlainEditor<Brush>,
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
    /// Buffer contents after the last edit.
    text: String,
}

impl TextEditState {
    /// Start editing `text` with the caret at the end.
    pub fn new(text: &str, font_size: f32) -> Self {
        let mut editor = PlainEditor::new(font_size);
        editor.set_text(text);
        editor.set_scale(1.0);

        let styles = editor.edit_styles();
        styles.insert(GenericFamily::SansSerif.into());
        styles.insert(StyleProperty::Brush(Brush::Solid(peniko::Color::BLACK)));

        let mut state = Self {
            editor,
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            text: text.to_string(),
        };
        state.driver().move_to_text_end();
        state
    }

    fn driver(&mut self) -> PlainEditorDriver<'_, Brush> {
        self.editor.driver(&mut self.font_cx, &mut self.layout_cx)
    }

    fn sync_text(&mut self) {
        self.text = self.editor.text().to_string();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole text, caret at the end.
    pub fn set_text(&mut self, text: &str) {
        self.editor.set_text(text);
        self.driver().move_to_text_end();
        self.sync_text();
    }

    /// Wrap width of the edited box, in surface units.
    pub fn set_width(&mut self, width: Option<f32>) {
        self.editor.set_width(width);
    }

    pub fn select_all(&mut self) {
        self.driver().select_all();
    }

    /// The selected text, empty when the selection is collapsed.
    pub fn selected_text(&self) -> &str {
        self.editor.selected_text().unwrap_or("")
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, event: &KeyEvent) -> TextEditResult {
        if self.editor.is_composing() {
            return TextEditResult::NotHandled;
        }

        let action_mod = event.modifiers.action_mod();
        let shift = event.modifiers.shift;

        {
            let mut drv = self.editor.driver(&mut self.font_cx, &mut self.layout_cx);
            match &event.key {
                Key::Escape => return TextEditResult::ExitEdit,
                Key::Tab | Key::Named(_) => return TextEditResult::NotHandled,
                Key::Backspace => {
                    if action_mod {
                        drv.backdelete_word();
                    } else {
                        drv.backdelete();
                    }
                }
                Key::Delete => {
                    if action_mod {
                        drv.delete_word();
                    } else {
                        drv.delete();
                    }
                }
                Key::Enter => drv.insert_or_replace_selection("\n"),
                Key::Left => match (action_mod, shift) {
                    (true, true) => drv.select_word_left(),
                    (true, false) => drv.move_word_left(),
                    (false, true) => drv.select_left(),
                    (false, false) => drv.move_left(),
                },
                Key::Right => match (action_mod, shift) {
                    (true, true) => drv.select_word_right(),
                    (true, false) => drv.move_word_right(),
                    (false, true) => drv.select_right(),
                    (false, false) => drv.move_right(),
                },
                Key::Up => {
                    if shift {
                        drv.select_up();
                    } else {
                        drv.move_up();
                    }
                }
                Key::Down => {
                    if shift {
                        drv.select_down();
                    } else {
                        drv.move_down();
                    }
                }
                Key::Home => match (action_mod, shift) {
                    (true, true) => drv.select_to_text_start(),
                    (true, false) => drv.move_to_text_start(),
                    (false, true) => drv.select_to_line_start(),
                    (false, false) => drv.move_to_line_start(),
                },
                Key::End => match (action_mod, shift) {
                    (true, true) => drv.select_to_text_end(),
                    (true, false) => drv.move_to_text_end(),
                    (false, true) => drv.select_to_line_end(),
                    (false, false) => drv.move_to_line_end(),
                },
                Key::Character(c) => {
                    if action_mod {
                        if !event.key.is_char('a') {
                            return TextEditResult::NotHandled;
                        }
                        if shift {
                            drv.collapse_selection();
                        } else {
                            drv.select_all();
                        }
                    } else {
                        drv.insert_or_replace_selection(c);
                    }
                }
            }
        }

        self.sync_text();
        TextEditResult::Handled
    }
}

impl Default for TextEditState {
    fn default() -> Self {
        Self::new("", 16.0)
    }
}

impl fmt::Debug for TextEditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEditState")
            .field("text", &self.text)
            .field("selected", &self.selected_text())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn editor(text: &str) -> TextEditState {
        TextEditState::new(text, 16.0)
    }

    fn press(state: &mut TextEditState, name: &str) -> TextEditResult {
        state.handle_key(&KeyEvent::named(name, Modifiers::NONE))
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut state = editor("Type here...");
        state.select_all();
        assert_eq!(state.selected_text(), "Type here...");
        press(&mut state, "H");
        press(&mut state, "i");
        assert_eq!(state.text(), "Hi");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut state = editor("abc");
        press(&mut state, "Backspace");
        assert_eq!(state.text(), "ab");
        press(&mut state, "Home");
        press(&mut state, "Delete");
        assert_eq!(state.text(), "b");
        press(&mut state, "Backspace");
        assert_eq!(state.text(), "b");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = editor("h\u{e9}llo");
        press(&mut state, "ArrowLeft");
        press(&mut state, "ArrowLeft");
        press(&mut state, "ArrowLeft");
        press(&mut state, "Backspace");
        assert_eq!(state.text(), "hllo");
    }

    #[test]
    fn test_caret_steps_over_combining_marks() {
        let mut state = editor("e\u{301}x");
        press(&mut state, "ArrowLeft");
        press(&mut state, "ArrowLeft");
        press(&mut state, "Backspace");
        assert_eq!(state.text(), "e\u{301}x");
        press(&mut state, "Delete");
        assert_eq!(state.text(), "x");
    }

    #[test]
    fn test_backspace_removes_whole_emoji() {
        let mut state = editor("ok \u{1f44d}\u{1f3fd}");
        press(&mut state, "Backspace");
        assert_eq!(state.text(), "ok ");
    }

    #[test]
    fn test_enter_and_line_start() {
        let mut state = editor("ab");
        press(&mut state, "Enter");
        press(&mut state, "c");
        assert_eq!(state.text(), "ab\nc");
        press(&mut state, "Home");
        press(&mut state, ">");
        assert_eq!(state.text(), "ab\n>c");
        state.handle_key(&KeyEvent::named("Home", Modifiers::ctrl()));
        press(&mut state, "<");
        assert_eq!(state.text(), "<ab\n>c");
    }

    #[test]
    fn test_shift_selection() {
        let mut state = editor("abcd");
        let shift_left = KeyEvent::named("ArrowLeft", Modifiers::shift());
        state.handle_key(&shift_left);
        state.handle_key(&shift_left);
        assert_eq!(state.selected_text(), "cd");
        press(&mut state, "x");
        assert_eq!(state.text(), "abx");
    }

    #[test]
    fn test_shortcuts() {
        let mut state = editor("abc");
        assert_eq!(
            state.handle_key(&KeyEvent::named("a", Modifiers::ctrl())),
            TextEditResult::Handled
        );
        assert_eq!(state.selected_text(), "abc");
        assert_eq!(
            state.handle_key(&KeyEvent::named("z", Modifiers::ctrl())),
            TextEditResult::NotHandled
        );
        assert_eq!(press(&mut state, "Escape"), TextEditResult::ExitEdit);
        assert_eq!(state.text(), "abc");
    }

    #[test]
    fn test_modifier_keydowns_insert_nothing() {
        let mut state = editor("abc");
        for name in ["Shift", "Control", "CapsLock", "F5"] {
            assert_eq!(
                state.handle_key(&KeyEvent::named(name, Modifiers::shift())),
                TextEditResult::NotHandled
            );
        }
        state.handle_key(&KeyEvent::named("R", Modifiers::shift()));
        assert_eq!(state.text(), "abcR");
    }

    #[test]
    fn test_set_text_moves_caret_to_end() {
        let mut state = editor("abc");
        press(&mut state, "Home");
        state.set_text("xy");
        press(&mut state, "z");
        assert_eq!(state.text(), "xyz");
    }
}
