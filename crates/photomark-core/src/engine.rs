//! The annotation engine: host-facing facade over the surface, tools,
//! history and text editing.

use crate::config::EngineConfig;
use crate::error::{ColorParseError, ConfigError, SnapshotError};
use crate::history::History;
use crate::input::{Key, KeyEvent, Modifiers};
use crate::leader::LeaderState;
use crate::scene::SceneSnapshot;
use crate::shapes::{CompositeKind, Interaction, SerializableColor, Shape, ShapeId};
use crate::surface::{Cursor, InteractionMode, Surface};
use crate::text_edit::{TextEditResult, TextEditState};
use crate::tools::{GestureEnd, GestureStart, ToolContext, ToolKind, ToolMachine};
use crate::widget::WidgetState;
use kurbo::{Point, Size};

/// Callbacks the host receives.
pub trait AnnotationObserver {
    /// The committed object list changed (commit, undo, redo, load).
    fn on_annotations_change(&mut self, _objects: &[Shape]) {}

    /// The engine asks the host to switch its toolbar to `tool`.
    fn on_tool_change(&mut self, _tool: ToolKind) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl AnnotationObserver for NoopObserver {}

/// Rasterizes the annotation layer for export.
pub trait SnapshotRenderer {
    /// Encode `objects` (paint order) over a transparent `size` surface.
    fn render_png(&mut self, objects: &[Shape], size: Size, scale: f64) -> Result<Vec<u8>, SnapshotError>;
}

/// How an open text edit ends.
#[derive(Debug, Clone)]
enum EditKind {
    /// Standalone textbox; commits if the text changed.
    Plain { original: String },
    /// Leader label; regroups and commits.
    Leader(LeaderState),
}

#[derive(Debug)]
struct EditSession {
    target: ShapeId,
    editor: TextEditState,
    kind: EditKind,
}

/// Select-tool drag of the current selection.
#[derive(Debug, Clone, Copy)]
struct MoveDrag {
    last: Point,
    moved: bool,
}

/// Everything that lives between activate and deactivate.
#[derive(Debug)]
struct Session {
    surface: Surface,
    history: History,
    tools: ToolMachine,
    edit: Option<EditSession>,
    drag: Option<MoveDrag>,
}

impl Session {
    fn new(config: &EngineConfig, tool: ToolKind) -> Self {
        let mut surface = Surface::new(config.surface_size, config.hit_tolerance);
        surface.set_mode(mode_for(tool));
        Self {
            history: History::new(surface.serialize()),
            surface,
            tools: ToolMachine::new(),
            edit: None,
            drag: None,
        }
    }

    fn notify(&self, observer: &mut dyn AnnotationObserver) {
        let snapshot = self.surface.serialize();
        observer.on_annotations_change(&snapshot.objects);
    }

    fn commit(&mut self, observer: &mut dyn AnnotationObserver) {
        self.history.commit(self.surface.serialize());
        self.notify(observer);
    }

    /// Replace the scene, abandoning any gesture or edit in flight.
    fn restore(&mut self, snapshot: &SceneSnapshot) {
        self.tools = ToolMachine::new();
        self.edit = None;
        self.drag = None;
        self.surface.restore(snapshot);
    }

    /// Keep the edited textbox focused and live across selection changes.
    fn rewire_edit(&mut self) {
        if let Some(edit) = &self.edit {
            let target = edit.target;
            self.surface.focus_text(target);
            self.surface.set_interaction(target, Interaction::LIVE);
        }
    }

    fn sync_edit_text(&mut self) {
        let Some(edit) = &self.edit else {
            return;
        };
        if let Some(textbox) = self.surface.get_mut(edit.target).and_then(Shape::as_textbox_mut) {
            textbox.content = edit.editor.text().to_string();
        }
    }

    fn begin_edit(
        &mut self,
        config: &EngineConfig,
        observer: &mut dyn AnnotationObserver,
        target: ShapeId,
        kind: EditKind,
        select_all: bool,
    ) {
        if self.edit.as_ref().is_some_and(|e| e.target != target) {
            self.end_edit(config, observer);
        }
        let (content, font_size, width) = self
            .surface
            .get(target)
            .and_then(Shape::as_textbox)
            .map(|t| (t.content.clone(), t.font_size, t.width))
            .unwrap_or_else(|| (String::new(), config.text_font_size, config.text_width));
        let mut editor = TextEditState::new(&content, font_size as f32);
        editor.set_width(Some(width as f32));
        if select_all {
            editor.select_all();
        }
        self.edit = Some(EditSession { target, editor, kind });
        self.rewire_edit();
        log::debug!("Editing textbox {target}");
    }

    /// Close the open edit and run its finalize. Returns false if none was open.
    fn end_edit(&mut self, config: &EngineConfig, observer: &mut dyn AnnotationObserver) -> bool {
        self.sync_edit_text();
        let Some(edit) = self.edit.take() else {
            return false;
        };
        self.surface.blur_text();
        match edit.kind {
            EditKind::Plain { original } => {
                if edit.editor.text() != original {
                    self.commit(observer);
                }
            }
            EditKind::Leader(state) => match state.finish(&mut self.surface, config) {
                Ok(_) => self.commit(observer),
                Err(err) => log::warn!("Leader finalize aborted: {err}"),
            },
        }
        log::debug!("Finished editing textbox {}", edit.target);
        true
    }

    /// Finish the running gesture as if the pointer were released.
    fn finish_gesture(&mut self, config: &EngineConfig, observer: &mut dyn AnnotationObserver) {
        if let Some(drag) = self.drag.take() {
            if drag.moved {
                self.commit(observer);
            }
        }
        match self.tools.pointer_up(&mut self.surface) {
            GestureEnd::Nothing => {}
            GestureEnd::Commit => self.commit(observer),
            GestureEnd::LeaderReleased(state) => {
                if let Some(label) = state.parts().map(|p| p.label) {
                    self.begin_edit(config, observer, label, EditKind::Leader(state), false);
                }
            }
        }
    }
}

fn mode_for(tool: ToolKind) -> InteractionMode {
    if tool.draws() {
        InteractionMode::Draw
    } else {
        InteractionMode::Select
    }
}

/// The photo annotation engine.
pub struct AnnotationEngine {
    config: EngineConfig,
    tool: ToolKind,
    color: SerializableColor,
    observer: Box<dyn AnnotationObserver>,
    session: Option<Session>,
}

impl AnnotationEngine {
    /// Create an inactive engine.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let color = config.default_color()?;
        Ok(Self {
            config,
            tool: ToolKind::default(),
            color,
            observer: Box::new(NoopObserver),
            session: None,
        })
    }

    /// Builder: install the host's observer.
    pub fn with_observer(mut self, observer: Box<dyn AnnotationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn AnnotationObserver>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Mount the surface with an empty scene and a one-entry history.
    pub fn activate(&mut self) {
        if self.session.is_some() {
            return;
        }
        self.session = Some(Session::new(&self.config, self.tool));
        log::info!("Annotation layer activated ({})", self.tool);
    }

    /// Unmount the surface. The scene and history are discarded.
    pub fn deactivate(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!(
                "Annotation layer deactivated with {} objects",
                session.surface.scene().len()
            );
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Set the tool from a toolbar name; unknown names mean select.
    pub fn set_tool_name(&mut self, name: &str) {
        let tool = ToolKind::parse(name).unwrap_or_else(|| {
            log::warn!("Unknown tool {name:?}, using select");
            ToolKind::Select
        });
        self.set_tool(tool);
    }

    /// Switch tools, finishing any gesture in progress first.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.tool {
            return;
        }
        self.tool = tool;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.finish_gesture(&self.config, self.observer.as_mut());
        session.surface.set_mode(mode_for(tool));
        session.rewire_edit();
        log::debug!("Tool changed to {tool}");
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    /// Set the color for new objects. A bad color keeps the previous one.
    pub fn set_color(&mut self, css: &str) -> Result<(), ColorParseError> {
        match SerializableColor::from_css(css) {
            Ok(color) => {
                self.color = color;
                Ok(())
            }
            Err(err) => {
                log::warn!("Ignoring color {css:?}: {err}");
                Err(err)
            }
        }
    }

    /// Follow the host container's bounds.
    pub fn resize(&mut self, width: f64, height: f64) {
        if let Some(session) = self.session.as_mut() {
            session.surface.resize(Size::new(width, height));
        }
    }

    pub fn pointer_down(&mut self, point: Point, modifiers: Modifiers) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let observer = self.observer.as_mut();

        if !self.tool.draws() {
            let editing = session.edit.as_ref().map(|e| e.target);
            match session.surface.hit_test(point) {
                Some(id) if Some(id) == editing => {}
                Some(id) => {
                    if modifiers.shift {
                        session.surface.toggle_selection(id);
                    } else if !session.surface.is_selected(id) {
                        session.surface.select(id);
                    }
                    if session.surface.is_selected(id) {
                        session.drag = Some(MoveDrag {
                            last: point,
                            moved: false,
                        });
                    }
                }
                None => {
                    session.surface.clear_selection();
                    session.rewire_edit();
                }
            }
            return;
        }

        if self.tool == ToolKind::Text {
            session.end_edit(&self.config, observer);
        }
        let ctx = ToolContext {
            tool: self.tool,
            color: self.color,
        };
        if let GestureStart::TextPlaced(id) = session.tools.pointer_down(&mut session.surface, &self.config, ctx, point) {
            let original = session
                .surface
                .get(id)
                .and_then(Shape::as_textbox)
                .map(|t| t.content.clone())
                .unwrap_or_default();
            session.begin_edit(&self.config, observer, id, EditKind::Plain { original }, true);
            session.commit(observer);
            self.set_tool(ToolKind::Select);
            self.observer.on_tool_change(ToolKind::Select);
        }
    }

    /// Returns whether anything followed the pointer.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.surface.update_hover(point);
        if let Some(drag) = session.drag.as_mut() {
            let delta = point - drag.last;
            drag.last = point;
            if session.surface.translate_selected(delta) {
                drag.moved = true;
            }
            return true;
        }
        session.tools.pointer_move(&mut session.surface, &self.config, point)
    }

    pub fn pointer_up(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.finish_gesture(&self.config, self.observer.as_mut());
        }
    }

    /// Double-click re-opens a leader label, or a plain textbox in select mode.
    pub fn double_click(&mut self, point: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let observer = self.observer.as_mut();
        let Some(target) = session.surface.hit_test(point) else {
            return;
        };
        if session.edit.as_ref().is_some_and(|e| e.target == target) {
            return;
        }

        let Some(shape) = session.surface.get(target) else {
            return;
        };
        let is_leader = shape.custom_type() == Some(CompositeKind::LeaderLine);
        let plain_text = shape
            .as_textbox()
            .filter(|t| t.editable && !self.tool.draws())
            .map(|t| t.content.clone());

        if is_leader {
            session.end_edit(&self.config, observer);
            match (LeaderState::Grouped { group: target }).reopen(&mut session.surface) {
                Ok(state) => {
                    if let Some(label) = state.parts().map(|p| p.label) {
                        session.begin_edit(&self.config, observer, label, EditKind::Leader(state), true);
                    }
                }
                Err(err) => log::warn!("Cannot re-edit leader {target}: {err}"),
            }
        } else if let Some(original) = plain_text {
            session.begin_edit(&self.config, observer, target, EditKind::Plain { original }, true);
        }
    }

    /// Route a key press. Returns whether the engine consumed it.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        if let Some(edit) = session.edit.as_mut() {
            return match edit.editor.handle_key(event) {
                TextEditResult::Handled => {
                    session.sync_edit_text();
                    true
                }
                TextEditResult::ExitEdit => {
                    session.end_edit(&self.config, self.observer.as_mut());
                    true
                }
                TextEditResult::NotHandled => false,
            };
        }

        let action = event.modifiers.action_mod();
        match &event.key {
            Key::Delete | Key::Backspace => {
                self.delete_selected();
                true
            }
            key if action && key.is_char('z') => {
                if event.modifiers.shift {
                    self.redo();
                } else {
                    self.undo();
                }
                true
            }
            key if action && key.is_char('y') => {
                self.redo();
                true
            }
            _ => false,
        }
    }

    /// Replace the text of the open edit, as the host's text field reports it.
    pub fn set_editing_text(&mut self, text: &str) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(edit) = session.edit.as_mut() else {
            return false;
        };
        edit.editor.set_text(text);
        session.sync_edit_text();
        true
    }

    /// End the open text edit, running its finalize.
    pub fn exit_text_editing(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => session.end_edit(&self.config, self.observer.as_mut()),
            None => false,
        }
    }

    /// Step back one commit. No-op at the bottom of the history.
    pub fn undo(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(snapshot) = session.history.undo().cloned() else {
            return false;
        };
        session.restore(&snapshot);
        session.notify(self.observer.as_mut());
        true
    }

    /// Step forward one commit. No-op at the top of the history.
    pub fn redo(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(snapshot) = session.history.redo().cloned() else {
            return false;
        };
        session.restore(&snapshot);
        session.notify(self.observer.as_mut());
        true
    }

    /// Remove every selected object in one commit.
    ///
    /// Does nothing while a textbox is being edited.
    pub fn delete_selected(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.edit.is_some() {
            return false;
        }
        let selected = session.surface.selected_ids();
        if selected.is_empty() {
            return false;
        }
        for id in &selected {
            session.surface.remove_object(*id);
        }
        session.surface.clear_selection();
        log::debug!("Deleted {} objects", selected.len());
        session.commit(self.observer.as_mut());
        true
    }

    /// Replace the scene with host-supplied annotations; history restarts there.
    pub fn load_annotations(&mut self, snapshot: SceneSnapshot) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.restore(&snapshot);
        session.history.reset(session.surface.serialize());
        session.notify(self.observer.as_mut());
        true
    }

    /// Objects in paint order (empty while inactive).
    pub fn objects(&self) -> Vec<&Shape> {
        self.session
            .as_ref()
            .map(|s| s.surface.objects())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Option<SceneSnapshot> {
        self.session.as_ref().map(|s| s.surface.serialize())
    }

    /// Current objects as JSON, for persistence elsewhere.
    pub fn annotations_json(&self) -> Result<String, SnapshotError> {
        self.snapshot().ok_or(SnapshotError::Inactive)?.to_json()
    }

    /// Rasterize the annotation layer to PNG bytes.
    pub fn rendered_snapshot(&self, renderer: &mut dyn SnapshotRenderer) -> Result<Vec<u8>, SnapshotError> {
        let session = self.session.as_ref().ok_or(SnapshotError::Inactive)?;
        let snapshot = session.surface.serialize();
        let bytes = renderer.render_png(&snapshot.objects, session.surface.size(), self.config.export_scale)?;
        log::info!("Rendered annotation snapshot: {} bytes", bytes.len());
        Ok(bytes)
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.session.as_ref().map(|s| &s.surface)
    }

    pub fn cursor(&self) -> Cursor {
        self.surface().map(Surface::cursor).unwrap_or_default()
    }

    pub fn selected(&self) -> Vec<ShapeId> {
        self.surface().map(Surface::selected_ids).unwrap_or_default()
    }

    /// Selection, hover or edit state of an object, for host highlighting.
    pub fn widget_state(&self, id: ShapeId) -> WidgetState {
        self.surface().map_or(WidgetState::Normal, |s| s.widget_state(id))
    }

    /// Textbox in edit mode, if any.
    pub fn editing(&self) -> Option<ShapeId> {
        self.session.as_ref()?.edit.as_ref().map(|e| e.target)
    }

    pub fn editing_text(&self) -> Option<&str> {
        self.session.as_ref()?.edit.as_ref().map(|e| e.editor.text())
    }

    pub fn history_len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.history.len())
    }

    pub fn can_undo(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.history.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.history.can_redo())
    }
}

impl Default for AnnotationEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            tool: ToolKind::default(),
            color: SerializableColor::new(0xDC, 0x26, 0x26, 255),
            observer: Box::new(NoopObserver),
            session: None,
        }
    }
}
