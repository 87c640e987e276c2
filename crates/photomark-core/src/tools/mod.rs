//! Tool state machine: turns pointer gestures into scene objects.

use crate::config::EngineConfig;
use crate::leader::LeaderState;
use crate::shapes::{
    Arrowhead, CloudPath, CompositeKind, Ellipse, HeadAnchor, Interaction, Line, Rectangle,
    SerializableColor, Shape, ShapeId, ShapeStyle, Textbox, heading_degrees,
};
use crate::surface::Surface;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available tools, named as the toolbar names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Text,
    Arrow,
    Line,
    Square,
    Circle,
    Cloud,
    Leader,
}

impl ToolKind {
    /// Every tool, in toolbar order.
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Select,
        ToolKind::Text,
        ToolKind::Arrow,
        ToolKind::Line,
        ToolKind::Square,
        ToolKind::Circle,
        ToolKind::Cloud,
        ToolKind::Leader,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Text => "text",
            ToolKind::Arrow => "arrow",
            ToolKind::Line => "line",
            ToolKind::Square => "square",
            ToolKind::Circle => "circle",
            ToolKind::Cloud => "cloud",
            ToolKind::Leader => "leader",
        }
    }

    /// Look up a tool by toolbar name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Whether pointer-down on the surface starts a drawing gesture.
    pub fn draws(&self) -> bool {
        *self != ToolKind::Select
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The host inputs a gesture is drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolContext {
    pub tool: ToolKind,
    pub color: SerializableColor,
}

/// Object under construction during a drag.
#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Line(ShapeId),
    Arrow { line: ShapeId, head: ShapeId },
    Rectangle(ShapeId),
    Ellipse(ShapeId),
    /// Latest cloud preview; none until the first move.
    Cloud(Option<ShapeId>),
    Leader(LeaderState),
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Waiting for pointer-down.
    #[default]
    Idle,
    /// Pointer is down and a draft follows it.
    Drawing {
        /// Pointer-down point.
        start: Point,
        /// Style captured at pointer-down.
        color: SerializableColor,
        draft: Draft,
    },
}

/// What pointer-down did.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureStart {
    /// Nothing: select tool, or a gesture was already running.
    Ignored,
    /// A drag gesture began.
    Drawing,
    /// A textbox was placed and wants edit mode.
    TextPlaced(ShapeId),
}

/// What pointer-up did.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEnd {
    /// No gesture was running.
    Nothing,
    /// The gesture finished and the scene should be committed.
    Commit,
    /// A leader was released and its label wants edit mode.
    LeaderReleased(LeaderState),
}

/// Drives a single gesture at a time.
#[derive(Debug, Clone, Default)]
pub struct ToolMachine {
    state: ToolState,
}

impl ToolMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, ToolState::Drawing { .. })
    }

    /// Pointer-down with the host's current tool and color.
    pub fn pointer_down(
        &mut self,
        surface: &mut Surface,
        config: &EngineConfig,
        ctx: ToolContext,
        point: Point,
    ) -> GestureStart {
        if self.is_drawing() || !ctx.tool.draws() {
            return GestureStart::Ignored;
        }
        let stroke = ShapeStyle::stroked(ctx.color, config.stroke_width);
        let draft = match ctx.tool {
            ToolKind::Select => return GestureStart::Ignored,
            ToolKind::Text => {
                let mut textbox = Textbox::new(point, config.text_placeholder.clone(), ctx.color)
                    .with_width(config.text_width)
                    .with_font(config.text_font_size, config.font_family.clone());
                textbox.interaction = Interaction::LIVE;
                let id = surface.add_object(Shape::Textbox(textbox));
                log::debug!("Placed textbox {id}");
                return GestureStart::TextPlaced(id);
            }
            ToolKind::Line => Draft::Line(add_inert(surface, Shape::Line(Line::new(point, point).with_style(stroke)))),
            ToolKind::Arrow => {
                let line = add_inert(surface, Shape::Line(Line::new(point, point).with_style(stroke)));
                let head = Arrowhead::new(
                    point,
                    config.arrowhead_size.width,
                    config.arrowhead_size.height,
                    0.0,
                    HeadAnchor::Tip,
                )
                .with_style(ShapeStyle::filled(ctx.color));
                let head = add_inert(surface, Shape::Arrowhead(head));
                Draft::Arrow { line, head }
            }
            ToolKind::Square => Draft::Rectangle(add_inert(
                surface,
                Shape::Rectangle(Rectangle::from_corners(point, point).with_style(stroke)),
            )),
            ToolKind::Circle => Draft::Ellipse(add_inert(
                surface,
                Shape::Ellipse(Ellipse::from_diagonal(point, point).with_style(stroke)),
            )),
            ToolKind::Cloud => Draft::Cloud(None),
            ToolKind::Leader => Draft::Leader(LeaderState::start(surface, config, point, ctx.color)),
        };
        log::debug!("Gesture start: {} at ({}, {})", ctx.tool, point.x, point.y);
        self.state = ToolState::Drawing {
            start: point,
            color: ctx.color,
            draft,
        };
        GestureStart::Drawing
    }

    /// Pointer-move. Returns false when idle (nothing to update).
    pub fn pointer_move(&mut self, surface: &mut Surface, config: &EngineConfig, point: Point) -> bool {
        let ToolState::Drawing { start, color, draft } = &mut self.state else {
            return false;
        };
        let start = *start;

        match draft {
            Draft::Line(id) => {
                if let Some(Shape::Line(line)) = surface.get_mut(*id) {
                    line.end = point;
                }
            }
            Draft::Arrow { line, head } => {
                if let Some(Shape::Line(line)) = surface.get_mut(*line) {
                    line.end = point;
                }
                if let Some(Shape::Arrowhead(head)) = surface.get_mut(*head) {
                    head.position = point;
                    head.angle = heading_degrees(start, point);
                }
            }
            Draft::Rectangle(id) => {
                if let Some(Shape::Rectangle(rect)) = surface.get_mut(*id) {
                    rect.set_corners(start, point);
                }
            }
            Draft::Ellipse(id) => {
                if let Some(Shape::Ellipse(ellipse)) = surface.get_mut(*id) {
                    ellipse.set_diagonal(start, point);
                }
            }
            Draft::Cloud(preview) => {
                if let Some(old) = preview.take() {
                    surface.remove_object(old);
                }
                let cloud = CloudPath::cloud(start, point)
                    .with_style(ShapeStyle::stroked(*color, config.stroke_width));
                *preview = Some(add_inert(surface, Shape::Path(cloud)));
            }
            Draft::Leader(leader) => {
                if let Err(err) = leader.drag(surface, config, point) {
                    log::warn!("Leader drag ignored: {err}");
                }
            }
        }
        true
    }

    /// Pointer-up: finish the running gesture.
    pub fn pointer_up(&mut self, surface: &mut Surface) -> GestureEnd {
        let ToolState::Drawing { draft, .. } = std::mem::take(&mut self.state) else {
            return GestureEnd::Nothing;
        };

        match draft {
            Draft::Arrow { line, head } => {
                match surface.group_objects(&[line, head], CompositeKind::Arrow) {
                    Some(group) => log::debug!("Arrow grouped as {group}"),
                    None => log::warn!("Arrow parts missing, left ungrouped"),
                }
                GestureEnd::Commit
            }
            Draft::Leader(leader) => match leader.release(surface) {
                Ok(editing) => GestureEnd::LeaderReleased(editing),
                Err(err) => {
                    log::warn!("Leader finalize aborted: {err}");
                    GestureEnd::Nothing
                }
            },
            Draft::Line(_) | Draft::Rectangle(_) | Draft::Ellipse(_) | Draft::Cloud(_) => {
                GestureEnd::Commit
            }
        }
    }
}

fn add_inert(surface: &mut Surface, mut shape: Shape) -> ShapeId {
    shape.set_interaction(Interaction::INERT);
    surface.add_object(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::InteractionMode;
    use kurbo::Size;

    fn setup() -> (Surface, EngineConfig, ToolMachine) {
        let mut surface = Surface::new(Size::new(800.0, 600.0), 4.0);
        surface.set_mode(InteractionMode::Draw);
        (surface, EngineConfig::default(), ToolMachine::new())
    }

    fn ctx(tool: ToolKind) -> ToolContext {
        ToolContext {
            tool,
            color: SerializableColor::new(220, 38, 38, 255),
        }
    }

    #[test]
    fn test_tool_names() {
        assert_eq!(ToolKind::parse("square"), Some(ToolKind::Square));
        assert_eq!(ToolKind::parse("eraser"), None);
        assert_eq!(ToolKind::Leader.to_string(), "leader");
        assert_eq!(serde_json::to_string(&ToolKind::Cloud).unwrap(), "\"cloud\"");
    }

    #[test]
    fn test_select_never_draws() {
        let (mut surface, config, mut tools) = setup();
        let start = tools.pointer_down(&mut surface, &config, ctx(ToolKind::Select), Point::ZERO);
        assert_eq!(start, GestureStart::Ignored);
        assert!(!tools.pointer_move(&mut surface, &config, Point::new(5.0, 5.0)));
        assert_eq!(tools.pointer_up(&mut surface), GestureEnd::Nothing);
    }

    #[test]
    fn test_rectangle_drag() {
        let (mut surface, config, mut tools) = setup();
        tools.pointer_down(&mut surface, &config, ctx(ToolKind::Square), Point::new(50.0, 50.0));
        tools.pointer_move(&mut surface, &config, Point::new(10.0, 80.0));
        assert_eq!(tools.pointer_up(&mut surface), GestureEnd::Commit);
        match surface.objects()[0] {
            Shape::Rectangle(r) => {
                assert_eq!(r.position, Point::new(10.0, 50.0));
                assert!((r.width - 40.0).abs() < f64::EPSILON);
                assert!((r.height - 30.0).abs() < f64::EPSILON);
                assert!((r.style.stroke_width - 3.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_arrow_groups_on_up() {
        let (mut surface, config, mut tools) = setup();
        tools.pointer_down(&mut surface, &config, ctx(ToolKind::Arrow), Point::ZERO);
        tools.pointer_move(&mut surface, &config, Point::new(100.0, 0.0));
        assert_eq!(surface.objects().len(), 2);
        tools.pointer_up(&mut surface);
        let objects = surface.objects();
        assert_eq!(objects.len(), 1);
        let group = objects[0].as_group().unwrap();
        assert_eq!(group.custom_type, Some(CompositeKind::Arrow));
        match &group.children()[1] {
            Shape::Arrowhead(head) => {
                assert!((head.angle - 90.0).abs() < f64::EPSILON);
                assert_eq!(head.tip(), Point::new(100.0, 0.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_cloud_replaces_preview() {
        let (mut surface, config, mut tools) = setup();
        tools.pointer_down(&mut surface, &config, ctx(ToolKind::Cloud), Point::ZERO);
        assert!(surface.objects().is_empty());
        tools.pointer_move(&mut surface, &config, Point::new(50.0, 50.0));
        let first = surface.objects()[0].id();
        tools.pointer_move(&mut surface, &config, Point::new(80.0, 60.0));
        let objects = surface.objects();
        assert_eq!(objects.len(), 1);
        assert_ne!(objects[0].id(), first);
        assert_eq!(objects[0].bounds(), kurbo::Rect::new(0.0, 0.0, 80.0, 60.0));
    }

    #[test]
    fn test_text_places_immediately() {
        let (mut surface, config, mut tools) = setup();
        let start = tools.pointer_down(&mut surface, &config, ctx(ToolKind::Text), Point::new(5.0, 6.0));
        let GestureStart::TextPlaced(id) = start else {
            panic!("expected text");
        };
        assert!(!tools.is_drawing());
        let text = surface.get(id).unwrap().as_textbox().unwrap();
        assert_eq!(text.content, "Type here...");
        assert!((text.font_size - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_leader_release_hands_over_state() {
        let (mut surface, config, mut tools) = setup();
        tools.pointer_down(&mut surface, &config, ctx(ToolKind::Leader), Point::new(10.0, 10.0));
        tools.pointer_move(&mut surface, &config, Point::new(90.0, 90.0));
        match tools.pointer_up(&mut surface) {
            GestureEnd::LeaderReleased(LeaderState::EditingNew { .. }) => {}
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(surface.objects().len(), 3);
    }
}
