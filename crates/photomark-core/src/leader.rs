//! Leader-line lifecycle: drafting, editing the new label, grouped, and
//! editing an existing one.
//!
//! Each transition consumes the current state and either returns the next
//! one or fails without touching the scene.

use crate::config::EngineConfig;
use crate::error::LeaderError;
use crate::shapes::{
    Arrowhead, CompositeKind, HeadAnchor, Interaction, Line, SerializableColor, Shape, ShapeId,
    ShapeStyle, Textbox, heading_degrees,
};
use crate::surface::Surface;
use kurbo::Point;

/// The three loose primitives of a leader-line, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderParts {
    pub line: ShapeId,
    pub head: ShapeId,
    pub label: ShapeId,
}

impl LeaderParts {
    fn ids(&self) -> [ShapeId; 3] {
        [self.line, self.head, self.label]
    }

    /// Fails with the first part that is no longer in the scene.
    fn check(&self, surface: &Surface) -> Result<(), LeaderError> {
        let missing = [(self.line, "line"), (self.head, "arrowhead"), (self.label, "textbox")]
            .into_iter()
            .find(|(id, _)| surface.get(*id).is_none());
        match missing {
            Some((_, part)) => Err(LeaderError::MissingPart(part)),
            None => Ok(()),
        }
    }
}

/// Where a leader-line is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum LeaderState {
    /// Pointer is down; the line follows the pointer.
    Drafting { parts: LeaderParts, start: Point },
    /// Pointer released; the label is being typed.
    EditingNew { parts: LeaderParts },
    /// One `leaderLine` composite in the scene.
    Grouped { group: ShapeId },
    /// Composite dissolved for a label edit.
    EditingExisting { parts: LeaderParts },
}

impl LeaderState {
    /// Place the three inert parts at `start`.
    pub fn start(surface: &mut Surface, config: &EngineConfig, start: Point, color: SerializableColor) -> Self {
        let line = Line::new(start, start).with_style(ShapeStyle::stroked(color, config.stroke_width));
        let head = Arrowhead::new(
            start,
            config.leader_arrowhead_size.width,
            config.leader_arrowhead_size.height,
            180.0,
            HeadAnchor::Base,
        )
        .with_style(ShapeStyle::filled(color));
        let mut label = Textbox::new(start + config.leader_initial_label_offset, "", color)
            .with_width(config.leader_text_width)
            .with_font(config.leader_font_size, config.font_family.clone())
            .with_background(config.leader_background().ok());
        label.editable = false;

        let parts = LeaderParts {
            line: surface.add_object(Shape::Line(line)),
            head: surface.add_object(Shape::Arrowhead(head)),
            label: surface.add_object(Shape::Textbox(label)),
        };
        for id in parts.ids() {
            surface.set_interaction(id, Interaction::INERT);
        }
        log::debug!("Leader start at ({}, {})", start.x, start.y);
        LeaderState::Drafting { parts, start }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LeaderState::Drafting { .. } => "drafting",
            LeaderState::EditingNew { .. } => "editingNew",
            LeaderState::Grouped { .. } => "grouped",
            LeaderState::EditingExisting { .. } => "editingExisting",
        }
    }

    /// The loose parts, when not grouped.
    pub fn parts(&self) -> Option<&LeaderParts> {
        match self {
            LeaderState::Drafting { parts, .. }
            | LeaderState::EditingNew { parts }
            | LeaderState::EditingExisting { parts } => Some(parts),
            LeaderState::Grouped { .. } => None,
        }
    }

    fn invalid(&self, transition: &'static str) -> LeaderError {
        LeaderError::InvalidTransition {
            transition,
            state: self.name(),
        }
    }

    /// Follow the pointer: stretch the line, turn the head back toward the
    /// start and keep the label clear of the line.
    pub fn drag(&self, surface: &mut Surface, config: &EngineConfig, point: Point) -> Result<(), LeaderError> {
        let LeaderState::Drafting { parts, start } = self else {
            return Err(self.invalid("drag"));
        };
        parts.check(surface)?;
        let start = *start;

        if let Some(Shape::Line(line)) = surface.get_mut(parts.line) {
            line.end = point;
        }
        if let Some(Shape::Arrowhead(head)) = surface.get_mut(parts.head) {
            head.angle = heading_degrees(point, start);
        }
        if let Some(Shape::Textbox(label)) = surface.get_mut(parts.label) {
            label.position = point + config.leader_label_offset(point - start);
        }
        Ok(())
    }

    /// Pointer released: the label becomes an editable, live textbox.
    pub fn release(self, surface: &mut Surface) -> Result<Self, LeaderError> {
        let LeaderState::Drafting { parts, .. } = self else {
            return Err(self.invalid("release"));
        };
        parts.check(surface)?;
        if let Some(Shape::Textbox(label)) = surface.get_mut(parts.label) {
            label.content.clear();
            label.editable = true;
        }
        surface.set_interaction(parts.label, Interaction::LIVE);
        log::debug!("Leader released, editing label");
        Ok(LeaderState::EditingNew { parts })
    }

    /// Label edit ended: fill in a placeholder if blank and group the parts.
    pub fn finish(self, surface: &mut Surface, config: &EngineConfig) -> Result<Self, LeaderError> {
        let parts = match self {
            LeaderState::EditingNew { parts } | LeaderState::EditingExisting { parts } => parts,
            other => return Err(other.invalid("finish")),
        };
        parts.check(surface)?;

        if let Some(Shape::Textbox(label)) = surface.get_mut(parts.label) {
            if label.content.trim().is_empty() {
                label.content = config.leader_placeholder.clone();
            }
        }
        let group = surface
            .group_objects(&parts.ids(), CompositeKind::LeaderLine)
            .ok_or(LeaderError::MissingPart("group"))?;
        surface.select(group);
        log::debug!("Leader grouped as {group}");
        Ok(LeaderState::Grouped { group })
    }

    /// Dissolve a grouped leader back into parts at absolute coordinates.
    pub fn reopen(self, surface: &mut Surface) -> Result<Self, LeaderError> {
        let LeaderState::Grouped { group } = self else {
            return Err(self.invalid("reopen"));
        };
        let parts = leader_parts_of(surface, group)?;
        surface.ungroup_object(group).ok_or(LeaderError::NotLeader)?;
        if let Some(Shape::Textbox(label)) = surface.get_mut(parts.label) {
            label.editable = true;
        }
        surface.set_interaction(parts.label, Interaction::LIVE);
        log::debug!("Leader {group} reopened for editing");
        Ok(LeaderState::EditingExisting { parts })
    }
}

/// Identify the line, head and label of a leader composite.
fn leader_parts_of(surface: &Surface, group: ShapeId) -> Result<LeaderParts, LeaderError> {
    let Some(Shape::Group(g)) = surface.get(group) else {
        return Err(LeaderError::NotLeader);
    };
    if g.custom_type != Some(CompositeKind::LeaderLine) {
        return Err(LeaderError::NotLeader);
    }
    match g.children() {
        [Shape::Line(line), Shape::Arrowhead(head), Shape::Textbox(label)] => Ok(LeaderParts {
            line: line.id,
            head: head.id,
            label: label.id,
        }),
        _ => Err(LeaderError::NotLeader),
    }
}
