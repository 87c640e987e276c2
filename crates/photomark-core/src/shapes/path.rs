//! Path shape, used for revision-cloud outlines.

use super::{Interaction, ShapeId, ShapeStyle, ShapeTrait, point_to_polyline_dist};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of perimeter samples in a revision cloud.
pub const CLOUD_SAMPLES: usize = 12;

/// One path-data command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum PathCommand {
    M { to: Point },
    L { to: Point },
    Q { ctrl: Point, to: Point },
    Z,
}

/// A closed outline built from path-data commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudPath {
    pub(crate) id: ShapeId,
    pub commands: Vec<PathCommand>,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub interaction: Interaction,
}

impl CloudPath {
    /// Create a path from raw commands.
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self {
            id: Uuid::new_v4(),
            commands,
            style: ShapeStyle::default(),
            interaction: Interaction::default(),
        }
    }

    /// Scalloped rectangle spanned by two corners.
    ///
    /// Starts at `a`, then walks the perimeter top → right → bottom → left
    /// with [`CLOUD_SAMPLES`] evenly spaced samples, each emitted as a
    /// quadratic segment whose control point equals its end point, and closes.
    pub fn cloud(a: Point, b: Point) -> Self {
        let mut commands = Vec::with_capacity(CLOUD_SAMPLES + 2);
        commands.push(PathCommand::M { to: a });
        for i in 0..CLOUD_SAMPLES {
            let progress = i as f64 / CLOUD_SAMPLES as f64;
            let sample = if progress < 0.25 {
                Point::new(a.x + (b.x - a.x) * (progress * 4.0), a.y)
            } else if progress < 0.5 {
                Point::new(b.x, a.y + (b.y - a.y) * ((progress - 0.25) * 4.0))
            } else if progress < 0.75 {
                Point::new(b.x - (b.x - a.x) * ((progress - 0.5) * 4.0), b.y)
            } else {
                Point::new(a.x, b.y - (b.y - a.y) * ((progress - 0.75) * 4.0))
            };
            commands.push(PathCommand::Q {
                ctrl: sample,
                to: sample,
            });
        }
        commands.push(PathCommand::Z);
        Self::new(commands)
    }

    /// Builder: set the style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// SVG-style path data, e.g. `M 0 0 Q 10 0 10 0 ... Z`.
    pub fn path_data(&self) -> String {
        self.commands
            .iter()
            .map(|cmd| match cmd {
                PathCommand::M { to } => format!("M {} {}", to.x, to.y),
                PathCommand::L { to } => format!("L {} {}", to.x, to.y),
                PathCommand::Q { ctrl, to } => format!("Q {} {} {} {}", ctrl.x, ctrl.y, to.x, to.y),
                PathCommand::Z => "Z".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Closed polygon through every command end point.
    fn outline(&self) -> Vec<Point> {
        let mut pts: Vec<Point> = self
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                PathCommand::M { to } | PathCommand::L { to } | PathCommand::Q { to, .. } => {
                    Some(*to)
                }
                PathCommand::Z => None,
            })
            .collect();
        if let Some(first) = pts.first().copied() {
            pts.push(first);
        }
        pts
    }
}

impl ShapeTrait for CloudPath {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let pts = self.outline();
        let Some(first) = pts.first() else {
            return Rect::ZERO;
        };
        pts.iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let pad = tolerance + self.style.stroke_width / 2.0;
        self.bounds().inflate(pad, pad).contains(point)
            || point_to_polyline_dist(point, &self.outline()) <= pad
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for cmd in &self.commands {
            match *cmd {
                PathCommand::M { to } => path.move_to(to),
                PathCommand::L { to } => path.line_to(to),
                PathCommand::Q { ctrl, to } => path.quad_to(ctrl, to),
                PathCommand::Z => path.close_path(),
            }
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn interaction(&self) -> Interaction {
        self.interaction
    }

    fn set_interaction(&mut self, interaction: Interaction) {
        self.interaction = interaction;
    }

    fn transform(&mut self, affine: Affine) {
        for cmd in &mut self.commands {
            match cmd {
                PathCommand::M { to } | PathCommand::L { to } => *to = affine * *to,
                PathCommand::Q { ctrl, to } => {
                    *ctrl = affine * *ctrl;
                    *to = affine * *to;
                }
                PathCommand::Z => {}
            }
        }
    }
}
