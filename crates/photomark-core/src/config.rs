//! Engine configuration.

use crate::error::ConfigError;
use crate::shapes::SerializableColor;
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Drawing constants and defaults. Every field may be omitted in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Stroke width of drawn shapes.
    pub stroke_width: f64,
    /// CSS color used until the host picks one.
    pub default_color: String,
    /// Hit-test slop in surface pixels.
    pub hit_tolerance: f64,
    /// Arrow tool head (width x height).
    pub arrowhead_size: Size,
    /// Leader-line head (width x height).
    pub leader_arrowhead_size: Size,
    pub text_placeholder: String,
    pub text_width: f64,
    pub text_font_size: f64,
    pub font_family: String,
    pub leader_text_width: f64,
    pub leader_font_size: f64,
    /// CSS color behind leader labels.
    pub leader_text_background: String,
    /// Label used when a leader is finalized with blank text.
    pub leader_placeholder: String,
    /// Label offset from the start point before the first move.
    pub leader_initial_label_offset: Vec2,
    /// Label offset from the pointer when dragging right and down.
    pub leader_label_offset_right_down: Vec2,
    /// Label offset from the pointer when dragging left and up.
    pub leader_label_offset_left_up: Vec2,
    /// Surface size until the host reports its container bounds.
    pub surface_size: Size,
    /// Scale factor for rendered snapshots.
    pub export_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stroke_width: 3.0,
            default_color: "#DC2626".to_string(),
            hit_tolerance: 4.0,
            arrowhead_size: Size::new(10.0, 10.0),
            leader_arrowhead_size: Size::new(12.0, 16.0),
            text_placeholder: "Type here...".to_string(),
            text_width: 200.0,
            text_font_size: 16.0,
            font_family: "Arial".to_string(),
            leader_text_width: 120.0,
            leader_font_size: 12.0,
            leader_text_background: "rgba(0,0,0,0.1)".to_string(),
            leader_placeholder: "Note...".to_string(),
            leader_initial_label_offset: Vec2::new(15.0, -10.0),
            leader_label_offset_right_down: Vec2::new(10.0, 5.0),
            leader_label_offset_left_up: Vec2::new(-110.0, -25.0),
            surface_size: Size::new(800.0, 600.0),
            export_scale: 1.0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that colors parse and sizes are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_color()?;
        self.leader_background()?;
        let lengths = [
            ("stroke_width", self.stroke_width),
            ("hit_tolerance", self.hit_tolerance),
            ("arrowhead_size", self.arrowhead_size.width),
            ("arrowhead_size", self.arrowhead_size.height),
            ("leader_arrowhead_size", self.leader_arrowhead_size.width),
            ("leader_arrowhead_size", self.leader_arrowhead_size.height),
            ("text_width", self.text_width),
            ("text_font_size", self.text_font_size),
            ("leader_text_width", self.leader_text_width),
            ("leader_font_size", self.leader_font_size),
            ("surface_size", self.surface_size.width),
            ("surface_size", self.surface_size.height),
        ];
        for (field, value) in lengths {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        let offsets = [
            ("leader_initial_label_offset", self.leader_initial_label_offset),
            ("leader_label_offset_right_down", self.leader_label_offset_right_down),
            ("leader_label_offset_left_up", self.leader_label_offset_left_up),
        ];
        for (field, offset) in offsets {
            if !offset.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite".to_string(),
                });
            }
        }
        if !(self.export_scale.is_finite() && self.export_scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "export_scale",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn default_color(&self) -> Result<SerializableColor, ConfigError> {
        SerializableColor::from_css(&self.default_color).map_err(|e| ConfigError::Invalid {
            field: "default_color",
            reason: e.to_string(),
        })
    }

    pub fn leader_background(&self) -> Result<SerializableColor, ConfigError> {
        SerializableColor::from_css(&self.leader_text_background).map_err(|e| ConfigError::Invalid {
            field: "leader_text_background",
            reason: e.to_string(),
        })
    }

    /// Label offset for a drag vector (pointer minus start point).
    pub fn leader_label_offset(&self, drag: Vec2) -> Vec2 {
        let right = self.leader_label_offset_right_down;
        let left = self.leader_label_offset_left_up;
        Vec2::new(
            if drag.x >= 0.0 { right.x } else { left.x },
            if drag.y >= 0.0 { right.y } else { left.y },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.default_color().unwrap(),
            SerializableColor::new(0xDC, 0x26, 0x26, 255)
        );
        assert_eq!(config.leader_background().unwrap().a, 26);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "stroke_width": 5.0 }"#).unwrap();
        assert!((config.stroke_width - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.leader_placeholder, "Note...");
    }

    #[test]
    fn test_bad_color_rejected() {
        let err = EngineConfig::from_json(r#"{ "default_color": "blurple" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "default_color", .. }));
    }

    #[test]
    fn test_negative_sizes_rejected() {
        for (json, field) in [
            (r#"{ "hit_tolerance": -1.0 }"#, "hit_tolerance"),
            (r#"{ "arrowhead_size": { "width": 10.0, "height": -2.0 } }"#, "arrowhead_size"),
            (r#"{ "leader_font_size": -12.0 }"#, "leader_font_size"),
            (r#"{ "text_width": -200.0 }"#, "text_width"),
        ] {
            let err = EngineConfig::from_json(json).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { field: f, .. } if f == field),
                "{json}: {err}"
            );
        }
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut config = EngineConfig::default();
        config.text_font_size = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "text_font_size", .. })
        ));

        let mut config = EngineConfig::default();
        config.leader_label_offset_left_up = Vec2::new(f64::INFINITY, 0.0);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.export_scale = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_label_offset_flips_per_axis() {
        let config = EngineConfig::default();
        assert_eq!(config.leader_label_offset(Vec2::new(5.0, 5.0)), Vec2::new(10.0, 5.0));
        assert_eq!(config.leader_label_offset(Vec2::new(-5.0, 5.0)), Vec2::new(-110.0, 5.0));
        assert_eq!(config.leader_label_offset(Vec2::new(5.0, -5.0)), Vec2::new(10.0, -25.0));
    }
}
