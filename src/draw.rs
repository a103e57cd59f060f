//! Drawable primitives handed to the rendering collaborator.
//!
//! A [`DrawPlan`] is an immutable, ordered list: later primitives are painted
//! on top of earlier ones.

use serde::{Deserialize, Serialize};

use crate::types::{Point, Rect};

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSLUCENT_BLACK: Color = Color::rgba(0, 0, 0, 160);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    /// Top-left corner of the label in screen space.
    pub origin: Point,
    /// Font size in screen units.
    pub size: f32,
    pub text: String,
    pub foreground: Color,
    pub background: Color,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Circle {
        center: Point,
        radius: f32,
        color: Color,
    },
    Text(TextLabel),
    Polyline {
        points: Vec<Point>,
        color: Color,
        width: f32,
    },
    Rect {
        rect: Rect,
        color: Color,
        width: f32,
    },
}

/// Colors for one classification state of the face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub eyebrow: Color,
    pub eye: Color,
}

impl Palette {
    pub const NORMAL: Palette = Palette {
        eyebrow: Color::rgb(0, 255, 0),
        eye: Color::rgba(0, 200, 255, 160),
    };

    pub const LARGE_ANGLE: Palette = Palette {
        eyebrow: Color::rgb(255, 165, 0),
        eye: Color::rgba(255, 165, 0, 140),
    };
}

/// Everything to draw for one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawPlan {
    pub primitives: Vec<Primitive>,
    /// Quality score of the face the plan was built from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
}

impl DrawPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter()
    }

    /// Text of every label in the plan, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(label) => Some(label.text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_serialize_with_kind_tag() {
        let circle = Primitive::Circle {
            center: Point::new(1.0, 2.0),
            radius: 3.0,
            color: Color::WHITE,
        };
        let json = serde_json::to_value(&circle).unwrap();
        assert_eq!(json["kind"], "circle");
        assert_eq!(json["radius"], 3.0);

        let label = Primitive::Text(TextLabel {
            origin: Point::zero(),
            size: 12.0,
            text: "L".to_string(),
            foreground: Color::WHITE,
            background: Color::TRANSLUCENT_BLACK,
            alignment: Alignment::Center,
        });
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["alignment"], "center");
    }

    #[test]
    fn empty_plan_omits_quality() {
        let json = serde_json::to_string(&DrawPlan::empty()).unwrap();
        assert_eq!(json, r#"{"primitives":[]}"#);
    }
}
