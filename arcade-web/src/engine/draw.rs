//! Per-frame draw list
//!
//! Simulation code never talks to the GPU. Everything visible is appended
//! here in canvas pixels and the renderer turns it into triangles once the
//! frame is complete. Text is collected separately for the HTML overlay.

/// RGBA color, components in 0-1
pub type Color = [f32; 4];

/// Named colors used across modes
pub mod colors {
    use super::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const RED: Color = [1.0, 0.25, 0.25, 1.0];
    pub const GREEN: Color = [0.2, 1.0, 0.4, 1.0];
    pub const YELLOW: Color = [1.0, 0.9, 0.2, 1.0];
    pub const ORANGE: Color = [1.0, 0.55, 0.1, 1.0];
    pub const CYAN: Color = [0.2, 0.9, 0.9, 0.7];
    pub const BLUE: Color = [0.3, 0.5, 1.0, 1.0];
    pub const PURPLE: Color = [0.7, 0.4, 1.0, 1.0];
    pub const GREY: Color = [0.5, 0.5, 0.55, 0.6];
    pub const DARK: Color = [0.08, 0.08, 0.12, 1.0];
    /// Ghost cursors of other players
    pub const GHOST: Color = [0.8, 0.8, 1.0, 0.6];
}

/// One drawable primitive, canvas pixel coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { x: f32, y: f32, radius: f32, color: Color },
    Ring { x: f32, y: f32, radius: f32, width: f32, color: Color },
    Line { x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color },
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
}

/// Text label for the overlay layer
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextLabel {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub alpha: f32,
}

#[derive(Default)]
pub struct DrawList {
    shapes: Vec<Shape>,
    labels: Vec<TextLabel>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.labels.clear();
    }

    pub fn circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.shapes.push(Shape::Circle { x, y, radius, color });
    }

    pub fn ring(&mut self, x: f32, y: f32, radius: f32, width: f32, color: Color) {
        self.shapes.push(Shape::Ring { x, y, radius, width, color });
    }

    pub fn line(&mut self, a: (f32, f32), b: (f32, f32), width: f32, color: Color) {
        self.shapes.push(Shape::Line { x1: a.0, y1: a.1, x2: b.0, y2: b.1, width, color });
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.shapes.push(Shape::Rect { x, y, w, h, color });
    }

    pub fn label(&mut self, x: f32, y: f32, text: impl Into<String>, alpha: f32) {
        self.labels.push(TextLabel { x, y, text: text.into(), alpha });
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }
}

/// Fade a color's alpha
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Parse a CSS hex color (`#rgb` or `#rrggbb`, `#` optional)
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.trim().trim_start_matches('#');
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

    match digits.len() {
        6 => Some([
            channel(digits.get(0..2)?)?,
            channel(digits.get(2..4)?)?,
            channel(digits.get(4..6)?)?,
            1.0,
        ]),
        3 => {
            let mut rgb = [0.0f32; 3];
            for (i, c) in digits.chars().enumerate() {
                let v = c.to_digit(16)? as f32;
                rgb[i] = (v * 16.0 + v) / 255.0;
            }
            Some([rgb[0], rgb[1], rgb[2], 1.0])
        }
        _ => None,
    }
}
