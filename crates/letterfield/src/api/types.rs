use std::fmt;

use serde::{Deserialize, Serialize};

/// Simulation phase of the particle field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Ballistic launch, gravity and ground bounce.
    #[default]
    Drop,
    /// Eased interpolation onto the word's target points.
    Morph,
}

/// How a run seeds its particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartMode {
    /// Launch every particle from the launch origin and let it fall.
    #[default]
    Drop,
    /// Seed particles next to their targets with zero velocity and start in morph.
    /// Used when a scheduled word rotation remounts the hero.
    Continuity,
}

/// Event emitted by the field to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// The first scene has been built.
    Ready { particles: usize },
}

/// Canvas size in CSS pixels plus the device pixel ratio.
///
/// Dimensions are clamped to at least 1px so layout math never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            dpr: if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 },
        }
    }

    /// Backing-store width in device pixels.
    pub fn device_width(&self) -> u32 {
        (self.width * self.dpr).round().max(1.0) as u32
    }

    /// Backing-store height in device pixels.
    pub fn device_height(&self) -> u32 {
        (self.height * self.dpr).round().max(1.0) as u32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0, 1.0)
    }
}

fn clamp_dimension(value: f32) -> f32 {
    if value.is_finite() {
        value.max(1.0)
    } else {
        1.0
    }
}

/// 8-bit RGBA color. Serialized as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// CSS `rgba()` form for canvas fill and stroke styles.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value).ok_or_else(|| format!("invalid color `{value}`"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_clamps_zero_area() {
        let vp = Viewport::new(0.0, -5.0, 0.0);
        assert_eq!(vp.width, 1.0);
        assert_eq!(vp.height, 1.0);
        assert_eq!(vp.dpr, 1.0);
        assert_eq!(vp.device_width(), 1);
    }

    #[test]
    fn viewport_device_size_uses_dpr() {
        let vp = Viewport::new(400.0, 300.0, 2.0);
        assert_eq!(vp.device_width(), 800);
        assert_eq!(vp.device_height(), 600);
    }

    #[test]
    fn parse_hex_forms() {
        assert_eq!(Color::parse_hex("#fff"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::parse_hex("0b0b0c"), Some(Color::rgb(11, 11, 12)));
        assert_eq!(Color::parse_hex("#ff5a1f80"), Some(Color::rgba(255, 90, 31, 128)));
        assert_eq!(Color::parse_hex("#12345"), None);
        assert_eq!(Color::parse_hex("#gggggg"), None);
    }

    #[test]
    fn color_display_round_trips_through_serde() {
        let json = serde_json::to_string(&Color::rgb(244, 241, 234)).unwrap();
        assert_eq!(json, "\"#f4f1ea\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(244, 241, 234));
    }

    #[test]
    fn css_includes_alpha() {
        assert_eq!(Color::rgba(255, 0, 0, 255).to_css(), "rgba(255, 0, 0, 1.000)");
    }
}
