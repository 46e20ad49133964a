use serde::{Deserialize, Serialize};

use crate::api::types::Color;
use crate::extensions::easing::Easing;

/// Errors raised while parsing or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("`{field}` must not be empty")]
    Empty { field: &'static str },
}

/// Every tunable of the letter field.
///
/// Read live: the simulator consults its current config on every tick and
/// every target rebuild, so replacing it never restarts the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConfig {
    /// CSS font family used to render the word mask.
    pub font_family: String,
    /// CSS font weight (100..=900 usually).
    pub font_weight: u16,
    /// Distance between sampled target points, in CSS pixels.
    pub sample_gap: f32,
    /// Extra space between letters, as a fraction of the font size.
    pub letter_spacing: f32,
    /// Fraction of the canvas the word may span.
    pub word_scale: f32,
    /// Size of each particle's glyph, in CSS pixels.
    pub glyph_size: f32,

    pub gravity: f32,
    /// Restitution applied to vertical velocity on ground contact. Negative.
    pub bounce: f32,
    /// Horizontal velocity retained on ground contact.
    pub friction: f32,

    /// Launch origin as `[x, y]` fractions of the canvas.
    pub launch_origin: [f32; 2],
    pub launch_radius: f32,
    pub launch_speed: f32,
    pub launch_speed_jitter: f32,
    /// Launch direction in degrees (canvas space, -90 is straight up).
    pub launch_angle: f32,
    /// Total angular spread around `launch_angle`, in degrees.
    pub launch_spread: f32,

    pub drop_ms: f32,
    /// Pause after the drop before the morph starts.
    pub morph_delay_ms: f32,
    pub transition_ms: f32,
    /// Upper bound of each particle's random transition start delay.
    pub transition_jitter_ms: f32,
    /// Interpolation gain added on top of the base gain at full progress.
    pub morph_gain: f32,
    pub easing: Easing,

    pub repel_radius: f32,
    pub repel_force: f32,
    /// Exponential smoothing factor for the pointer, per nominal frame.
    pub pointer_smoothing: f32,
    /// Pointer distance below which no repulsion applies.
    pub dead_zone: f32,
    /// Largest offset the pointer may push a particle's target.
    pub max_dock_offset: f32,

    /// Fraction of background cells holding a flickering glyph.
    pub static_density: f32,
    /// Flicker speed in radians per millisecond.
    pub static_speed: f32,
    /// Background grid cell size, in CSS pixels.
    pub static_cell: f32,

    pub foreground: Color,
    pub background: Color,
    pub accent: Color,

    /// Fade particles from 0.85 to full alpha over their morph progress.
    pub fade_in: bool,
    /// Stroke each particle glyph in the accent color after filling it.
    pub outline: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            font_family: "Inter, Helvetica, Arial, sans-serif".to_string(),
            font_weight: 800,
            sample_gap: 6.0,
            letter_spacing: 0.04,
            word_scale: 0.8,
            glyph_size: 9.0,
            gravity: 6.0,
            bounce: -0.28,
            friction: 0.86,
            launch_origin: [0.5, 0.92],
            launch_radius: 40.0,
            launch_speed: 14.0,
            launch_speed_jitter: 6.0,
            launch_angle: -90.0,
            launch_spread: 70.0,
            drop_ms: 1200.0,
            morph_delay_ms: 900.0,
            transition_ms: 1400.0,
            transition_jitter_ms: 600.0,
            morph_gain: 0.18,
            easing: Easing::CubicInOut,
            repel_radius: 120.0,
            repel_force: 40.0,
            pointer_smoothing: 0.18,
            dead_zone: 8.0,
            max_dock_offset: 28.0,
            static_density: 0.35,
            static_speed: 0.0015,
            static_cell: 28.0,
            foreground: Color::rgb(244, 241, 234),
            background: Color::rgb(11, 11, 12),
            accent: Color::rgb(255, 90, 31),
            fade_in: true,
            outline: false,
        }
    }
}

impl FieldConfig {
    /// Parse a full config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Run every field check a patch would run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigPatch::from(self).validate()
    }

    /// Time from run start until the morph phase begins.
    pub fn drop_window_ms(&self) -> f64 {
        (self.drop_ms + self.morph_delay_ms) as f64
    }

    /// True when `other` would lay the word out differently.
    pub fn layout_differs(&self, other: &FieldConfig) -> bool {
        self.font_family != other.font_family
            || self.font_weight != other.font_weight
            || self.sample_gap != other.sample_gap
            || self.letter_spacing != other.letter_spacing
            || self.word_scale != other.word_scale
    }

    /// True when `other` would build a different background field.
    pub fn background_differs(&self, other: &FieldConfig) -> bool {
        self.static_density != other.static_density || self.static_cell != other.static_cell
    }
}

/// Typed partial update from an external tuning surface.
///
/// Every field is optional; present fields are validated one by one before
/// anything is merged, so a rejected patch leaves the config untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigPatch {
    pub font_family: Option<String>,
    pub font_weight: Option<u16>,
    pub sample_gap: Option<f32>,
    pub letter_spacing: Option<f32>,
    pub word_scale: Option<f32>,
    pub glyph_size: Option<f32>,
    pub gravity: Option<f32>,
    pub bounce: Option<f32>,
    pub friction: Option<f32>,
    pub launch_origin: Option<[f32; 2]>,
    pub launch_radius: Option<f32>,
    pub launch_speed: Option<f32>,
    pub launch_speed_jitter: Option<f32>,
    pub launch_angle: Option<f32>,
    pub launch_spread: Option<f32>,
    pub drop_ms: Option<f32>,
    pub morph_delay_ms: Option<f32>,
    pub transition_ms: Option<f32>,
    pub transition_jitter_ms: Option<f32>,
    pub morph_gain: Option<f32>,
    pub easing: Option<Easing>,
    pub repel_radius: Option<f32>,
    pub repel_force: Option<f32>,
    pub pointer_smoothing: Option<f32>,
    pub dead_zone: Option<f32>,
    pub max_dock_offset: Option<f32>,
    pub static_density: Option<f32>,
    pub static_speed: Option<f32>,
    pub static_cell: Option<f32>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub accent: Option<Color>,
    pub fade_in: Option<bool>,
    pub outline: Option<bool>,
}

fn check(field: &'static str, value: Option<f32>, min: f32, max: f32) -> Result<(), ConfigError> {
    match value {
        Some(v) if !(v.is_finite() && v >= min && v <= max) => Err(ConfigError::OutOfRange {
            field,
            value: v,
            min,
            max,
        }),
        _ => Ok(()),
    }
}

impl ConfigPatch {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        *self == ConfigPatch::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(family) = &self.font_family {
            if family.trim().is_empty() {
                return Err(ConfigError::Empty { field: "fontFamily" });
            }
        }
        check("fontWeight", self.font_weight.map(f32::from), 1.0, 1000.0)?;
        check("sampleGap", self.sample_gap, 1.0, 64.0)?;
        check("letterSpacing", self.letter_spacing, -0.5, 2.0)?;
        check("wordScale", self.word_scale, 0.05, 1.0)?;
        check("glyphSize", self.glyph_size, 1.0, 256.0)?;
        check("gravity", self.gravity, 0.0, 100.0)?;
        check("bounce", self.bounce, -1.0, 0.0)?;
        check("friction", self.friction, 0.0, 1.0)?;
        if let Some([x, y]) = self.launch_origin {
            check("launchOrigin[0]", Some(x), 0.0, 1.0)?;
            check("launchOrigin[1]", Some(y), 0.0, 1.0)?;
        }
        check("launchRadius", self.launch_radius, 0.0, 10_000.0)?;
        check("launchSpeed", self.launch_speed, 0.0, 500.0)?;
        check("launchSpeedJitter", self.launch_speed_jitter, 0.0, 500.0)?;
        check("launchAngle", self.launch_angle, -360.0, 360.0)?;
        check("launchSpread", self.launch_spread, 0.0, 360.0)?;
        check("dropMs", self.drop_ms, 0.0, 60_000.0)?;
        check("morphDelayMs", self.morph_delay_ms, 0.0, 60_000.0)?;
        check("transitionMs", self.transition_ms, 1.0, 60_000.0)?;
        check("transitionJitterMs", self.transition_jitter_ms, 0.0, 60_000.0)?;
        check("morphGain", self.morph_gain, 0.0, 0.96)?;
        check("repelRadius", self.repel_radius, 0.0, 5_000.0)?;
        check("repelForce", self.repel_force, 0.0, 1_000.0)?;
        check("pointerSmoothing", self.pointer_smoothing, 0.0, 1.0)?;
        check("deadZone", self.dead_zone, 0.0, 5_000.0)?;
        check("maxDockOffset", self.max_dock_offset, 0.0, 1_000.0)?;
        check("staticDensity", self.static_density, 0.0, 1.0)?;
        check("staticSpeed", self.static_speed, 0.0, 1.0)?;
        check("staticCell", self.static_cell, 4.0, 512.0)?;
        Ok(())
    }

    /// Validate, then merge every present field into `config`.
    pub fn apply_to(&self, config: &mut FieldConfig) -> Result<(), ConfigError> {
        self.validate()?;

        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = &self.$field {
                        config.$field = value.clone();
                    }
                )*
            };
        }

        merge!(
            font_family, font_weight, sample_gap, letter_spacing, word_scale, glyph_size,
            gravity, bounce, friction,
            launch_origin, launch_radius, launch_speed, launch_speed_jitter, launch_angle, launch_spread,
            drop_ms, morph_delay_ms, transition_ms, transition_jitter_ms, morph_gain, easing,
            repel_radius, repel_force, pointer_smoothing, dead_zone, max_dock_offset,
            static_density, static_speed, static_cell,
            foreground, background, accent,
            fade_in, outline,
        );
        Ok(())
    }
}

impl From<&FieldConfig> for ConfigPatch {
    fn from(c: &FieldConfig) -> Self {
        Self {
            font_family: Some(c.font_family.clone()),
            font_weight: Some(c.font_weight),
            sample_gap: Some(c.sample_gap),
            letter_spacing: Some(c.letter_spacing),
            word_scale: Some(c.word_scale),
            glyph_size: Some(c.glyph_size),
            gravity: Some(c.gravity),
            bounce: Some(c.bounce),
            friction: Some(c.friction),
            launch_origin: Some(c.launch_origin),
            launch_radius: Some(c.launch_radius),
            launch_speed: Some(c.launch_speed),
            launch_speed_jitter: Some(c.launch_speed_jitter),
            launch_angle: Some(c.launch_angle),
            launch_spread: Some(c.launch_spread),
            drop_ms: Some(c.drop_ms),
            morph_delay_ms: Some(c.morph_delay_ms),
            transition_ms: Some(c.transition_ms),
            transition_jitter_ms: Some(c.transition_jitter_ms),
            morph_gain: Some(c.morph_gain),
            easing: Some(c.easing),
            repel_radius: Some(c.repel_radius),
            repel_force: Some(c.repel_force),
            pointer_smoothing: Some(c.pointer_smoothing),
            dead_zone: Some(c.dead_zone),
            max_dock_offset: Some(c.max_dock_offset),
            static_density: Some(c.static_density),
            static_speed: Some(c.static_speed),
            static_cell: Some(c.static_cell),
            foreground: Some(c.foreground),
            background: Some(c.background),
            accent: Some(c.accent),
            fade_in: Some(c.fade_in),
            outline: Some(c.outline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        FieldConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = FieldConfig::from_json(r##"{ "dropMs": 500, "accent": "#00ff00" }"##).unwrap();
        assert_eq!(config.drop_ms, 500.0);
        assert_eq!(config.accent, Color::rgb(0, 255, 0));
        assert_eq!(config.bounce, FieldConfig::default().bounce);
    }

    #[test]
    fn drop_window_sums_drop_and_delay() {
        let config = FieldConfig {
            drop_ms: 1200.0,
            morph_delay_ms: 900.0,
            ..FieldConfig::default()
        };
        assert_eq!(config.drop_window_ms(), 2100.0);
    }

    #[test]
    fn patch_merges_present_fields_only() {
        let mut config = FieldConfig::default();
        let patch = ConfigPatch::from_json(r#"{ "gravity": 2.5, "outline": true }"#).unwrap();
        patch.apply_to(&mut config).unwrap();
        assert_eq!(config.gravity, 2.5);
        assert!(config.outline);
        assert_eq!(config.friction, FieldConfig::default().friction);
    }

    #[test]
    fn rejected_patch_leaves_config_untouched() {
        let mut config = FieldConfig::default();
        let patch = ConfigPatch {
            gravity: Some(3.0),
            bounce: Some(0.5),
            ..ConfigPatch::default()
        };
        let err = patch.apply_to(&mut config).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "bounce", .. }));
        assert_eq!(config, FieldConfig::default());
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let err = ConfigPatch::from_json(r#"{ "gravty": 1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn patch_rejects_bad_color() {
        assert!(ConfigPatch::from_json(r#"{ "foreground": "teal-ish" }"#).is_err());
    }

    #[test]
    fn patch_rejects_nan_and_blank_family() {
        let nan = ConfigPatch {
            sample_gap: Some(f32::NAN),
            ..ConfigPatch::default()
        };
        assert!(nan.validate().is_err());

        let blank = ConfigPatch {
            font_family: Some("  ".to_string()),
            ..ConfigPatch::default()
        };
        assert!(matches!(blank.validate(), Err(ConfigError::Empty { .. })));
    }

    #[test]
    fn layout_differs_tracks_layout_fields() {
        let base = FieldConfig::default();
        let recolored = FieldConfig {
            accent: Color::rgb(1, 2, 3),
            ..base.clone()
        };
        assert!(!base.layout_differs(&recolored));
        let regapped = FieldConfig {
            sample_gap: 4.0,
            ..base.clone()
        };
        assert!(base.layout_differs(&regapped));
    }
}
