//! Scene Configuration
//!
//! Single source of truth for every tunable of the globe scene. Defaults
//! give the stock scene: three cyan star layers, a point-lit globe,
//! a country outline and a hidden region highlight that fades in on demand.
//!
//! Files are JSON. Every struct is `#[serde(default)]`, so a file only needs
//! to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::starfield::RECYCLE_Z;

/// One depth band of the starfield.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarLayerConfig {
    /// Number of particles in the layer.
    pub count: usize,
    /// Tint as `0xRRGGBB`.
    pub color: u32,
    /// Sprite size in world units.
    pub point_size: f32,
    /// Side length of the initial spawn box (and its depth).
    pub spread: f32,
}

impl Default for StarLayerConfig {
    fn default() -> Self {
        Self {
            count: 800,
            color: 0x00ccff,
            point_size: 0.04,
            spread: 40.0,
        }
    }
}

/// Perspective camera and orbit-control settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the globe centre.
    pub distance: f32,
    /// Fraction of the remaining angular velocity applied per frame.
    pub damping_factor: f32,
    /// Radians of rotation per pixel of drag.
    pub rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 3.5,
            damping_factor: 0.05,
            rotate_speed: 0.005,
        }
    }
}

/// Ambient plus one point light.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub point_color: u32,
    pub point_intensity: f32,
    pub point_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: 0xffffff,
            ambient_intensity: 1.0,
            point_color: 0x00aaff,
            point_intensity: 2.0,
            point_position: [5.0, 3.0, 5.0],
        }
    }
}

/// The base globe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub radius: f32,
    pub color: u32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 1.5,
            color: 0x123456,
            width_segments: 64,
            height_segments: 64,
        }
    }
}

/// A partial sphere shell, parameterized like a classic `SphereGeometry`.
///
/// `phi` sweeps around the Y axis, `theta` from the north pole downwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereSegment {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub phi_start: f32,
    pub phi_length: f32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for SphereSegment {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
            phi_start: 0.0,
            phi_length: std::f32::consts::TAU,
            theta_start: 0.0,
            theta_length: std::f32::consts::PI,
        }
    }
}

/// A textured overlay draped over the globe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Image path, relative to the working directory.
    pub texture: String,
    pub segment: SphereSegment,
    /// Euler rotation (x, y, z) in radians.
    pub rotation: [f32; 3],
    pub position: [f32; 3],
    pub scale: f32,
    /// Opacity the overlay is created with.
    pub opacity: f32,
    /// Fragments with texture alpha below this are discarded.
    pub alpha_test: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            texture: String::new(),
            segment: SphereSegment::default(),
            rotation: [0.02, 1.2, 0.0],
            position: [0.0, -0.55, 0.0],
            scale: 1.18,
            opacity: 1.0,
            alpha_test: 0.1,
        }
    }
}

impl OverlayConfig {
    /// Country outline: always visible once loaded.
    pub fn country_outline() -> Self {
        Self {
            texture: "assets/india4.png".to_string(),
            segment: SphereSegment {
                radius: 1.53,
                width_segments: 64,
                height_segments: 64,
                phi_start: 1.1,
                phi_length: 0.55,
                theta_start: 0.9,
                theta_length: 0.8,
            },
            opacity: 0.9,
            ..Self::default()
        }
    }

    /// Region highlight: hidden until revealed.
    pub fn region_highlight() -> Self {
        Self {
            texture: "assets/karnataka2.png".to_string(),
            segment: SphereSegment {
                radius: 1.53,
                width_segments: 64,
                height_segments: 64,
                phi_start: 1.24,
                phi_length: 0.14,
                theta_start: 1.38,
                theta_length: 0.13,
            },
            opacity: 0.0,
            ..Self::default()
        }
    }
}

/// Timing of the reveal fade and the glow that follows it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Opacity added per fade tick.
    pub fade_step: f32,
    /// Fade timer period in milliseconds.
    pub fade_interval_ms: u64,
    /// Opacity moved per glow tick.
    pub glow_step: f32,
    pub glow_floor: f32,
    pub glow_ceiling: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            fade_step: 0.03,
            fade_interval_ms: 60,
            glow_step: 0.01,
            glow_floor: 0.85,
            glow_ceiling: 1.0,
        }
    }
}

/// Complete scene description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Star layers, nearest first. Index order drives parallax scaling.
    pub star_layers: Vec<StarLayerConfig>,
    /// Seed for star placement and respawn positions.
    pub star_seed: u64,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub globe: GlobeConfig,
    pub outline: OverlayConfig,
    pub highlight: OverlayConfig,
    pub reveal: RevealConfig,
    pub background_color: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_layers: vec![
                StarLayerConfig {
                    count: 800,
                    color: 0x00ccff,
                    point_size: 0.04,
                    spread: 40.0,
                },
                StarLayerConfig {
                    count: 1000,
                    color: 0x0077ff,
                    point_size: 0.025,
                    spread: 80.0,
                },
                StarLayerConfig {
                    count: 1200,
                    color: 0x004466,
                    point_size: 0.015,
                    spread: 150.0,
                },
            ],
            star_seed: 0x5EED_57A2,
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            globe: GlobeConfig::default(),
            outline: OverlayConfig::country_outline(),
            highlight: OverlayConfig::region_highlight(),
            reveal: RevealConfig::default(),
            background_color: 0x000000,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check ranges that would otherwise break animation invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for layer in &self.star_layers {
            if !(layer.point_size > 0.0) {
                return Err(invalid("star_layers.point_size", "must be positive"));
            }
            // Initial z is drawn from [-spread, 0] and must sit inside the recycle band.
            if !(layer.spread > 0.0 && layer.spread <= -RECYCLE_Z) {
                return Err(invalid(
                    "star_layers.spread",
                    format!("must be in (0, {}]", -RECYCLE_Z),
                ));
            }
        }

        let reveal = &self.reveal;
        if !(reveal.fade_step > 0.0) {
            return Err(invalid("reveal.fade_step", "must be positive"));
        }
        if reveal.fade_interval_ms == 0 {
            return Err(invalid("reveal.fade_interval_ms", "must be non-zero"));
        }
        if !(reveal.glow_step > 0.0) {
            return Err(invalid("reveal.glow_step", "must be positive"));
        }
        if !(0.0 <= reveal.glow_floor
            && reveal.glow_floor < reveal.glow_ceiling
            && reveal.glow_ceiling <= 1.0)
        {
            return Err(invalid(
                "reveal.glow_floor",
                "need 0 <= glow_floor < glow_ceiling <= 1",
            ));
        }

        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return Err(invalid("camera.near", "need 0 < near < far"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Split `0xRRGGBB` into normalized sRGB components.
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_star_layers() {
        let config = SceneConfig::default();
        let counts: Vec<usize> = config.star_layers.iter().map(|l| l.count).collect();
        assert_eq!(counts, vec![800, 1000, 1200]);
        assert_eq!(config.star_layers[2].spread, 150.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_rgb(0x000000), [0.0, 0.0, 0.0]);
        let [r, g, b] = hex_to_rgb(0x00ccff);
        assert_eq!(r, 0.0);
        assert!((g - 0.8).abs() < 1e-6);
        assert_eq!(b, 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SceneConfig::from_json_str(r#"{ "reveal": { "fade_interval_ms": 30 } }"#)
            .expect("partial config should parse");
        assert_eq!(config.reveal.fade_interval_ms, 30);
        assert_eq!(config.reveal.fade_step, 0.03);
        assert_eq!(config.star_layers.len(), 3);
    }

    #[test]
    fn test_rejects_spread_beyond_recycle_depth() {
        let json = r#"{ "star_layers": [ { "count": 10, "spread": 400.0 } ] }"#;
        let err = SceneConfig::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "star_layers.spread",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_glow_bounds() {
        let mut config = SceneConfig::default();
        config.reveal.glow_floor = 1.0;
        config.reveal.glow_ceiling = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SceneConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
