//! Config Module
//!
//! Centralized configuration for the globe scene: star layers, camera,
//! lighting, overlay placement and reveal timing.

pub mod scene_config;

pub use scene_config::{
    CameraConfig, GlobeConfig, LightingConfig, OverlayConfig, RevealConfig, SceneConfig,
    SphereSegment, StarLayerConfig, hex_to_rgb,
};
