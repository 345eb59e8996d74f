//! Star Globe Engine Library
//!
//! A textured 3D globe with a staged region reveal, set in front of a
//! procedural parallax starfield. The scene logic (starfield animation,
//! reveal state machine, frame driver) is plain data and runs without a GPU;
//! the [`render`] module draws it with wgpu.
//!
//! # Modules
//!
//! - [`starfield`] - Particle layers, depth drift, wraparound and opacity pulse
//! - [`reveal`] - Asset-gated fade-in and glow cycle of the region highlight
//! - [`frame_loop`] - Per-frame ordering of scene updates, controls and render
//! - [`camera`] - Damped orbit controls
//! - [`config`] - Scene configuration with JSON loading and validation
//! - [`assets`] - Background texture decoding
//! - [`render`] - wgpu passes for the globe, overlays and stars
//!
//! # Example
//!
//! ```ignore
//! use star_globe_engine::config::SceneConfig;
//! use star_globe_engine::frame_loop::{FrameDriver, SceneContext};
//!
//! let config = SceneConfig::default();
//! let mut driver = FrameDriver::new(SceneContext::from_config(&config));
//!
//! // Once the highlight texture has decoded:
//! driver.overlay_asset_ready();
//! driver.trigger_reveal();
//!
//! // Every redraw:
//! driver.frame(&mut view)?;
//! ```

pub mod assets;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod render;
pub mod reveal;
pub mod starfield;

pub use config::SceneConfig;
pub use error::{AssetError, ConfigError, RenderError, StarfieldError};
pub use frame_loop::{FrameCollaborator, FrameDriver, FrameStats, SceneContext};
pub use reveal::{RevealOverlay, RevealPhase, TriggerOutcome};
pub use starfield::{ParticleLayer, Starfield};
