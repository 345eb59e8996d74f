//! Starfield Module
//!
//! Procedural parallax starfield: layer generation and per-frame animation.
//!
//! # Modules
//!
//! - [`layer`] - One depth band of particles and its construction
//! - [`animator`] - Depth drift, wraparound, rotation drift, opacity pulse

pub mod animator;
pub mod layer;

pub use animator::{RECYCLE_Z, Starfield, WRAP_Z, advance_layers, layer_opacity};
pub use layer::ParticleLayer;
