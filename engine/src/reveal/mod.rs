//! Reveal Module
//!
//! Staged reveal of the region highlight: asset gate, timed fade-in, then an
//! endless glow driven by the frame loop.

pub mod fade_timer;
pub mod overlay;

pub use fade_timer::FadeTicker;
pub use overlay::{GlowDirection, OpacityDriver, RevealOverlay, RevealPhase, TriggerOutcome};
