//! Camera Module
//!
//! Orbit camera state and math. Window-system agnostic: the viewer feeds it
//! button and cursor events.

pub mod orbit_controls;

pub use orbit_controls::OrbitControls;
