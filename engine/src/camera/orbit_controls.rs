//! Orbit Controls for the Globe View
//!
//! A spherical-coordinate orbit camera around the globe centre. Dragging
//! adds angular velocity; each frame `update` applies a damped share of it,
//! so rotation glides to a stop after release. Zoom and pan are disabled:
//! distance and target stay fixed.
//!
//! Controls:
//! - Left mouse drag: Orbit

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Elevation limit in radians, just short of the poles.
const MAX_ELEVATION: f32 = 1.55;

/// Damped orbit camera.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Horizontal angle in radians; 0 puts the eye on +Z.
    pub azimuth: f32,
    /// Vertical angle in radians, clamped to `±MAX_ELEVATION`.
    pub elevation: f32,
    /// Eye distance from the target. Fixed.
    pub distance: f32,
    pub target: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    damping_factor: f32,
    rotate_speed: f32,
    azimuth_velocity: f32,
    elevation_velocity: f32,
    is_rotating: bool,
    last_mouse: Option<[f32; 2]>,
}

impl OrbitControls {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            distance: config.distance,
            target: Vec3::ZERO,
            aspect,
            fov: config.fov_deg,
            near: config.near,
            far: config.far,
            damping_factor: config.damping_factor.clamp(0.0, 1.0),
            rotate_speed: config.rotate_speed,
            azimuth_velocity: 0.0,
            elevation_velocity: 0.0,
            is_rotating: false,
            last_mouse: None,
        }
    }

    // ========================================================================
    // MATRICES
    // ========================================================================

    pub fn eye_position(&self) -> Vec3 {
        let cos_elev = self.elevation.cos();
        let offset = Vec3::new(
            self.distance * cos_elev * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * cos_elev * self.azimuth.cos(),
        );
        self.target + offset
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Right-handed perspective with wgpu's [0, 1] depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Start or stop a rotate drag.
    pub fn handle_rotate_button(&mut self, pressed: bool) {
        self.is_rotating = pressed;
        if !pressed {
            self.last_mouse = None;
        }
    }

    /// Feed a cursor position. Only accumulates velocity while dragging.
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) {
        if self.is_rotating {
            if let Some([last_x, last_y]) = self.last_mouse {
                // Dragging right swings the eye left around the globe.
                self.azimuth_velocity -= (x - last_x) * self.rotate_speed;
                self.elevation_velocity += (y - last_y) * self.rotate_speed;
            }
        }
        self.last_mouse = Some([x, y]);
    }

    /// Apply one frame of damped rotation.
    pub fn update(&mut self) {
        if self.damping_factor <= 0.0 {
            self.azimuth += self.azimuth_velocity;
            self.elevation += self.elevation_velocity;
            self.azimuth_velocity = 0.0;
            self.elevation_velocity = 0.0;
        } else {
            self.azimuth += self.azimuth_velocity * self.damping_factor;
            self.elevation += self.elevation_velocity * self.damping_factor;
            self.azimuth_velocity *= 1.0 - self.damping_factor;
            self.elevation_velocity *= 1.0 - self.damping_factor;
        }
        self.elevation = self.elevation.clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Update the aspect ratio after a resize. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.is_rotating
    }

    /// Remaining angular velocity magnitude.
    pub fn velocity(&self) -> f32 {
        self.azimuth_velocity.abs() + self.elevation_velocity.abs()
    }
}
