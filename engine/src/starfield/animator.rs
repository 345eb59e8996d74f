//! Starfield Animator
//!
//! Per-frame motion of every star layer:
//!
//! - particles drift toward the camera at `speed * (index + 1) * 0.5`
//! - a particle reaching `WRAP_Z` respawns at `RECYCLE_Z` with a fresh x/y,
//!   spread wider for deeper layers (parallax cue)
//! - each layer slowly rotates, deeper layers faster
//! - layer opacity pulses on a sine of the shared frame time, so all layers
//!   stay phase-locked to each other

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::layer::{ParticleLayer, sample};
use crate::config::StarLayerConfig;

/// Depth at which a particle is recycled.
pub const WRAP_Z: f32 = 20.0;
/// Depth a recycled particle respawns at.
pub const RECYCLE_Z: f32 = -150.0;
/// Scales per-particle speed into per-frame depth motion.
pub const DEPTH_SPEED_FACTOR: f32 = 0.5;
/// Respawn x/y spread per layer index step.
pub const RESPAWN_SPREAD: f32 = 40.0;
/// Rotation drift per frame per layer index step, radians.
pub const ROTATION_STEP_X: f32 = 0.0002;
pub const ROTATION_STEP_Y: f32 = 0.0004;
/// Layer opacity pulse: `BASE + AMPLITUDE * sin(now_ms * RATE * (index + 1))`.
pub const PULSE_BASE: f64 = 0.7;
pub const PULSE_AMPLITUDE: f64 = 0.2;
pub const PULSE_RATE: f64 = 0.001;

/// Layer-wide opacity for the layer at `layer_index` at time `now_ms`.
#[inline]
pub fn layer_opacity(layer_index: usize, now_ms: f64) -> f32 {
    let scale = (layer_index + 1) as f64;
    (PULSE_BASE + PULSE_AMPLITUDE * (now_ms * PULSE_RATE * scale).sin()) as f32
}

impl ParticleLayer {
    /// Advance this layer one frame. `index` is the layer's slot in the
    /// frame's layer list.
    fn advance<R: Rng + ?Sized>(&mut self, index: usize, now_ms: f64, rng: &mut R) {
        let scale = (index + 1) as f32;
        let respawn_half = RESPAWN_SPREAD * scale * 0.5;

        for (pos, &speed) in self.positions.iter_mut().zip(&self.speeds) {
            pos[2] += speed * scale * DEPTH_SPEED_FACTOR;
            if pos[2] >= WRAP_Z {
                pos[2] = RECYCLE_Z;
                pos[0] = sample(rng, -respawn_half, respawn_half);
                pos[1] = sample(rng, -respawn_half, respawn_half);
            }
        }

        self.rotation.y += ROTATION_STEP_Y * scale;
        self.rotation.x += ROTATION_STEP_X * scale;
        self.opacity = layer_opacity(index, now_ms);
    }
}

/// Advance every layer one frame at the shared time `now_ms`.
///
/// An empty slice is a no-op.
pub fn advance_layers<R: Rng + ?Sized>(layers: &mut [ParticleLayer], now_ms: f64, rng: &mut R) {
    for (index, layer) in layers.iter_mut().enumerate() {
        layer.advance(index, now_ms, rng);
    }
}

/// The full set of star layers plus the RNG used for respawns.
#[derive(Clone, Debug)]
pub struct Starfield {
    layers: Vec<ParticleLayer>,
    rng: StdRng,
}

impl Starfield {
    /// Wrap pre-built layers. `seed` drives respawn positions.
    pub fn new(layers: Vec<ParticleLayer>, seed: u64) -> Self {
        Self {
            layers,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build one layer per config entry, nearest first.
    pub fn from_config(configs: &[StarLayerConfig], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let layers: Vec<ParticleLayer> = configs
            .iter()
            .enumerate()
            .map(|(index, config)| ParticleLayer::from_config(config, index, &mut rng))
            .collect();

        tracing::debug!(
            layers = layers.len(),
            particles = layers.iter().map(ParticleLayer::count).sum::<usize>(),
            "starfield built"
        );

        Self { layers, rng }
    }

    /// Advance all layers one frame.
    pub fn advance(&mut self, now_ms: f64) {
        advance_layers(&mut self.layers, now_ms, &mut self.rng);
    }

    pub fn layers(&self) -> &[ParticleLayer] {
        &self.layers
    }

    pub fn total_particles(&self) -> usize {
        self.layers.iter().map(ParticleLayer::count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_layer(z: Vec<f32>, speed: f32) -> ParticleLayer {
        let positions = z.iter().map(|&z| [1.0, -1.0, z]).collect::<Vec<_>>();
        let speeds = vec![speed; positions.len()];
        ParticleLayer::from_parts(positions, speeds, [1.0; 3], 0.04, 40.0, 0).unwrap()
    }

    #[test]
    fn test_layer_opacity_at_zero() {
        assert!((layer_opacity(0, 0.0) - 0.7).abs() < 1e-6);
        assert!((layer_opacity(2, 0.0) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_layer_opacity_peak() {
        // sin(pi/2) for layer 0 at t = 1570.796 ms
        let t = std::f64::consts::FRAC_PI_2 / PULSE_RATE;
        assert!((layer_opacity(0, t) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_drift_scales_with_index() {
        let mut layers = vec![single_layer(vec![], 0.02), single_layer(vec![], 0.02)];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            advance_layers(&mut layers, 0.0, &mut rng);
        }
        assert!((layers[0].rotation().y - 0.004).abs() < 1e-6);
        assert!((layers[0].rotation().x - 0.002).abs() < 1e-6);
        assert!((layers[1].rotation().y - 0.008).abs() < 1e-6);
        assert!((layers[1].rotation().x - 0.004).abs() < 1e-6);
    }

    #[test]
    fn test_no_layers_is_noop() {
        let mut rng = StdRng::seed_from_u64(3);
        advance_layers(&mut [], 1234.0, &mut rng);
    }

    #[test]
    fn test_empty_layer_still_drifts() {
        let mut starfield = Starfield::new(vec![single_layer(vec![], 0.02)], 1);
        starfield.advance(0.0);
        assert_eq!(starfield.total_particles(), 0);
        assert!(starfield.layers()[0].rotation().y > 0.0);
    }

    #[test]
    fn test_wrap_respawns_far() {
        let mut layers = vec![single_layer(vec![19.99], 0.02)];
        let mut rng = StdRng::seed_from_u64(11);
        advance_layers(&mut layers, 0.0, &mut rng);

        let p = layers[0].positions()[0];
        assert_eq!(p[2], RECYCLE_Z);
        assert!(p[0].abs() <= 20.0);
        assert!(p[1].abs() <= 20.0);
    }
}
