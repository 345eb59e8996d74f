//! Particle Layer
//!
//! One depth band of background stars. Positions move every frame; speeds,
//! opacity seeds and the visual constants are fixed at creation.

use glam::{EulerRot, Mat4, Vec2};
use rand::Rng;

use crate::config::{StarLayerConfig, hex_to_rgb};
use crate::error::StarfieldError;

/// Per-particle drift speed range.
pub const SPEED_RANGE: (f32, f32) = (0.01, 0.025);
/// Per-particle opacity seed range.
pub const OPACITY_SEED_RANGE: (f32, f32) = (0.5, 1.0);

/// Uniform sample in `[min, max)`. Degenerate ranges return `min`.
pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// A depth layer of star particles.
#[derive(Clone, Debug)]
pub struct ParticleLayer {
    pub(crate) positions: Vec<[f32; 3]>,
    pub(crate) speeds: Vec<f32>,
    opacity_seeds: Vec<f32>,
    color: [f32; 3],
    point_size: f32,
    spread: f32,
    layer_index: usize,
    pub(crate) rotation: Vec2,
    pub(crate) opacity: f32,
}

impl ParticleLayer {
    /// Build a layer of `count` randomly placed particles.
    ///
    /// x and y are spread over `[-spread/2, spread/2)`, z over `[-spread, 0)`.
    /// A zero count yields an empty layer that animates as a no-op.
    pub fn create<R: Rng + ?Sized>(
        count: usize,
        color: [f32; 3],
        point_size: f32,
        spread: f32,
        layer_index: usize,
        rng: &mut R,
    ) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut speeds = Vec::with_capacity(count);
        let mut opacity_seeds = Vec::with_capacity(count);

        let half = spread * 0.5;
        for _ in 0..count {
            positions.push([
                sample(rng, -half, half),
                sample(rng, -half, half),
                sample(rng, -spread, 0.0),
            ]);
            speeds.push(sample(rng, SPEED_RANGE.0, SPEED_RANGE.1));
            opacity_seeds.push(sample(rng, OPACITY_SEED_RANGE.0, OPACITY_SEED_RANGE.1));
        }

        Self {
            positions,
            speeds,
            opacity_seeds,
            color,
            point_size,
            spread,
            layer_index,
            rotation: Vec2::ZERO,
            opacity: 0.9,
        }
    }

    /// Build a layer from a config entry.
    pub fn from_config<R: Rng + ?Sized>(
        config: &StarLayerConfig,
        layer_index: usize,
        rng: &mut R,
    ) -> Self {
        Self::create(
            config.count,
            hex_to_rgb(config.color),
            config.point_size,
            config.spread,
            layer_index,
            rng,
        )
    }

    /// Build a layer from explicit particle state.
    ///
    /// Opacity seeds are set to the top of their range.
    pub fn from_parts(
        positions: Vec<[f32; 3]>,
        speeds: Vec<f32>,
        color: [f32; 3],
        point_size: f32,
        spread: f32,
        layer_index: usize,
    ) -> Result<Self, StarfieldError> {
        if positions.len() != speeds.len() {
            return Err(StarfieldError::LengthMismatch {
                positions: positions.len(),
                speeds: speeds.len(),
            });
        }
        let opacity_seeds = vec![OPACITY_SEED_RANGE.1; speeds.len()];
        Ok(Self {
            positions,
            speeds,
            opacity_seeds,
            color,
            point_size,
            spread,
            layer_index,
            rotation: Vec2::ZERO,
            opacity: 0.9,
        })
    }

    pub fn count(&self) -> usize {
        self.speeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Positions as a flat `x, y, z, x, y, z, ...` slice of length `count * 3`.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    pub fn opacity_seeds(&self) -> &[f32] {
        &self.opacity_seeds
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn spread(&self) -> f32 {
        self.spread
    }

    pub fn layer_index(&self) -> usize {
        self.layer_index
    }

    /// Accumulated drift rotation (x, y) in radians.
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    /// Layer-wide rendered opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Object-to-world transform for the drift rotation.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_create_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let layer = ParticleLayer::create(500, [0.0, 0.8, 1.0], 0.04, 40.0, 0, &mut rng);

        assert_eq!(layer.count(), 500);
        assert_eq!(layer.positions_flat().len(), 500 * 3);
        for p in layer.positions() {
            assert!(p[0] >= -20.0 && p[0] < 20.0);
            assert!(p[1] >= -20.0 && p[1] < 20.0);
            assert!(p[2] >= -40.0 && p[2] <= 0.0);
        }
        for &s in layer.speeds() {
            assert!(s >= 0.01 && s < 0.025);
        }
        for &o in layer.opacity_seeds() {
            assert!(o >= 0.5 && o < 1.0);
        }
    }

    #[test]
    fn test_zero_count_layer() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = ParticleLayer::create(0, [1.0; 3], 0.01, 10.0, 2, &mut rng);
        assert!(layer.is_empty());
        assert!(layer.positions_flat().is_empty());
    }

    #[test]
    fn test_same_seed_same_layer() {
        let a = ParticleLayer::create(16, [1.0; 3], 0.02, 80.0, 1, &mut StdRng::seed_from_u64(99));
        let b = ParticleLayer::create(16, [1.0; 3], 0.02, 80.0, 1, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.speeds(), b.speeds());
    }

    #[test]
    fn test_from_parts_length_mismatch() {
        let err = ParticleLayer::from_parts(vec![[0.0; 3]; 2], vec![0.02], [1.0; 3], 0.04, 40.0, 0)
            .unwrap_err();
        assert_eq!(
            err,
            StarfieldError::LengthMismatch {
                positions: 2,
                speeds: 1
            }
        );
    }

    #[test]
    fn test_model_matrix_identity_at_rest() {
        let layer = ParticleLayer::from_parts(vec![], vec![], [1.0; 3], 0.04, 40.0, 0).unwrap();
        assert_eq!(layer.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_zero_spread_layer_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(4);
        let layer = ParticleLayer::create(8, [1.0; 3], 0.04, 0.0, 0, &mut rng);
        for p in layer.positions() {
            assert_eq!(*p, [0.0, 0.0, 0.0]);
        }
        assert_eq!(sample(&mut rng, 3.0, 3.0), 3.0);
    }
}
