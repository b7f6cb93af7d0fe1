//! Producers of ore map densities.
use std::sync::Arc;

use crate::noise::{NoiseSampler, NormalizedSimplexNoise};
use crate::random::seed_for_code;

/// Generates a block of densities in ore map cell coordinates.
pub trait OreMapLayer: Send + Sync {
    /// Returns `size_x * size_z` densities in row-major order (`z * size_x + x`),
    /// starting at cell `(x, z)`.
    fn gen_layer(&self, x: i32, z: i32, size_x: usize, size_z: usize) -> Vec<u8>;
}

/// Ore map layer backed by a [`NoiseSampler`].
///
/// Noise values are stretched around `0.5` by `contrast`, shifted by `bias`, clamped and
/// quantized to `0..=255`.
pub struct NoiseOreMapLayer {
    noise: Arc<dyn NoiseSampler>,
    contrast: f64,
    bias: f64,
}

impl NoiseOreMapLayer {
    pub fn new(noise: Arc<dyn NoiseSampler>) -> Self {
        Self {
            noise,
            contrast: 1.0,
            bias: 0.0,
        }
    }

    /// Layer seeded for one deposit code, so each deposit gets its own pattern.
    pub fn for_deposit(world_seed: u64, code: &str) -> Self {
        let noise = NormalizedSimplexNoise::from_default_octaves(
            4,
            0.09,
            0.6,
            seed_for_code(world_seed, code),
        );
        Self::new(Arc::new(noise)).with_contrast(2.0)
    }

    pub fn with_contrast(mut self, contrast: f64) -> Self {
        self.contrast = contrast;
        self
    }

    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    #[inline]
    fn density(&self, x: f64, z: f64) -> u8 {
        let v = (self.noise.sample(x, z) - 0.5) * self.contrast + 0.5 + self.bias;
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

impl OreMapLayer for NoiseOreMapLayer {
    fn gen_layer(&self, x: i32, z: i32, size_x: usize, size_z: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(size_x * size_z);
        for dz in 0..size_z {
            for dx in 0..size_x {
                out.push(self.density((x + dx as i32) as f64, (z + dz as i32) as f64));
            }
        }
        out
    }
}
