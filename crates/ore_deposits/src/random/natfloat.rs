//! Configurable random distributions for deposit dimensions.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::random::DepositRand;

/// Shape of a [`NatFloat`] distribution.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Distribution {
    /// One draw, flat over `avg ± var`.
    #[default]
    Uniform,
    /// Mean of two draws.
    Triangle,
    /// Mean of three draws.
    Gaussian,
    /// Mean of six draws.
    NarrowGaussian,
    /// Mean of twelve draws.
    VeryNarrowGaussian,
    /// Three-draw gaussian mirrored towards the edges of the range.
    InverseGaussian,
}

impl Distribution {
    fn draws(self) -> u32 {
        match self {
            Distribution::Uniform => 1,
            Distribution::Triangle => 2,
            Distribution::Gaussian | Distribution::InverseGaussian => 3,
            Distribution::NarrowGaussian => 6,
            Distribution::VeryNarrowGaussian => 12,
        }
    }
}

/// A random float described by average, variance and distribution shape.
///
/// Values fall into `offset + multiplier * (avg ± var)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NatFloat {
    pub avg: f32,
    pub var: f32,
    pub dist: Distribution,
    pub offset: f32,
}

impl Default for NatFloat {
    fn default() -> Self {
        Self::zero()
    }
}

impl NatFloat {
    /// Creates a distribution with the given shape.
    pub fn new(avg: f32, var: f32, dist: Distribution) -> Self {
        Self {
            avg,
            var,
            dist,
            offset: 0.0,
        }
    }

    /// Uniform distribution over `avg ± var`.
    pub fn uniform(avg: f32, var: f32) -> Self {
        Self::new(avg, var, Distribution::Uniform)
    }

    /// Always yields `value`. Still consumes one draw per sample.
    pub fn constant(value: f32) -> Self {
        Self::uniform(value, 0.0)
    }

    pub fn zero() -> Self {
        Self::constant(0.0)
    }

    /// Sets the offset added after scaling.
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    /// Expected value of the distribution.
    pub fn average(&self) -> f32 {
        self.offset + self.avg
    }

    /// Draws a value from `rand`, consuming [`Distribution`]-dependent draws.
    pub fn next_float(&self, multiplier: f32, rand: &DepositRand) -> f32 {
        let n = self.dist.draws();
        let mut sum = 0.0;
        for _ in 0..n {
            sum += rand.next_float();
        }
        let mut rnd = sum / n as f32 - 0.5;

        if self.dist == Distribution::InverseGaussian {
            rnd = if rnd > 0.0 { 0.5 - rnd } else { -0.5 - rnd };
        }

        self.offset + multiplier * (self.avg + rnd * 2.0 * self.var)
    }
}
