//! 2D noise sampling used for ore maps and disc distortion.
//!
//! Deposit code only depends on the [`NoiseSampler`] trait. [`NormalizedSimplexNoise`]
//! is the bundled implementation: octave-summed simplex noise rescaled to `[0, 1]`.
use ::noise::{NoiseFn, Simplex};

/// A 2D scalar noise field.
pub trait NoiseSampler: Send + Sync {
    /// Samples the field at world coordinates. Implementations should return values in `[0, 1]`.
    fn sample(&self, x: f64, z: f64) -> f64;
}

impl<F> NoiseSampler for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn sample(&self, x: f64, z: f64) -> f64 {
        self(x, z)
    }
}

struct Octave {
    noise: Simplex,
    amplitude: f64,
    frequency: f64,
}

/// Octave simplex noise normalized to `[0, 1]`.
pub struct NormalizedSimplexNoise {
    octaves: Vec<Octave>,
    amplitude_sum: f64,
}

impl NormalizedSimplexNoise {
    /// Creates noise from explicit per-octave amplitudes and frequencies.
    ///
    /// Octave `i` is seeded with `seed + i`. Extra entries of the longer slice are ignored.
    pub fn new(amplitudes: &[f64], frequencies: &[f64], seed: u64) -> Self {
        let octaves: Vec<Octave> = amplitudes
            .iter()
            .zip(frequencies)
            .enumerate()
            .map(|(i, (&amplitude, &frequency))| Octave {
                noise: Simplex::new(seed.wrapping_add(i as u64) as u32),
                amplitude,
                frequency,
            })
            .collect();
        let amplitude_sum = octaves.iter().map(|o| o.amplitude.abs()).sum();
        Self {
            octaves,
            amplitude_sum,
        }
    }

    /// Creates fractal noise with `octave_count` octaves, each doubling the frequency
    /// and multiplying the amplitude by `persistence`.
    pub fn from_default_octaves(
        octave_count: usize,
        base_frequency: f64,
        persistence: f64,
        seed: u64,
    ) -> Self {
        let mut amplitudes = Vec::with_capacity(octave_count);
        let mut frequencies = Vec::with_capacity(octave_count);
        let mut amplitude = 1.0;
        let mut frequency = base_frequency;
        for _ in 0..octave_count {
            amplitudes.push(amplitude);
            frequencies.push(frequency);
            amplitude *= persistence;
            frequency *= 2.0;
        }
        Self::new(&amplitudes, &frequencies, seed)
    }

    /// Number of octaves.
    pub fn octave_count(&self) -> usize {
        self.octaves.len()
    }
}

impl NoiseSampler for NormalizedSimplexNoise {
    fn sample(&self, x: f64, z: f64) -> f64 {
        if self.amplitude_sum <= 0.0 {
            return 0.5;
        }
        let mut value = 0.0;
        for octave in &self.octaves {
            value +=
                octave.amplitude * octave.noise.get([x * octave.frequency, z * octave.frequency]);
        }
        ((value / self.amplitude_sum + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
