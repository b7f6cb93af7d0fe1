//! Deterministic random stream shared by deposit generation.
//!
//! One [`DepositRand`] stream drives every deposit attempt of a world. The driver
//! re-seeds it from the world seed and column coordinates before each chunk column
//! (and before each queued child deposit), so identical seeds produce identical worlds
//! as long as the draw order is preserved. Cloning a [`DepositRand`] clones the
//! handle, not the stream.
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub mod natfloat;

pub use natfloat::{Distribution, NatFloat};

/// Shared handle over a single seeded random stream.
#[derive(Clone)]
pub struct DepositRand {
    world_seed: u64,
    rng: Arc<Mutex<StdRng>>,
}

impl fmt::Debug for DepositRand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepositRand")
            .field("world_seed", &self.world_seed)
            .finish_non_exhaustive()
    }
}

impl DepositRand {
    /// Creates a stream for the given world seed, positioned at the world origin.
    pub fn new(world_seed: u64) -> Self {
        Self {
            world_seed,
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed_for_position(
                world_seed, 0, 0,
            )))),
        }
    }

    /// World seed this stream derives its position seeds from.
    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    /// Re-seeds the shared stream from the world seed and a horizontal position.
    pub fn init_position_seed(&self, x: i32, z: i32) {
        let seed = seed_for_position(self.world_seed, x, z);
        self.with_rng(|rng| *rng = StdRng::seed_from_u64(seed));
    }

    /// Returns a float in `[0, 1)`.
    #[inline]
    pub fn next_float(&self) -> f32 {
        self.with_rng(|rng| unit_f32(rng.next_u32()))
    }

    /// Returns an integer in `[0, max)`, or `0` when `max <= 0`.
    #[inline]
    pub fn next_int(&self, max: i32) -> i32 {
        if max <= 0 {
            return 0;
        }
        self.with_rng(|rng| ((u64::from(rng.next_u32()) * max as u64) >> 32) as i32)
    }

    /// Returns `true` if both handles draw from the same stream.
    pub fn shares_stream_with(&self, other: &DepositRand) -> bool {
        Arc::ptr_eq(&self.rng, &other.rng)
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

/// Creates a deterministic seed for a horizontal block or chunk position.
pub fn seed_for_position(world_seed: u64, x: i32, z: i32) -> u64 {
    let px = x as i64 as u64;
    let pz = z as i64 as u64;
    let mixed =
        world_seed ^ px.wrapping_mul(0x9E3779B97F4A7C15) ^ pz.wrapping_mul(0xBF58476D1CE4E5B9);
    mix_u64(mixed)
}

/// Creates a deterministic seed for a named stream, e.g. one ore map per deposit code.
pub fn seed_for_code(world_seed: u64, code: &str) -> u64 {
    // FNV-1a keeps the result stable across Rust releases.
    let mut hash: u64 = 0xCBF29CE484222325;
    for byte in code.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001B3);
    }
    mix_u64(world_seed ^ hash)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Maps the upper 24 bits of `bits` onto `[0, 1)`.
#[inline]
fn unit_f32(bits: u32) -> f32 {
    (bits >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}
