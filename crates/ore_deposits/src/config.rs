//! World dimensions and seeds shared by every deposit operation.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Static world layout used by deposit generation.
///
/// Chunk columns are `chunk_size` wide and split vertically into slabs of
/// `chunk_size` height. Regions group `region_size / chunk_size` chunks per axis
/// and carry one ore map per deposit code with `region_size / ore_map_scale` cells.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct WorldGenConfig {
    /// Edge length of a chunk in blocks. Also the height of one vertical slab.
    pub chunk_size: i32,
    /// Edge length of a map region in blocks.
    pub region_size: i32,
    /// Total world height in blocks.
    pub world_height: i32,
    /// Sea level in blocks.
    pub sea_level: i32,
    /// Blocks per ore map cell.
    pub ore_map_scale: i32,
    /// World seed feeding the deposit stream and the ore map noise.
    pub world_seed: u64,
    /// Global factor applied to every variant's tries per chunk.
    pub tries_multiplier: f32,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            chunk_size: 32,
            region_size: 512,
            world_height: 256,
            sea_level: 110,
            ore_map_scale: 16,
            world_seed: 0,
            tries_multiplier: 1.0,
        }
    }
}

impl WorldGenConfig {
    /// Creates a default configuration with the given world seed.
    pub fn new(world_seed: u64) -> Self {
        Self {
            world_seed,
            ..Default::default()
        }
    }

    /// Sets the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: i32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the region size.
    pub fn with_region_size(mut self, region_size: i32) -> Self {
        self.region_size = region_size;
        self
    }

    /// Sets the world height.
    pub fn with_world_height(mut self, world_height: i32) -> Self {
        self.world_height = world_height;
        self
    }

    /// Sets the sea level.
    pub fn with_sea_level(mut self, sea_level: i32) -> Self {
        self.sea_level = sea_level;
        self
    }

    /// Sets the ore map scale.
    pub fn with_ore_map_scale(mut self, ore_map_scale: i32) -> Self {
        self.ore_map_scale = ore_map_scale;
        self
    }

    /// Sets the world seed.
    pub fn with_world_seed(mut self, world_seed: u64) -> Self {
        self.world_seed = world_seed;
        self
    }

    /// Sets the global tries multiplier.
    pub fn with_tries_multiplier(mut self, tries_multiplier: f32) -> Self {
        self.tries_multiplier = tries_multiplier;
        self
    }

    /// Number of ore map cells along one region edge, excluding padding.
    #[inline]
    pub fn ore_map_size(&self) -> i32 {
        self.region_size / self.ore_map_scale
    }

    /// Number of chunks along one region edge.
    #[inline]
    pub fn region_chunk_size(&self) -> i32 {
        self.region_size / self.chunk_size
    }

    /// Number of vertical slabs in a chunk column.
    #[inline]
    pub fn slab_count(&self) -> usize {
        (self.world_height / self.chunk_size) as usize
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size <= 0 {
            return Err(Error::InvalidConfig("chunk_size must be > 0".into()));
        }
        if self.region_size <= 0 || self.region_size % self.chunk_size != 0 {
            return Err(Error::InvalidConfig(
                "region_size must be a positive multiple of chunk_size".into(),
            ));
        }
        if self.world_height <= 0 || self.world_height % self.chunk_size != 0 {
            return Err(Error::InvalidConfig(
                "world_height must be a positive multiple of chunk_size".into(),
            ));
        }
        if self.sea_level < 0 || self.sea_level >= self.world_height {
            return Err(Error::InvalidConfig(
                "sea_level must lie inside the world height".into(),
            ));
        }
        if self.ore_map_scale <= 0 || self.region_size % self.ore_map_scale != 0 {
            return Err(Error::InvalidConfig(
                "ore_map_scale must be a positive divisor of region_size".into(),
            ));
        }
        if self.ore_map_size() < 2 {
            return Err(Error::InvalidConfig(
                "ore map must have at least 2 cells per region edge".into(),
            ));
        }
        if self.tries_multiplier.is_nan() || self.tries_multiplier < 0.0 {
            return Err(Error::InvalidConfig("tries_multiplier must be >= 0".into()));
        }

        Ok(())
    }
}
