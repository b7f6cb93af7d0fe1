//! Per-region ore map cache.
//!
//! A [`MapRegion`] holds at most one [`OreMap`] per deposit code. Entries are created once,
//! by the single worker that owns the region, and never replaced afterwards.
//! [`WorldRegions`] stores the regions generated so far, keyed by region coordinates.
use std::collections::HashMap;

use glam::IVec2;

use crate::config::WorldGenConfig;
use crate::oremap::grid::OreMap;

/// Data cached for one map region.
#[derive(Clone, Debug, Default)]
pub struct MapRegion {
    ore_maps: HashMap<String, OreMap>,
}

impl MapRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ore map for a deposit code.
    pub fn ore_map(&self, code: &str) -> Option<&OreMap> {
        self.ore_maps.get(code)
    }

    pub fn has_ore_map(&self, code: &str) -> bool {
        self.ore_maps.contains_key(code)
    }

    /// Stores the map built by `make` unless the code already has one.
    ///
    /// `make` is not called when an entry exists. Returns `true` if a map was inserted.
    pub fn insert_ore_map_with(&mut self, code: &str, make: impl FnOnce() -> OreMap) -> bool {
        if self.ore_maps.contains_key(code) {
            return false;
        }
        self.ore_maps.insert(code.to_owned(), make());
        true
    }

    /// Number of cached ore maps.
    pub fn len(&self) -> usize {
        self.ore_maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ore_maps.is_empty()
    }

    /// Deposit codes with a cached ore map, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.ore_maps.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

/// All generated map regions.
#[derive(Clone, Debug, Default)]
pub struct WorldRegions {
    regions: HashMap<IVec2, MapRegion>,
}

impl WorldRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Region at region coordinates, if generated.
    pub fn get(&self, region_x: i32, region_z: i32) -> Option<&MapRegion> {
        self.regions.get(&IVec2::new(region_x, region_z))
    }

    /// Region at region coordinates, creating an empty one if missing.
    pub fn get_or_create(&mut self, region_x: i32, region_z: i32) -> &mut MapRegion {
        self.regions
            .entry(IVec2::new(region_x, region_z))
            .or_default()
    }

    /// Region containing the given chunk, if generated.
    pub fn for_chunk(
        &self,
        config: &WorldGenConfig,
        chunk_x: i32,
        chunk_z: i32,
    ) -> Option<&MapRegion> {
        let (rx, rz) = region_of_chunk(config, chunk_x, chunk_z);
        self.get(rx, rz)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Region coordinates of a chunk.
pub fn region_of_chunk(config: &WorldGenConfig, chunk_x: i32, chunk_z: i32) -> (i32, i32) {
    (
        (chunk_x * config.chunk_size).div_euclid(config.region_size),
        (chunk_z * config.chunk_size).div_euclid(config.region_size),
    )
}
