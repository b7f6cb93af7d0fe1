//! Full-height chunk column storage.
use glam::IVec3;

use crate::world::blocks::BlockId;

/// One chunk column: `world_height / chunk_size` cubic slabs plus its height maps.
///
/// Within a slab, blocks are laid out as `((y % chunk_size) * chunk_size + lz) * chunk_size + lx`.
#[derive(Clone, Debug)]
pub struct ChunkColumn {
    chunk_size: i32,
    world_height: i32,
    slabs: Vec<Vec<BlockId>>,
    /// Highest rain-blocking block per column, `lz * chunk_size + lx`.
    pub rain_height_map: Vec<u16>,
    /// Terrain surface height from world generation, `lz * chunk_size + lx`.
    pub terrain_height_map: Vec<u16>,
}

impl ChunkColumn {
    /// Creates an all-air column.
    pub fn new(chunk_size: i32, world_height: i32) -> Self {
        debug_assert!(chunk_size > 0, "chunk_size must be > 0");
        debug_assert!(
            world_height % chunk_size == 0,
            "world_height must be a multiple of chunk_size"
        );
        let slab_len = (chunk_size * chunk_size * chunk_size) as usize;
        let slab_count = (world_height / chunk_size) as usize;
        let area = (chunk_size * chunk_size) as usize;
        Self {
            chunk_size,
            world_height,
            slabs: vec![vec![BlockId::AIR; slab_len]; slab_count],
            rain_height_map: vec![0; area],
            terrain_height_map: vec![0; area],
        }
    }

    /// Creates a column filled with `block` from `y = 0` up to and including `surface_y`,
    /// with both height maps set to `surface_y`.
    pub fn filled(chunk_size: i32, world_height: i32, block: BlockId, surface_y: i32) -> Self {
        let mut column = Self::new(chunk_size, world_height);
        let top = surface_y.clamp(0, world_height - 1);
        for y in 0..=top {
            column.fill_layer(y, block);
        }
        column.rain_height_map.fill(top as u16);
        column.terrain_height_map.fill(top as u16);
        column
    }

    #[inline]
    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    #[inline]
    pub fn world_height(&self) -> i32 {
        self.world_height
    }

    /// Index of the slab holding height `y`.
    #[inline]
    pub fn slab_index(&self, y: i32) -> usize {
        (y / self.chunk_size) as usize
    }

    /// Index inside a slab for local coordinates.
    #[inline]
    pub fn index3d(&self, lx: i32, y: i32, lz: i32) -> usize {
        (((y % self.chunk_size) * self.chunk_size + lz) * self.chunk_size + lx) as usize
    }

    /// Index into the height maps.
    #[inline]
    pub fn index2d(&self, lx: i32, lz: i32) -> usize {
        (lz * self.chunk_size + lx) as usize
    }

    /// Whether local coordinates lie inside the column.
    #[inline]
    pub fn contains(&self, lx: i32, y: i32, lz: i32) -> bool {
        (0..self.chunk_size).contains(&lx)
            && (0..self.chunk_size).contains(&lz)
            && (0..self.world_height).contains(&y)
    }

    /// Block at local coordinates, or `None` outside the column.
    pub fn get(&self, lx: i32, y: i32, lz: i32) -> Option<BlockId> {
        if !self.contains(lx, y, lz) {
            return None;
        }
        Some(self.slabs[self.slab_index(y)][self.index3d(lx, y, lz)])
    }

    /// Sets a block at local coordinates. Returns `false` outside the column.
    pub fn set(&mut self, lx: i32, y: i32, lz: i32, id: BlockId) -> bool {
        if !self.contains(lx, y, lz) {
            return false;
        }
        let (slab, idx) = (self.slab_index(y), self.index3d(lx, y, lz));
        self.slabs[slab][idx] = id;
        true
    }

    /// Fills one horizontal layer.
    pub fn fill_layer(&mut self, y: i32, id: BlockId) {
        for lz in 0..self.chunk_size {
            for lx in 0..self.chunk_size {
                self.set(lx, y, lz, id);
            }
        }
    }

    /// Rain height at local coordinates.
    #[inline]
    pub fn rain_height(&self, lx: i32, lz: i32) -> i32 {
        i32::from(self.rain_height_map[self.index2d(lx, lz)])
    }

    /// Terrain height at local coordinates.
    #[inline]
    pub fn terrain_height(&self, lx: i32, lz: i32) -> i32 {
        i32::from(self.terrain_height_map[self.index2d(lx, lz)])
    }

    /// Raw slab data.
    pub fn slab(&self, index: usize) -> Option<&[BlockId]> {
        self.slabs.get(index).map(Vec::as_slice)
    }

    /// Counts blocks equal to `id` in the whole column.
    pub fn count(&self, id: BlockId) -> usize {
        self.slabs
            .iter()
            .map(|s| s.iter().filter(|b| **b == id).count())
            .sum()
    }

    /// Local coordinates of every block equal to `id`.
    pub fn positions_of(&self, id: BlockId) -> Vec<IVec3> {
        let mut out = Vec::new();
        for y in 0..self.world_height {
            for lz in 0..self.chunk_size {
                for lx in 0..self.chunk_size {
                    if self.get(lx, y, lz) == Some(id) {
                        out.push(IVec3::new(lx, y, lz));
                    }
                }
            }
        }
        out
    }
}
