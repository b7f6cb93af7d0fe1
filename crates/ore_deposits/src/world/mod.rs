//! Voxel storage seen by deposit generation.
//!
//! Generators write directly into a [`ChunkColumn`] on the fast path and go through a
//! [`BlockAccessor`] when a block needs placement side effects.
use glam::IVec3;

pub mod blocks;
pub mod column;

pub use blocks::{wildcard_capture, BlockId, BlockPalette, BlockRegistry};
pub use column::ChunkColumn;

/// World-level block access used by the callback placement path.
pub trait BlockAccessor {
    /// Block at a world position.
    fn block(&self, pos: IVec3) -> BlockId;

    /// Places `id` at a world position, running any block-specific placement logic.
    ///
    /// Returns `true` if the block was placed.
    fn try_place_for_worldgen(&mut self, pos: IVec3, id: BlockId) -> bool;
}

/// Accessor that records callback placements instead of applying them.
#[derive(Debug, Default, Clone)]
pub struct PlacementLog {
    placements: Vec<(IVec3, BlockId)>,
}

impl PlacementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placements(&self) -> &[(IVec3, BlockId)] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Writes recorded placements that fall into the given column.
    pub fn apply_to(&self, column: &mut ChunkColumn, chunk_x: i32, chunk_z: i32) -> usize {
        let cs = column.chunk_size();
        let mut applied = 0;
        for (pos, id) in &self.placements {
            if column.set(pos.x - chunk_x * cs, pos.y, pos.z - chunk_z * cs, *id) {
                applied += 1;
            }
        }
        applied
    }
}

impl BlockAccessor for PlacementLog {
    fn block(&self, pos: IVec3) -> BlockId {
        self.placements
            .iter()
            .rev()
            .find(|(p, _)| *p == pos)
            .map(|(_, id)| *id)
            .unwrap_or(BlockId::AIR)
    }

    fn try_place_for_worldgen(&mut self, pos: IVec3, id: BlockId) -> bool {
        self.placements.push((pos, id));
        true
    }
}

/// Accessor that ignores every placement.
impl BlockAccessor for () {
    fn block(&self, _pos: IVec3) -> BlockId {
        BlockId::AIR
    }

    fn try_place_for_worldgen(&mut self, _pos: IVec3, _id: BlockId) -> bool {
        false
    }
}
