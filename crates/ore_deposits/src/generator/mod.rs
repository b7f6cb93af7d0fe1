//! Deposit generation strategies.
//!
//! A [`DepositGenerator`] places one deposit attempt into a chunk column. Generators are
//! created by name through the [`GeneratorRegistry`] when a
//! [`DepositVariant`](crate::deposit::DepositVariant) is initialized, and draw all of their
//! randomness from the variant's shared [`DepositRand`].
use std::collections::HashMap;
use std::sync::Arc;

use glam::IVec3;

use crate::config::WorldGenConfig;
use crate::deposit::{DepositAttributes, DepositBlock, DepositVariant};
use crate::noise::NoiseSampler;
use crate::oremap::WorldRegions;
use crate::random::DepositRand;
use crate::world::{BlockAccessor, BlockId, BlockRegistry, ChunkColumn};

pub mod child;
pub mod disc;
pub mod registry;

pub use child::ChildDepositGenerator;
pub use disc::{DiscDepositGenerator, DiscShape};
pub use registry::{GeneratorFactory, GeneratorRegistry};

/// World layout and block registry shared by all generation calls.
#[derive(Clone)]
pub struct GenContext {
    pub config: WorldGenConfig,
    pub blocks: Arc<dyn BlockRegistry>,
}

impl GenContext {
    pub fn new(config: WorldGenConfig, blocks: Arc<dyn BlockRegistry>) -> Self {
        Self { config, blocks }
    }
}

impl std::fmt::Debug for GenContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The parts of a variant a generator reads during setup.
#[derive(Clone, Copy)]
pub struct VariantView<'a> {
    pub code: &'a str,
    /// Origin file for diagnostics.
    pub source: &'a str,
    pub tries_per_chunk: f32,
    pub with_block_callback: bool,
    pub attributes: &'a DepositAttributes,
    pub child_deposits: &'a Arc<Vec<DepositVariant>>,
    /// Host pattern of the parent deposit, set for nested variants.
    pub parent_in_block: Option<&'a DepositBlock>,
}

/// Everything a [`GeneratorFactory`] receives.
#[derive(Clone, Copy)]
pub struct GeneratorArgs<'a> {
    pub variant: VariantView<'a>,
    pub rand: &'a DepositRand,
    /// Noise used to distort deposit edges.
    pub distortion: &'a Arc<dyn NoiseSampler>,
    pub ctx: &'a GenContext,
}

/// Mutable state of one chunk column being populated.
pub struct ChunkTarget<'a> {
    pub column: &'a mut ChunkColumn,
    pub chunk_x: i32,
    pub chunk_z: i32,
    /// Receives placements on the callback path.
    pub accessor: &'a mut dyn BlockAccessor,
    /// Regions generated so far, for ore map lookups of child deposits.
    pub regions: &'a WorldRegions,
    /// Child deposits queued for after the top-level pass.
    pub sub_deposits: &'a mut SubDepositQueue,
}

impl ChunkTarget<'_> {
    /// World position of the column origin.
    #[inline]
    pub fn base(&self) -> (i32, i32) {
        let cs = self.column.chunk_size();
        (self.chunk_x * cs, self.chunk_z * cs)
    }

    /// Places `id` at a column-local position, directly or through the accessor.
    pub fn place(&mut self, lx: i32, y: i32, lz: i32, id: BlockId, callback: bool) {
        if callback {
            let (bx, bz) = self.base();
            self.accessor
                .try_place_for_worldgen(IVec3::new(bx + lx, y, bz + lz), id);
        } else {
            self.column.set(lx, y, lz, id);
        }
    }
}

/// A deposit placement strategy.
pub trait DepositGenerator: Send + Sync {
    /// Registry name of the strategy.
    fn name(&self) -> &str;

    /// Runs one attempt centred at the world position `pos`.
    fn generate(&self, ctx: &GenContext, target: &mut ChunkTarget<'_>, pos: IVec3);

    /// Average number of blocks placed per chunk column.
    fn expected_yield(&self) -> f32;

    /// Stream the generator draws from.
    fn rand(&self) -> &DepositRand;

    /// A new instance with the same settings, bound to the same stream and noise.
    fn clone_box(&self) -> Box<dyn DepositGenerator>;
}

impl Clone for Box<dyn DepositGenerator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A queued child deposit.
#[derive(Clone)]
pub struct SubDeposit {
    pub pos: IVec3,
    children: Arc<Vec<DepositVariant>>,
    index: usize,
}

impl SubDeposit {
    pub fn variant(&self) -> &DepositVariant {
        &self.children[self.index]
    }
}

/// Child deposits to place after the top-level pass, one per world position.
#[derive(Clone, Default)]
pub struct SubDepositQueue {
    entries: Vec<SubDeposit>,
    by_pos: HashMap<IVec3, usize>,
}

impl SubDepositQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `children[index]` at `pos`, replacing an earlier entry at the same position.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn push(&mut self, pos: IVec3, children: &Arc<Vec<DepositVariant>>, index: usize) -> bool {
        if index >= children.len() {
            return false;
        }
        let entry = SubDeposit {
            pos,
            children: Arc::clone(children),
            index,
        };
        match self.by_pos.get(&pos) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.by_pos.insert(pos, self.entries.len());
                self.entries.push(entry);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubDeposit> {
        self.entries.iter()
    }

    /// Removes and returns all entries in insertion order.
    pub fn take(&mut self) -> Vec<SubDeposit> {
        self.by_pos.clear();
        std::mem::take(&mut self.entries)
    }
}

/// Index of a grade in `0..max_grade`, drawn only when grades are configured.
#[inline]
pub(crate) fn draw_grade(rand: &DepositRand, max_grade: usize) -> usize {
    if max_grade == 0 {
        0
    } else {
        rand.next_int(max_grade as i32) as usize
    }
}
