#![forbid(unsafe_code)]
//! ore_deposits: Procedural ore deposit placement for voxel terrain generation.
//!
//! Modules:
//! - deposit: variant configuration, attributes, block patterns, climate filter
//! - generator: generation strategies (disc shapes, child deposits) and their registry
//! - oremap: per-region density grids with bilinear sampling
//! - random: the shared, position-seeded deposit stream and `NatFloat` distributions
//! - world: chunk column storage and block registry/accessor traits
//! - driver: region and chunk column callbacks tying it all together
//!
//! For examples and docs, see README.
pub mod config;
pub mod deposit;
pub mod driver;
pub mod error;
pub mod events;
pub mod generator;
pub mod noise;
pub mod oremap;
pub mod random;
pub mod world;

/// Convenient re-exports for common types. Import with `use ore_deposits::prelude::*;`.
pub mod prelude {
    pub use crate::config::WorldGenConfig;
    pub use crate::deposit::{
        Climate, ClimateConditions, ClimateSampler, DepositAttributes, DepositBlock,
        DepositVariant, DepositVariantConfig,
    };
    pub use crate::driver::{ChunkDepositReport, DepositSystem};
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        DepositEvent, DepositEventKind, EventSink, FnSink, MultiSink, VecSink,
    };
    pub use crate::generator::{
        ChildDepositGenerator, ChunkTarget, DepositGenerator, DiscDepositGenerator, DiscShape,
        GenContext, GeneratorArgs, GeneratorRegistry, SubDepositQueue,
    };
    pub use crate::noise::{NoiseSampler, NormalizedSimplexNoise};
    pub use crate::oremap::{MapRegion, NoiseOreMapLayer, OreMap, OreMapLayer, WorldRegions};
    pub use crate::random::{DepositRand, Distribution, NatFloat};
    pub use crate::world::{
        BlockAccessor, BlockId, BlockPalette, BlockRegistry, ChunkColumn, PlacementLog,
    };
}
