//! Region-scale ore maps: per-deposit density grids cached per map region.
//!
//! Each deposit with an ore map gets one [`OreMap`] per region, produced once by an
//! [`OreMapLayer`] and shared by every chunk column in that region.
pub mod grid;
pub mod layer;
pub mod region;

pub use grid::OreMap;
pub use layer::{NoiseOreMapLayer, OreMapLayer};
pub use region::{region_of_chunk, MapRegion, WorldRegions};
