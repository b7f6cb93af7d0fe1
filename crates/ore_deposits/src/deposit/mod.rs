//! Deposit configuration and runtime variants.
pub mod attributes;
pub mod block;
pub mod climate;
pub mod variant;

pub use attributes::DepositAttributes;
pub use block::{resolve_block_table, BlockTable, DepositBlock, ResolvedDepositBlock};
pub use climate::{normalized_elevation, Climate, ClimateConditions, ClimateSampler};
pub use variant::{DepositVariant, DepositVariantConfig, UNKNOWN_CODE};
