//! Typed attributes read by the built-in generators.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::deposit::block::DepositBlock;
use crate::random::NatFloat;

/// Attribute set of a deposit variant.
///
/// Every field is optional in configuration files. Generators fall back to their own
/// defaults (with a warning) for missing dimensions. Custom generators can read `extra`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct DepositAttributes {
    /// Host blocks the deposit may replace.
    pub in_block: Option<DepositBlock>,
    /// Replacement pattern, resolved per host block and grade.
    pub place_block: Option<DepositBlock>,
    /// Decoration placed on the surface above the deposit.
    pub surface_block: Option<DepositBlock>,
    /// Horizontal radius in blocks, capped at 64.
    pub radius: Option<NatFloat>,
    /// Vertical thickness in blocks.
    pub thickness: Option<NatFloat>,
    /// Placement height; its meaning depends on the generator shape.
    pub y: Option<NatFloat>,
    /// Number of placement samples per child deposit attempt.
    pub random_tries: Option<NatFloat>,
    /// Base chance of a surface decoration per replaced block.
    pub surface_block_chance: f32,
    /// Chance that an attempt places surface decorations at all.
    pub gen_surface_block_chance: f32,
    /// Largest allowed height difference between a cell and the deposit centre.
    pub max_y_roughness: f32,
    /// Tests the host block only on the top layer of each cell.
    pub ignore_parent_test_per_block: bool,
    /// Places the bottom layer through the block callback path.
    pub with_last_layer_block_callback: bool,
    /// Strength of the noise added to the disc edge.
    pub edge_distortion: f32,
    /// Free-form values for custom generators.
    pub extra: BTreeMap<String, String>,
}

impl Default for DepositAttributes {
    fn default() -> Self {
        Self {
            in_block: None,
            place_block: None,
            surface_block: None,
            radius: None,
            thickness: None,
            y: None,
            random_tries: None,
            surface_block_chance: 0.05,
            gen_surface_block_chance: 1.0,
            max_y_roughness: 999.0,
            ignore_parent_test_per_block: false,
            with_last_layer_block_callback: false,
            edge_distortion: 0.0,
            extra: BTreeMap::new(),
        }
    }
}

impl DepositAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_in_block(mut self, block: DepositBlock) -> Self {
        self.in_block = Some(block);
        self
    }

    pub fn with_place_block(mut self, block: DepositBlock) -> Self {
        self.place_block = Some(block);
        self
    }

    pub fn with_surface_block(mut self, block: DepositBlock) -> Self {
        self.surface_block = Some(block);
        self
    }

    pub fn with_radius(mut self, radius: NatFloat) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_thickness(mut self, thickness: NatFloat) -> Self {
        self.thickness = Some(thickness);
        self
    }

    pub fn with_y(mut self, y: NatFloat) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_random_tries(mut self, tries: NatFloat) -> Self {
        self.random_tries = Some(tries);
        self
    }

    pub fn with_surface_block_chance(mut self, chance: f32) -> Self {
        self.surface_block_chance = chance;
        self
    }

    pub fn with_gen_surface_block_chance(mut self, chance: f32) -> Self {
        self.gen_surface_block_chance = chance;
        self
    }

    pub fn with_max_y_roughness(mut self, roughness: f32) -> Self {
        self.max_y_roughness = roughness;
        self
    }

    pub fn with_edge_distortion(mut self, strength: f32) -> Self {
        self.edge_distortion = strength;
        self
    }

    /// Sets a free-form value.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Free-form value parsed as `T`, or `None` if missing or unparsable.
    pub fn extra_as<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.extra.get(key)?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let attrs = DepositAttributes::default();
        assert_eq!(attrs.surface_block_chance, 0.05);
        assert_eq!(attrs.gen_surface_block_chance, 1.0);
        assert_eq!(attrs.max_y_roughness, 999.0);
        assert!(attrs.radius.is_none());
    }

    #[test]
    fn extra_values_parse() {
        let attrs = DepositAttributes::new()
            .with_extra("veins", "3")
            .with_extra("name", "x");
        assert_eq!(attrs.extra_as::<u32>("veins"), Some(3));
        assert_eq!(attrs.extra_as::<u32>("name"), None);
        assert_eq!(attrs.extra_as::<u32>("missing"), None);
    }
}
