//! Deposit variants: configuration records and their runtime form.
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use glam::IVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::deposit::attributes::DepositAttributes;
use crate::deposit::block::DepositBlock;
use crate::deposit::climate::ClimateConditions;
use crate::error::Error;
use crate::events::{DepositEvent, DepositEventKind, EventSink};
use crate::generator::{
    ChunkTarget, DepositGenerator, GenContext, GeneratorArgs, GeneratorRegistry, VariantView,
};
use crate::noise::NoiseSampler;
use crate::oremap::{MapRegion, NoiseOreMapLayer, OreMap, OreMapLayer, WorldRegions};
use crate::random::DepositRand;

/// Code used for variants whose configuration has none.
pub const UNKNOWN_CODE: &str = "unknown";

const UNKNOWN_SOURCE: &str = "unknown source";

/// Deposit variant as written in configuration. Child deposits nest recursively.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepositVariantConfig {
    pub code: Option<String>,
    /// Attempts per chunk column. The fractional part is the chance of one extra attempt.
    pub tries_per_chunk: f32,
    /// Registry name of the generator.
    pub generator: Option<String>,
    pub with_ore_map: bool,
    /// Places blocks through the [`BlockAccessor`](crate::world::BlockAccessor) callback
    /// path instead of writing the column directly.
    pub with_block_callback: bool,
    pub attributes: DepositAttributes,
    pub climate: ClimateConditions,
    pub child_deposits: Vec<DepositVariantConfig>,
    /// File the variant was loaded from.
    pub source: Option<String>,
}

impl DepositVariantConfig {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    pub fn with_tries_per_chunk(mut self, tries: f32) -> Self {
        self.tries_per_chunk = tries;
        self
    }

    pub fn with_ore_map(mut self, enabled: bool) -> Self {
        self.with_ore_map = enabled;
        self
    }

    pub fn with_block_callback(mut self, enabled: bool) -> Self {
        self.with_block_callback = enabled;
        self
    }

    pub fn with_attributes(mut self, attributes: DepositAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_climate(mut self, climate: ClimateConditions) -> Self {
        self.climate = climate;
        self
    }

    /// Appends a child deposit.
    pub fn with_child(mut self, child: DepositVariantConfig) -> Self {
        self.child_deposits.push(child);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Runtime deposit variant.
///
/// Built with [`DepositVariant::from_config`] and made usable by
/// [`DepositVariant::initialize`], which creates the generator and the ore map layer.
/// A variant without a generator is inert: it still populates ore maps but places nothing.
pub struct DepositVariant {
    code: Option<String>,
    source: Option<String>,
    tries_per_chunk: f32,
    generator_name: Option<String>,
    with_ore_map: bool,
    with_block_callback: bool,
    attributes: DepositAttributes,
    climate: ClimateConditions,
    child_deposits: Arc<Vec<DepositVariant>>,
    generator: Option<Box<dyn DepositGenerator>>,
    ore_map_layer: Option<Arc<dyn OreMapLayer>>,
    rand: Option<DepositRand>,
    distortion: Option<Arc<dyn NoiseSampler>>,
}

impl DepositVariant {
    pub fn from_config(config: DepositVariantConfig) -> Self {
        let children = config
            .child_deposits
            .into_iter()
            .map(DepositVariant::from_config)
            .collect();
        Self {
            code: config.code,
            source: config.source,
            tries_per_chunk: config.tries_per_chunk,
            generator_name: config.generator,
            with_ore_map: config.with_ore_map,
            with_block_callback: config.with_block_callback,
            attributes: config.attributes,
            climate: config.climate,
            child_deposits: Arc::new(children),
            generator: None,
            ore_map_layer: None,
            rand: None,
            distortion: None,
        }
    }

    /// Uses `layer` instead of the default noise layer for this variant's ore map.
    ///
    /// Must be set before [`initialize`](Self::initialize) to take precedence.
    pub fn with_ore_map_layer(mut self, layer: Arc<dyn OreMapLayer>) -> Self {
        self.ore_map_layer = Some(layer);
        self
    }

    /// Creates the generator of this variant and of all children.
    ///
    /// Configuration problems are logged and sent to `sink`; they leave the affected
    /// variant inert instead of failing.
    pub fn initialize(
        &mut self,
        ctx: &GenContext,
        registry: &GeneratorRegistry,
        rand: &DepositRand,
        distortion: &Arc<dyn NoiseSampler>,
        sink: &mut dyn EventSink,
    ) {
        self.initialize_nested(ctx, registry, rand, distortion, None, sink);
    }

    fn initialize_nested(
        &mut self,
        ctx: &GenContext,
        registry: &GeneratorRegistry,
        rand: &DepositRand,
        distortion: &Arc<dyn NoiseSampler>,
        parent_in_block: Option<&DepositBlock>,
        sink: &mut dyn EventSink,
    ) {
        if self.code.is_none() {
            let message = format!(
                "Deposit in file {} has no code defined, it will be named '{}'.",
                self.source(),
                UNKNOWN_CODE
            );
            error!("{}", message);
            self.report(sink, message);
            self.code = Some(UNKNOWN_CODE.to_owned());
        }

        self.rand = Some(rand.clone());
        self.distortion = Some(Arc::clone(distortion));
        if self.with_ore_map && self.ore_map_layer.is_none() {
            self.ore_map_layer = Some(Arc::new(NoiseOreMapLayer::for_deposit(
                ctx.config.world_seed,
                self.code(),
            )));
        }

        let host = self
            .attributes
            .in_block
            .clone()
            .or_else(|| parent_in_block.cloned());
        for child in Arc::make_mut(&mut self.child_deposits).iter_mut() {
            child.initialize_nested(ctx, registry, rand, distortion, host.as_ref(), sink);
        }

        let Some(name) = self.generator_name.as_deref() else {
            let message = Error::MissingGenerator {
                variant: self.code().to_owned(),
            }
            .to_string();
            error!("{} (file {})", message, self.source());
            self.report(sink, message);
            return;
        };

        let args = GeneratorArgs {
            variant: VariantView {
                code: self.code(),
                source: self.source(),
                tries_per_chunk: self.tries_per_chunk,
                with_block_callback: self.with_block_callback,
                attributes: &self.attributes,
                child_deposits: &self.child_deposits,
                parent_in_block,
            },
            rand,
            distortion,
            ctx,
        };
        let generator = registry.create(name, &args);
        match generator {
            Some(generator) => {
                debug!("Deposit '{}' uses generator '{}'", self.code(), name);
                self.generator = Some(generator);
            }
            None => {
                let message = Error::UnknownGenerator {
                    name: name.to_owned(),
                }
                .to_string();
                error!(
                    "Deposit '{}' in file {}: {}",
                    self.code(),
                    self.source(),
                    message
                );
                self.report(sink, message);
            }
        }
    }

    fn report(&self, sink: &mut dyn EventSink, message: String) {
        if sink.wants(DepositEventKind::ConfigError) {
            sink.send(DepositEvent::ConfigError {
                variant: self.code().to_owned(),
                source: self.source.clone(),
                message,
            });
        }
    }

    /// Creates the missing ore maps of this variant and its children in `region`.
    ///
    /// Returns the number of maps created. Existing maps are never regenerated.
    pub fn populate_region_field(
        &self,
        ctx: &GenContext,
        region: &mut MapRegion,
        region_x: i32,
        region_z: i32,
    ) -> usize {
        let mut created = 0;
        if let Some(layer) = &self.ore_map_layer {
            let code = self.code();
            if !region.has_ore_map(code) {
                let noise_size = ctx.config.ore_map_size();
                let size = (noise_size + 1) as usize;
                let data =
                    layer.gen_layer(region_x * noise_size, region_z * noise_size, size, size);
                match OreMap::new(size, 1, data) {
                    Some(map) => {
                        if region.insert_ore_map_with(code, || map) {
                            created += 1;
                        }
                    }
                    None => error!(
                        "Ore map layer of deposit '{}' returned the wrong number of cells.",
                        code
                    ),
                }
            }
        }
        for child in self.child_deposits.iter() {
            created += child.populate_region_field(ctx, region, region_x, region_z);
        }
        created
    }

    /// Ore map density at the centre of a chunk, in `[0, 1]`.
    ///
    /// Returns `0` when the region has not been generated or has no map for this code.
    pub fn sample_field_factor(
        &self,
        ctx: &GenContext,
        regions: &WorldRegions,
        chunk_x: i32,
        chunk_z: i32,
    ) -> f32 {
        let config = &ctx.config;
        let Some(map) = regions
            .for_chunk(config, chunk_x, chunk_z)
            .and_then(|region| region.ore_map(self.code()))
        else {
            return 0.0;
        };

        let cs = config.chunk_size;
        let region_size = config.region_size as f32;
        let noise_size = map.inner_size() as f32;
        let lx = (chunk_x * cs + cs / 2).rem_euclid(config.region_size) as f32;
        let lz = (chunk_z * cs + cs / 2).rem_euclid(config.region_size) as f32;
        let x = (lx / region_size * noise_size).clamp(0.0, noise_size - 1.0);
        let z = (lz / region_size * noise_size).clamp(0.0, noise_size - 1.0);

        (map.sample_lerped(x, z) / 255.0).clamp(0.0, 1.0)
    }

    /// Average blocks placed per chunk column, `0` when inert.
    pub fn expected_yield(&self) -> f32 {
        self.generator
            .as_ref()
            .map_or(0.0, |generator| generator.expected_yield())
    }

    /// Runs one attempt of the generator at a world position. Inert variants do nothing.
    pub fn generate_at(&self, ctx: &GenContext, target: &mut ChunkTarget<'_>, pos: IVec3) {
        if let Some(generator) = &self.generator {
            generator.generate(ctx, target, pos);
        }
    }

    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or(UNKNOWN_CODE)
    }

    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(UNKNOWN_SOURCE)
    }

    pub fn tries_per_chunk(&self) -> f32 {
        self.tries_per_chunk
    }

    pub fn generator_name(&self) -> Option<&str> {
        self.generator_name.as_deref()
    }

    pub fn with_ore_map(&self) -> bool {
        self.with_ore_map
    }

    pub fn with_block_callback(&self) -> bool {
        self.with_block_callback
    }

    pub fn attributes(&self) -> &DepositAttributes {
        &self.attributes
    }

    /// Attributes of this variant only. Generators keep the values read at initialization.
    pub fn attributes_mut(&mut self) -> &mut DepositAttributes {
        &mut self.attributes
    }

    pub fn climate(&self) -> &ClimateConditions {
        &self.climate
    }

    pub fn climate_mut(&mut self) -> &mut ClimateConditions {
        &mut self.climate
    }

    pub fn child_deposits(&self) -> &[DepositVariant] {
        &self.child_deposits
    }

    /// Whether both variants refer to the same child list.
    pub fn shares_children_with(&self, other: &DepositVariant) -> bool {
        Arc::ptr_eq(&self.child_deposits, &other.child_deposits)
    }

    pub fn generator(&self) -> Option<&dyn DepositGenerator> {
        self.generator.as_deref()
    }

    /// `true` when no generator could be created.
    pub fn is_inert(&self) -> bool {
        self.generator.is_none()
    }

    pub fn ore_map_layer(&self) -> Option<&Arc<dyn OreMapLayer>> {
        self.ore_map_layer.as_ref()
    }

    /// Stream handed to [`initialize`](Self::initialize).
    pub fn rand(&self) -> Option<&DepositRand> {
        self.rand.as_ref()
    }

    /// Codes of this variant and all nested children that carry an ore map.
    pub fn ore_map_codes(&self) -> HashSet<&str> {
        let mut codes = HashSet::new();
        if self.ore_map_layer.is_some() {
            codes.insert(self.code());
        }
        for child in self.child_deposits.iter() {
            codes.extend(child.ore_map_codes());
        }
        codes
    }
}

/// Deep-copies attributes and climate, shares the child list and creates a new generator
/// instance bound to the same stream and distortion noise.
impl Clone for DepositVariant {
    fn clone(&self) -> Self {
        Self {
            code: self.code.clone(),
            source: self.source.clone(),
            tries_per_chunk: self.tries_per_chunk,
            generator_name: self.generator_name.clone(),
            with_ore_map: self.with_ore_map,
            with_block_callback: self.with_block_callback,
            attributes: self.attributes.clone(),
            climate: self.climate,
            child_deposits: Arc::clone(&self.child_deposits),
            generator: self.generator.as_ref().map(|generator| generator.clone_box()),
            ore_map_layer: self.ore_map_layer.clone(),
            rand: self.rand.clone(),
            distortion: self.distortion.clone(),
        }
    }
}

impl fmt::Debug for DepositVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepositVariant")
            .field("code", &self.code())
            .field("source", &self.source)
            .field("tries_per_chunk", &self.tries_per_chunk)
            .field("generator", &self.generator_name)
            .field("with_ore_map", &self.with_ore_map)
            .field("with_block_callback", &self.with_block_callback)
            .field("child_deposits", &self.child_deposits.len())
            .field("inert", &self.is_inert())
            .finish()
    }
}
