//! Region and chunk column callbacks that run all deposit variants.
use std::collections::HashSet;
use std::sync::Arc;

use glam::IVec3;
use tracing::{debug, info, warn};

use crate::config::WorldGenConfig;
use crate::deposit::{normalized_elevation, ClimateSampler, DepositVariant, DepositVariantConfig};
use crate::error::Result;
use crate::events::{DepositEvent, DepositEventKind, EventSink};
use crate::generator::{ChunkTarget, GenContext, GeneratorRegistry, SubDepositQueue};
use crate::noise::{NoiseSampler, NormalizedSimplexNoise};
use crate::oremap::{MapRegion, WorldRegions};
use crate::random::{seed_for_code, DepositRand};
use crate::world::{BlockAccessor, BlockRegistry, ChunkColumn};

/// Counters collected while populating one chunk column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkDepositReport {
    /// Attempts handed to a generator.
    pub attempts: usize,
    /// Attempts dropped by the climate filter.
    pub climate_rejections: usize,
    /// Queued child deposits that were generated.
    pub sub_deposits: usize,
}

/// Owns the deposit variants of a world and runs them per region and per chunk column.
///
/// All variants share one [`DepositRand`], re-seeded at the start of every column and
/// before every queued child deposit.
pub struct DepositSystem {
    ctx: GenContext,
    rand: DepositRand,
    variants: Vec<DepositVariant>,
}

impl DepositSystem {
    /// Validates `config` and initializes every variant.
    pub fn new(
        config: WorldGenConfig,
        registry: &GeneratorRegistry,
        blocks: Arc<dyn BlockRegistry>,
        variants: Vec<DepositVariantConfig>,
    ) -> Result<Self> {
        Self::new_with_events(config, registry, blocks, variants, &mut ())
    }

    /// Like [`DepositSystem::new`], sending configuration errors to `sink`.
    pub fn new_with_events(
        config: WorldGenConfig,
        registry: &GeneratorRegistry,
        blocks: Arc<dyn BlockRegistry>,
        variants: Vec<DepositVariantConfig>,
        sink: &mut dyn EventSink,
    ) -> Result<Self> {
        config.validate()?;

        let rand = DepositRand::new(config.world_seed);
        let distortion: Arc<dyn NoiseSampler> =
            Arc::new(NormalizedSimplexNoise::from_default_octaves(
                3,
                0.1,
                0.5,
                seed_for_code(config.world_seed, "deposit-distortion"),
            ));
        let ctx = GenContext::new(config, blocks);

        let variants: Vec<DepositVariant> = variants
            .into_iter()
            .map(|cfg| {
                let mut variant = DepositVariant::from_config(cfg);
                variant.initialize(&ctx, registry, &rand, &distortion, sink);
                variant
            })
            .collect();

        info!(
            "Deposit system ready | variants: {} | inert: {}.",
            variants.len(),
            variants.iter().filter(|v| v.is_inert()).count()
        );

        Ok(Self {
            ctx,
            rand,
            variants,
        })
    }

    pub fn context(&self) -> &GenContext {
        &self.ctx
    }

    pub fn config(&self) -> &WorldGenConfig {
        &self.ctx.config
    }

    pub fn rand(&self) -> &DepositRand {
        &self.rand
    }

    pub fn variants(&self) -> &[DepositVariant] {
        &self.variants
    }

    /// Top-level variant by code.
    pub fn variant(&self, code: &str) -> Option<&DepositVariant> {
        self.variants.iter().find(|v| v.code() == code)
    }

    /// Expected blocks per chunk column for every top-level variant.
    pub fn expected_yields(&self) -> Vec<(String, f32)> {
        self.variants
            .iter()
            .map(|v| (v.code().to_owned(), v.expected_yield()))
            .collect()
    }

    /// Creates the missing ore maps of all variants for one region.
    ///
    /// Returns the number of maps created; calling it again for the same region creates none.
    pub fn on_map_region_gen(
        &self,
        region: &mut MapRegion,
        region_x: i32,
        region_z: i32,
        sink: &mut dyn EventSink,
    ) -> usize {
        let before: HashSet<String> = region.codes().into_iter().map(str::to_owned).collect();

        let created: usize = self
            .variants
            .iter()
            .map(|v| v.populate_region_field(&self.ctx, region, region_x, region_z))
            .sum();

        if created > 0 {
            debug!(
                "Region ({}, {}): created {} ore maps.",
                region_x, region_z, created
            );
            if sink.wants(DepositEventKind::RegionPopulated) {
                let codes = region
                    .codes()
                    .into_iter()
                    .filter(|code| !before.contains(*code))
                    .map(str::to_owned)
                    .collect();
                sink.send(DepositEvent::RegionPopulated {
                    region_x,
                    region_z,
                    codes,
                });
            }
        }

        created
    }

    /// Places all deposits of one chunk column.
    ///
    /// Reads ore maps from `regions` (missing regions give a factor of `0`), temperature and
    /// rainfall from `climate`, and forwards callback placements to `accessor`.
    #[allow(clippy::too_many_arguments)]
    pub fn on_chunk_column_gen<C>(
        &self,
        column: &mut ChunkColumn,
        chunk_x: i32,
        chunk_z: i32,
        regions: &WorldRegions,
        climate: &C,
        accessor: &mut dyn BlockAccessor,
        sink: &mut dyn EventSink,
    ) -> ChunkDepositReport
    where
        C: ClimateSampler + ?Sized,
    {
        let config = &self.ctx.config;
        let cs = config.chunk_size;
        let rand = &self.rand;
        let mut report = ChunkDepositReport::default();

        if column.chunk_size() != cs || column.world_height() != config.world_height {
            warn!(
                "Chunk ({}, {}): column is {}x{} but the world is {}x{}, skipping deposits.",
                chunk_x,
                chunk_z,
                column.chunk_size(),
                column.world_height(),
                cs,
                config.world_height
            );
            return report;
        }

        if sink.wants(DepositEventKind::ChunkStarted) {
            sink.send(DepositEvent::ChunkStarted { chunk_x, chunk_z });
        }

        rand.init_position_seed(chunk_x, chunk_z);

        let mut queue = SubDepositQueue::new();
        let mut target = ChunkTarget {
            column,
            chunk_x,
            chunk_z,
            accessor,
            regions,
            sub_deposits: &mut queue,
        };

        for variant in &self.variants {
            let factor = if variant.with_ore_map() {
                variant.sample_field_factor(&self.ctx, regions, chunk_x, chunk_z)
            } else {
                1.0
            };
            let quantity =
                (variant.tries_per_chunk() * factor * config.tries_multiplier).max(0.0);
            let mut tries = quantity as i32;
            if rand.next_float() < quantity - tries as f32 {
                tries += 1;
            }

            for _ in 0..tries {
                let lx = rand.next_int(cs);
                let lz = rand.next_int(cs);
                let pos = IVec3::new(chunk_x * cs + lx, 0, chunk_z * cs + lz);

                let here = climate.climate_at(pos.x, pos.z);
                let elevation = normalized_elevation(
                    target.column.terrain_height(lx, lz),
                    config.sea_level,
                    config.world_height,
                );
                if !variant.climate().matches(here, elevation) {
                    report.climate_rejections += 1;
                    if sink.wants(DepositEventKind::ClimateRejected) {
                        sink.send(DepositEvent::ClimateRejected {
                            code: variant.code().to_owned(),
                            pos,
                        });
                    }
                    continue;
                }

                report.attempts += 1;
                if sink.wants(DepositEventKind::AttemptMade) {
                    sink.send(DepositEvent::AttemptMade {
                        code: variant.code().to_owned(),
                        pos,
                    });
                }
                variant.generate_at(&self.ctx, &mut target, pos);
            }
        }

        // Children may queue their own children; each round goes one level deeper.
        loop {
            let batch = target.sub_deposits.take();
            if batch.is_empty() {
                break;
            }
            for sub in batch {
                let variant = sub.variant();
                rand.init_position_seed(sub.pos.x, sub.pos.z);
                variant.generate_at(&self.ctx, &mut target, sub.pos);
                report.sub_deposits += 1;
                if sink.wants(DepositEventKind::SubDepositGenerated) {
                    sink.send(DepositEvent::SubDepositGenerated {
                        code: variant.code().to_owned(),
                        pos: sub.pos,
                    });
                }
            }
        }

        debug!(
            "Chunk ({}, {}) | attempts: {} | rejected: {} | sub deposits: {}.",
            chunk_x, chunk_z, report.attempts, report.climate_rejections, report.sub_deposits
        );

        if sink.wants(DepositEventKind::ChunkFinished) {
            sink.send(DepositEvent::ChunkFinished {
                chunk_x,
                chunk_z,
                report,
            });
        }

        report
    }
}

impl std::fmt::Debug for DepositSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepositSystem")
            .field("config", &self.ctx.config)
            .field("variants", &self.variants)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deposit::{Climate, DepositAttributes, DepositBlock};
    use crate::events::VecSink;
    use crate::random::NatFloat;
    use crate::world::{BlockId, BlockPalette};

    fn palette() -> (Arc<dyn BlockRegistry>, BlockId, BlockId) {
        let mut palette = BlockPalette::new();
        let granite = palette.solid("rock-granite");
        let ore = palette.solid("ore-galena-granite");
        (Arc::new(palette), granite, ore)
    }

    fn galena(tries: f32) -> DepositVariantConfig {
        DepositVariantConfig::new("galena")
            .with_generator("disc-followsealevel")
            .with_tries_per_chunk(tries)
            .with_attributes(
                DepositAttributes::new()
                    .with_in_block(DepositBlock::new("rock-*").named("rock"))
                    .with_place_block(DepositBlock::new("ore-galena-{rock}"))
                    .with_radius(NatFloat::uniform(5.0, 2.0))
                    .with_thickness(NatFloat::constant(2.0))
                    .with_y(NatFloat::uniform(10.0, 5.0)),
            )
    }

    fn generate(
        system: &DepositSystem,
        column: &mut ChunkColumn,
        sink: &mut dyn EventSink,
    ) -> ChunkDepositReport {
        system.on_chunk_column_gen(
            column,
            0,
            0,
            &WorldRegions::new(),
            &Climate::new(10.0, 0.5),
            &mut (),
            sink,
        )
    }

    #[test]
    fn invalid_world_config_is_rejected() {
        let (blocks, _, _) = palette();
        let config = WorldGenConfig::default().with_chunk_size(0);
        let result =
            DepositSystem::new(config, &GeneratorRegistry::with_builtin(), blocks, vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn column_generation_is_deterministic() {
        let (blocks, granite, ore) = palette();
        let system = DepositSystem::new(
            WorldGenConfig::new(5),
            &GeneratorRegistry::with_builtin(),
            blocks,
            vec![galena(4.0)],
        )
        .expect("valid config");

        let mut a = ChunkColumn::filled(32, 256, granite, 150);
        let mut b = ChunkColumn::filled(32, 256, granite, 150);
        let report_a = generate(&system, &mut a, &mut ());
        let report_b = generate(&system, &mut b, &mut ());

        assert_eq!(report_a, report_b);
        assert_eq!(report_a.attempts, 4);
        assert!(a.count(ore) > 0);
        assert_eq!(a.positions_of(ore), b.positions_of(ore));
    }

    #[test]
    fn mismatched_column_is_left_untouched() {
        let (blocks, granite, ore) = palette();
        let system = DepositSystem::new(
            WorldGenConfig::new(5),
            &GeneratorRegistry::with_builtin(),
            blocks,
            vec![galena(4.0)],
        )
        .expect("valid config");

        let mut sink = VecSink::new();
        let mut small = ChunkColumn::filled(16, 256, granite, 150);
        assert_eq!(
            generate(&system, &mut small, &mut sink),
            ChunkDepositReport::default()
        );
        let mut short = ChunkColumn::filled(32, 128, granite, 120);
        assert_eq!(
            generate(&system, &mut short, &mut sink),
            ChunkDepositReport::default()
        );

        assert_eq!(small.count(ore), 0);
        assert_eq!(short.count(ore), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn events_bracket_the_column() {
        let (blocks, granite, _) = palette();
        let system = DepositSystem::new(
            WorldGenConfig::new(5),
            &GeneratorRegistry::with_builtin(),
            blocks,
            vec![galena(2.0)],
        )
        .expect("valid config");

        let mut column = ChunkColumn::filled(32, 256, granite, 150);
        let mut sink = VecSink::new();
        let report = generate(&system, &mut column, &mut sink);

        let events = sink.as_slice();
        assert_eq!(events[0].kind(), DepositEventKind::ChunkStarted);
        assert_eq!(sink.count(DepositEventKind::AttemptMade), 2);
        match events.last() {
            Some(DepositEvent::ChunkFinished { report: r, .. }) => assert_eq!(*r, report),
            other => panic!("unexpected last event {other:?}"),
        }
    }

    #[test]
    fn config_errors_reach_the_sink() {
        let (blocks, _, _) = palette();
        let mut sink = VecSink::new();
        let system = DepositSystem::new_with_events(
            WorldGenConfig::new(5),
            &GeneratorRegistry::with_builtin(),
            blocks,
            vec![galena(1.0).with_generator("nope")],
            &mut sink,
        )
        .expect("valid config");
        assert_eq!(sink.count(DepositEventKind::ConfigError), 1);
        assert!(system.variants()[0].is_inert());
        assert_eq!(system.expected_yields(), vec![("galena".to_owned(), 0.0)]);
    }

    #[test]
    fn region_population_reports_new_codes_once() {
        let (blocks, _, _) = palette();
        let system = DepositSystem::new(
            WorldGenConfig::new(5),
            &GeneratorRegistry::with_builtin(),
            blocks,
            vec![galena(1.0).with_ore_map(true)],
        )
        .expect("valid config");

        let mut region = MapRegion::new();
        let mut sink = VecSink::new();
        assert_eq!(system.on_map_region_gen(&mut region, 0, 0, &mut sink), 1);
        assert_eq!(system.on_map_region_gen(&mut region, 0, 0, &mut sink), 0);
        assert_eq!(
            sink.into_inner(),
            vec![DepositEvent::RegionPopulated {
                region_x: 0,
                region_z: 0,
                codes: vec!["galena".to_owned()],
            }]
        );
    }
}
