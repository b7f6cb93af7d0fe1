//! Scattered child deposits placed around a point of their parent.
use std::sync::Arc;

use glam::IVec3;
use tracing::warn;

use crate::deposit::block::{resolve_block_table, BlockTable};
use crate::generator::{draw_grade, ChunkTarget, DepositGenerator, GenContext, GeneratorArgs};
use crate::random::{DepositRand, NatFloat};
use crate::world::BlockId;

const MAX_RADIUS: i32 = 64;

/// Places single blocks at random offsets around the queued position.
///
/// Host blocks default to the parent deposit's `in_block`, so children inherit the rock
/// type captured by the parent's wildcard.
#[derive(Clone)]
pub struct ChildDepositGenerator {
    rand: DepositRand,
    place_blocks: Arc<BlockTable>,
    surface_blocks: Arc<BlockTable>,
    max_grade: usize,
    radius: NatFloat,
    random_tries: NatFloat,
    surface_block_chance: f32,
    with_block_callback: bool,
    tries_per_chunk: f32,
}

impl ChildDepositGenerator {
    pub const NAME: &'static str = "childdeposit";

    pub fn new(args: &GeneratorArgs<'_>) -> Self {
        let view = args.variant;
        let attrs = view.attributes;

        let radius = attrs.radius.unwrap_or_else(|| {
            warn!(
                "Child deposit '{}' in '{}' has no radius, using default.",
                view.code, view.source
            );
            NatFloat::uniform(3.0, 1.0)
        });
        let random_tries = attrs.random_tries.unwrap_or_else(|| {
            warn!(
                "Child deposit '{}' in '{}' has no random_tries, using default.",
                view.code, view.source
            );
            NatFloat::constant(8.0)
        });

        let host = attrs.in_block.as_ref().or(view.parent_in_block);
        let (place_blocks, surface_blocks, max_grade) = match (host, attrs.place_block.as_ref()) {
            (Some(host), Some(place)) => {
                let registry = args.ctx.blocks.as_ref();
                let surfaces = attrs
                    .surface_block
                    .as_ref()
                    .map(|surface| resolve_block_table(registry, host, surface, view.source))
                    .unwrap_or_default();
                (
                    resolve_block_table(registry, host, place, view.source),
                    surfaces,
                    place.max_grade(),
                )
            }
            _ => {
                warn!(
                    "Child deposit '{}' in '{}' has no host or place block, it will place nothing.",
                    view.code, view.source
                );
                (BlockTable::new(), BlockTable::new(), 0)
            }
        };

        Self {
            rand: args.rand.clone(),
            place_blocks: Arc::new(place_blocks),
            surface_blocks: Arc::new(surface_blocks),
            max_grade,
            radius,
            random_tries,
            surface_block_chance: attrs.surface_block_chance,
            with_block_callback: view.with_block_callback,
            tries_per_chunk: view.tries_per_chunk,
        }
    }

    fn place_surface(
        &self,
        ctx: &GenContext,
        target: &mut ChunkTarget<'_>,
        (lx, lz): (i32, i32),
        y: i32,
        host: BlockId,
        grade: usize,
    ) {
        let world_height = target.column.world_height();
        let surface_y = target.column.rain_height(lx, lz);
        let depth = surface_y - y;
        let chance = self.surface_block_chance * (1.0 - depth as f32 / 8.0).max(0.0);
        if surface_y >= world_height || self.rand.next_float() >= chance {
            return;
        }
        // The decoration goes one above the surface.
        if surface_y + 1 >= world_height {
            return;
        }
        let Some(surface) = self
            .surface_blocks
            .get(&host)
            .and_then(|resolved| resolved.for_grade(grade))
        else {
            return;
        };
        let below_solid = target
            .column
            .get(lx, surface_y, lz)
            .is_some_and(|below| ctx.blocks.is_solid_on_top(below));
        if below_solid && target.column.get(lx, surface_y + 1, lz) == Some(BlockId::AIR) {
            target.column.set(lx, surface_y + 1, lz, surface);
        }
    }
}

impl DepositGenerator for ChildDepositGenerator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn generate(&self, ctx: &GenContext, target: &mut ChunkTarget<'_>, pos: IVec3) {
        let rand = &self.rand;
        let cs = target.column.chunk_size();
        let world_height = target.column.world_height();

        let grade = draw_grade(rand, self.max_grade);

        let mut radius = (self.radius.next_float(1.0, rand) as i32).min(MAX_RADIUS);
        if radius <= 0 {
            return;
        }
        radius += 1;

        let gen_surface = rand.next_float() > 0.35 && !self.surface_blocks.is_empty();
        let tries = self.random_tries.next_float(1.0, rand);
        let tries = if tries > 0.0 { tries.ceil() as i32 } else { 0 };

        // Samples are bounded by the chunk the parent position lies in.
        let origin_x = pos.x.div_euclid(cs) * cs;
        let origin_z = pos.z.div_euclid(cs) * cs;

        for _ in 0..tries {
            let sample = IVec3::new(
                pos.x + rand.next_int(radius) - radius / 2,
                pos.y + rand.next_int(radius) - radius / 2,
                pos.z + rand.next_int(radius) - radius / 2,
            );
            let lx = sample.x - origin_x;
            let lz = sample.z - origin_z;
            if sample.y <= 1 || sample.y >= world_height {
                continue;
            }
            if lx < 0 || lz < 0 || lx >= cs || lz >= cs {
                continue;
            }

            let Some(current) = target.column.get(lx, sample.y, lz) else {
                continue;
            };
            let Some(place) = self
                .place_blocks
                .get(&current)
                .and_then(|resolved| resolved.for_grade(grade))
            else {
                continue;
            };

            if self.with_block_callback {
                target.accessor.try_place_for_worldgen(sample, place);
            } else {
                target.column.set(lx, sample.y, lz, place);
            }

            if gen_surface {
                self.place_surface(ctx, target, (lx, lz), sample.y, current, grade);
            }
        }
    }

    fn expected_yield(&self) -> f32 {
        self.random_tries.average() * self.tries_per_chunk
    }

    fn rand(&self) -> &DepositRand {
        &self.rand
    }

    fn clone_box(&self) -> Box<dyn DepositGenerator> {
        Box::new(self.clone())
    }
}
