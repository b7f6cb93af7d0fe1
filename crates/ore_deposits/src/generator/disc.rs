//! Disc-shaped deposits.
//!
//! A disc is an ellipse in the horizontal plane with a vertical thickness. The three
//! shapes differ only in how the top of each cell is found:
//!
//! - [`DiscShape::Anywhere`]: around a centre height drawn as a fraction of the world
//!   height, tapering towards the edge,
//! - [`DiscShape::FollowSurface`]: a fixed depth below the terrain surface,
//! - [`DiscShape::FollowSealevel`]: a fixed depth below sea level.
use std::f32::consts::PI;
use std::sync::Arc;

use glam::IVec3;
use tracing::warn;

use crate::deposit::block::{resolve_block_table, BlockTable, ResolvedDepositBlock};
use crate::deposit::DepositVariant;
use crate::generator::{draw_grade, ChunkTarget, DepositGenerator, GenContext, GeneratorArgs};
use crate::noise::NoiseSampler;
use crate::random::{DepositRand, Distribution, NatFloat};
use crate::world::{BlockId, ChunkColumn};

/// Cells this far outside the chunk are still visited so distorted edges line up.
const EDGE_MARGIN: i32 = 6;

/// Upper bound for the drawn radius.
const MAX_RADIUS: i32 = 64;

const DEFAULT_RADIUS: NatFloat = NatFloat {
    avg: 6.0,
    var: 2.0,
    dist: Distribution::Uniform,
    offset: 0.0,
};

const DEFAULT_THICKNESS: NatFloat = NatFloat {
    avg: 2.0,
    var: 1.0,
    dist: Distribution::Uniform,
    offset: 0.0,
};

/// How a disc finds its vertical position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiscShape {
    Anywhere,
    FollowSurface,
    FollowSealevel,
}

impl DiscShape {
    pub fn generator_name(self) -> &'static str {
        match self {
            DiscShape::Anywhere => "disc-anywhere",
            DiscShape::FollowSurface => "disc-followsurface",
            DiscShape::FollowSealevel => "disc-followsealevel",
        }
    }

    /// `y` used when the attributes define none: a height fraction for
    /// [`DiscShape::Anywhere`], a depth in blocks otherwise.
    fn default_y(self) -> NatFloat {
        match self {
            DiscShape::Anywhere => NatFloat::uniform(0.3, 0.2),
            DiscShape::FollowSurface | DiscShape::FollowSealevel => {
                NatFloat::uniform(8.0, 4.0)
            }
        }
    }
}

/// Vertical placement chosen once per attempt.
#[derive(Clone, Copy, Debug)]
struct DiscCentre {
    y: i32,
    depth: i32,
}

#[derive(Clone)]
pub struct DiscDepositGenerator {
    shape: DiscShape,
    rand: DepositRand,
    distortion: Arc<dyn NoiseSampler>,
    place_blocks: Arc<BlockTable>,
    surface_blocks: Arc<BlockTable>,
    max_grade: usize,
    radius: NatFloat,
    thickness: NatFloat,
    y: NatFloat,
    surface_block_chance: f32,
    gen_surface_block_chance: f32,
    max_y_roughness: f32,
    ignore_parent_test_per_block: bool,
    with_last_layer_block_callback: bool,
    edge_distortion: f32,
    with_block_callback: bool,
    tries_per_chunk: f32,
    children: Arc<Vec<DepositVariant>>,
}

impl DiscDepositGenerator {
    /// Resolves block tables and reads dimensions from the variant's attributes.
    pub fn new(args: &GeneratorArgs<'_>, shape: DiscShape) -> Self {
        let view = args.variant;
        let attrs = view.attributes;

        let radius = attrs.radius.unwrap_or_else(|| {
            warn!(
                "Deposit '{}' in '{}' has no radius, using default.",
                view.code, view.source
            );
            DEFAULT_RADIUS
        });
        let thickness = attrs.thickness.unwrap_or_else(|| {
            warn!(
                "Deposit '{}' in '{}' has no thickness, using default.",
                view.code, view.source
            );
            DEFAULT_THICKNESS
        });
        let y = attrs.y.unwrap_or_else(|| shape.default_y());

        let host = attrs.in_block.as_ref().or(view.parent_in_block);
        let (place_blocks, surface_blocks, max_grade) = match (host, attrs.place_block.as_ref()) {
            (Some(host), Some(place)) => {
                let registry = args.ctx.blocks.as_ref();
                let places = resolve_block_table(registry, host, place, view.source);
                let surfaces = attrs
                    .surface_block
                    .as_ref()
                    .map(|surface| resolve_block_table(registry, host, surface, view.source))
                    .unwrap_or_default();
                (places, surfaces, place.max_grade())
            }
            _ => {
                warn!(
                    "Deposit '{}' in '{}' lacks in_block or place_block, placing nothing.",
                    view.code, view.source
                );
                (BlockTable::new(), BlockTable::new(), 0)
            }
        };

        Self {
            shape,
            rand: args.rand.clone(),
            distortion: Arc::clone(args.distortion),
            place_blocks: Arc::new(place_blocks),
            surface_blocks: Arc::new(surface_blocks),
            max_grade,
            radius,
            thickness,
            y,
            surface_block_chance: attrs.surface_block_chance,
            gen_surface_block_chance: attrs.gen_surface_block_chance,
            max_y_roughness: attrs.max_y_roughness,
            ignore_parent_test_per_block: attrs.ignore_parent_test_per_block,
            with_last_layer_block_callback: attrs.with_last_layer_block_callback,
            edge_distortion: attrs.edge_distortion,
            with_block_callback: view.with_block_callback,
            tries_per_chunk: view.tries_per_chunk,
            children: Arc::clone(view.child_deposits),
        }
    }

    pub fn shape(&self) -> DiscShape {
        self.shape
    }

    /// Draws the per-attempt vertical placement.
    fn before_gen(
        &self,
        ctx: &GenContext,
        column: &ChunkColumn,
        local: (i32, i32),
    ) -> DiscCentre {
        let world_height = ctx.config.world_height;
        match self.shape {
            DiscShape::Anywhere => DiscCentre {
                y: (self.y.next_float(1.0, &self.rand) * world_height as f32) as i32,
                depth: 0,
            },
            DiscShape::FollowSurface => {
                let depth = self.y.next_float(1.0, &self.rand) as i32;
                let cs = column.chunk_size();
                let lx = local.0.clamp(0, cs - 1);
                let lz = local.1.clamp(0, cs - 1);
                DiscCentre {
                    y: column.terrain_height(lx, lz) - depth,
                    depth,
                }
            }
            DiscShape::FollowSealevel => {
                let depth = self.y.next_float(1.0, &self.rand) as i32;
                DiscCentre {
                    y: ctx.config.sea_level - depth,
                    depth,
                }
            }
        }
    }

    /// Top y and number of layers of one cell.
    fn load_y_and_thickness(
        &self,
        ctx: &GenContext,
        column: &ChunkColumn,
        (lx, lz): (i32, i32),
        centre: DiscCentre,
        thickness: i32,
        edge: f32,
    ) -> (i32, i32) {
        match self.shape {
            DiscShape::Anywhere => {
                let local = (thickness as f32 * edge.min(1.0)).ceil() as i32;
                (centre.y + local / 2, local)
            }
            DiscShape::FollowSurface => (column.terrain_height(lx, lz) - centre.depth, thickness),
            DiscShape::FollowSealevel => (ctx.config.sea_level - centre.depth, thickness),
        }
    }

    fn queue_children(&self, ctx: &GenContext, target: &mut ChunkTarget<'_>, pos: IVec3) {
        let cs = target.column.chunk_size();
        let area = (cs * cs) as f32;
        for (index, child) in self.children.iter().enumerate() {
            let rnd = self.rand.next_float();
            let quantity = child.tries_per_chunk() / area;
            if quantity <= rnd {
                continue;
            }
            let place = !child.with_ore_map()
                || child.sample_field_factor(ctx, target.regions, target.chunk_x, target.chunk_z)
                    * quantity
                    > rnd;
            if place {
                target.sub_deposits.push(pos, &self.children, index);
            }
        }
    }

    fn place_surface(
        &self,
        ctx: &GenContext,
        target: &mut ChunkTarget<'_>,
        lx: i32,
        y: i32,
        lz: i32,
        host: BlockId,
    ) {
        let world_height = target.column.world_height();
        let surface_y = target.column.rain_height(lx, lz);
        let depth = surface_y - y;
        let chance = self.surface_block_chance * (1.11 - depth as f32 / 9.0).max(0.0);
        if surface_y >= world_height - 1 || self.rand.next_float() >= chance {
            return;
        }
        let Some(surface) = self
            .surface_blocks
            .get(&host)
            .and_then(|resolved| resolved.for_grade(0))
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

impl DepositGenerator for DiscDepositGenerator {
    fn name(&self) -> &str {
        self.shape.generator_name()
    }

    fn generate(&self, ctx: &GenContext, target: &mut ChunkTarget<'_>, pos: IVec3) {
        let rand = &self.rand;
        let cs = target.column.chunk_size();
        let world_height = target.column.world_height();

        let grade = draw_grade(rand, self.max_grade);

        let radius = (self.radius.next_float(1.0, rand) as i32).min(MAX_RADIUS);
        if radius <= 0 {
            return;
        }

        // Stretch the circle by up to 25% along one axis.
        let deform = (rand.next_float() - 0.5).clamp(-0.25, 0.25);
        let radius_x = radius - (radius as f32 * deform) as i32;
        let radius_z = radius + (radius as f32 * deform) as i32;

        let (base_x, base_z) = target.base();
        if pos.x + radius_x < base_x - EDGE_MARGIN
            || pos.z + radius_z < base_z - EDGE_MARGIN
            || pos.x - radius_x >= base_x + cs + EDGE_MARGIN
            || pos.z - radius_z >= base_z + cs + EDGE_MARGIN
        {
            return;
        }

        let centre = self.before_gen(ctx, target.column, (pos.x - base_x, pos.z - base_z));

        let drawn = self.thickness.next_float(1.0, rand);
        let mut thickness = drawn as i32;
        if rand.next_float() < drawn - thickness as f32 {
            thickness += 1;
        }
        if thickness <= 0 {
            return;
        }

        let gen_surface =
            rand.next_float() <= self.gen_surface_block_chance && !self.surface_blocks.is_empty();

        let radius_sq_x = (radius_x * radius_x) as f32;
        let radius_sq_z = (radius_z * radius_z) as f32;
        let min_x = (pos.x - radius_x).max(base_x - EDGE_MARGIN);
        let max_x = (pos.x + radius_x).min(base_x + cs + EDGE_MARGIN);
        let min_z = (pos.z - radius_z).max(base_z - EDGE_MARGIN);
        let max_z = (pos.z + radius_z).min(base_z + cs + EDGE_MARGIN);

        for x in min_x..=max_x {
            let lx = x - base_x;
            let dx = (x - pos.x) as f32;
            let x_sq = dx * dx / radius_sq_x;

            for z in min_z..=max_z {
                let lz = z - base_z;
                let dz = (z - pos.z) as f32;
                let mut edge = 1.0 - (x_sq + dz * dz / radius_sq_z);
                if self.edge_distortion != 0.0 {
                    let n = self.distortion.sample(f64::from(x) / 8.0, f64::from(z) / 8.0) as f32;
                    edge += self.edge_distortion * (n - 0.5);
                }
                if edge < 0.0 || lx < 0 || lz < 0 || lx >= cs || lz >= cs {
                    continue;
                }

                let (top_y, layers) = self.load_y_and_thickness(
                    ctx,
                    target.column,
                    (lx, lz),
                    centre,
                    thickness,
                    edge,
                );
                if (top_y - centre.y).abs() as f32 > self.max_y_roughness {
                    continue;
                }

                // With `ignore_parent_test_per_block` only the first valid layer is tested.
                let mut host: Option<(BlockId, &ResolvedDepositBlock)> = None;
                let mut tested = false;
                for layer in 0..layers {
                    let y = top_y - layer;
                    if y <= 1 || y >= world_height {
                        continue;
                    }
                    let Some(current) = target.column.get(lx, y, lz) else {
                        continue;
                    };
                    if !self.ignore_parent_test_per_block || !tested {
                        host = self.place_blocks.get(&current).map(|r| (current, r));
                        tested = true;
                    }
                    let Some((host_id, resolved)) = host else {
                        if self.ignore_parent_test_per_block {
                            break;
                        }
                        continue;
                    };
                    let Some(place) = resolved.for_grade(grade) else {
                        continue;
                    };

                    let callback = self.with_block_callback
                        || (self.with_last_layer_block_callback && layer == layers - 1);
                    target.place(lx, y, lz, place, callback);

                    self.queue_children(ctx, target, IVec3::new(x, y, z));

                    if gen_surface {
                        self.place_surface(ctx, target, lx, y, lz, host_id);
                    }
                }
            }
        }
    }

    fn expected_yield(&self) -> f32 {
        let radius = self.radius.average();
        self.thickness.average() * radius * radius * PI * self.tries_per_chunk
    }

    fn rand(&self) -> &DepositRand {
        &self.rand
    }

    fn clone_box(&self) -> Box<dyn DepositGenerator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::config::WorldGenConfig;
    use crate::deposit::{DepositAttributes, DepositBlock};
    use crate::generator::{SubDepositQueue, VariantView};
    use crate::oremap::WorldRegions;
    use crate::world::{BlockPalette, BlockRegistry, PlacementLog};

    struct Fixture {
        ctx: GenContext,
        granite: BlockId,
        ore: BlockId,
        rand: DepositRand,
        distortion: Arc<dyn NoiseSampler>,
        kids: Arc<Vec<DepositVariant>>,
    }

    fn fixture() -> Fixture {
        let mut palette = BlockPalette::new();
        let granite = palette.solid("rock-granite");
        let ore = palette.solid("ore-galena-granite");
        palette.register("looseores-galena-granite", false);
        palette.solid("soil-loam");
        palette.register("sand-loose", false);
        palette.solid("ore-poor-galena-granite");
        palette.solid("ore-rich-galena-granite");
        let blocks: Arc<dyn BlockRegistry> = Arc::new(palette);
        Fixture {
            ctx: GenContext::new(WorldGenConfig::new(7), blocks),
            granite,
            ore,
            rand: DepositRand::new(7),
            distortion: Arc::new(|_x: f64, _z: f64| 0.5),
            kids: Arc::new(Vec::new()),
        }
    }

    fn attrs() -> DepositAttributes {
        DepositAttributes::new()
            .with_in_block(DepositBlock::new("rock-*").named("rock"))
            .with_place_block(DepositBlock::new("ore-galena-{rock}"))
            .with_radius(NatFloat::constant(5.0))
            .with_thickness(NatFloat::constant(2.0))
            .with_y(NatFloat::constant(0.25))
    }

    fn build(
        f: &Fixture,
        attrs: &DepositAttributes,
        shape: DiscShape,
        callback: bool,
    ) -> DiscDepositGenerator {
        let args = GeneratorArgs {
            variant: VariantView {
                code: "galena",
                source: "test",
                tries_per_chunk: 3.0,
                with_block_callback: callback,
                attributes: attrs,
                child_deposits: &f.kids,
                parent_in_block: None,
            },
            rand: &f.rand,
            distortion: &f.distortion,
            ctx: &f.ctx,
        };
        DiscDepositGenerator::new(&args, shape)
    }

    fn run(
        f: &Fixture,
        generator: &DiscDepositGenerator,
        column: &mut ChunkColumn,
        pos: IVec3,
    ) -> PlacementLog {
        run_seeded(f, generator, column, pos, 0)
    }

    fn run_seeded(
        f: &Fixture,
        generator: &DiscDepositGenerator,
        column: &mut ChunkColumn,
        pos: IVec3,
        seed_x: i32,
    ) -> PlacementLog {
        let regions = WorldRegions::new();
        let mut queue = SubDepositQueue::new();
        let mut log = PlacementLog::new();
        let mut target = ChunkTarget {
            column,
            chunk_x: 0,
            chunk_z: 0,
            accessor: &mut log,
            regions: &regions,
            sub_deposits: &mut queue,
        };
        f.rand.init_position_seed(seed_x, 0);
        generator.generate(&f.ctx, &mut target, pos);
        log
    }

    #[test]
    fn anywhere_disc_replaces_host_blocks() {
        let f = fixture();
        let generator = build(&f, &attrs(), DiscShape::Anywhere, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        run(&f, &generator, &mut column, IVec3::new(16, 0, 16));

        let placed = column.positions_of(f.ore);
        assert!(!placed.is_empty());
        // Centre y is 0.25 * 256 = 64; two layers around it.
        assert!(placed.iter().all(|p| (62..=66).contains(&p.y)));
        assert!(placed.iter().all(|p| (p.x - 16).abs() <= 7 && (p.z - 16).abs() <= 7));
    }

    #[test]
    fn follow_sealevel_places_below_sea_level() {
        let f = fixture();
        let attrs = attrs().with_y(NatFloat::constant(4.0));
        let generator = build(&f, &attrs, DiscShape::FollowSealevel, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        run(&f, &generator, &mut column, IVec3::new(10, 0, 10));

        let placed = column.positions_of(f.ore);
        assert!(!placed.is_empty());
        let sea = f.ctx.config.sea_level;
        assert!(placed.iter().all(|p| p.y == sea - 4 || p.y == sea - 5));
    }

    #[test]
    fn follow_surface_tracks_terrain() {
        let f = fixture();
        let attrs = attrs().with_y(NatFloat::constant(3.0));
        let generator = build(&f, &attrs, DiscShape::FollowSurface, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 150);
        run(&f, &generator, &mut column, IVec3::new(10, 0, 10));

        let placed = column.positions_of(f.ore);
        assert!(!placed.is_empty());
        assert!(placed.iter().all(|p| p.y == 147 || p.y == 146));
    }

    #[test]
    fn attempts_outside_the_chunk_change_nothing() {
        let f = fixture();
        let generator = build(&f, &attrs(), DiscShape::Anywhere, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        run(&f, &generator, &mut column, IVec3::new(500, 0, 500));
        assert_eq!(column.count(f.ore), 0);
    }

    #[test]
    fn callback_path_goes_through_accessor() {
        let f = fixture();
        let generator = build(&f, &attrs(), DiscShape::Anywhere, true);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        let log = run(&f, &generator, &mut column, IVec3::new(16, 0, 16));
        assert_eq!(column.count(f.ore), 0);
        assert!(!log.is_empty());
        assert!(log.placements().iter().all(|(_, id)| *id == f.ore));
    }

    #[test]
    fn zero_radius_consumes_only_the_radius_draw() {
        let f = fixture();
        let attrs = attrs().with_radius(NatFloat::zero());
        let generator = build(&f, &attrs, DiscShape::Anywhere, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        run(&f, &generator, &mut column, IVec3::new(16, 0, 16));

        let reference = DepositRand::new(7);
        reference.init_position_seed(0, 0);
        reference.next_float();
        assert_eq!(f.rand.next_float(), reference.next_float());
        assert_eq!(column.count(f.ore), 0);
    }

    #[test]
    fn missing_blocks_make_an_inert_generator() {
        let f = fixture();
        let attrs = DepositAttributes::new().with_radius(NatFloat::constant(5.0));
        let generator = build(&f, &attrs, DiscShape::Anywhere, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        run(&f, &generator, &mut column, IVec3::new(16, 0, 16));
        assert_eq!(column.count(f.granite), 32 * 32 * 201);
    }

    #[test]
    fn expected_yield_uses_averages() {
        let f = fixture();
        let generator = build(&f, &attrs(), DiscShape::Anywhere, false);
        let expected = 2.0 * 25.0 * PI * 3.0;
        assert!((generator.expected_yield() - expected).abs() < 1e-3);
        assert_eq!(generator.name(), "disc-anywhere");
    }

    fn block(f: &Fixture, code: &str) -> BlockId {
        f.ctx.blocks.block_id(code).expect("registered block")
    }

    fn ys(positions: &[IVec3]) -> BTreeSet<i32> {
        positions.iter().map(|p| p.y).collect()
    }

    fn cells(column: &ChunkColumn, id: BlockId) -> BTreeSet<[i32; 3]> {
        column
            .positions_of(id)
            .into_iter()
            .map(|p| p.to_array())
            .collect()
    }

    /// Three layers below sea level: y = 106, 105, 104.
    fn three_layers(ignore_parent_test: bool) -> DepositAttributes {
        let mut attrs = attrs()
            .with_y(NatFloat::constant(4.0))
            .with_thickness(NatFloat::constant(3.0));
        attrs.ignore_parent_test_per_block = ignore_parent_test;
        attrs
    }

    #[test]
    fn single_host_test_skips_columns_with_foreign_top() {
        let f = fixture();
        let soil = block(&f, "soil-loam");

        let generator = build(&f, &three_layers(true), DiscShape::FollowSealevel, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        column.fill_layer(106, soil);
        run(&f, &generator, &mut column, IVec3::new(10, 0, 10));
        assert_eq!(column.count(f.ore), 0);
        assert_eq!(column.count(soil), 32 * 32);

        // Testing every layer still reaches the host blocks below.
        let generator = build(&f, &three_layers(false), DiscShape::FollowSealevel, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        column.fill_layer(106, soil);
        run(&f, &generator, &mut column, IVec3::new(10, 0, 10));
        assert_eq!(ys(&column.positions_of(f.ore)), BTreeSet::from([104, 105]));
    }

    #[test]
    fn single_host_test_replaces_whole_column_after_top_match() {
        let f = fixture();
        let soil = block(&f, "soil-loam");
        let generator = build(&f, &three_layers(true), DiscShape::FollowSealevel, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        column.fill_layer(105, soil);
        run(&f, &generator, &mut column, IVec3::new(10, 0, 10));

        let placed = column.positions_of(f.ore);
        assert_eq!(ys(&placed), BTreeSet::from([104, 105, 106]));
        assert!(column.count(soil) < 32 * 32);
    }

    #[test]
    fn last_layer_goes_through_accessor() {
        let f = fixture();
        let mut attrs = attrs()
            .with_y(NatFloat::constant(4.0))
            .with_thickness(NatFloat::constant(2.0));
        attrs.with_last_layer_block_callback = true;
        let generator = build(&f, &attrs, DiscShape::FollowSealevel, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        let log = run(&f, &generator, &mut column, IVec3::new(10, 0, 10));

        assert_eq!(ys(&column.positions_of(f.ore)), BTreeSet::from([106]));
        assert!(!log.is_empty());
        assert!(log.placements().iter().all(|(p, id)| p.y == 105 && *id == f.ore));
    }

    #[test]
    fn rough_cells_are_skipped() {
        let f = fixture();
        let terrain = |column: &mut ChunkColumn| {
            // A 10 block step at x = 10 under the disc centre.
            for lz in 0..32 {
                for lx in 10..32 {
                    let i = column.index2d(lx, lz);
                    column.terrain_height_map[i] = 140;
                }
            }
        };
        let surface = |roughness: f32| {
            attrs()
                .with_y(NatFloat::constant(3.0))
                .with_thickness(NatFloat::constant(1.0))
                .with_max_y_roughness(roughness)
        };

        let generator = build(&f, &surface(2.0), DiscShape::FollowSurface, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 150);
        terrain(&mut column);
        run(&f, &generator, &mut column, IVec3::new(10, 0, 10));
        let placed = column.positions_of(f.ore);
        assert!(!placed.is_empty());
        assert!(placed.iter().all(|p| p.x >= 10 && p.y == 137));

        let generator = build(&f, &surface(999.0), DiscShape::FollowSurface, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 150);
        terrain(&mut column);
        run(&f, &generator, &mut column, IVec3::new(10, 0, 10));
        assert_eq!(ys(&column.positions_of(f.ore)), BTreeSet::from([137, 147]));
    }

    #[test]
    fn edge_distortion_widens_the_footprint() {
        let mut f = fixture();
        f.distortion = Arc::new(|_x: f64, _z: f64| 1.0);
        let flat = three_layers(false);
        let distorted = three_layers(false).with_edge_distortion(2.0);

        let generator = build(&f, &flat, DiscShape::FollowSealevel, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        run(&f, &generator, &mut column, IVec3::new(16, 0, 16));
        let plain = cells(&column, f.ore);

        let generator = build(&f, &distorted, DiscShape::FollowSealevel, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
        run(&f, &generator, &mut column, IVec3::new(16, 0, 16));
        let wide = cells(&column, f.ore);

        assert!(!plain.is_empty());
        assert!(plain.is_subset(&wide));
        assert!(wide.len() > plain.len());
        assert!(wide.iter().all(|p| (p[0] - 16).abs() <= 6 && (p[2] - 16).abs() <= 6));
    }

    #[test]
    fn one_attempt_uses_a_single_grade() {
        let f = fixture();
        let attrs = attrs().with_place_block(
            DepositBlock::new("ore-{grade}-galena-{rock}").with_grades(["poor", "rich"]),
        );
        let generator = build(&f, &attrs, DiscShape::Anywhere, false);
        let poor = block(&f, "ore-poor-galena-granite");
        let rich = block(&f, "ore-rich-galena-granite");

        let mut grades_seen = [false; 2];
        for seed_x in 0..20 {
            let mut column = ChunkColumn::filled(32, 256, f.granite, 200);
            run_seeded(&f, &generator, &mut column, IVec3::new(16, 0, 16), seed_x);
            let (p, r) = (column.count(poor), column.count(rich));
            assert!(p + r > 0);
            assert!(p == 0 || r == 0, "attempt mixed grades: {p} poor, {r} rich");
            grades_seen[0] |= p > 0;
            grades_seen[1] |= r > 0;
        }
        assert_eq!(grades_seen, [true, true]);
    }

    fn decorated(f: &Fixture, depth: f32, prepare: impl Fn(&mut ChunkColumn)) -> Vec<IVec3> {
        let attrs = attrs()
            .with_surface_block(DepositBlock::new("looseores-galena-{rock}"))
            .with_surface_block_chance(1.0)
            .with_y(NatFloat::constant(depth))
            .with_thickness(NatFloat::constant(1.0));
        let generator = build(f, &attrs, DiscShape::FollowSurface, false);
        let mut column = ChunkColumn::filled(32, 256, f.granite, 150);
        prepare(&mut column);
        run(f, &generator, &mut column, IVec3::new(16, 0, 16));
        column.positions_of(block(f, "looseores-galena-granite"))
    }

    #[test]
    fn surface_decoration_sits_on_top_of_the_surface() {
        let f = fixture();
        let found = decorated(&f, 1.0, |_| {});
        assert!(!found.is_empty());
        assert!(found.iter().all(|p| p.y == 151));
    }

    #[test]
    fn surface_decoration_is_guarded() {
        let f = fixture();
        let sand = block(&f, "sand-loose");
        assert!(decorated(&f, 12.0, |_| {}).is_empty());
        assert!(decorated(&f, 1.0, |column| column.fill_layer(150, sand)).is_empty());
        assert!(decorated(&f, 1.0, |column| column.fill_layer(151, f.granite)).is_empty());
    }
}
