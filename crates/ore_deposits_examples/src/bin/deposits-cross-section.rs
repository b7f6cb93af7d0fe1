use std::sync::Arc;

use ore_deposits::prelude::*;
use ore_deposits_examples::{
    init_tracing, render_cross_section_to_png, render_top_view_to_png, RenderConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 0x5EED;
const SURFACE: i32 = 120;

struct Palette {
    blocks: Arc<dyn BlockRegistry>,
    granite: BlockId,
    colors: Vec<(BlockId, [u8; 3])>,
}

fn build_palette() -> Palette {
    let mut palette = BlockPalette::new();
    let granite = palette.solid("rock-granite");
    let colors = vec![
        (granite, [96, 96, 104]),
        (palette.solid("ore-poor-galena-granite"), [150, 160, 190]),
        (palette.solid("ore-rich-galena-granite"), [90, 110, 200]),
        (palette.solid("ore-quartz-granite"), [240, 240, 230]),
        (palette.solid("ore-cassiterite-granite"), [170, 90, 40]),
        (palette.register("looseores-galena-granite", false), [250, 210, 60]),
    ];
    Palette {
        blocks: Arc::new(palette),
        granite,
        colors,
    }
}

fn deposits() -> Vec<DepositVariantConfig> {
    let galena = DepositVariantConfig::new("galena")
        .with_generator("disc-followsurface")
        .with_tries_per_chunk(3.0)
        .with_attributes(
            DepositAttributes::new()
                .with_in_block(DepositBlock::new("rock-*").named("rock"))
                .with_place_block(
                    DepositBlock::new("ore-{grade}-galena-{rock}").with_grades(["poor", "rich"]),
                )
                .with_surface_block(DepositBlock::new("looseores-galena-{rock}"))
                .with_surface_block_chance(0.5)
                .with_radius(NatFloat::uniform(9.0, 3.0))
                .with_thickness(NatFloat::uniform(3.0, 1.0))
                .with_y(NatFloat::uniform(10.0, 4.0))
                .with_edge_distortion(0.4),
        )
        .with_child(
            DepositVariantConfig::new("quartz")
                .with_generator("childdeposit")
                .with_tries_per_chunk(12.0)
                .with_attributes(
                    DepositAttributes::new()
                        .with_place_block(DepositBlock::new("ore-quartz-{rock}"))
                        .with_radius(NatFloat::uniform(4.0, 1.0))
                        .with_random_tries(NatFloat::uniform(10.0, 3.0)),
                ),
        );

    let cassiterite = DepositVariantConfig::new("cassiterite")
        .with_generator("disc-anywhere")
        .with_tries_per_chunk(2.0)
        .with_attributes(
            DepositAttributes::new()
                .with_in_block(DepositBlock::new("rock-*").named("rock"))
                .with_place_block(DepositBlock::new("ore-cassiterite-{rock}"))
                .with_radius(NatFloat::uniform(6.0, 2.0))
                .with_thickness(NatFloat::uniform(2.0, 1.0))
                .with_y(NatFloat::uniform(0.25, 0.15)),
        );

    vec![galena, cassiterite]
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let palette = build_palette();
    let config = WorldGenConfig::new(SEED);
    let system = DepositSystem::new(
        config.clone(),
        &GeneratorRegistry::with_builtin(),
        Arc::clone(&palette.blocks),
        deposits(),
    )?;

    // Slightly uneven terrain so surface-following discs have something to follow.
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut column = ChunkColumn::filled(
        config.chunk_size,
        config.world_height,
        palette.granite,
        SURFACE,
    );
    for h in column.terrain_height_map.iter_mut() {
        *h -= (rng.next_u32() % 4) as u16;
    }

    let report = system.on_chunk_column_gen(
        &mut column,
        0,
        0,
        &WorldRegions::new(),
        &Climate::new(14.0, 0.6),
        &mut (),
        &mut (),
    );
    tracing::info!(
        "Chunk (0, 0): {} attempts, {} sub-deposits.",
        report.attempts,
        report.sub_deposits
    );

    let mut rc = RenderConfig::new(6).with_background([214, 230, 244]);
    for &(id, color) in &palette.colors {
        rc.set_block_color(id, color);
    }
    for lz in [8, 16, 24] {
        render_cross_section_to_png(
            &column,
            lz,
            SURFACE + 8,
            &rc,
            format!("deposits-cross-section-z{lz}.png"),
        )?;
    }

    // Top view hides host rock so buried ores show through.
    let mut top = RenderConfig::new(12).with_fallback([40, 40, 48]);
    for &(id, color) in palette.colors.iter().skip(1) {
        top.set_block_color(id, color);
    }
    render_top_view_to_png(&column, &top, "deposits-cross-section-top.png")?;
    Ok(())
}
