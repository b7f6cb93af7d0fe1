use std::sync::Arc;

use ore_deposits::prelude::*;
use ore_deposits_examples::{init_tracing, render_ore_map_to_png};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut palette = BlockPalette::new();
    palette.solid("rock-andesite");
    palette.solid("ore-malachite-andesite");

    let config = WorldGenConfig::new(1234).with_ore_map_scale(8);
    let system = DepositSystem::new(
        config.clone(),
        &GeneratorRegistry::with_builtin(),
        Arc::new(palette),
        vec![DepositVariantConfig::new("malachite")
            .with_generator("disc-followsealevel")
            .with_tries_per_chunk(0.5)
            .with_ore_map(true)
            .with_attributes(
                DepositAttributes::new()
                    .with_in_block(DepositBlock::new("rock-*").named("rock"))
                    .with_place_block(DepositBlock::new("ore-malachite-{rock}")),
            )],
    )?;
    let variant = system
        .variant("malachite")
        .ok_or_else(|| anyhow::anyhow!("variant 'malachite' missing"))?;

    let mut regions = WorldRegions::new();
    let mut created = Vec::new();
    let mut sink = FnSink::new(|event| {
        if let DepositEvent::RegionPopulated { codes, .. } = event {
            created.extend(codes);
        }
    });
    for (rx, rz) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        system.on_map_region_gen(regions.get_or_create(rx, rz), rx, rz, &mut sink);
        if let Some(map) = regions.get(rx, rz).and_then(|r| r.ore_map("malachite")) {
            render_ore_map_to_png(map, 8, [60, 200, 120], format!("oremap-density-{rx}-{rz}.png"))?;
        }
    }
    drop(sink);
    tracing::info!("Created {} ore maps.", created.len());

    // Coarse chunk-level view of the factor across the four regions.
    let chunks = config.region_chunk_size() * 2;
    for chunk_z in (0..chunks).step_by(4) {
        let row: String = (0..chunks)
            .step_by(2)
            .map(|chunk_x| {
                let f = variant.sample_field_factor(system.context(), &regions, chunk_x, chunk_z);
                match (f * 4.0) as u8 {
                    0 => ' ',
                    1 => '.',
                    2 => 'o',
                    _ => '#',
                }
            })
            .collect();
        println!("|{row}|");
    }
    Ok(())
}
