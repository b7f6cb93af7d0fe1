use std::collections::BTreeMap;
use std::sync::Arc;

use glam::IVec3;
use ore_deposits::prelude::*;
use ore_deposits_examples::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut palette = BlockPalette::new();
    let basalt = palette.solid("rock-basalt");
    palette.solid("ore-olivine-basalt");
    palette.solid("ore-chromite-basalt");

    let config = WorldGenConfig::new(99);
    let system = DepositSystem::new(
        config.clone(),
        &GeneratorRegistry::with_builtin(),
        Arc::new(palette),
        vec![DepositVariantConfig::new("olivine")
            .with_generator("disc-anywhere")
            .with_tries_per_chunk(1.5)
            .with_climate(ClimateConditions::default().with_temperature(-5.0, 25.0))
            .with_attributes(
                DepositAttributes::new()
                    .with_in_block(DepositBlock::new("rock-*").named("rock"))
                    .with_place_block(DepositBlock::new("ore-olivine-{rock}")),
            )
            .with_child(
                DepositVariantConfig::new("chromite")
                    .with_generator("childdeposit")
                    .with_tries_per_chunk(6.0)
                    .with_attributes(
                        DepositAttributes::new()
                            .with_place_block(DepositBlock::new("ore-chromite-{rock}")),
                    ),
            )],
    )?;

    for (code, expected) in system.expected_yields() {
        println!("{code:>10}: ~{expected:.0} blocks per chunk");
    }

    // Temperature falls off towards +z so the climate filter rejects the far rows.
    let climate = |_x: i32, z: i32| Climate::new(25.0 - z as f32 / 12.0, 0.5);
    let mut per_code: BTreeMap<String, usize> = BTreeMap::new();
    let mut rejected = 0usize;
    let mut deepest = IVec3::MAX;
    let mut sink = FnSink::new(|event| match event {
        DepositEvent::AttemptMade { code, .. } => *per_code.entry(code).or_default() += 1,
        DepositEvent::ClimateRejected { .. } => rejected += 1,
        DepositEvent::SubDepositGenerated { code, pos } => {
            *per_code.entry(code).or_default() += 1;
            if pos.y < deepest.y {
                deepest = pos;
            }
        }
        _ => {}
    });

    let mut totals = ChunkDepositReport::default();
    for chunk_z in 0..16 {
        for chunk_x in 0..8 {
            let mut column =
                ChunkColumn::filled(config.chunk_size, config.world_height, basalt, 110);
            let report = system.on_chunk_column_gen(
                &mut column,
                chunk_x,
                chunk_z,
                &WorldRegions::new(),
                &climate,
                &mut (),
                &mut sink,
            );
            totals.attempts += report.attempts;
            totals.climate_rejections += report.climate_rejections;
            totals.sub_deposits += report.sub_deposits;
        }
    }
    drop(sink);

    println!("{totals:?}");
    for (code, count) in &per_code {
        println!("{code:>10}: {count} generated");
    }
    println!("climate rejections seen by sink: {rejected}");
    if deepest != IVec3::MAX {
        println!("deepest sub-deposit: {deepest}");
    }
    Ok(())
}
