use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ore_deposits::prelude::*;

struct CountingLayer {
    calls: Arc<AtomicUsize>,
}

impl OreMapLayer for CountingLayer {
    fn gen_layer(&self, x: i32, z: i32, size_x: usize, size_z: usize) -> Vec<u8> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut out = Vec::with_capacity(size_x * size_z);
        for dz in 0..size_z as i32 {
            for dx in 0..size_x as i32 {
                out.push(((x + dx) * 7 + (z + dz) * 13).rem_euclid(256) as u8);
            }
        }
        out
    }
}

fn context() -> GenContext {
    let mut palette = BlockPalette::new();
    palette.solid("rock-granite");
    GenContext::new(WorldGenConfig::new(21), Arc::new(palette))
}

fn initialized(variant: DepositVariant, ctx: &GenContext) -> DepositVariant {
    let mut variant = variant;
    let distortion: Arc<dyn NoiseSampler> = Arc::new(|_x: f64, _z: f64| 0.5);
    variant.initialize(
        ctx,
        &GeneratorRegistry::with_builtin(),
        &DepositRand::new(21),
        &distortion,
        &mut (),
    );
    variant
}

#[test]
fn populating_twice_keeps_the_first_map() {
    let ctx = context();
    let calls = Arc::new(AtomicUsize::new(0));
    let variant = initialized(
        DepositVariant::from_config(
            DepositVariantConfig::new("cassiterite")
                .with_generator("disc-followsurface")
                .with_ore_map(true),
        )
        .with_ore_map_layer(Arc::new(CountingLayer {
            calls: Arc::clone(&calls),
        })),
        &ctx,
    );

    let mut region = MapRegion::new();
    assert_eq!(variant.populate_region_field(&ctx, &mut region, 2, -1), 1);
    let first = region.ore_map("cassiterite").cloned().expect("map");
    assert_eq!(variant.populate_region_field(&ctx, &mut region, 2, -1), 0);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(region.ore_map("cassiterite"), Some(&first));
    assert_eq!(first.data().len(), 33 * 33);
    // The grid starts at the region origin in cell coordinates.
    assert_eq!(first.get(0, 0), ((2_i32 * 32) * 7 + (-32) * 13).rem_euclid(256) as u8);
}

#[test]
fn field_factor_is_within_unit_range() {
    let ctx = context();
    let variant = initialized(
        DepositVariant::from_config(
            DepositVariantConfig::new("cassiterite")
                .with_generator("disc-followsurface")
                .with_ore_map(true),
        ),
        &ctx,
    );

    let mut regions = WorldRegions::new();
    for (rx, rz) in [(0, 0), (-1, 0), (0, -1), (-1, -1)] {
        variant.populate_region_field(&ctx, regions.get_or_create(rx, rz), rx, rz);
    }

    for chunk_x in -16..16 {
        for chunk_z in -16..16 {
            let factor = variant.sample_field_factor(&ctx, &regions, chunk_x, chunk_z);
            assert!((0.0..=1.0).contains(&factor), "factor {factor} out of range");
        }
    }
    assert_eq!(variant.sample_field_factor(&ctx, &regions, 16, 0), 0.0);
    assert_eq!(variant.sample_field_factor(&ctx, &regions, 0, -17), 0.0);
}

#[test]
fn system_populates_children_too() {
    let mut palette = BlockPalette::new();
    palette.solid("rock-granite");
    let system = DepositSystem::new(
        WorldGenConfig::new(3),
        &GeneratorRegistry::with_builtin(),
        Arc::new(palette),
        vec![DepositVariantConfig::new("galena")
            .with_generator("disc-anywhere")
            .with_ore_map(true)
            .with_child(
                DepositVariantConfig::new("sphalerite")
                    .with_generator("childdeposit")
                    .with_ore_map(true),
            )],
    )
    .expect("valid config");

    let mut regions = WorldRegions::new();
    let created = system.on_map_region_gen(regions.get_or_create(0, 0), 0, 0, &mut ());
    assert_eq!(created, 2);
    let region = regions.get(0, 0).expect("region");
    assert_eq!(region.codes(), vec!["galena", "sphalerite"]);
}

#[test]
fn cloned_variants_share_stream_and_children() {
    let ctx = context();
    let variant = initialized(
        DepositVariant::from_config(
            DepositVariantConfig::new("galena")
                .with_generator("disc-anywhere")
                .with_child(DepositVariantConfig::new("quartz").with_generator("childdeposit")),
        ),
        &ctx,
    );
    let mut copy = variant.clone();
    copy.climate_mut().min_rain = 0.7;
    copy.attributes_mut().max_y_roughness = 2.0;

    assert_eq!(variant.climate().min_rain, 0.0);
    assert_eq!(variant.attributes().max_y_roughness, 999.0);
    assert!(variant.shares_children_with(&copy));

    let a = variant.generator().expect("generator").rand();
    let b = copy.generator().expect("generator").rand();
    assert!(a.shares_stream_with(b));

    // Draws through one handle advance the other.
    a.init_position_seed(4, 4);
    let first = a.next_float();
    b.init_position_seed(4, 4);
    assert_eq!(b.next_float(), first);
}

#[cfg(feature = "serde")]
#[test]
fn nested_config_deserializes() {
    let json = r#"{
        "code": "galena",
        "tries_per_chunk": 0.25,
        "generator": "disc-followsurface",
        "with_ore_map": true,
        "attributes": {
            "in_block": { "code": "rock-*", "name": "rock" },
            "place_block": { "code": "ore-{grade}-galena-{rock}", "allowed_variants": ["poor", "rich"] },
            "radius": { "avg": 8.0, "var": 3.0, "dist": "gaussian" },
            "thickness": { "avg": 2.0, "var": 0.5 }
        },
        "climate": { "min_temp": -10.0 },
        "child_deposits": [
            { "code": "quartz", "generator": "childdeposit", "tries_per_chunk": 5.0 }
        ]
    }"#;

    let config: DepositVariantConfig = serde_json::from_str(json).expect("valid json");
    assert_eq!(config.code.as_deref(), Some("galena"));
    assert_eq!(config.climate.min_temp, -10.0);
    assert_eq!(config.climate.max_temp, 50.0);
    assert_eq!(config.attributes.surface_block_chance, 0.05);
    let radius = config.attributes.radius.expect("radius");
    assert_eq!(radius.dist, Distribution::Gaussian);
    assert_eq!(
        config
            .attributes
            .place_block
            .as_ref()
            .map(|b| b.max_grade()),
        Some(2)
    );
    assert_eq!(config.child_deposits.len(), 1);
    assert_eq!(config.child_deposits[0].tries_per_chunk, 5.0);
}
