use std::sync::Arc;
use std::time::Duration;

use criterion::{Criterion, Throughput};
use ore_deposits::prelude::*;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Granite world with one graded ore per rock.
#[allow(dead_code)]
pub fn palette() -> (Arc<dyn BlockRegistry>, BlockId) {
    let mut palette = BlockPalette::new();
    let granite = palette.solid("rock-granite");
    palette.solid("ore-poor-galena-granite");
    palette.solid("ore-rich-galena-granite");
    palette.solid("ore-quartz-granite");
    palette.register("looseores-galena-granite", false);
    (Arc::new(palette), granite)
}

/// A surface-following disc deposit with a child deposit.
#[allow(dead_code)]
pub fn galena(radius: f32) -> DepositVariantConfig {
    DepositVariantConfig::new("galena")
        .with_generator("disc-followsurface")
        .with_tries_per_chunk(4.0)
        .with_attributes(
            DepositAttributes::new()
                .with_in_block(DepositBlock::new("rock-*").named("rock"))
                .with_place_block(
                    DepositBlock::new("ore-{grade}-galena-{rock}").with_grades(["poor", "rich"]),
                )
                .with_surface_block(DepositBlock::new("looseores-galena-{rock}"))
                .with_radius(NatFloat::uniform(radius, radius * 0.25))
                .with_thickness(NatFloat::uniform(2.0, 1.0))
                .with_y(NatFloat::uniform(12.0, 6.0)),
        )
        .with_child(
            DepositVariantConfig::new("quartz")
                .with_generator("childdeposit")
                .with_tries_per_chunk(10.0)
                .with_attributes(
                    DepositAttributes::new()
                        .with_place_block(DepositBlock::new("ore-quartz-{rock}"))
                        .with_radius(NatFloat::uniform(4.0, 1.0))
                        .with_random_tries(NatFloat::uniform(6.0, 2.0)),
                ),
        )
}
