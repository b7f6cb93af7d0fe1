use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use image::{ImageBuffer, Rgb, RgbImage};
use ore_deposits::prelude::*;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a console subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_level(true))
        .try_init();
}

/// Pixel scale and per-block colours for column renders.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub pixel_size: u32,
    pub background: [u8; 3],
    pub fallback: [u8; 3],
    colors: HashMap<BlockId, [u8; 3]>,
}

impl RenderConfig {
    pub fn new(pixel_size: u32) -> Self {
        Self {
            pixel_size: pixel_size.max(1),
            background: [214, 230, 244],
            fallback: [120, 120, 120],
            colors: HashMap::new(),
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_fallback(mut self, fallback: [u8; 3]) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn set_block_color(&mut self, id: BlockId, color: [u8; 3]) {
        self.colors.insert(id, color);
    }

    fn color_of(&self, id: BlockId) -> [u8; 3] {
        if id.is_air() {
            return self.background;
        }
        self.colors.get(&id).copied().unwrap_or(self.fallback)
    }
}

fn fill_cell(img: &mut RgbImage, px: u32, py: u32, size: u32, color: [u8; 3]) {
    for dy in 0..size {
        for dx in 0..size {
            img.put_pixel(px * size + dx, py * size + dy, Rgb(color));
        }
    }
}

fn save(img: &RgbImage, path: &Path) -> anyhow::Result<()> {
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("Wrote '{}'.", path.display());
    Ok(())
}

/// Render the X/Y slice at `lz` up to `max_y`, world bottom at the image bottom.
pub fn render_cross_section_to_png(
    column: &ChunkColumn,
    lz: i32,
    max_y: i32,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let size = column.chunk_size();
    let height = max_y.clamp(1, column.world_height());
    let s = config.pixel_size;
    let mut img: RgbImage = ImageBuffer::new(size as u32 * s, height as u32 * s);

    for y in 0..height {
        for lx in 0..size {
            let color = column
                .get(lx, y, lz)
                .map(|id| config.color_of(id))
                .unwrap_or(config.background);
            fill_cell(&mut img, lx as u32, (height - 1 - y) as u32, s, color);
        }
    }
    save(&img, path.as_ref())
}

/// Top-down view showing the highest coloured block of every cell column.
pub fn render_top_view_to_png(
    column: &ChunkColumn,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let size = column.chunk_size();
    let s = config.pixel_size;
    let mut img: RgbImage = ImageBuffer::new(size as u32 * s, size as u32 * s);

    for lz in 0..size {
        for lx in 0..size {
            let color = (0..column.world_height())
                .rev()
                .filter_map(|y| column.get(lx, y, lz))
                .find(|id| config.colors.contains_key(id))
                .map(|id| config.color_of(id))
                .unwrap_or(config.fallback);
            fill_cell(&mut img, lx as u32, lz as u32, s, color);
        }
    }
    save(&img, path.as_ref())
}

/// Ore map density scaled onto `tint`.
pub fn render_ore_map_to_png(
    map: &OreMap,
    pixel_size: u32,
    tint: [u8; 3],
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let n = map.size() as u32;
    let s = pixel_size.max(1);
    let mut img: RgbImage = ImageBuffer::new(n * s, n * s);

    for z in 0..map.size() {
        for x in 0..map.size() {
            let t = map.get(x, z) as f32 / 255.0;
            let color = tint.map(|c| (c as f32 * t) as u8);
            fill_cell(&mut img, x as u32, z as u32, s, color);
        }
    }
    save(&img, path.as_ref())
}
