#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, render_cross_section_to_png, render_ore_map_to_png, render_top_view_to_png,
    RenderConfig,
};
