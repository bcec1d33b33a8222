use std::time::Instant;

use image::RgbImage;
use tracing::info;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::figure::Figure;
use crate::grid::IterationGrid;
use crate::threads::make_sampler;

pub mod bench;
pub mod complex;
pub mod config;
pub mod coord;
pub mod error;
pub mod escape;
pub mod figure;
pub mod grid;
pub mod painter;
pub mod sampler;
pub mod text;
pub mod threads;
#[cfg(feature = "gui")]
pub mod window;

pub use complex::ComplexPoint;
pub use coord::{Axis, Viewport};
pub use error::Error;
pub use escape::{escape_time, EscapeTime};
pub use sampler::{sample, GridSampler, Sampler};

/// Sample the grid described by `config`.
pub fn compute(config: &RenderConfig) -> Result<IterationGrid> {
    config.validate()?;
    let sampler = make_sampler(config.threads);
    let start = Instant::now();
    let grid = sampler.sample(config.width, config.height, &config.region, config.max_iter)?;
    info!(
        width = grid.width(),
        height = grid.height(),
        max_iter = grid.max_iter(),
        threads = config.threads,
        interior = grid.interior_count(),
        min = ?grid.min(),
        max = ?grid.max(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "mandelbrot grid computed"
    );
    Ok(grid)
}

/// Sample and draw the figure described by `config`, saving it if an output is set.
pub fn render(config: &RenderConfig) -> Result<RgbImage> {
    let grid = compute(config)?;
    let fig = Figure::with_title(&config.title);
    let img = fig.render(&grid, &config.region, config.colormap);
    if let Some(path) = &config.output {
        fig.save(&img, path)?;
    }
    Ok(img)
}
