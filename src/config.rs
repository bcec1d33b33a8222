use std::path::PathBuf;

use crate::coord::Viewport;
use crate::error::{Error, Result};
use crate::painter::ColormapName;

pub const DEFAULT_WIDTH: usize = 800;
pub const DEFAULT_HEIGHT: usize = 800;
pub const DEFAULT_MAX_ITER: u32 = 1000;
pub const DEFAULT_TITLE: &str = "Mandelbrot Set";
pub const DEFAULT_OUTPUT: &str = "mandelbrot.png";

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub region: Viewport,
    pub max_iter: u32,
    pub colormap: ColormapName,
    /// Worker threads; 0 samples on the calling thread.
    pub threads: usize,
    pub title: String,
    /// PNG destination, if any.
    pub output: Option<PathBuf>,
    /// Show the figure in a window; needs the `gui` feature.
    pub window: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            region: Viewport::default(),
            max_iter: DEFAULT_MAX_ITER,
            colormap: ColormapName::default(),
            threads: 0,
            title: DEFAULT_TITLE.to_string(),
            output: if cfg!(feature = "gui") {
                None
            } else {
                Some(PathBuf::from(DEFAULT_OUTPUT))
            },
            window: cfg!(feature = "gui"),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let r = &self.region;
        let finite = [r.x.min, r.x.max, r.y.min, r.y.max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || !r.is_valid() {
            return Err(Error::InvalidRegion {
                x_min: r.x.min,
                x_max: r.x.max,
                y_min: r.y.min,
                y_max: r.y.max,
            });
        }
        Ok(())
    }
}
