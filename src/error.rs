use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid region: x [{x_min}, {x_max}), y [{y_min}, {y_max})")]
    InvalidRegion {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "gui")]
    #[error("window error: {0}")]
    Window(#[from] winit::error::OsError),

    #[cfg(feature = "gui")]
    #[error("pixel buffer error: {0}")]
    Pixels(#[from] pixels::Error),

    #[error("sampler worker disconnected")]
    WorkerDisconnected,

    #[error("failed to join row bands: {0}")]
    Join(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
