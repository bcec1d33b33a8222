use std::path::PathBuf;
use std::process::ExitCode;

use image::RgbImage;
use structopt::StructOpt;
use tracing::error;

use mandelheat::config::{RenderConfig, DEFAULT_OUTPUT};
use mandelheat::coord::Viewport;
use mandelheat::error::Result;
use mandelheat::painter::ColormapName;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mandelheat-imagegen",
    about = "Render the Mandelbrot escape-time grid as a heatmap"
)]
struct Opt {
    #[structopt(long, default_value = "800")]
    width: usize,
    #[structopt(long, default_value = "800")]
    height: usize,
    #[structopt(long, default_value = "-2.0", allow_hyphen_values = true)]
    x_min: f64,
    #[structopt(long, default_value = "1.0", allow_hyphen_values = true)]
    x_max: f64,
    #[structopt(long, default_value = "-1.5", allow_hyphen_values = true)]
    y_min: f64,
    #[structopt(long, default_value = "1.5", allow_hyphen_values = true)]
    y_max: f64,
    #[structopt(long, default_value = "1000")]
    max_iter: u32,
    /// inferno, viridis, greyscale or rainbow
    #[structopt(long, default_value = "inferno")]
    colormap: ColormapName,
    /// Worker threads, 0 for single-threaded
    #[structopt(long, default_value = "0")]
    threads: usize,
    #[structopt(long, default_value = "Mandelbrot Set")]
    title: String,
    /// Save the figure as PNG
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
    /// Do not open a window
    #[structopt(long)]
    no_window: bool,
}

impl From<Opt> for RenderConfig {
    fn from(opt: Opt) -> Self {
        let window = cfg!(feature = "gui") && !opt.no_window;
        Self {
            width: opt.width,
            height: opt.height,
            region: Viewport::from_bounds(opt.x_min, opt.x_max, opt.y_min, opt.y_max),
            max_iter: opt.max_iter,
            colormap: opt.colormap,
            threads: opt.threads,
            title: opt.title,
            output: opt.output.or_else(|| {
                if window {
                    None
                } else {
                    Some(PathBuf::from(DEFAULT_OUTPUT))
                }
            }),
            window,
        }
    }
}

#[cfg(feature = "gui")]
fn show(img: RgbImage, title: &str) -> Result<()> {
    mandelheat::window::show(img, title)
}

#[cfg(not(feature = "gui"))]
fn show(_img: RgbImage, _title: &str) -> Result<()> {
    Ok(())
}

fn run(config: &RenderConfig) -> Result<()> {
    let img = mandelheat::render(config)?;
    if config.window {
        show(img, &config.title)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let config: RenderConfig = Opt::from_args().into();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
