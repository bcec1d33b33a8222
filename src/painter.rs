use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbImage};

use crate::error::Error;
use crate::grid::IterationGrid;

/// Maps a normalized value in `[0, 1]` to a color.
pub trait Colormap {
    fn color(&self, frac: f64) -> Rgb<u8>;
}

fn mix(a: u8, b: u8, frac: f64) -> u8 {
    let af = a as f64;
    let bf = b as f64;
    let m = af * (1.0 - frac) + bf * frac;
    f64::round(m) as u8
}

fn interpolate(stops: &[[u8; 3]], frac: f64) -> Rgb<u8> {
    let frac = if frac.is_nan() { 0.0 } else { frac.clamp(0.0, 1.0) };
    let last = stops.len() - 1;
    let pos = frac * last as f64;
    let n = (pos.floor() as usize).min(last);
    let rgb1 = stops[n];
    let rgb2 = stops[(n + 1).min(last)];
    let frac = pos - n as f64;
    Rgb([
        mix(rgb1[0], rgb2[0], frac),
        mix(rgb1[1], rgb2[1], frac),
        mix(rgb1[2], rgb2[2], frac),
    ])
}

const INFERNO: [[u8; 3]; 9] = [
    [0x00, 0x00, 0x04],
    [0x1f, 0x0c, 0x48],
    [0x55, 0x0f, 0x6d],
    [0x88, 0x22, 0x6a],
    [0xba, 0x36, 0x55],
    [0xe3, 0x59, 0x33],
    [0xf9, 0x8c, 0x0a],
    [0xf9, 0xc9, 0x32],
    [0xfc, 0xff, 0xa4],
];

const VIRIDIS: [[u8; 3]; 9] = [
    [0x44, 0x01, 0x54],
    [0x47, 0x2c, 0x7a],
    [0x3b, 0x51, 0x8b],
    [0x2c, 0x71, 0x8e],
    [0x21, 0x90, 0x8d],
    [0x27, 0xad, 0x81],
    [0x5c, 0xc8, 0x63],
    [0xaa, 0xdc, 0x32],
    [0xfd, 0xe7, 0x25],
];

const RAINBOW: [[u8; 3]; 10] = [
    [0xbe, 0x0a, 0xff],
    [0x58, 0x0a, 0xff],
    [0x14, 0x7d, 0xf5],
    [0x0a, 0xef, 0xff],
    [0x0a, 0xff, 0x99],
    [0xa1, 0xff, 0x0a],
    [0xde, 0xff, 0x0a],
    [0xff, 0xd3, 0x00],
    [0xff, 0x87, 0x00],
    [0xff, 0x00, 0x00],
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ColormapName {
    #[default]
    Inferno,
    Viridis,
    Greyscale,
    Rainbow,
}

impl Colormap for ColormapName {
    fn color(&self, frac: f64) -> Rgb<u8> {
        match self {
            Self::Inferno => interpolate(&INFERNO, frac),
            Self::Viridis => interpolate(&VIRIDIS, frac),
            Self::Greyscale => interpolate(&[[0, 0, 0], [0xff, 0xff, 0xff]], frac),
            Self::Rainbow => interpolate(&RAINBOW, frac),
        }
    }
}

impl FromStr for ColormapName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inferno" => Ok(Self::Inferno),
            "viridis" => Ok(Self::Viridis),
            "greyscale" | "grayscale" | "grey" | "gray" => Ok(Self::Greyscale),
            "rainbow" => Ok(Self::Rainbow),
            _ => Err(Error::UnknownColormap(s.to_string())),
        }
    }
}

impl fmt::Display for ColormapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Inferno => "inferno",
            Self::Viridis => "viridis",
            Self::Greyscale => "greyscale",
            Self::Rainbow => "rainbow",
        };
        f.write_str(name)
    }
}

/// Linear scaling of counts onto `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    pub fn from_grid(grid: &IterationGrid) -> Self {
        let vmin = grid.min().unwrap_or(0) as f64;
        let vmax = grid.max().unwrap_or(0) as f64;
        Self::new(vmin, vmax)
    }

    pub fn apply(&self, value: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span <= 0.0 {
            0.0
        } else {
            ((value - self.vmin) / span).clamp(0.0, 1.0)
        }
    }
}

pub struct HeatmapPainter<C: Colormap> {
    colormap: C,
    norm: Normalize,
}

impl<C> HeatmapPainter<C>
where
    C: Colormap,
{
    pub fn new(colormap: C, norm: Normalize) -> Self {
        Self { colormap, norm }
    }

    pub fn for_grid(colormap: C, grid: &IterationGrid) -> Self {
        Self::new(colormap, Normalize::from_grid(grid))
    }

    pub fn count_color(&self, count: u32) -> Rgb<u8> {
        self.colormap.color(self.norm.apply(count as f64))
    }

    pub fn color(&self, frac: f64) -> Rgb<u8> {
        self.colormap.color(frac)
    }

    /// Pixel `(x, y)` shows cell `[[y, x]]`; row 0 is the top of the image.
    pub fn paint(&self, grid: &IterationGrid) -> RgbImage {
        let width = grid.width() as u32;
        let height = grid.height() as u32;

        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let count = grid.get(y as usize, x as usize);
                img.put_pixel(x, y, self.count_color(count));
            }
        }
        img
    }
}
