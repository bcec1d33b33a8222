use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::info;

use crate::coord::Viewport;
use crate::error::Result;
use crate::grid::IterationGrid;
use crate::painter::{Colormap, HeatmapPainter, Normalize};
use crate::text::{draw_text, text_size, GLYPH_HEIGHT};

const BACKGROUND: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const INK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
const AXIS_DIVISIONS: u32 = 2;
const LABEL_GAP: u32 = 4;

/// Heatmap with a title, labelled axes and a labelled colorbar.
#[derive(Clone, Debug)]
pub struct Figure {
    pub title: String,
    pub margin: u32,
    pub gap: u32,
    pub bar_width: u32,
    pub tick_length: u32,
    /// Colorbar divisions; `ticks + 1` labels from min to max count.
    pub ticks: u32,
    pub text_scale: u32,
}

impl Default for Figure {
    fn default() -> Self {
        Self {
            title: "Mandelbrot Set".to_string(),
            margin: 20,
            gap: 20,
            bar_width: 24,
            tick_length: 6,
            ticks: 4,
            text_scale: 2,
        }
    }
}

impl Figure {
    pub fn with_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub plot_x: u32,
    pub plot_y: u32,
    pub plot_w: u32,
    pub plot_h: u32,
    pub bar_x: u32,
    pub width: u32,
    pub height: u32,
}

struct Labels {
    x: Vec<String>,
    y: Vec<String>,
    counts: Vec<String>,
}

pub fn format_coord(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

fn axis_labels(min: f64, max: f64) -> Vec<String> {
    (0..=AXIS_DIVISIONS)
        .map(|t| format_coord(min + (max - min) * t as f64 / AXIS_DIVISIONS as f64))
        .collect()
}

impl Figure {
    fn labels(&self, region: &Viewport, norm: &Normalize) -> Labels {
        let ticks = self.ticks.max(1);
        let counts = (0..=ticks)
            .map(|t| {
                let v = norm.vmax - (norm.vmax - norm.vmin) * t as f64 / ticks as f64;
                format!("{}", v.round() as i64)
            })
            .collect();
        Labels {
            x: axis_labels(region.x.min, region.x.max),
            y: axis_labels(region.y.min, region.y.max),
            counts,
        }
    }

    fn widest(&self, labels: &[String]) -> u32 {
        labels
            .iter()
            .map(|l| text_size(l, self.text_scale).0)
            .max()
            .unwrap_or(0)
    }

    fn layout_for(&self, grid: &IterationGrid, labels: &Labels) -> Layout {
        let (title_w, title_h) = text_size(&self.title, self.text_scale);
        let text_h = GLYPH_HEIGHT * self.text_scale;
        let title_band = if self.title.is_empty() {
            0
        } else {
            title_h + self.margin
        };

        let plot_w = grid.width() as u32;
        let plot_h = grid.height() as u32;
        let plot_x = self.margin + self.widest(&labels.y) + LABEL_GAP + self.tick_length;
        let plot_y = self.margin + title_band;
        let bar_x = plot_x + plot_w + self.gap;

        let width = bar_x
            + self.bar_width
            + self.tick_length
            + LABEL_GAP
            + self.widest(&labels.counts)
            + self.margin;
        let height = plot_y + plot_h + self.tick_length + LABEL_GAP + text_h + self.margin;
        Layout {
            plot_x,
            plot_y,
            plot_w,
            plot_h,
            bar_x,
            width: width.max(2 * self.margin + title_w),
            height,
        }
    }

    pub fn layout(&self, grid: &IterationGrid, region: &Viewport) -> Layout {
        let labels = self.labels(region, &Normalize::from_grid(grid));
        self.layout_for(grid, &labels)
    }

    pub fn render<C: Colormap>(
        &self,
        grid: &IterationGrid,
        region: &Viewport,
        colormap: C,
    ) -> RgbImage {
        let painter = HeatmapPainter::for_grid(colormap, grid);
        let labels = self.labels(region, &Normalize::from_grid(grid));
        let layout = self.layout_for(grid, &labels);
        let heatmap = painter.paint(grid);

        let mut img = RgbImage::from_pixel(layout.width, layout.height, BACKGROUND);
        for (x, y, px) in heatmap.enumerate_pixels() {
            img.put_pixel(layout.plot_x + x, layout.plot_y + y, *px);
        }
        self.draw_title(&mut img, &layout);
        self.draw_axes(&mut img, &layout, &labels);
        self.draw_colorbar(&mut img, &layout, &painter, &labels.counts);
        img
    }

    fn draw_title(&self, img: &mut RgbImage, layout: &Layout) {
        if self.title.is_empty() {
            return;
        }
        let (title_w, _) = text_size(&self.title, self.text_scale);
        let x = layout.plot_x as i64 + (layout.plot_w as i64 - title_w as i64) / 2;
        let x = x.max(self.margin as i64);
        draw_text(img, x, self.margin as i64, &self.title, INK, self.text_scale);
    }

    fn draw_axes(&self, img: &mut RgbImage, layout: &Layout, labels: &Labels) {
        let text_h = (GLYPH_HEIGHT * self.text_scale) as i64;
        let below = layout.plot_y + layout.plot_h;
        for (t, label) in labels.x.iter().enumerate() {
            let x = layout.plot_x + layout.plot_w * t as u32 / AXIS_DIVISIONS;
            for dy in 0..self.tick_length {
                img.put_pixel(x, below + dy, INK);
            }
            let (w, _) = text_size(label, self.text_scale);
            let lx = x as i64 - w as i64 / 2;
            let ly = (below + self.tick_length + LABEL_GAP) as i64;
            draw_text(img, lx, ly, label, INK, self.text_scale);
        }
        let left = layout.plot_x - self.tick_length;
        for (t, label) in labels.y.iter().enumerate() {
            let y = layout.plot_y + layout.plot_h * t as u32 / AXIS_DIVISIONS;
            for dx in 0..self.tick_length {
                img.put_pixel(left + dx, y, INK);
            }
            let (w, _) = text_size(label, self.text_scale);
            let lx = (left - LABEL_GAP) as i64 - w as i64;
            draw_text(img, lx, y as i64 - text_h / 2, label, INK, self.text_scale);
        }
    }

    fn draw_colorbar<C: Colormap>(
        &self,
        img: &mut RgbImage,
        layout: &Layout,
        painter: &HeatmapPainter<C>,
        labels: &[String],
    ) {
        let h = layout.plot_h;
        let top = layout.plot_y;
        // highest count at the top
        for y in 0..h {
            let frac = if h > 1 {
                1.0 - y as f64 / (h - 1) as f64
            } else {
                1.0
            };
            let color = painter.color(frac);
            for x in 0..self.bar_width {
                img.put_pixel(layout.bar_x + x, top + y, color);
            }
        }
        if h == 0 {
            return;
        }
        let text_h = (GLYPH_HEIGHT * self.text_scale) as i64;
        let ticks = labels.len().saturating_sub(1).max(1) as u64;
        let tick_x = layout.bar_x + self.bar_width;
        for (t, label) in labels.iter().enumerate() {
            let y = top + ((h - 1) as u64 * t as u64 / ticks) as u32;
            for x in 0..self.tick_length {
                img.put_pixel(tick_x + x, y, INK);
            }
            let lx = (tick_x + self.tick_length + LABEL_GAP) as i64;
            draw_text(img, lx, y as i64 - text_h / 2, label, INK, self.text_scale);
        }
    }

    pub fn save<P: AsRef<Path>>(&self, img: &RgbImage, path: P) -> Result<()> {
        img.save(path.as_ref())?;
        info!(
            path = %path.as_ref().display(),
            width = img.width(),
            height = img.height(),
            "figure saved"
        );
        Ok(())
    }
}
