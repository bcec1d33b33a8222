use std::time::Instant;

use tracing::debug;

use crate::coord::Viewport;
use crate::error::Result;
use crate::escape::EscapeTime;
use crate::grid::IterationGrid;

pub trait Sampler {
    fn sample(
        &self,
        width: usize,
        height: usize,
        region: &Viewport,
        max_iter: u32,
    ) -> Result<IterationGrid>;
}

// band row 0 is image row `rows_start`
pub fn sample_rows(
    width: usize,
    height: usize,
    rows_start: usize,
    rows_end: usize,
    region: &Viewport,
    max_iter: u32,
) -> IterationGrid {
    assert!(rows_start <= rows_end && rows_end <= height, "rows out of range");
    let evaluator = EscapeTime::new(max_iter);
    let mut grid = IterationGrid::new(width, rows_end - rows_start, max_iter);
    for x in 0..width {
        for y in rows_start..rows_end {
            let c = region.point_at(x, y, width, height);
            grid.counts[[y - rows_start, x]] = evaluator.evaluate(c);
        }
    }
    grid
}

#[derive(Copy, Clone, Debug, Default)]
pub struct GridSampler;

impl Sampler for GridSampler {
    fn sample(
        &self,
        width: usize,
        height: usize,
        region: &Viewport,
        max_iter: u32,
    ) -> Result<IterationGrid> {
        Ok(sample(width, height, region, max_iter))
    }
}

pub fn sample(width: usize, height: usize, region: &Viewport, max_iter: u32) -> IterationGrid {
    debug!(width, height, max_iter, ?region, "sampling grid");
    let start = Instant::now();
    let grid = sample_rows(width, height, 0, height, region, max_iter);
    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "grid sampled");
    grid
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::complex::c;
    use crate::escape::escape_time;

    #[test]
    fn test_shape() {
        for (w, h) in [(1, 1), (3, 1), (1, 4), (17, 9)] {
            let grid = sample(w, h, &Viewport::default(), 20);
            assert_eq!(grid.width(), w);
            assert_eq!(grid.height(), h);
        }
    }

    #[test]
    fn test_single_pixel_is_region_corner() {
        let region = Viewport::default();
        for m in [0, 1, 3, 100] {
            let grid = sample(1, 1, &region, m);
            assert_eq!(grid.get(0, 0), escape_time(c(-2.0, -1.5), m));
        }
        // |-2 - 1.5i| > 2
        assert_eq!(sample(1, 1, &region, 100).get(0, 0), 1);
    }

    #[test]
    fn test_three_points_on_real_axis() {
        let region = Viewport::from_bounds(-2.0, 1.0, 0.0, 1.0);
        let grid = sample(3, 1, &region, 10);
        // -2 sits on the bailout circle, -1 cycles, 0 is fixed
        assert_eq!(grid.get(0, 0), 10);
        assert_eq!(grid.get(0, 1), 10);
        assert_eq!(grid.get(0, 2), 10);
    }

    #[test]
    fn test_not_transposed() {
        // Wide real range, narrow imaginary range: columns vary, rows barely do.
        let region = Viewport::from_bounds(-2.0, 2.0, 0.0, 0.001);
        let grid = sample(4, 2, &region, 50);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 2);
        for row in 0..2 {
            for col in 0..4 {
                let p = region.point_at(col, row, 4, 2);
                assert_eq!(grid.get(row, col), escape_time(p, 50));
            }
        }
        // column 0 is c = -2 (+tiny i), column 3 is c = 1
        assert_eq!(grid.get(0, 0), 50);
        assert_eq!(grid.get(0, 3), 3);
    }

    #[test]
    fn test_cells_within_budget() {
        let grid = sample(40, 30, &Viewport::default(), 25);
        assert!(grid.counts().iter().all(|&n| n <= 25));
        assert_eq!(grid.max(), Some(25));
    }

    #[test]
    fn test_trait_matches_function() {
        let region = Viewport::default();
        let grid = GridSampler.sample(9, 5, &region, 30).unwrap();
        assert_eq!(grid, sample(9, 5, &region, 30));
    }

    #[test]
    #[should_panic(expected = "rows out of range")]
    fn test_band_past_last_row() {
        sample_rows(4, 4, 2, 5, &Viewport::default(), 10);
    }

    #[test]
    fn test_band_matches_full_grid() {
        let region = Viewport::default();
        let full = sample(12, 10, &region, 40);
        let band = sample_rows(12, 10, 3, 7, &region, 40);
        assert_eq!(band.height(), 4);
        for row in 0..4 {
            for col in 0..12 {
                assert_eq!(band.get(row, col), full.get(row + 3, col));
            }
        }
    }
}
