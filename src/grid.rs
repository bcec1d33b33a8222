use ndarray::{concatenate, Array2, ArrayView2, Axis};

use crate::error::Error;

/// Escape counts for every pixel, indexed `[[row, col]]`.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationGrid {
    pub(crate) max_iter: u32,
    pub(crate) counts: Array2<u32>,
}

impl IterationGrid {
    pub fn new(width: usize, height: usize, max_iter: u32) -> Self {
        Self {
            max_iter,
            counts: Array2::zeros((height, width)),
        }
    }

    pub fn from_array(counts: Array2<u32>, max_iter: u32) -> Self {
        Self { max_iter, counts }
    }

    pub fn width(&self) -> usize {
        self.counts.ncols()
    }

    pub fn height(&self) -> usize {
        self.counts.nrows()
    }

    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.counts[[row, col]]
    }

    pub fn counts(&self) -> ArrayView2<'_, u32> {
        self.counts.view()
    }

    pub fn into_array(self) -> Array2<u32> {
        self.counts
    }

    pub fn min(&self) -> Option<u32> {
        self.counts.iter().copied().min()
    }

    pub fn max(&self) -> Option<u32> {
        self.counts.iter().copied().max()
    }

    pub fn interior_count(&self) -> usize {
        self.counts.iter().filter(|&&n| n == self.max_iter).count()
    }

    /// Stack row bands top to bottom.
    pub fn join_rows(bands: &[IterationGrid]) -> Result<Self, Error> {
        let first = bands.first().ok_or(Error::Join("no bands"))?;
        let max_iter = first.max_iter;
        let width = first.width();
        let mut views = vec![];
        for band in bands {
            if band.width() != width {
                return Err(Error::Join("different width"));
            }
            if band.max_iter != max_iter {
                return Err(Error::Join("different iteration budget"));
            }
            views.push(band.counts.view());
        }
        let counts = concatenate(Axis(0), &views).map_err(|_| Error::Join("shape mismatch"))?;
        Ok(Self { max_iter, counts })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_shape() {
        let grid = IterationGrid::new(7, 3, 10);
        assert_eq!(grid.width(), 7);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.counts().dim(), (3, 7));
    }

    #[test]
    fn test_summary() {
        let grid = IterationGrid::from_array(array![[1, 5, 5], [2, 3, 5]], 5);
        assert_eq!(grid.min(), Some(1));
        assert_eq!(grid.max(), Some(5));
        assert_eq!(grid.interior_count(), 3);
        assert_eq!(grid.get(1, 0), 2);
    }

    #[test]
    fn test_join_rows() {
        let a = IterationGrid::from_array(array![[1, 2]], 9);
        let b = IterationGrid::from_array(array![[3, 4], [5, 6]], 9);
        let joined = IterationGrid::join_rows(&[a, b]).unwrap();
        assert_eq!(joined.into_array(), array![[1, 2], [3, 4], [5, 6]]);
    }

    #[test]
    fn test_join_rows_rejects_mismatch() {
        let a = IterationGrid::from_array(array![[1, 2]], 9);
        let b = IterationGrid::from_array(array![[3, 4, 5]], 9);
        assert!(IterationGrid::join_rows(&[a, b]).is_err());
        assert!(IterationGrid::join_rows(&[]).is_err());
    }
}
