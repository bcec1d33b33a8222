use std::cell::Cell;
use std::iter::zip;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error};

use crate::coord::Viewport;
use crate::error::{Error, Result};
use crate::grid::IterationGrid;
use crate::sampler::{sample, sample_rows, Sampler};

/// Contiguous range of image rows, `start..end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowBand {
    pub start: usize,
    pub end: usize,
}

/// Split `height` rows into at most `n` non-empty bands whose sizes differ by at most one.
pub fn split_rows(height: usize, n: usize) -> Vec<RowBand> {
    let n = n.min(height);
    if n == 0 {
        return vec![];
    }
    let size = height / n;
    let size_xtra = height % n;

    let mut start = 0;
    let mut bands = vec![];
    for i in 0..n {
        let end = start + size + usize::from(i < size_xtra);
        bands.push(RowBand { start, end });
        start = end;
    }
    bands
}

#[derive(Debug)]
pub struct SplitPart<T> {
    pub n: usize,
    pub part: T,
}

impl<T> SplitPart<T> {
    pub fn new(part: T, n: usize) -> Self {
        Self { part, n }
    }
}

impl SplitPart<IterationGrid> {
    /// Reassemble bands in their original order.
    pub fn join(mut splits: Vec<SplitPart<IterationGrid>>) -> Result<IterationGrid> {
        splits.sort_by_key(|s| s.n);
        for (i, s) in splits.iter().enumerate() {
            if s.n != i {
                return Err(Error::Join("missing or duplicate band"));
            }
        }
        let bands: Vec<IterationGrid> = splits.into_iter().map(|s| s.part).collect();
        IterationGrid::join_rows(&bands)
    }
}

#[derive(Copy, Clone, Debug)]
struct Job {
    width: usize,
    height: usize,
    band: RowBand,
    region: Viewport,
    max_iter: u32,
}

const LIVENESS_INTERVAL: Duration = Duration::from_millis(50);

struct Worker {
    tx: mpsc::Sender<SplitPart<Job>>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn new(sol_tx: mpsc::Sender<SplitPart<IterationGrid>>) -> Self {
        let (tx, rx) = mpsc::channel::<SplitPart<Job>>();
        let handle = thread::spawn(move || loop {
            let SplitPart { n, part: job } = match rx.recv() {
                Ok(s) => s,
                Err(_) => return,
            };
            let grid = sample_rows(
                job.width,
                job.height,
                job.band.start,
                job.band.end,
                &job.region,
                job.max_iter,
            );
            if sol_tx.send(SplitPart::new(grid, n)).is_err() {
                return;
            }
        });

        Self { tx, handle }
    }

    fn send(&self, part: SplitPart<Job>) -> Result<()> {
        self.tx.send(part).map_err(|_| Error::WorkerDisconnected)
    }

    // Workers only exit when the sampler goes away, so a finished one has panicked.
    fn is_dead(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Samples row bands on a pool of worker threads. Produces the same grid as
/// [`crate::sampler::GridSampler`].
///
/// A failed call leaves results of other bands unaccounted for, so after
/// any error the sampler refuses further work.
pub struct ThreadedSampler {
    workers: Vec<Worker>,
    rx: mpsc::Receiver<SplitPart<IterationGrid>>,
    broken: Cell<bool>,
}

impl ThreadedSampler {
    pub fn new(n: usize) -> Self {
        let (tx, rx) = mpsc::channel();
        let workers = (0..n).map(|_| Worker::new(tx.clone())).collect();
        Self {
            workers,
            rx,
            broken: Cell::new(false),
        }
    }

    pub fn with_physical_cores() -> Self {
        Self::new(num_cpus::get_physical())
    }

    pub fn is_broken(&self) -> bool {
        self.broken.get()
    }

    fn fail(&self) -> Error {
        self.broken.set(true);
        error!("sampler worker lost, pool disabled");
        Error::WorkerDisconnected
    }

    fn run_jobs(&self, jobs: Vec<Job>) -> Result<IterationGrid> {
        if self.is_broken() {
            return Err(Error::WorkerDisconnected);
        }
        let sn = jobs.len();
        for (n, (worker, job)) in zip(&self.workers, jobs).enumerate() {
            if worker.send(SplitPart::new(job, n)).is_err() {
                return Err(self.fail());
            }
        }
        let mut parts = Vec::with_capacity(sn);
        while parts.len() < sn {
            match self.rx.recv_timeout(LIVENESS_INTERVAL) {
                Ok(part) => parts.push(part),
                Err(RecvTimeoutError::Timeout) => {
                    if self.workers.iter().any(Worker::is_dead) {
                        return Err(self.fail());
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return Err(self.fail()),
            }
        }
        SplitPart::join(parts)
    }
}

impl Sampler for ThreadedSampler {
    fn sample(
        &self,
        width: usize,
        height: usize,
        region: &Viewport,
        max_iter: u32,
    ) -> Result<IterationGrid> {
        let bands = split_rows(height, self.workers.len());
        if bands.len() < 2 {
            return Ok(sample(width, height, region, max_iter));
        }
        debug!(threads = bands.len(), ?bands, "sampling row bands");

        let jobs = bands
            .into_iter()
            .map(|band| Job {
                width,
                height,
                band,
                region: *region,
                max_iter,
            })
            .collect();
        self.run_jobs(jobs)
    }
}

/// Single-threaded for `threads == 0`, a worker pool otherwise.
pub fn make_sampler(threads: usize) -> Box<dyn Sampler> {
    if threads == 0 {
        Box::new(crate::sampler::GridSampler)
    } else {
        Box::new(ThreadedSampler::new(threads))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn check_split(height: usize, n: usize) {
        let bands = split_rows(height, n);
        assert_eq!(bands.len(), n.min(height));
        let mut next = 0;
        for band in &bands {
            assert_eq!(band.start, next);
            assert!(band.end > band.start);
            next = band.end;
        }
        assert_eq!(next, if bands.is_empty() { 0 } else { height });
        let sizes: Vec<usize> = bands.iter().map(|b| b.end - b.start).collect();
        if let (Some(min), Some(max)) = (sizes.iter().min(), sizes.iter().max()) {
            assert!(max - min <= 1);
        }
    }

    #[test]
    fn test_row_splits() {
        check_split(1, 1);
        check_split(0, 2);
        check_split(5, 8);
        check_split(8, 5);
        check_split(100, 1);
        check_split(55, 47);
    }

    #[test]
    fn test_join_out_of_order() {
        let region = Viewport::default();
        let full = sample(6, 9, &region, 30);
        let parts: Vec<SplitPart<IterationGrid>> = split_rows(9, 3)
            .into_iter()
            .enumerate()
            .rev()
            .map(|(n, b)| SplitPart::new(sample_rows(6, 9, b.start, b.end, &region, 30), n))
            .collect();
        assert_eq!(SplitPart::join(parts).unwrap(), full);
    }

    #[test]
    fn test_join_rejects_duplicate() {
        let band = sample_rows(2, 2, 0, 1, &Viewport::default(), 5);
        let parts = vec![SplitPart::new(band.clone(), 0), SplitPart::new(band, 0)];
        assert!(SplitPart::join(parts).is_err());
    }

    #[test]
    fn test_threaded_matches_single() {
        let region = Viewport::default();
        let expected = sample(31, 23, &region, 60);
        for n in [1, 2, 3, 4, 8, 40] {
            let sampler = ThreadedSampler::new(n);
            assert_eq!(sampler.sample(31, 23, &region, 60).unwrap(), expected);
        }
    }

    #[test]
    fn test_threaded_reusable() {
        let sampler = ThreadedSampler::new(3);
        let region = Viewport::from_bounds(-0.8, -0.7, 0.05, 0.15);
        let a = sampler.sample(10, 10, &region, 100).unwrap();
        let b = sampler.sample(10, 10, &region, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_panicked_worker_disables_pool() {
        let sampler = ThreadedSampler::new(2);
        let region = Viewport::default();
        let good = Job {
            width: 4,
            height: 4,
            band: RowBand { start: 0, end: 2 },
            region,
            max_iter: 10,
        };
        // rows past the image make the worker panic
        let bad = Job {
            band: RowBand { start: 2, end: 9 },
            ..good
        };
        assert!(matches!(
            sampler.run_jobs(vec![good, bad]),
            Err(Error::WorkerDisconnected)
        ));
        assert!(sampler.is_broken());
        assert!(sampler.sample(4, 4, &region, 10).is_err());
    }

    #[test]
    fn test_physical_cores_pool() {
        let region = Viewport::default();
        let sampler = ThreadedSampler::with_physical_cores();
        let grid = sampler.sample(20, 12, &region, 30).unwrap();
        assert_eq!(grid, sample(20, 12, &region, 30));
        assert!(!sampler.is_broken());
    }

    #[test]
    fn test_make_sampler() {
        let region = Viewport::default();
        let single = make_sampler(0).sample(8, 8, &region, 20).unwrap();
        let pooled = make_sampler(4).sample(8, 8, &region, 20).unwrap();
        assert_eq!(single, pooled);
    }
}
