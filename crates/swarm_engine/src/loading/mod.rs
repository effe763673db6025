//! Batched bulk loading of the spatial index
//!
//! Populating an octree with 10^5..10^7 points cannot run as one
//! synchronous pass without stalling the host's frame loop. The
//! [`BulkLoader`] is a resumable build: each [`BulkLoader::step`] call
//! inserts one batch of points and then hands control back to the
//! caller's scheduling loop, with a cancellation flag observed between
//! batches. [`load_parallel`] is the alternative worker-pool phase that
//! partitions the full point array into batches and mutates the tree
//! under a single coarse lock.
//!
//! The index under construction is private to the loader until
//! completion; readers keep querying the previously published index, so
//! a partially built tree is never observable.

use crate::foundation::math::Vec3;
use crate::spatial::Octree;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

/// Default number of points inserted per cooperative batch
pub const DEFAULT_BATCH_SIZE: usize = 200_000;

/// Capability to produce the i-th point of a generated set
///
/// Position generation itself (noise sampling, curve distribution)
/// lives outside the engine; the loader only pulls points by index.
/// Returning `None` before `count` points were produced means the
/// supplier ran dry, which ends the load early with an accurate
/// summary rather than an error.
pub trait PointSupplier {
    /// Produce the point at `index`, or `None` if exhausted
    fn point_at(&self, index: usize) -> Option<Vec3>;
}

impl<F> PointSupplier for F
where
    F: Fn(usize) -> Option<Vec3>,
{
    fn point_at(&self, index: usize) -> Option<Vec3> {
        self(index)
    }
}

/// Progress of an in-flight bulk load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Points consumed from the supplier so far
    pub inserted: usize,
    /// Points requested in total
    pub total: usize,
}

/// Receiver for per-batch progress events (UI, logging)
pub trait ProgressSink {
    /// Called once after every completed batch
    fn on_progress(&mut self, progress: LoadProgress);
}

/// Final accounting of a completed (or cancelled) load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Points asked of the supplier
    pub requested: usize,
    /// Points the supplier actually produced
    pub supplied: usize,
    /// Points stored in the index
    pub inserted: usize,
    /// Points dropped as out-of-bounds or NaN
    pub rejected: usize,
}

/// Outcome of a single cooperative step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// A batch was inserted and more work remains
    InProgress(LoadProgress),
    /// Every available point has been consumed
    Complete,
    /// The cancellation flag was raised; the partial tree is abandoned
    Cancelled,
}

/// Everything a finished load hands back to its host
pub struct LoadResult {
    /// The fully built index
    pub tree: Octree,
    /// The complete point array, in supplier order (for render upload)
    pub points: Vec<Vec3>,
    /// Final accounting
    pub summary: LoadSummary,
}

/// Resumable, frame-budgeted population of a fresh octree
///
/// Drive it with [`Self::step`] once per scheduler tick until it
/// reports [`LoadState::Complete`], then take the built index with
/// [`Self::finish`]. Within one batch points are inserted in supplier
/// order; the loader never suspends mid-batch.
pub struct BulkLoader<S: PointSupplier> {
    supplier: S,
    tree: Octree,
    points: Vec<Vec3>,
    requested: usize,
    batch_size: usize,
    cursor: usize,
    rejected: usize,
    exhausted: bool,
    cancel: Arc<AtomicBool>,
}

impl<S: PointSupplier> BulkLoader<S> {
    /// Start a load of `count` points into `tree`, `batch_size` at a time
    pub fn new(tree: Octree, supplier: S, count: usize, batch_size: usize) -> Self {
        Self {
            supplier,
            tree,
            points: Vec::with_capacity(count),
            requested: count,
            batch_size: batch_size.max(1),
            cursor: 0,
            rejected: 0,
            exhausted: false,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag that cancels the load between batches when raised
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// True once every available point has been consumed
    pub fn is_complete(&self) -> bool {
        self.exhausted || self.cursor >= self.requested
    }

    /// Insert one batch of points, then yield
    pub fn step(&mut self) -> LoadState {
        if self.cancel.load(Ordering::Acquire) {
            log::debug!(
                "bulk load cancelled after {} of {} points",
                self.cursor,
                self.requested
            );
            return LoadState::Cancelled;
        }
        if self.is_complete() {
            return LoadState::Complete;
        }

        let batch_end = (self.cursor + self.batch_size).min(self.requested);
        while self.cursor < batch_end {
            let Some(point) = self.supplier.point_at(self.cursor) else {
                log::warn!(
                    "point supplier exhausted after {} of {} points",
                    self.cursor,
                    self.requested
                );
                self.exhausted = true;
                break;
            };
            self.cursor += 1;
            self.points.push(point);
            if !self.tree.insert(point).is_stored() {
                self.rejected += 1;
            }
        }

        if self.is_complete() {
            LoadState::Complete
        } else {
            LoadState::InProgress(self.progress())
        }
    }

    /// Current progress snapshot
    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            inserted: self.cursor,
            total: self.requested,
        }
    }

    /// Consume the loader, yielding the built index and point array
    pub fn finish(self) -> LoadResult {
        let summary = LoadSummary {
            requested: self.requested,
            supplied: self.cursor,
            inserted: self.tree.len(),
            rejected: self.rejected,
        };
        LoadResult {
            tree: self.tree,
            points: self.points,
            summary,
        }
    }
}

/// Insert a full point array into `tree` using a rayon worker pool
///
/// The array is partitioned into `batch_size` chunks; workers take one
/// mutual-exclusion lock around the whole tree for each chunk, since a
/// leaf split mutates shared interior state. Insertion order across
/// chunks is unspecified, but routing depends on geometry only, so the
/// resulting tree holds exactly the same point set as a sequential
/// load.
pub fn load_parallel(tree: Octree, points: &[Vec3], batch_size: usize) -> (Octree, LoadSummary) {
    let requested = points.len();
    let shared = Mutex::new(tree);
    let rejected = AtomicUsize::new(0);

    points.par_chunks(batch_size.max(1)).for_each(|chunk| {
        let mut dropped = 0usize;
        let mut tree = shared.lock().unwrap();
        for &point in chunk {
            if !tree.insert(point).is_stored() {
                dropped += 1;
            }
        }
        drop(tree);
        if dropped > 0 {
            rejected.fetch_add(dropped, Ordering::Relaxed);
        }
    });

    let tree = shared.into_inner().unwrap();
    let rejected = rejected.into_inner();
    let summary = LoadSummary {
        requested,
        supplied: requested,
        inserted: tree.len(),
        rejected,
    };
    (tree, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Aabb, OctreeConfig};

    fn world() -> Aabb {
        Aabb::new(Vec3::new(-100.0, -100.0, -100.0), Vec3::new(100.0, 100.0, 100.0))
    }

    fn empty_tree() -> Octree {
        Octree::new(world(), OctreeConfig::default()).unwrap()
    }

    /// Deterministic in-bounds point pattern
    fn lattice_point(index: usize) -> Vec3 {
        let i = index as f32;
        Vec3::new(
            (i * 17.0) % 180.0 - 90.0,
            (i * 29.0) % 180.0 - 90.0,
            (i * 43.0) % 180.0 - 90.0,
        )
    }

    #[test]
    fn test_step_yields_once_per_batch() {
        let supplier = |i: usize| Some(lattice_point(i));
        let mut loader = BulkLoader::new(empty_tree(), supplier, 1_000, 300);

        assert_eq!(
            loader.step(),
            LoadState::InProgress(LoadProgress { inserted: 300, total: 1_000 })
        );
        assert_eq!(
            loader.step(),
            LoadState::InProgress(LoadProgress { inserted: 600, total: 1_000 })
        );
        assert_eq!(
            loader.step(),
            LoadState::InProgress(LoadProgress { inserted: 900, total: 1_000 })
        );
        // Final partial batch completes the load
        assert_eq!(loader.step(), LoadState::Complete);

        let result = loader.finish();
        assert_eq!(result.summary.supplied, 1_000);
        assert_eq!(result.summary.inserted, 1_000);
        assert_eq!(result.summary.rejected, 0);
        assert_eq!(result.points.len(), 1_000);
        assert_eq!(result.tree.len(), 1_000);
    }

    #[test]
    fn test_supplier_exhaustion_stops_early() {
        let supplier = |i: usize| (i < 250).then(|| lattice_point(i));
        let mut loader = BulkLoader::new(empty_tree(), supplier, 1_000, 100);

        let mut state = loader.step();
        while matches!(state, LoadState::InProgress(_)) {
            state = loader.step();
        }
        assert_eq!(state, LoadState::Complete);

        let result = loader.finish();
        assert_eq!(result.summary.requested, 1_000);
        assert_eq!(result.summary.supplied, 250);
        assert_eq!(result.summary.inserted, 250);
    }

    #[test]
    fn test_out_of_bounds_points_are_counted_not_fatal() {
        // Every third point lands outside the world volume
        let supplier = |i: usize| {
            Some(if i % 3 == 0 {
                Vec3::new(500.0, 0.0, 0.0)
            } else {
                lattice_point(i)
            })
        };
        let mut loader = BulkLoader::new(empty_tree(), supplier, 300, 300);
        assert_eq!(loader.step(), LoadState::Complete);

        let result = loader.finish();
        assert_eq!(result.summary.supplied, 300);
        assert_eq!(result.summary.rejected, 100);
        assert_eq!(result.summary.inserted, 200);
        assert_eq!(result.tree.len(), 200);
    }

    #[test]
    fn test_cancellation_between_batches() {
        let supplier = |i: usize| Some(lattice_point(i));
        let mut loader = BulkLoader::new(empty_tree(), supplier, 1_000_000, 100_000);
        let cancel = loader.cancel_flag();

        for _ in 0..3 {
            assert!(matches!(loader.step(), LoadState::InProgress(_)));
        }
        cancel.store(true, Ordering::Release);

        // The flag is observed before any further batch work
        assert_eq!(loader.step(), LoadState::Cancelled);
        assert_eq!(loader.progress().inserted, 300_000);
        assert_eq!(loader.step(), LoadState::Cancelled);
    }

    #[test]
    fn test_parallel_load_matches_sequential_count() {
        let points: Vec<Vec3> = (0..50_000).map(lattice_point).collect();
        let (tree, summary) = load_parallel(empty_tree(), &points, 5_000);

        assert_eq!(summary.requested, 50_000);
        assert_eq!(summary.inserted, 50_000);
        assert_eq!(summary.rejected, 0);
        assert_eq!(tree.len(), 50_000);

        // Every stored point is inside the world volume
        let bounds = tree.world_bounds();
        tree.visit_points(|p| assert!(bounds.contains_point(p)));
    }

    #[test]
    fn test_parallel_load_counts_rejects() {
        let mut points: Vec<Vec3> = (0..1_000).map(lattice_point).collect();
        points.extend((0..100).map(|_| Vec3::new(1_000.0, 0.0, 0.0)));
        let (tree, summary) = load_parallel(empty_tree(), &points, 64);

        assert_eq!(summary.inserted, 1_000);
        assert_eq!(summary.rejected, 100);
        assert_eq!(tree.len(), 1_000);
    }
}
