//! Host component owning the published index and rebuild lifecycle
//!
//! [`SwarmManager`] replaces any notion of a process-wide "current
//! index" singleton with explicit ownership: it holds the published
//! octree behind an atomically swappable slot, drives at most one
//! in-flight bulk load one batch per tick, and fans results out to
//! registered subscriber sinks.
//!
//! Readers never see a partially built tree: a rebuild works on a
//! private octree and the slot is replaced in one step on completion.
//! Triggering a new rebuild cancels the in-flight one between batches;
//! the previously published index stays authoritative until the new
//! build lands.

use crate::foundation::math::Vec3;
use crate::loading::{BulkLoader, LoadState, LoadSummary, PointSupplier, ProgressSink};
use crate::publish::{FocusProvider, NeighborPublisher, NeighborSetSink};
use crate::spatial::{Aabb, IndexError, Octree, OctreeConfig};
use std::sync::atomic::Ordering;
use std::sync::{Arc, RwLock};

/// Receiver for the complete point array, once per finished rebuild
pub trait FullPointSetSink {
    /// Called with the full point set after each successful rebuild
    fn on_point_set(&mut self, points: &[Vec3]);
}

/// Cloneable read handle onto the currently published index
///
/// `index()` grabs an `Arc` snapshot; queries against the snapshot run
/// without touching any build-side lock, so concurrent readers are
/// never blocked by an in-flight rebuild.
#[derive(Clone)]
pub struct IndexHandle {
    slot: Arc<RwLock<Arc<Octree>>>,
}

impl IndexHandle {
    /// Snapshot of the currently published index
    pub fn index(&self) -> Arc<Octree> {
        Arc::clone(&self.slot.read().unwrap())
    }
}

/// Owns the spatial index, its rebuild pipeline, and its subscribers
pub struct SwarmManager<S: PointSupplier> {
    world_bounds: Aabb,
    octree_config: OctreeConfig,
    batch_size: usize,
    slot: Arc<RwLock<Arc<Octree>>>,
    publisher: NeighborPublisher,
    in_flight: Option<BulkLoader<S>>,
    points: Vec<Vec3>,
    point_sinks: Vec<Box<dyn FullPointSetSink>>,
    progress_sinks: Vec<Box<dyn ProgressSink>>,
    last_summary: Option<LoadSummary>,
}

impl<S: PointSupplier> SwarmManager<S> {
    /// Create a manager publishing an empty index over `world_bounds`
    pub fn new(
        world_bounds: Aabb,
        octree_config: OctreeConfig,
        batch_size: usize,
        publisher: NeighborPublisher,
    ) -> Result<Self, IndexError> {
        let empty = Octree::new(world_bounds, octree_config)?;
        Ok(Self {
            world_bounds,
            octree_config,
            batch_size,
            slot: Arc::new(RwLock::new(Arc::new(empty))),
            publisher,
            in_flight: None,
            points: Vec::new(),
            point_sinks: Vec::new(),
            progress_sinks: Vec::new(),
            last_summary: None,
        })
    }

    /// Read handle for concurrent queriers
    pub fn handle(&self) -> IndexHandle {
        IndexHandle {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Snapshot of the currently published index
    pub fn index(&self) -> Arc<Octree> {
        Arc::clone(&self.slot.read().unwrap())
    }

    /// Register a subscriber for the full point set
    pub fn subscribe_points(&mut self, sink: Box<dyn FullPointSetSink>) {
        self.point_sinks.push(sink);
    }

    /// Register a subscriber for bulk-load progress events
    pub fn subscribe_progress(&mut self, sink: Box<dyn ProgressSink>) {
        self.progress_sinks.push(sink);
    }

    /// Register a subscriber for published neighbor sets
    pub fn subscribe_neighbors(&mut self, sink: Box<dyn NeighborSetSink>) {
        self.publisher.subscribe(sink);
    }

    /// True while a rebuild is in flight
    pub fn is_rebuilding(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Accounting from the most recently completed rebuild
    pub fn last_summary(&self) -> Option<LoadSummary> {
        self.last_summary
    }

    /// The full point array from the last completed rebuild
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Most recently published neighbor set
    pub fn neighbors(&self) -> &[Vec3] {
        self.publisher.neighbors()
    }

    /// Start rebuilding the point set from scratch
    ///
    /// Any in-flight rebuild is cancelled cooperatively; its partially
    /// built index is abandoned and the published index keeps serving
    /// queries until the new build completes.
    pub fn regenerate(&mut self, supplier: S, count: usize) -> Result<(), IndexError> {
        if let Some(stale) = self.in_flight.take() {
            stale.cancel_flag().store(true, Ordering::Release);
            log::info!("superseding in-flight rebuild at {:?}", stale.progress());
        }
        let fresh = Octree::new(self.world_bounds, self.octree_config)?;
        log::info!("starting rebuild of {} points", count);
        self.in_flight = Some(BulkLoader::new(fresh, supplier, count, self.batch_size));
        Ok(())
    }

    /// Publish an externally built index (e.g. from a parallel load)
    pub fn publish(&mut self, tree: Octree, points: Vec<Vec3>, summary: LoadSummary) {
        log::info!(
            "publishing index: {} points stored, {} rejected",
            summary.inserted,
            summary.rejected
        );
        *self.slot.write().unwrap() = Arc::new(tree);
        self.points = points;
        self.last_summary = Some(summary);
        for sink in &mut self.point_sinks {
            sink.on_point_set(&self.points);
        }
        self.publisher.set_ready(true);
    }

    /// One cooperative tick: advance the rebuild by a single batch, then
    /// run the neighbor publisher's cadence check against the published
    /// index
    ///
    /// The focus provider (e.g. the camera) is polled once per tick.
    pub fn update(&mut self, focus: &dyn FocusProvider) {
        if let Some(loader) = &mut self.in_flight {
            match loader.step() {
                LoadState::InProgress(progress) => {
                    for sink in &mut self.progress_sinks {
                        sink.on_progress(progress);
                    }
                }
                LoadState::Complete => {
                    if let Some(finished) = self.in_flight.take() {
                        let result = finished.finish();
                        let final_progress = crate::loading::LoadProgress {
                            inserted: result.summary.supplied,
                            total: result.summary.requested,
                        };
                        for sink in &mut self.progress_sinks {
                            sink.on_progress(final_progress);
                        }
                        self.publish(result.tree, result.points, result.summary);
                    }
                }
                LoadState::Cancelled => {
                    // A superseded loader is normally replaced on the spot;
                    // an externally raised flag just drops the partial tree.
                    log::debug!("dropping cancelled rebuild");
                    self.in_flight = None;
                }
            }
        }

        let current = self.index();
        self.publisher.tick(&current, focus.focus());
    }
}
