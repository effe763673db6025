//! Periodic neighbor-set publication
//!
//! The renderer does not need a fresh neighbor list every tick; the
//! [`NeighborPublisher`] re-queries the index around a moving focus
//! point on a fixed cadence and pushes the result to its subscribers.
//! The set is rebuilt wholesale on every query — there is no
//! incremental diffing.

use crate::foundation::math::Vec3;
use crate::spatial::Octree;

/// Capability providing the current query center (e.g. camera position)
pub trait FocusProvider {
    /// The focus point for the next neighbor query
    fn focus(&self) -> Vec3;
}

impl<F> FocusProvider for F
where
    F: Fn() -> Vec3,
{
    fn focus(&self) -> Vec3 {
        self()
    }
}

/// Receiver for freshly published neighbor sets
pub trait NeighborSetSink {
    /// Called exactly once per successful query tick
    fn on_neighbors(&mut self, neighbors: &[Vec3]);
}

/// Re-queries the index around the focus point every `cadence` ticks
///
/// Ticks before the first bulk load completes are no-ops; flip
/// [`Self::set_ready`] once an index has been published. An empty query
/// result keeps the previous set (sticky last-known-good) and does not
/// notify subscribers.
pub struct NeighborPublisher {
    radius: f32,
    cadence: u64,
    tick_count: u64,
    ready: bool,
    neighbors: Vec<Vec3>,
    sinks: Vec<Box<dyn NeighborSetSink>>,
}

impl NeighborPublisher {
    /// Create a publisher querying `radius` around the focus every
    /// `cadence` ticks
    pub fn new(radius: f32, cadence: u64) -> Self {
        Self {
            radius,
            cadence: cadence.max(1),
            tick_count: 0,
            ready: false,
            neighbors: Vec::new(),
            sinks: Vec::new(),
        }
    }

    /// Register a subscriber; all sinks are notified synchronously after
    /// each publish
    pub fn subscribe(&mut self, sink: Box<dyn NeighborSetSink>) {
        self.sinks.push(sink);
    }

    /// Gate queries on bulk-load completion
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// True once the index is queryable
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The most recently published neighbor set
    pub fn neighbors(&self) -> &[Vec3] {
        &self.neighbors
    }

    /// Advance one scheduler tick; query and publish on cadence ticks
    ///
    /// Returns true when a neighbor set was published this tick.
    pub fn tick(&mut self, index: &Octree, focus: Vec3) -> bool {
        self.tick_count += 1;
        if !self.ready || self.tick_count % self.cadence != 0 {
            return false;
        }

        let neighbors = index.query_radius(focus, self.radius);
        if neighbors.is_empty() {
            // Keep the last known-good set rather than flickering to
            // nothing when the focus leaves the swarm.
            return false;
        }

        log::debug!("publishing {} neighbors around {:?}", neighbors.len(), focus);
        self.neighbors = neighbors;
        for sink in &mut self.sinks {
            sink.on_neighbors(&self.neighbors);
        }
        true
    }
}
