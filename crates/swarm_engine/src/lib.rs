//! # Swarm Engine
//!
//! A spatial indexing engine for very large point swarms (10^5..10^7
//! points) that must answer "which points lie within radius R of a
//! moving query point" at interactive rates.
//!
//! ## Features
//!
//! - **Octree index**: capacity/depth bounded octant splitting with
//!   box-pruned, distance-exact radius queries
//! - **Frame-budgeted bulk loading**: resumable batched rebuilds that
//!   never stall the host loop, with cooperative cancellation
//! - **Parallel bulk insertion**: rayon worker pool under a single
//!   coarse tree lock
//! - **Atomic publication**: readers always see a fully built index,
//!   never a partial rebuild
//! - **Cadenced neighbor publishing**: wholesale neighbor-set rebuilds
//!   around a moving focus, fanned out to subscriber sinks
//!
//! ## Quick Start
//!
//! ```rust
//! use swarm_engine::prelude::*;
//!
//! let config = SwarmConfig::default();
//! let publisher = NeighborPublisher::new(config.neighbor_radius, config.publish_cadence);
//! let mut manager = SwarmManager::new(
//!     config.world_bounds(),
//!     config.octree,
//!     config.batch_size,
//!     publisher,
//! )?;
//!
//! // Supplier: any capability producing the i-th point
//! let supplier = |i: usize| Some(Vec3::new(i as f32 % 90.0, 0.0, 0.0));
//! manager.regenerate(supplier, 1_000)?;
//!
//! // Host loop: one batch of build work plus a cadence check per tick
//! while manager.is_rebuilding() {
//!     manager.update(&|| Vec3::zeros());
//! }
//! let nearby = manager.index().query_radius(Vec3::zeros(), 10.0);
//! # assert!(!nearby.is_empty());
//! # Ok::<(), swarm_engine::spatial::IndexError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod spatial;
pub mod loading;
pub mod publish;
pub mod config;

mod manager;

pub use manager::{FullPointSetSink, IndexHandle, SwarmManager};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SwarmConfig},
        foundation::math::Vec3,
        loading::{BulkLoader, LoadProgress, LoadState, LoadSummary, PointSupplier, ProgressSink},
        publish::{FocusProvider, NeighborPublisher, NeighborSetSink},
        spatial::{Aabb, IndexError, InsertOutcome, Octree, OctreeConfig},
        FullPointSetSink, IndexHandle, SwarmManager,
    };
}
