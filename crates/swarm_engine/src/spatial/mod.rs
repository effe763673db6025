//! Spatial partitioning data structures
//!
//! Provides the octree index used for radius queries over large point
//! swarms, plus the bounding-volume primitive it is built on.

mod bounds;
mod octree;

pub use bounds::Aabb;
pub use octree::{IndexError, InsertOutcome, Octree, OctreeConfig};
