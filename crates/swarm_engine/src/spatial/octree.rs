//! Octree spatial index
//!
//! Divides 3D space into hierarchical octants for fast radius queries
//! over very large point sets. Each node subdivides into 8 children when
//! its point count exceeds a capacity threshold, up to a maximum depth;
//! beyond that depth a leaf simply keeps growing.
//!
//! Insertion routing and query pruning both run on the closed-interval
//! box tests in [`crate::spatial::bounds`]. A radius query prunes whole
//! subtrees whose bounds miss the query box `[center - r, center + r]`,
//! then keeps only points within true Euclidean distance of the center
//! (sphere semantics).

use crate::foundation::math::{distance_squared, Vec3};
use crate::spatial::bounds::Aabb;
use serde::{Deserialize, Serialize};

/// Errors raised at index construction time
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// World bounds are not strictly ordered min < max on every axis
    #[error("degenerate world bounds: min must be strictly below max on every axis")]
    DegenerateBounds,

    /// Node capacity of zero can never hold a point
    #[error("max_points_per_node must be at least 1")]
    ZeroCapacity,

    /// A zero-depth tree cannot subdivide its root
    #[error("max_depth must be at least 1")]
    ZeroDepth,
}

/// Configuration for octree splitting behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OctreeConfig {
    /// Maximum points per node before subdivision
    pub max_points_per_node: usize,

    /// Maximum subdivision depth; leaves at this depth never split
    pub max_depth: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_points_per_node: 16,
            max_depth: 4,
        }
    }
}

impl OctreeConfig {
    /// Validate capacity and depth parameters
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.max_points_per_node == 0 {
            return Err(IndexError::ZeroCapacity);
        }
        if self.max_depth == 0 {
            return Err(IndexError::ZeroDepth);
        }
        Ok(())
    }
}

/// Result of a single point insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Point routed to a leaf; `true` when the insert forced a subdivision
    Inserted {
        /// Whether this insert pushed a leaf over capacity and split it
        caused_split: bool,
    },

    /// Point kept on an interior node's overflow list because it strayed
    /// outside that node's own volume (floating-point boundary effects)
    Retained,

    /// Point lies outside the world bounds (or has NaN coordinates) and
    /// was dropped
    Rejected,
}

impl InsertOutcome {
    /// True unless the point was dropped
    pub fn is_stored(self) -> bool {
        !matches!(self, Self::Rejected)
    }

    /// True when the insert triggered a leaf split
    pub fn caused_split(self) -> bool {
        matches!(self, Self::Inserted { caused_split: true })
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
struct OctreeNode {
    /// World-space bounds of this node
    bounds: Aabb,

    /// Points held directly: leaf storage, or the overflow list of an
    /// interior node
    points: Vec<Vec3>,

    /// Child nodes (8 octants), None if this is a leaf
    children: Option<Box<[OctreeNode; 8]>>,

    /// Depth in the tree (0 = root)
    depth: u32,
}

impl OctreeNode {
    fn new(bounds: Aabb, depth: u32) -> Self {
        Self {
            bounds,
            points: Vec::new(),
            children: None,
            depth,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Insert a point already known to be inside the root bounds
    fn insert(&mut self, point: Vec3, config: &OctreeConfig) -> InsertOutcome {
        if let Some(children) = &mut self.children {
            // Stray points that no longer fit this node's own volume stay
            // here rather than being mis-routed into a child.
            if !self.bounds.contains_point(point) {
                self.points.push(point);
                return InsertOutcome::Retained;
            }
            let octant = self.bounds.octant_index(point);
            return children[octant].insert(point, config);
        }

        self.points.push(point);

        if self.points.len() > config.max_points_per_node && self.depth < config.max_depth {
            self.split();
            InsertOutcome::Inserted { caused_split: true }
        } else {
            InsertOutcome::Inserted { caused_split: false }
        }
    }

    /// Subdivide this leaf into 8 children and redistribute its points
    fn split(&mut self) {
        debug_assert!(self.is_leaf());

        let child_bounds = self.bounds.split_octants();
        let new_children = child_bounds.map(|bounds| OctreeNode::new(bounds, self.depth + 1));
        self.children = Some(Box::new(new_children));

        let to_distribute = std::mem::take(&mut self.points);
        if let Some(children) = &mut self.children {
            for point in to_distribute {
                if self.bounds.contains_point(point) {
                    let octant = self.bounds.octant_index(point);
                    children[octant].points.push(point);
                } else {
                    // Keep strays as overflow on the freshly interior node
                    self.points.push(point);
                }
            }
        }
    }

    /// Depth-first radius query, parent before children, pruning any
    /// subtree whose bounds miss the query box
    fn query_into(&self, query_box: &Aabb, center: Vec3, radius_sq: f32, results: &mut Vec<Vec3>) {
        if !self.bounds.intersects(query_box) {
            return;
        }

        for &point in &self.points {
            if distance_squared(point, center) <= radius_sq {
                results.push(point);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_into(query_box, center, radius_sq, results);
            }
        }
    }

    fn visit_points(&self, visit: &mut impl FnMut(Vec3)) {
        for &point in &self.points {
            visit(point);
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.visit_points(visit);
            }
        }
    }

    fn count_nodes(&self) -> usize {
        let mut count = 1;
        if let Some(children) = &self.children {
            for child in children.iter() {
                count += child.count_nodes();
            }
        }
        count
    }
}

/// Octree spatial index over immutable 3D points
///
/// Points have no identity beyond position; duplicates are retained.
/// There is no removal — the point set changes only through full
/// rebuilds (build a fresh index and swap it in).
#[derive(Debug, Clone)]
pub struct Octree {
    root: OctreeNode,
    config: OctreeConfig,
    len: usize,
}

impl Octree {
    /// Create an empty octree covering `world_bounds`
    ///
    /// Fails fast on degenerate bounds or invalid capacity/depth.
    pub fn new(world_bounds: Aabb, config: OctreeConfig) -> Result<Self, IndexError> {
        if !world_bounds.is_valid() {
            return Err(IndexError::DegenerateBounds);
        }
        config.validate()?;
        Ok(Self {
            root: OctreeNode::new(world_bounds, 0),
            config,
            len: 0,
        })
    }

    /// Insert a point, routing it to the octant leaf that contains it
    ///
    /// Points outside the world bounds are dropped and reported as
    /// [`InsertOutcome::Rejected`]; they never abort a bulk load.
    pub fn insert(&mut self, point: Vec3) -> InsertOutcome {
        if !self.root.bounds.contains_point(point) {
            return InsertOutcome::Rejected;
        }
        let outcome = self.root.insert(point, &self.config);
        self.len += 1;
        outcome
    }

    /// Return all points within Euclidean distance `radius` of `center`
    ///
    /// Subtrees are pruned against the axis-aligned box
    /// `[center - r, center + r]`; surviving points are distance-filtered,
    /// so the result is the true sphere, not the enclosing cube.
    /// A negative (or NaN) radius yields an empty result.
    pub fn query_radius(&self, center: Vec3, radius: f32) -> Vec<Vec3> {
        let mut results = Vec::new();
        if !(radius >= 0.0) {
            return results;
        }
        let query_box = Aabb::from_center_extents(center, Vec3::repeat(radius));
        self.root
            .query_into(&query_box, center, radius * radius, &mut results);
        results
    }

    /// Number of points stored in the index
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no points are stored
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The fixed world volume this index covers
    pub fn world_bounds(&self) -> Aabb {
        self.root.bounds
    }

    /// The splitting configuration this index was built with
    pub fn config(&self) -> OctreeConfig {
        self.config
    }

    /// Total node count, root included (instrumentation)
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Visit every stored point in depth-first order
    pub fn visit_points(&self, mut visit: impl FnMut(Vec3)) {
        self.root.visit_points(&mut visit);
    }
}
