//! Axis-aligned bounding volume primitive
//!
//! The box tests here define the index's routing semantics: containment
//! is a closed-interval test on every axis, and octant routing sends a
//! point sitting exactly on a split plane to the positive-side child
//! (the box whose min corner is that plane).

use crate::foundation::math::Vec3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half-extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// True if `min` is strictly below `max` on every axis.
    ///
    /// A degenerate box cannot be subdivided and is rejected at index
    /// construction time.
    pub fn is_valid(&self) -> bool {
        self.min.x < self.max.x && self.min.y < self.max.y && self.min.z < self.max.z
    }

    /// Check if this AABB contains a point (closed interval on all axes)
    ///
    /// NaN coordinates fail every comparison, so points with NaN
    /// components are never contained.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Get the octant index (0-7) for a position relative to this box's center
    ///
    /// Bit 0 is set when `position.x >= center.x`, bit 1 for y, bit 2
    /// for z. Points exactly on a split plane route to the positive
    /// octant.
    pub fn octant_index(&self, position: Vec3) -> usize {
        let center = self.center();
        let x_bit = usize::from(position.x >= center.x);
        let y_bit = usize::from(position.y >= center.y);
        let z_bit = usize::from(position.z >= center.z);
        (z_bit << 2) | (y_bit << 1) | x_bit
    }

    /// Split this box at its center into 8 equal child boxes
    ///
    /// Child `i` occupies the upper half on axis `a` iff bit `a` of `i`
    /// is set, matching [`Self::octant_index`].
    pub fn split_octants(&self) -> [Aabb; 8] {
        let center = self.center();
        std::array::from_fn(|octant| {
            let mut min = self.min;
            let mut max = center;
            if octant & 1 != 0 {
                min.x = center.x;
                max.x = self.max.x;
            }
            if octant & 2 != 0 {
                min.y = center.y;
                max.y = self.max.y;
            }
            if octant & 4 != 0 {
                min.z = center.z;
                max.z = self.max.z;
            }
            Aabb::new(min, max)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_contains_point_closed_interval() {
        let aabb = unit_box();
        assert!(aabb.contains_point(Vec3::zeros()));
        // Boundary points belong to the box on both sides
        assert!(aabb.contains_point(Vec3::new(1.0, 0.0, 0.0)));
        assert!(aabb.contains_point(Vec3::new(-1.0, -1.0, -1.0)));
        assert!(!aabb.contains_point(Vec3::new(1.0001, 0.0, 0.0)));
    }

    #[test]
    fn test_contains_rejects_nan() {
        let aabb = unit_box();
        assert!(!aabb.contains_point(Vec3::new(f32::NAN, 0.0, 0.0)));
        assert!(!aabb.contains_point(Vec3::new(0.0, 0.0, f32::NAN)));
    }

    #[test]
    fn test_intersects_symmetric_and_reflexive() {
        let a = unit_box();
        let b = Aabb::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(2.0, 2.0, 2.0));
        let c = Aabb::new(Vec3::new(3.0, 3.0, 3.0), Vec3::new(4.0, 4.0, 4.0));
        assert!(a.intersects(&a));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!c.intersects(&a));
        // Separation on a single axis is enough
        let shifted = Aabb::new(Vec3::new(-1.0, 5.0, -1.0), Vec3::new(1.0, 6.0, 1.0));
        assert!(!a.intersects(&shifted));
    }

    #[test]
    fn test_split_octants_geometry() {
        let aabb = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(8.0, 8.0, 8.0));
        let children = aabb.split_octants();

        // Every child has half the extent and sits inside the parent
        for child in &children {
            assert_relative_eq!(child.extents().x, 2.0);
            assert_relative_eq!(child.extents().y, 2.0);
            assert_relative_eq!(child.extents().z, 2.0);
            assert!(aabb.contains_point(child.min));
            assert!(aabb.contains_point(child.max));
        }

        // Octant 0 is the all-negative corner, octant 7 the all-positive one
        assert_relative_eq!(children[0].min.x, 0.0);
        assert_relative_eq!(children[0].max.x, 4.0);
        assert_relative_eq!(children[7].min.z, 4.0);
        assert_relative_eq!(children[7].max.z, 8.0);
    }

    #[test]
    fn test_octant_index_matches_split() {
        let aabb = unit_box();
        let children = aabb.split_octants();
        let probes = [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
        ];
        for probe in probes {
            let index = aabb.octant_index(probe);
            assert!(children[index].contains_point(probe));
        }
    }

    #[test]
    fn test_octant_index_boundary_goes_positive() {
        let aabb = unit_box();
        // The exact center routes to the all-positive octant
        assert_eq!(aabb.octant_index(Vec3::zeros()), 7);
        assert_eq!(aabb.octant_index(Vec3::new(0.0, -0.5, -0.5)), 1);
    }

    #[test]
    fn test_is_valid() {
        assert!(unit_box().is_valid());
        let flat = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0));
        assert!(!flat.is_valid());
        let inverted = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(-1.0, -1.0, -1.0));
        assert!(!inverted.is_valid());
    }
}
