//! Math utilities and types
//!
//! Provides the fundamental vector types used by the spatial index.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Squared Euclidean distance between two points
pub fn distance_squared(a: Vec3, b: Vec3) -> f32 {
    (a - b).magnitude_squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_squared() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 6.0, 3.0);
        assert_relative_eq!(distance_squared(a, b), 25.0);
        assert_relative_eq!(distance_squared(a, a), 0.0);
    }
}
