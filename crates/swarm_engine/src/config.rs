//! Configuration system

pub use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec3;
use crate::spatial::{Aabb, OctreeConfig};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level engine configuration
///
/// Defaults mirror a mid-size interactive scene: a 200-unit world cube
/// around the origin, 10,000 points, neighbor queries of radius 10
/// every 10th tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Center of the fixed world volume
    pub world_center: Vec3,

    /// Edge length of the cubic world volume
    pub world_size: f32,

    /// Number of points requested per rebuild
    pub point_count: usize,

    /// Points inserted per cooperative batch during bulk load
    pub batch_size: usize,

    /// Radius of the neighbor query around the focus point
    pub neighbor_radius: f32,

    /// Publish a neighbor set every N ticks
    pub publish_cadence: u64,

    /// Octree splitting parameters
    pub octree: OctreeConfig,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            world_center: Vec3::zeros(),
            world_size: 200.0,
            point_count: 10_000,
            batch_size: crate::loading::DEFAULT_BATCH_SIZE,
            neighbor_radius: 10.0,
            publish_cadence: 10,
            octree: OctreeConfig::default(),
        }
    }
}

impl Config for SwarmConfig {}

impl SwarmConfig {
    /// The world bounding volume this configuration describes
    pub fn world_bounds(&self) -> Aabb {
        Aabb::from_center_extents(self.world_center, Vec3::repeat(self.world_size * 0.5))
    }
}
