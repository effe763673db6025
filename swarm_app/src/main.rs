//! Swarm engine demo application
//!
//! Drives the full pipeline from the host side: a synthetic point
//! supplier feeds a frame-budgeted rebuild, progress and point-set
//! sinks log what a renderer would upload, and a moving focus point
//! exercises the cadenced neighbor publisher. Position generation and
//! "rendering" both live here, outside the engine core.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swarm_engine::foundation::time::Timer;
use swarm_engine::loading;
use swarm_engine::prelude::*;

/// Deterministic noise-based point supplier
///
/// Stands in for the procedural distribution a real scene would use:
/// every index maps to a reproducible point inside a sphere around the
/// world center.
struct NoiseSupplier {
    seed: u64,
    radius: f32,
}

impl PointSupplier for NoiseSupplier {
    fn point_at(&self, index: usize) -> Option<Vec3> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(index as u64));
        // Rejection-sample the unit ball, then scale out
        loop {
            let candidate = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            if candidate.magnitude_squared() <= 1.0 {
                return Some(candidate * self.radius);
            }
        }
    }
}

/// Logs rebuild progress the way a loading bar would consume it
struct ProgressLogger;

impl ProgressSink for ProgressLogger {
    fn on_progress(&mut self, progress: LoadProgress) {
        log::info!("rebuild progress: {}/{}", progress.inserted, progress.total);
    }
}

/// Stand-in for the GPU position-buffer upload
struct PointSetLogger;

impl FullPointSetSink for PointSetLogger {
    fn on_point_set(&mut self, points: &[Vec3]) {
        log::info!("full point set published: {} points", points.len());
    }
}

/// Stand-in for the nearest-neighbor buffer upload
struct NeighborLogger;

impl NeighborSetSink for NeighborLogger {
    fn on_neighbors(&mut self, neighbors: &[Vec3]) {
        log::info!("neighbor set published: {} points", neighbors.len());
    }
}

fn run() -> Result<(), IndexError> {
    let config = SwarmConfig {
        point_count: 500_000,
        batch_size: 50_000,
        ..Default::default()
    };

    let publisher = NeighborPublisher::new(config.neighbor_radius, config.publish_cadence);
    let mut manager = SwarmManager::new(
        config.world_bounds(),
        config.octree,
        config.batch_size,
        publisher,
    )?;
    manager.subscribe_progress(Box::new(ProgressLogger));
    manager.subscribe_points(Box::new(PointSetLogger));
    manager.subscribe_neighbors(Box::new(NeighborLogger));

    let supplier = NoiseSupplier {
        seed: 0x5eed,
        radius: config.world_size * 0.45,
    };
    manager.regenerate(supplier, config.point_count)?;

    // Cooperative host loop: one batch of build work per frame while the
    // focus orbits the swarm.
    let mut timer = Timer::new();
    let mut angle = 0.0f32;
    for _frame in 0..200 {
        timer.update();
        angle += 0.02;
        let orbit = move || Vec3::new(angle.cos() * 30.0, 0.0, angle.sin() * 30.0);
        manager.update(&orbit);
    }
    log::info!(
        "ran {} frames in {:.2}s, index holds {} points, last neighbor set {}",
        timer.frame_count(),
        timer.total_time(),
        manager.index().len(),
        manager.neighbors().len(),
    );

    // Same point set again, this time through the parallel worker-pool
    // path, published wholesale.
    let points = manager.points().to_vec();
    let fresh = Octree::new(config.world_bounds(), config.octree)?;
    let (tree, summary) = loading::load_parallel(fresh, &points, config.batch_size);
    manager.publish(tree, points, summary);
    log::info!(
        "parallel reload: {} inserted, {} rejected",
        summary.inserted,
        summary.rejected
    );

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("demo failed: {err}");
        std::process::exit(1);
    }
}
