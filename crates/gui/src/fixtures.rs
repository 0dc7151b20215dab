//! Factory functions for synthetic point clouds.
//!
//! Used by tests, the headless harness and the binary when it starts
//! without a `.pcd` file. All generators are deterministic.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::AnnotationResult;
use crate::viewport::point_cloud::PointCloud;

// ── Point sets ──────────────────────────────────────────────────

/// Regular grid on the z = `z` plane, `n` x `n` points spanning `size`.
pub fn plane_points(size: f32, n: usize, z: f32) -> Vec<Vec3> {
    let n = n.max(2);
    let step = size / (n - 1) as f32;
    let origin = -size * 0.5;
    let mut points = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            points.push(Vec3::new(origin + i as f32 * step, origin + j as f32 * step, z));
        }
    }
    points
}

/// Points on the six faces of an axis-aligned box, `per_edge` samples per side.
pub fn box_surface_points(center: Vec3, size: Vec3, per_edge: usize) -> Vec<Vec3> {
    let n = per_edge.max(2);
    let h = size * 0.5;
    let lerp = |k: usize| -1.0 + 2.0 * k as f32 / (n - 1) as f32;
    let mut points = Vec::with_capacity(6 * n * n);
    for a in 0..n {
        for b in 0..n {
            let (u, v) = (lerp(a), lerp(b));
            for s in [-1.0, 1.0] {
                points.push(center + Vec3::new(s, u, v) * h);
                points.push(center + Vec3::new(u, s, v) * h);
                points.push(center + Vec3::new(u, v, s) * h);
            }
        }
    }
    points
}

/// `count` uniformly scattered points inside the box [-extent, extent]^3.
pub fn scattered_points(count: usize, extent: f32, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.random_range(-extent..=extent),
                rng.random_range(-extent..=extent),
                rng.random_range(-extent..=extent),
            )
        })
        .collect()
}

// ── Clouds ──────────────────────────────────────────────────────

/// The three corner picks used throughout the tests, as a cloud
pub fn corner_points() -> [Vec3; 3] {
    [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 0.0)]
}

/// Sparse cloud holding only the corner points, so every pick snaps exactly
pub fn corner_cloud() -> AnnotationResult<PointCloud> {
    PointCloud::from_points(corner_points().to_vec())
}

/// A ground plane with a box sitting on it: something worth annotating
pub fn annotation_scene() -> AnnotationResult<PointCloud> {
    let mut points = plane_points(20.0, 81, 0.0);
    points.extend(box_surface_points(Vec3::new(2.0, 1.0, 1.0), Vec3::new(3.0, 2.0, 2.0), 16));
    points.extend(box_surface_points(Vec3::new(-4.0, -3.0, 0.75), Vec3::new(1.5, 1.5, 1.5), 12));
    PointCloud::from_points(points)
}
