//! Point cloud data and PCD loading.

use std::path::Path;

use glam::Vec3;

use crate::error::{AnnotationError, AnnotationResult};

use super::picking::Aabb;

/// Immutable set of points with cached bounds
#[derive(Clone, Debug)]
pub struct PointCloud {
    points: Vec<Vec3>,
    bounds: Aabb,
}

impl PointCloud {
    /// Non-finite points are dropped; an empty result is an error.
    pub fn from_points(points: Vec<Vec3>) -> AnnotationResult<Self> {
        let total = points.len();
        let points: Vec<Vec3> = points.into_iter().filter(|p| p.is_finite()).collect();
        if points.len() < total {
            tracing::debug!("Dropped {} non-finite points", total - points.len());
        }
        let bounds = Aabb::from_points(&points)
            .ok_or_else(|| AnnotationError::PointCloud("point cloud has no valid points".into()))?;
        Ok(Self { points, bounds })
    }

    /// Load a `.pcd` file; the first three fields of each record are x, y, z.
    pub fn load_pcd(path: impl AsRef<Path>) -> AnnotationResult<Self> {
        let path = path.as_ref();
        let reader = pcd_rs::DynReader::open(path)
            .map_err(|e| AnnotationError::PointCloud(format!("{}: {e}", path.display())))?;

        let mut points = Vec::new();
        for record in reader {
            let record = record
                .map_err(|e| AnnotationError::PointCloud(format!("{}: {e}", path.display())))?;
            if let Some([x, y, z]) = record.to_xyz::<f32>() {
                points.push(Vec3::new(x, y, z));
            }
        }

        let cloud = Self::from_points(points)?;
        tracing::info!(
            "Loaded {} points from {} (bounds {:?} .. {:?})",
            cloud.len(),
            path.display(),
            cloud.bounds.min,
            cloud.bounds.max
        );
        Ok(cloud)
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}
