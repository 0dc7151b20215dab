use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

mod color;

pub use color::Rgb;

/// A point in world space
pub type Point3 = Vec3;

/// How the orientation of a new cuboid is derived from its three picks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationPolicy {
    /// Identity frame; the third pick only completes the cuboid
    #[default]
    AxisAligned,
    /// Frame spanned by the pick edges, re-orthogonalized into a rotation
    ThreePointFrame,
}

impl OrientationPolicy {
    pub fn all() -> &'static [OrientationPolicy] {
        &[OrientationPolicy::AxisAligned, OrientationPolicy::ThreePointFrame]
    }
}

/// Finished cuboid annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuboidDescriptor {
    /// Box center in world space
    pub center: Point3,
    /// Full extent along each local axis (never negative)
    pub size: Vec3,
    /// Local frame; columns are the box x/y/z axes in world space
    pub orientation: Mat3,
    /// Display color
    pub color: Rgb,
}

impl CuboidDescriptor {
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    /// Orientation as a unit quaternion
    pub fn rotation(&self) -> Quat {
        Quat::from_mat3(&self.orientation).normalize()
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.orientation.abs_diff_eq(Mat3::IDENTITY, 1e-6)
    }

    /// Convert a world point into the box's local frame (origin at center)
    pub fn to_local(&self, point: Point3) -> Vec3 {
        self.orientation.transpose() * (point - self.center)
    }

    /// Convert a local-frame point back into world space
    pub fn to_world(&self, local: Vec3) -> Point3 {
        self.center + self.orientation * local
    }

    /// The 8 corners; bit 0/1/2 of the index select +x/+y/+z
    pub fn corners(&self) -> [Point3; 8] {
        let h = self.half_extents();
        std::array::from_fn(|i| {
            let sx = if i & 1 != 0 { 1.0 } else { -1.0 };
            let sy = if i & 2 != 0 { 1.0 } else { -1.0 };
            let sz = if i & 4 != 0 { 1.0 } else { -1.0 };
            self.to_world(Vec3::new(sx * h.x, sy * h.y, sz * h.z))
        })
    }

    /// The 12 wireframe edges as corner pairs
    pub fn edges(&self) -> [(Point3, Point3); 12] {
        const EDGES: [(usize, usize); 12] = [
            // along x
            (0, 1), (2, 3), (4, 5), (6, 7),
            // along y
            (0, 2), (1, 3), (4, 6), (5, 7),
            // along z
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        let corners = self.corners();
        EDGES.map(|(a, b)| (corners[a], corners[b]))
    }

    /// Whether a world point lies inside or on the box (with tolerance)
    pub fn contains_point(&self, point: Point3, tolerance: f32) -> bool {
        let local = self.to_local(point).abs();
        let h = self.half_extents() + Vec3::splat(tolerance);
        local.x <= h.x && local.y <= h.y && local.z <= h.z
    }

    pub fn volume(&self) -> f32 {
        self.size.x * self.size.y * self.size.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> CuboidDescriptor {
        CuboidDescriptor {
            center: Vec3::new(1.0, 2.0, 3.0),
            size: Vec3::new(2.0, 4.0, 6.0),
            orientation: Mat3::IDENTITY,
            color: Rgb::new(255, 0, 0),
        }
    }

    #[test]
    fn test_corners_span_size() {
        let b = unit_box();
        let corners = b.corners();
        assert_eq!(corners[0], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(corners[7], Vec3::new(2.0, 4.0, 6.0));
        let centroid = corners.iter().copied().sum::<Vec3>() / 8.0;
        assert!(centroid.abs_diff_eq(b.center, 1e-6));
    }

    #[test]
    fn test_edges_total_length() {
        let b = unit_box();
        let total: f32 = b.edges().iter().map(|(a, c)| (*c - *a).length()).sum();
        assert!((total - 4.0 * (2.0 + 4.0 + 6.0)).abs() < 1e-5);
    }

    #[test]
    fn test_contains_point() {
        let b = unit_box();
        assert!(b.contains_point(b.center, 0.0));
        assert!(b.contains_point(Vec3::new(2.0, 4.0, 6.0), 1e-6));
        assert!(!b.contains_point(Vec3::new(2.1, 4.0, 6.0), 1e-6));
    }

    #[test]
    fn test_rotated_box_round_trips_local_coordinates() {
        let mut b = unit_box();
        b.orientation = Mat3::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let world = b.to_world(Vec3::new(1.0, 0.0, 0.0));
        assert!(world.abs_diff_eq(Vec3::new(1.0, 3.0, 3.0), 1e-5));
        assert!(b.to_local(world).abs_diff_eq(Vec3::X, 1e-5));
        assert!(!b.is_axis_aligned());
    }

    #[test]
    fn test_rotation_of_identity_frame() {
        let b = unit_box();
        assert!(b.rotation().abs_diff_eq(Quat::IDENTITY, 1e-6));
        assert!(b.is_axis_aligned());
        assert_eq!(b.volume(), 48.0);
    }

    #[test]
    fn test_orientation_policy_serde() {
        let json = serde_json::to_string(&OrientationPolicy::ThreePointFrame).unwrap();
        assert_eq!(json, "\"three_point_frame\"");
        let p: OrientationPolicy = serde_json::from_str("\"axis_aligned\"").unwrap();
        assert_eq!(p, OrientationPolicy::AxisAligned);
    }
}
