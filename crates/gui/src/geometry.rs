//! Cuboid construction from three picked points.
//!
//! `p0` and `p1` are opposite corners of the box footprint: they fix the
//! center and the per-axis extents. `p2` never changes the extents; depending
//! on the [`OrientationPolicy`] it either only completes the pick sequence or
//! also spans the box frame together with `p0` and `p1`.

use glam::{Mat3, Vec3};
use shared::{CuboidDescriptor, OrientationPolicy, Point3, Rgb};

use crate::error::{AnnotationError, AnnotationResult, Degeneracy};
use crate::palette::ColorPicker;

/// Picks closer than this are treated as the same world point
pub const DEFAULT_MIN_SEPARATION: f32 = 1e-5;

/// Below this squared length the rejected `e_y` is considered parallel to `e_x`
const PARALLEL_EPSILON_SQ: f32 = 1e-10;

// ── Vector helpers ───────────────────────────────────────────

pub fn subtract(a: Point3, b: Point3) -> Vec3 {
    a - b
}

pub fn midpoint(a: Point3, b: Point3) -> Point3 {
    (a + b) * 0.5
}

/// Unit vector, or None for zero-length / non-finite input
pub fn normalize_checked(v: Vec3) -> Option<Vec3> {
    v.try_normalize()
}

/// Componentwise |b - a|
pub fn abs_extents(a: Point3, b: Point3) -> Vec3 {
    subtract(b, a).abs()
}

/// Unit edge directions between the three picks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeVectors {
    /// p0 → p1
    pub e_x: Vec3,
    /// p0 → p2
    pub e_y: Vec3,
    /// p1 → p2
    pub e_z: Vec3,
}

impl EdgeVectors {
    pub fn from_points(p0: Point3, p1: Point3, p2: Point3) -> Option<Self> {
        Some(Self {
            e_x: normalize_checked(subtract(p1, p0))?,
            e_y: normalize_checked(subtract(p2, p0))?,
            e_z: normalize_checked(subtract(p2, p1))?,
        })
    }

    /// Largest |cos| between any pair; 0 for mutually orthogonal edges
    pub fn max_skew(&self) -> f32 {
        self.e_x
            .dot(self.e_y)
            .abs()
            .max(self.e_x.dot(self.e_z).abs())
            .max(self.e_y.dot(self.e_z).abs())
    }
}

/// Right-handed orthonormal frame whose x axis follows `e_x` and whose
/// xy-plane contains `e_y` (Gram-Schmidt). None if the two are parallel.
pub fn orthonormal_frame(e_x: Vec3, e_y: Vec3) -> Option<Mat3> {
    let x = normalize_checked(e_x)?;
    let rejected = e_y - x * e_y.dot(x);
    if rejected.length_squared() < PARALLEL_EPSILON_SQ {
        return None;
    }
    let y = rejected.normalize();
    let z = x.cross(y);
    Some(Mat3::from_cols(x, y, z))
}

// ── Builder ──────────────────────────────────────────────────

/// Turns three picks into a [`CuboidDescriptor`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuboidBuilder {
    pub policy: OrientationPolicy,
    pub min_separation: f32,
}

impl Default for CuboidBuilder {
    fn default() -> Self {
        Self::new(OrientationPolicy::default())
    }
}

impl CuboidBuilder {
    pub fn new(policy: OrientationPolicy) -> Self {
        Self {
            policy,
            min_separation: DEFAULT_MIN_SEPARATION,
        }
    }

    pub fn with_min_separation(mut self, min_separation: f32) -> Self {
        self.min_separation = min_separation.max(0.0);
        self
    }

    /// Fails on the first non-finite pick, then on the first pair (in pick
    /// order) closer than `min_separation`
    pub fn check_separation(&self, points: &[Point3; 3]) -> AnnotationResult<()> {
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(AnnotationError::DegenerateGeometry(Degeneracy::NonFinite(i)));
        }
        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            if points[a].distance(points[b]) <= self.min_separation {
                return Err(AnnotationError::DegenerateGeometry(Degeneracy::Coincident(a, b)));
            }
        }
        Ok(())
    }

    /// Box frame for already separated picks
    pub fn orientation(&self, p0: Point3, p1: Point3, p2: Point3) -> AnnotationResult<Mat3> {
        match self.policy {
            OrientationPolicy::AxisAligned => Ok(Mat3::IDENTITY),
            OrientationPolicy::ThreePointFrame => {
                let edges = EdgeVectors::from_points(p0, p1, p2)
                    .ok_or(AnnotationError::DegenerateGeometry(Degeneracy::Collinear))?;
                let frame = orthonormal_frame(edges.e_x, edges.e_y)
                    .ok_or(AnnotationError::DegenerateGeometry(Degeneracy::Collinear))?;
                tracing::debug!(skew = edges.max_skew(), "Re-orthogonalized pick frame");
                Ok(frame)
            }
        }
    }

    pub fn build(
        &self,
        p0: Point3,
        p1: Point3,
        p2: Point3,
        color: Rgb,
    ) -> AnnotationResult<CuboidDescriptor> {
        self.check_separation(&[p0, p1, p2])?;
        let orientation = self.orientation(p0, p1, p2)?;

        Ok(CuboidDescriptor {
            center: midpoint(p0, p1),
            size: abs_extents(p0, p1),
            orientation,
            color,
        })
    }
}

/// Tolerance for `orientation` to count as a rotation
const ORTHONORMAL_EPSILON: f32 = 1e-3;

/// Reject descriptors no pick sequence could produce: non-finite values,
/// negative extents, or an orientation that is not a proper rotation.
pub fn validate_cuboid(cuboid: &CuboidDescriptor) -> AnnotationResult<()> {
    let invalid = |reason: &str| Err(AnnotationError::InvalidCuboid(reason.to_string()));

    if !cuboid.center.is_finite() {
        return invalid("center is not finite");
    }
    if !cuboid.size.is_finite() {
        return invalid("size is not finite");
    }
    if cuboid.size.min_element() < 0.0 {
        return invalid("size has a negative extent");
    }
    let m = cuboid.orientation;
    if !m.is_finite() {
        return invalid("orientation is not finite");
    }
    let gram = m.transpose() * m;
    if !gram.abs_diff_eq(Mat3::IDENTITY, ORTHONORMAL_EPSILON)
        || (m.determinant() - 1.0).abs() > ORTHONORMAL_EPSILON
    {
        return invalid("orientation is not a rotation");
    }
    Ok(())
}

/// Build a cuboid with the default separation and a fresh random color
pub fn build_cuboid(
    p0: Point3,
    p1: Point3,
    p2: Point3,
    policy: OrientationPolicy,
) -> AnnotationResult<CuboidDescriptor> {
    CuboidBuilder::new(policy).build(p0, p1, p2, ColorPicker::new().next_color())
}
