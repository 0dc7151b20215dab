//! Error types for annotation operations.

use std::fmt;

/// Why three picks cannot form a cuboid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// Two picks (by pick order) are closer than the minimum separation
    Coincident(usize, usize),
    /// The picks lie on one line, so no frame can be spanned
    Collinear,
    /// A pick (by pick order) has a NaN or infinite coordinate
    NonFinite(usize),
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degeneracy::Coincident(a, b) => write!(f, "points {} and {} coincide", a + 1, b + 1),
            Degeneracy::Collinear => write!(f, "points are collinear"),
            Degeneracy::NonFinite(i) => write!(f, "point {} is not finite", i + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnnotationError {
    /// Recoverable: the session drops its picks and the user re-picks
    #[error("cannot build cuboid: {0}")]
    DegenerateGeometry(Degeneracy),

    #[error("cuboid index {index} out of range (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A replacement descriptor that no valid pick sequence could produce
    #[error("invalid cuboid: {0}")]
    InvalidCuboid(String),

    #[error("point cloud error: {0}")]
    PointCloud(String),

    #[error("settings error: {0}")]
    Settings(String),
}

pub type AnnotationResult<T> = Result<T, AnnotationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = AnnotationError::DegenerateGeometry(Degeneracy::Coincident(0, 1));
        assert_eq!(e.to_string(), "cannot build cuboid: points 1 and 2 coincide");

        let e = AnnotationError::IndexOutOfRange { index: 3, len: 2 };
        assert_eq!(e.to_string(), "cuboid index 3 out of range (store holds 2)");

        let e = AnnotationError::DegenerateGeometry(Degeneracy::NonFinite(0));
        assert_eq!(e.to_string(), "cannot build cuboid: point 1 is not finite");
    }
}
