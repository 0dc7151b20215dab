//! In-progress pick buffer and the marker nodes that visualize it.

use shared::{Point3, Rgb};

use crate::viewport::scene::{NodeId, Renderable, SceneGraph};

/// Picks needed for one cuboid
pub const PICKS_PER_CUBOID: usize = 3;

/// Up to three picked points, in pick order
#[derive(Default, Debug, Clone, PartialEq)]
pub struct PickBuffer {
    points: Vec<Point3>,
}

impl PickBuffer {
    /// Append a pick. When this completes the triple, the buffer is emptied
    /// and the three points are returned.
    pub fn push(&mut self, point: Point3) -> Option<[Point3; PICKS_PER_CUBOID]> {
        self.points.push(point);
        if self.points.len() < PICKS_PER_CUBOID {
            return None;
        }
        let triple = [self.points[0], self.points[1], self.points[2]];
        self.points.clear();
        Some(triple)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }
}

/// Marker nodes owned by the current pick sequence
#[derive(Default, Debug, Clone)]
pub struct TransientMarkers {
    nodes: Vec<NodeId>,
}

impl TransientMarkers {
    pub fn spawn(&mut self, scene: &mut SceneGraph, position: Point3, color: Rgb) -> NodeId {
        let name = format!("Pick marker {}", self.nodes.len() + 1);
        let id = scene.add(&name, Renderable::Marker { position, color });
        self.nodes.push(id);
        id
    }

    /// Remove every marker from the scene
    pub fn dispose(&mut self, scene: &mut SceneGraph) {
        for id in self.nodes.drain(..) {
            scene.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_buffer_fills_then_empties() {
        let mut b = PickBuffer::default();
        assert!(b.push(Vec3::X).is_none());
        assert!(b.push(Vec3::Y).is_none());
        assert_eq!(b.len(), 2);
        assert_eq!(b.push(Vec3::Z), Some([Vec3::X, Vec3::Y, Vec3::Z]));
        assert!(b.is_empty());
    }

    #[test]
    fn test_buffer_clear() {
        let mut b = PickBuffer::default();
        b.push(Vec3::ONE);
        b.clear();
        assert!(b.points().is_empty());
    }

    #[test]
    fn test_markers_spawn_and_dispose() {
        let mut scene = SceneGraph::default();
        let mut markers = TransientMarkers::default();
        let yellow = Rgb::new(255, 255, 0);
        markers.spawn(&mut scene, Vec3::ZERO, yellow);
        markers.spawn(&mut scene, Vec3::X, yellow);
        assert_eq!(markers.len(), 2);
        assert_eq!(scene.marker_count(), 2);

        markers.dispose(&mut scene);
        assert!(markers.is_empty());
        assert_eq!(scene.marker_count(), 0);
    }

    #[test]
    fn test_dispose_leaves_other_nodes() {
        let mut scene = SceneGraph::default();
        let other = scene.add("other", Renderable::Group(Vec::new()));
        let mut markers = TransientMarkers::default();
        markers.spawn(&mut scene, Vec3::ONE, Rgb::default());
        markers.dispose(&mut scene);
        assert!(scene.contains(other));
    }
}
