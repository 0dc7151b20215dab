//! Scene graph and render context owned by an annotation session.

use glam::Vec2;
use shared::{CuboidDescriptor, Point3, Rgb};

use super::camera::OrbitControls;
use super::point_cloud::PointCloud;

/// Handle of a node in the scene graph
pub type NodeId = u64;

/// Something the viewport can draw
#[derive(Clone, Debug)]
pub enum Renderable {
    PointCloud(PointCloud),
    /// Feedback dot for an in-progress pick
    Marker { position: Point3, color: Rgb },
    /// Finished cuboid, drawn as a wireframe
    Cuboid(CuboidDescriptor),
    Group(Vec<SceneNode>),
}

impl Renderable {
    /// Markers are feedback only and never intercept picks
    fn default_pickable(&self) -> bool {
        !matches!(self, Renderable::Marker { .. })
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub renderable: Renderable,
    pub visible: bool,
    pub pickable: bool,
}

impl SceneNode {
    fn find(&self, id: NodeId) -> Option<&SceneNode> {
        if self.id == id {
            return Some(self);
        }
        match &self.renderable {
            Renderable::Group(children) => children.iter().find_map(|c| c.find(id)),
            _ => None,
        }
    }

    fn find_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        if self.id == id {
            return Some(self);
        }
        match &mut self.renderable {
            Renderable::Group(children) => children.iter_mut().find_map(|c| c.find_mut(id)),
            _ => None,
        }
    }

    /// Visit this node and all descendants
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a SceneNode)) {
        f(self);
        if let Renderable::Group(children) = &self.renderable {
            for child in children {
                child.walk(f);
            }
        }
    }
}

fn remove_from(nodes: &mut Vec<SceneNode>, id: NodeId) -> bool {
    if let Some(pos) = nodes.iter().position(|n| n.id == id) {
        nodes.remove(pos);
        return true;
    }
    nodes.iter_mut().any(|n| match &mut n.renderable {
        Renderable::Group(children) => remove_from(children, id),
        _ => false,
    })
}

/// Flat list of top-level nodes; groups nest further nodes.
#[derive(Default, Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    next_id: NodeId,
    /// Monotonically increasing version counter, bumped on every mutation
    version: u64,
}

impl SceneGraph {
    fn make_node(&mut self, name: &str, renderable: Renderable) -> SceneNode {
        self.next_id += 1;
        self.version += 1;
        SceneNode {
            id: self.next_id,
            name: name.to_string(),
            pickable: renderable.default_pickable(),
            renderable,
            visible: true,
        }
    }

    /// Add a top-level node
    pub fn add(&mut self, name: &str, renderable: Renderable) -> NodeId {
        let node = self.make_node(name, renderable);
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Add a node under an existing group; None if `group` is not a group
    pub fn add_to_group(&mut self, group: NodeId, name: &str, renderable: Renderable) -> Option<NodeId> {
        let node = self.make_node(name, renderable);
        let id = node.id;
        match self.find_mut(group).map(|g| &mut g.renderable) {
            Some(Renderable::Group(children)) => {
                children.push(node);
                Some(id)
            }
            _ => None,
        }
    }

    /// Remove a node (and its children) wherever it is
    pub fn remove(&mut self, id: NodeId) -> bool {
        let removed = remove_from(&mut self.nodes, id);
        if removed {
            self.version += 1;
        }
        removed
    }

    /// Swap what a node draws, keeping its id
    pub fn replace(&mut self, id: NodeId, renderable: Renderable) -> bool {
        match self.find_mut(id) {
            Some(node) => {
                node.pickable = renderable.default_pickable();
                node.renderable = renderable;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        match self.find_mut(id) {
            Some(node) => {
                node.visible = visible;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find_map(|n| n.find(id))
    }

    fn find_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find_map(|n| n.find_mut(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Top-level nodes
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Visit every node, depth first
    pub fn walk<'a>(&'a self, mut f: impl FnMut(&'a SceneNode)) {
        for node in &self.nodes {
            node.walk(&mut f);
        }
    }

    /// Number of nodes (recursive) matching a predicate
    pub fn count_where(&self, mut pred: impl FnMut(&Renderable) -> bool) -> usize {
        let mut count = 0;
        self.walk(|n| {
            if pred(&n.renderable) {
                count += 1;
            }
        });
        count
    }

    pub fn marker_count(&self) -> usize {
        self.count_where(|r| matches!(r, Renderable::Marker { .. }))
    }

    pub fn cuboid_count(&self) -> usize {
        self.count_where(|r| matches!(r, Renderable::Cuboid(_)))
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Screen rectangle the scene is rendered into, in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    pub fn contains(&self, screen: Vec2) -> bool {
        screen.x >= self.left
            && screen.y >= self.top
            && screen.x <= self.left + self.width
            && screen.y <= self.top + self.height
    }

    /// Pixel → NDC (x right, y up, both in -1..=1 inside the viewport)
    pub fn to_ndc(&self, screen: Vec2) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        Some(Vec2::new(
            (screen.x - self.left) / self.width * 2.0 - 1.0,
            -((screen.y - self.top) / self.height) * 2.0 + 1.0,
        ))
    }

    /// NDC → pixel
    pub fn to_screen(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.left + (ndc.x + 1.0) * 0.5 * self.width,
            self.top + (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}

/// Everything needed to render and pick: scene, camera controls and viewport.
#[derive(Clone, Debug, Default)]
pub struct RenderContext {
    pub scene: SceneGraph,
    pub controls: OrbitControls,
    pub viewport: Viewport,
}

impl RenderContext {
    pub fn new(controls: OrbitControls, viewport: Viewport) -> Self {
        Self {
            scene: SceneGraph::default(),
            controls,
            viewport,
        }
    }
}
