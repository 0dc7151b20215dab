//! Annotation session: the create-mode state machine.
//!
//! While create mode is on, every resolved pointer click adds one pick and a
//! marker. The third pick builds a cuboid, stores it, adds its wireframe to
//! the scene and clears the markers. Orbit rotation is disabled for as long
//! as picks are being collected so drags do not fight clicks.

use serde::Serialize;
use shared::{CuboidDescriptor, OrientationPolicy, Point3, Rgb};

use crate::error::{AnnotationError, AnnotationResult};
use crate::geometry::{validate_cuboid, CuboidBuilder};
use crate::palette::ColorPicker;
use crate::viewport::camera::OrbitControls;
use crate::viewport::picking::{self, PickParams};
use crate::viewport::point_cloud::PointCloud;
use crate::viewport::scene::{NodeId, RenderContext, Renderable, SceneGraph, Viewport};

use super::markers::{PickBuffer, TransientMarkers, PICKS_PER_CUBOID};
use super::settings::AnnotationSettings;
use super::store::CuboidStore;

/// Where the session is in the pick sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "picked", rename_all = "snake_case")]
pub enum SessionState {
    /// Create mode off; clicks are ignored
    Idle,
    /// Create mode on with this many picks so far (0..=2)
    Collecting(usize),
}

impl SessionState {
    pub fn is_collecting(&self) -> bool {
        matches!(self, SessionState::Collecting(_))
    }
}

/// Result of one pointer click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickOutcome {
    /// Create mode is off
    Ignored,
    /// The ray hit nothing
    Missed,
    /// A pick was recorded; `count` picks are now buffered
    Collected { count: usize, point: Point3 },
    /// The third pick finished a cuboid, stored at `index`
    Completed { index: usize },
}

/// State change notification
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CreateModeChanged(bool),
    PointPicked { count: usize, point: Point3 },
    CuboidCreated { index: usize, cuboid: CuboidDescriptor },
    CuboidReplaced { index: usize },
    /// The pick buffer and markers were dropped without a cuboid
    PicksCleared,
    PickRejected(AnnotationError),
    PointCloudLoaded { points: usize },
}

/// Serializable view of the session for status displays and scripting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub picked_count: usize,
    pub picked_points: Vec<Point3>,
    pub marker_count: usize,
    pub cuboids: Vec<CuboidDescriptor>,
    pub orientation_policy: OrientationPolicy,
    pub point_count: usize,
    pub version: u64,
}

type Listener = Box<dyn FnMut(&SessionEvent)>;

pub struct AnnotationSession {
    context: RenderContext,
    builder: CuboidBuilder,
    pick_params: PickParams,
    keep_create_mode: bool,
    marker_color: Rgb,
    create_mode: bool,
    picks: PickBuffer,
    markers: TransientMarkers,
    store: CuboidStore,
    /// Wireframe node per stored cuboid, same order as the store
    cuboid_nodes: Vec<NodeId>,
    cloud_node: Option<NodeId>,
    cloud_points: usize,
    colors: ColorPicker,
    listeners: Vec<Listener>,
    version: u64,
}

impl std::fmt::Debug for AnnotationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationSession")
            .field("state", &self.state())
            .field("cuboids", &self.store.len())
            .field("listeners", &self.listeners.len())
            .field("version", &self.version)
            .finish()
    }
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self::new(RenderContext::default(), &AnnotationSettings::default())
    }
}

impl AnnotationSession {
    pub fn new(context: RenderContext, settings: &AnnotationSettings) -> Self {
        Self {
            context,
            builder: CuboidBuilder::new(settings.orientation_policy)
                .with_min_separation(settings.min_separation),
            pick_params: PickParams {
                point_threshold: settings.pick_threshold,
            },
            keep_create_mode: settings.keep_create_mode,
            marker_color: Rgb::new(255, 210, 40),
            create_mode: false,
            picks: PickBuffer::default(),
            markers: TransientMarkers::default(),
            store: CuboidStore::default(),
            cuboid_nodes: Vec::new(),
            cloud_node: None,
            cloud_points: 0,
            colors: ColorPicker::new(),
            listeners: Vec::new(),
            version: 0,
        }
    }

    /// Replace the color source (seeded pickers make runs reproducible)
    pub fn with_colors(mut self, colors: ColorPicker) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_marker_color(mut self, color: Rgb) -> Self {
        self.marker_color = color;
        self
    }

    /// Applies to markers spawned from now on
    pub fn set_marker_color(&mut self, color: Rgb) {
        self.marker_color = color;
    }

    /// Re-read the annotation settings; takes effect from the next pick
    pub fn apply_settings(&mut self, settings: &AnnotationSettings) {
        self.builder = CuboidBuilder::new(settings.orientation_policy)
            .with_min_separation(settings.min_separation);
        self.pick_params.point_threshold = settings.pick_threshold;
        self.keep_create_mode = settings.keep_create_mode;
    }

    // ── Notifications ────────────────────────────────────────

    /// Register a callback invoked after every state change
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: SessionEvent) {
        self.version += 1;
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    /// Bumped on every state change; cheap to poll from the UI
    pub fn version(&self) -> u64 {
        self.version
    }

    // ── Create mode ──────────────────────────────────────────

    pub fn set_create_mode(&mut self, enabled: bool) {
        if enabled {
            self.enable_create_mode();
        } else {
            self.disable_create_mode();
        }
    }

    /// Idle → Collecting(0). Leftover picks are discarded.
    pub fn enable_create_mode(&mut self) {
        self.clear_picks();
        self.context.controls.set_rotate_enabled(false);
        if !self.create_mode {
            self.create_mode = true;
            tracing::info!("Create mode on");
            self.emit(SessionEvent::CreateModeChanged(true));
        }
    }

    /// Any state → Idle, dropping picks without building a cuboid
    pub fn disable_create_mode(&mut self) {
        self.clear_picks();
        self.context.controls.set_rotate_enabled(true);
        if self.create_mode {
            self.create_mode = false;
            tracing::info!("Create mode off");
            self.emit(SessionEvent::CreateModeChanged(false));
        }
    }

    pub fn toggle_create_mode(&mut self) {
        self.set_create_mode(!self.create_mode);
    }

    pub fn is_create_mode(&self) -> bool {
        self.create_mode
    }

    fn clear_picks(&mut self) {
        if self.picks.is_empty() && self.markers.is_empty() {
            return;
        }
        self.picks.clear();
        self.markers.dispose(&mut self.context.scene);
        tracing::debug!("Pick buffer cleared");
        self.emit(SessionEvent::PicksCleared);
    }

    // ── Picking ──────────────────────────────────────────────

    /// Handle a click at screen coordinates (pixels, window space).
    ///
    /// `Err` only when the completing pick yields degenerate geometry; the
    /// session is then back at `Collecting(0)`.
    pub fn on_pointer_click(&mut self, screen_x: f32, screen_y: f32) -> AnnotationResult<PickOutcome> {
        if !self.create_mode {
            return Ok(PickOutcome::Ignored);
        }

        let hit = picking::pick(
            screen_x,
            screen_y,
            &self.context.viewport,
            &self.context.controls.camera,
            &self.context.scene,
            &self.pick_params,
        );

        match hit {
            Some(point) => self.accept_pick(point),
            None => {
                tracing::debug!("Click at ({screen_x:.1}, {screen_y:.1}) hit nothing");
                Ok(PickOutcome::Missed)
            }
        }
    }

    /// Record an already resolved world point as the next pick
    pub fn accept_pick(&mut self, point: Point3) -> AnnotationResult<PickOutcome> {
        if !self.create_mode {
            return Ok(PickOutcome::Ignored);
        }

        let Some([p0, p1, p2]) = self.picks.push(point) else {
            let count = self.picks.len();
            self.markers
                .spawn(&mut self.context.scene, point, self.marker_color);
            tracing::debug!("Pick {count} of {PICKS_PER_CUBOID} at {point:?}");
            self.emit(SessionEvent::PointPicked { count, point });
            return Ok(PickOutcome::Collected { count, point });
        };

        self.markers.dispose(&mut self.context.scene);
        let color = self.colors.next_color();

        let cuboid = match self.builder.build(p0, p1, p2, color) {
            Ok(cuboid) => cuboid,
            Err(e) => {
                tracing::warn!("Rejected pick sequence: {e}");
                self.emit(SessionEvent::PickRejected(e.clone()));
                self.emit(SessionEvent::PicksCleared);
                return Err(e);
            }
        };

        let index = self.store.append(cuboid.clone());
        let node = self.context.scene.add(
            &format!("Cuboid {}", index + 1),
            Renderable::Cuboid(cuboid.clone()),
        );
        self.cuboid_nodes.push(node);
        tracing::info!(
            "Created cuboid {index}: center {:?}, size {:?}",
            cuboid.center,
            cuboid.size
        );
        self.emit(SessionEvent::CuboidCreated { index, cuboid });

        if !self.keep_create_mode {
            self.disable_create_mode();
        }

        Ok(PickOutcome::Completed { index })
    }

    // ── Store ────────────────────────────────────────────────

    /// Overwrite a stored cuboid and its wireframe; malformed descriptors
    /// are rejected before anything changes
    pub fn replace_cuboid(&mut self, index: usize, cuboid: CuboidDescriptor) -> AnnotationResult<()> {
        validate_cuboid(&cuboid)?;
        self.store.replace_at(index, cuboid.clone())?;
        if let Some(&node) = self.cuboid_nodes.get(index) {
            self.context.scene.replace(node, Renderable::Cuboid(cuboid));
        }
        tracing::info!("Replaced cuboid {index}");
        self.emit(SessionEvent::CuboidReplaced { index });
        Ok(())
    }

    pub fn cuboids(&self) -> &[CuboidDescriptor] {
        self.store.as_slice()
    }

    pub fn cuboid_node(&self, index: usize) -> Option<NodeId> {
        self.cuboid_nodes.get(index).copied()
    }

    // ── Scene content ────────────────────────────────────────

    /// Show `cloud` in place of any previous cloud and frame the camera on it
    pub fn load_point_cloud(&mut self, cloud: PointCloud) {
        if let Some(old) = self.cloud_node.take() {
            self.context.scene.remove(old);
        }
        let points = cloud.len();
        let bounds = cloud.bounds();
        self.cloud_node = Some(
            self.context
                .scene
                .add("Point cloud", Renderable::PointCloud(cloud)),
        );
        self.cloud_points = points;
        self.context.controls.frame_bounds(&bounds);
        tracing::info!("Point cloud in scene: {points} points");
        self.emit(SessionEvent::PointCloudLoaded { points });
    }

    pub fn point_cloud(&self) -> Option<&PointCloud> {
        let node = self.context.scene.get(self.cloud_node?)?;
        match &node.renderable {
            Renderable::PointCloud(cloud) => Some(cloud),
            _ => None,
        }
    }

    // ── Camera / viewport ────────────────────────────────────

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.context.viewport = viewport;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.context.viewport
    }

    /// Advance camera damping; true while the view is still changing
    pub fn tick(&mut self) -> bool {
        self.context.controls.update()
    }

    pub fn reset_camera(&mut self) {
        self.context.controls.reset();
        tracing::debug!("Camera reset");
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.context.controls
    }

    /// Rotation enablement is owned by the session; pan, zoom and drag
    /// input go through here.
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.context.controls
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.context.scene
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        if self.create_mode {
            SessionState::Collecting(self.picks.len())
        } else {
            SessionState::Idle
        }
    }

    /// Picks collected towards the current cuboid
    pub fn picked_count(&self) -> usize {
        self.picks.len()
    }

    pub fn picked_points(&self) -> &[Point3] {
        self.picks.points()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn orientation_policy(&self) -> OrientationPolicy {
        self.builder.policy
    }

    pub fn set_orientation_policy(&mut self, policy: OrientationPolicy) {
        self.builder.policy = policy;
    }

    pub fn set_keep_create_mode(&mut self, keep: bool) {
        self.keep_create_mode = keep;
    }

    pub fn pick_params(&self) -> &PickParams {
        &self.pick_params
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            picked_count: self.picks.len(),
            picked_points: self.picks.points().to_vec(),
            marker_count: self.markers.len(),
            cuboids: self.store.as_slice().to_vec(),
            orientation_policy: self.builder.policy,
            point_count: self.cloud_points,
            version: self.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Degeneracy;
    use glam::{Mat3, Vec3};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> AnnotationSession {
        AnnotationSession::default().with_colors(ColorPicker::seeded(7))
    }

    fn corner_picks() -> [Vec3; 3] {
        [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 0.0)]
    }

    #[test]
    fn test_starts_idle() {
        let s = session();
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.picked_count(), 0);
        assert!(s.cuboids().is_empty());
        assert!(s.controls().rotate_enabled());
    }

    #[test]
    fn test_three_picks_make_one_cuboid_and_return_idle() {
        let mut s = session();
        s.enable_create_mode();
        assert_eq!(s.state(), SessionState::Collecting(0));

        let [p0, p1, p2] = corner_picks();
        assert_eq!(
            s.accept_pick(p0).unwrap(),
            PickOutcome::Collected { count: 1, point: p0 }
        );
        assert_eq!(s.state(), SessionState::Collecting(1));
        assert_eq!(s.scene().marker_count(), 1);
        s.accept_pick(p1).unwrap();
        assert_eq!(s.scene().marker_count(), 2);

        assert_eq!(s.accept_pick(p2).unwrap(), PickOutcome::Completed { index: 0 });
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.cuboids().len(), 1);
        assert_eq!(s.scene().marker_count(), 0);
        assert_eq!(s.scene().cuboid_count(), 1);

        let c = &s.cuboids()[0];
        assert_eq!(c.center, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(c.size, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(c.orientation, Mat3::IDENTITY);
    }

    #[test]
    fn test_disable_mid_sequence_discards_picks() {
        let mut s = session();
        s.enable_create_mode();
        s.accept_pick(Vec3::ZERO).unwrap();
        s.accept_pick(Vec3::ONE).unwrap();
        s.disable_create_mode();

        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.picked_count(), 0);
        assert_eq!(s.scene().marker_count(), 0);
        assert!(s.cuboids().is_empty());
    }

    #[test]
    fn test_idle_clicks_change_nothing() {
        let mut s = session();
        let v = s.version();
        assert_eq!(s.accept_pick(Vec3::ONE).unwrap(), PickOutcome::Ignored);
        assert_eq!(s.on_pointer_click(400.0, 300.0).unwrap(), PickOutcome::Ignored);
        assert_eq!(s.picked_count(), 0);
        assert_eq!(s.scene().marker_count(), 0);
        assert!(s.cuboids().is_empty());
        assert_eq!(s.version(), v);
    }

    #[test]
    fn test_duplicate_pair_rejected_on_third_pick() {
        let mut s = session();
        s.enable_create_mode();
        s.accept_pick(Vec3::ZERO).unwrap();
        s.accept_pick(Vec3::ZERO).unwrap();
        assert_eq!(s.state(), SessionState::Collecting(2));

        let err = s.accept_pick(Vec3::new(1.0, 1.0, 0.0)).unwrap_err();
        assert_eq!(
            err,
            AnnotationError::DegenerateGeometry(Degeneracy::Coincident(0, 1))
        );
        assert_eq!(s.state(), SessionState::Collecting(0));
        assert_eq!(s.scene().marker_count(), 0);
        assert!(s.cuboids().is_empty());
        assert!(!s.controls().rotate_enabled());
    }

    #[test]
    fn test_keep_create_mode() {
        let mut s = session();
        s.set_keep_create_mode(true);
        s.enable_create_mode();
        for p in corner_picks() {
            s.accept_pick(p).unwrap();
        }
        assert_eq!(s.state(), SessionState::Collecting(0));
        for p in corner_picks() {
            s.accept_pick(p + Vec3::Z).unwrap();
        }
        assert_eq!(s.cuboids().len(), 2);
    }

    #[test]
    fn test_rotation_suppressed_while_collecting() {
        let mut s = session();
        s.enable_create_mode();
        assert!(!s.controls().rotate_enabled());
        assert!(!s.controls_mut().rotate(30.0, 0.0));

        for p in corner_picks() {
            s.accept_pick(p).unwrap();
        }
        assert!(s.controls().rotate_enabled());
    }

    #[test]
    fn test_three_point_frame_policy() {
        let mut s = session();
        s.set_orientation_policy(OrientationPolicy::ThreePointFrame);
        s.enable_create_mode();
        for p in corner_picks() {
            s.accept_pick(p).unwrap();
        }
        let m = s.cuboids()[0].orientation;
        assert!(m.abs_diff_eq(Mat3::IDENTITY, 1e-6));
    }

    #[test]
    fn test_replace_cuboid_updates_store_and_scene() {
        let mut s = session();
        s.enable_create_mode();
        for p in corner_picks() {
            s.accept_pick(p).unwrap();
        }
        let mut edited = s.cuboids()[0].clone();
        edited.size = Vec3::splat(3.0);
        s.replace_cuboid(0, edited.clone()).unwrap();
        assert_eq!(s.cuboids()[0], edited);

        let node = s.scene().get(s.cuboid_node(0).unwrap()).unwrap();
        assert!(matches!(&node.renderable, Renderable::Cuboid(c) if *c == edited));

        let err = s.replace_cuboid(1, edited).unwrap_err();
        assert_eq!(err, AnnotationError::IndexOutOfRange { index: 1, len: 1 });
    }

    #[test]
    fn test_replace_rejects_malformed_cuboid() {
        let mut s = session();
        s.enable_create_mode();
        for p in corner_picks() {
            s.accept_pick(p).unwrap();
        }
        let before = s.cuboids()[0].clone();
        let version = s.version();

        let mut negative = before.clone();
        negative.size = Vec3::new(-1.0, 2.0, 2.0);
        let err = s.replace_cuboid(0, negative).unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidCuboid(_)));

        let mut sheared = before.clone();
        sheared.orientation = Mat3::from_cols(Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Z);
        assert!(s.replace_cuboid(0, sheared).is_err());

        assert_eq!(s.cuboids()[0], before);
        assert_eq!(s.version(), version);
    }

    #[test]
    fn test_non_finite_pick_is_rejected_on_completion() {
        let mut s = session();
        s.enable_create_mode();
        s.accept_pick(Vec3::new(f32::NAN, 0.0, 0.0)).unwrap();
        s.accept_pick(Vec3::new(2.0, 0.0, 0.0)).unwrap();

        let err = s.accept_pick(Vec3::new(2.0, 2.0, 0.0)).unwrap_err();
        assert_eq!(err, AnnotationError::DegenerateGeometry(Degeneracy::NonFinite(0)));
        assert!(s.cuboids().is_empty());
        assert_eq!(s.state(), SessionState::Collecting(0));
        assert_eq!(s.marker_count(), 0);
        assert_eq!(s.scene().cuboid_count(), 0);
    }

    #[test]
    fn test_events_are_delivered_in_order() {
        let mut s = session();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        s.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        s.enable_create_mode();
        for p in corner_picks() {
            s.accept_pick(p).unwrap();
        }

        let seen = seen.borrow();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[0], SessionEvent::CreateModeChanged(true));
        assert!(matches!(seen[1], SessionEvent::PointPicked { count: 1, .. }));
        assert!(matches!(seen[2], SessionEvent::PointPicked { count: 2, .. }));
        assert!(matches!(seen[3], SessionEvent::CuboidCreated { index: 0, .. }));
        assert_eq!(seen[4], SessionEvent::CreateModeChanged(false));
        assert_eq!(s.version(), 5);
    }

    #[test]
    fn test_enable_twice_clears_leftovers() {
        let mut s = session();
        s.enable_create_mode();
        s.accept_pick(Vec3::ONE).unwrap();
        s.enable_create_mode();
        assert_eq!(s.state(), SessionState::Collecting(0));
        assert_eq!(s.scene().marker_count(), 0);
    }

    #[test]
    fn test_click_through_camera() {
        let mut s = session();
        let cloud = PointCloud::from_points(vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]).unwrap();
        s.load_point_cloud(cloud);
        s.enable_create_mode();

        let vp = *s.viewport();
        let screen = s.controls().camera.project(Vec3::new(1.0, 0.0, 0.0), &vp).unwrap();
        let outcome = s.on_pointer_click(screen.x, screen.y).unwrap();
        assert_eq!(
            outcome,
            PickOutcome::Collected {
                count: 1,
                point: Vec3::new(1.0, 0.0, 0.0)
            }
        );

        assert_eq!(s.on_pointer_click(1.0, 1.0).unwrap(), PickOutcome::Missed);
        assert_eq!(s.picked_count(), 1);
    }

    #[test]
    fn test_load_point_cloud_replaces_previous() {
        let mut s = session();
        s.load_point_cloud(PointCloud::from_points(vec![Vec3::ZERO]).unwrap());
        s.load_point_cloud(PointCloud::from_points(vec![Vec3::ONE, Vec3::X]).unwrap());
        let clouds = s
            .scene()
            .count_where(|r| matches!(r, Renderable::PointCloud(_)));
        assert_eq!(clouds, 1);
        assert_eq!(s.point_cloud().unwrap().len(), 2);
        assert_eq!(s.snapshot().point_count, 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut s = session();
        s.enable_create_mode();
        s.accept_pick(Vec3::ONE).unwrap();
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["state"]["state"], "collecting");
        assert_eq!(json["state"]["picked"], 1);
        assert_eq!(json["picked_count"], 1);
    }
}
