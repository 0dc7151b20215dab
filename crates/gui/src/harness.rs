//! Headless test harness for driving an annotation session.
//!
//! Owns a session with a fixed viewport, records every [`SessionEvent`] and
//! exposes the clicks and queries a user would perform through the window.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use shared::{CuboidDescriptor, OrientationPolicy, Point3};

use crate::error::AnnotationResult;
use crate::palette::ColorPicker;
use crate::state::{AnnotationSession, AnnotationSettings, PickOutcome, SessionEvent, SessionState};
use crate::viewport::camera::OrbitControls;
use crate::viewport::point_cloud::PointCloud;
use crate::viewport::scene::{RenderContext, Viewport};

/// Headless test harness: session, event log and a deterministic palette
pub struct TestHarness {
    pub session: AnnotationSession,
    events: Rc<RefCell<Vec<SessionEvent>>>,
}

impl TestHarness {
    /// Empty scene, 800x600 viewport, default settings
    pub fn new() -> Self {
        Self::with_settings(&AnnotationSettings::default())
    }

    pub fn with_settings(settings: &AnnotationSettings) -> Self {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        let context = RenderContext::new(controls, Viewport::default());
        let mut session =
            AnnotationSession::new(context, settings).with_colors(ColorPicker::seeded(0));

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        Self { session, events }
    }

    /// Harness with `cloud` loaded and the camera framed on it
    pub fn with_cloud(cloud: PointCloud) -> Self {
        let mut h = Self::new();
        h.session.load_point_cloud(cloud);
        h
    }

    // ── Input ─────────────────────────────────────────────────

    pub fn enable_create_mode(&mut self) {
        self.session.enable_create_mode();
    }

    pub fn disable_create_mode(&mut self) {
        self.session.disable_create_mode();
    }

    /// Click at window coordinates
    pub fn click(&mut self, x: f32, y: f32) -> AnnotationResult<PickOutcome> {
        self.session.on_pointer_click(x, y)
    }

    /// Click wherever `point` appears on screen; `Missed` if it is off screen
    pub fn click_world(&mut self, point: Point3) -> AnnotationResult<PickOutcome> {
        match self.screen_position(point) {
            Some(screen) => self.click(screen.x, screen.y),
            None => Ok(PickOutcome::Missed),
        }
    }

    /// Enable create mode and click the three points in order
    pub fn create_cuboid(&mut self, points: [Point3; 3]) -> AnnotationResult<PickOutcome> {
        self.enable_create_mode();
        let mut last = PickOutcome::Ignored;
        for p in points {
            last = self.click_world(p)?;
        }
        Ok(last)
    }

    pub fn set_orientation_policy(&mut self, policy: OrientationPolicy) {
        self.session.set_orientation_policy(policy);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.session.set_viewport(viewport);
    }

    /// Drag-orbit as the viewport would; returns whether rotation was accepted
    pub fn drag(&mut self, dx: f32, dy: f32) -> bool {
        let accepted = self.session.controls_mut().rotate(dx, dy);
        self.session.tick();
        accepted
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn screen_position(&self, point: Point3) -> Option<Vec2> {
        let viewport = self.session.viewport();
        self.session
            .controls()
            .camera
            .project(point, viewport)
            .filter(|s| viewport.contains(*s))
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn cuboid_count(&self) -> usize {
        self.session.cuboids().len()
    }

    pub fn cuboid(&self, index: usize) -> Option<&CuboidDescriptor> {
        self.session.cuboids().get(index)
    }

    pub fn picked_count(&self) -> usize {
        self.session.picked_count()
    }

    /// Markers currently present in the scene graph
    pub fn marker_count(&self) -> usize {
        self.session.scene().marker_count()
    }

    /// Cuboid wireframes currently present in the scene graph
    pub fn wireframe_count(&self) -> usize {
        self.session.scene().cuboid_count()
    }

    /// Status line text, as shown under the viewport
    pub fn status_text(&self) -> String {
        format!("{} of 3 points selected", self.picked_count())
    }

    /// Events received so far
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
