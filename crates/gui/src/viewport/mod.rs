//! 3D viewport panel: routes pointer input into the annotation session and paints the scene

pub use annotator_lib::viewport::{camera, picking, point_cloud, scene};
pub mod renderer;

use egui::Ui;

use crate::app::CREATE_MODE_ACCENT;
use crate::i18n::t;
use crate::state::{AppState, PickOutcome, PICKS_PER_CUBOID};
use scene::Viewport;

/// Scroll → zoom factor
const ZOOM_SPEED: f32 = 0.01;
/// Pan distance per pixel, relative to the camera distance
const PAN_SPEED: f32 = 0.0015;

/// 3D viewport panel
pub struct ViewportPanel {
    /// Last viewport rect pushed into the session
    last_viewport: Option<Viewport>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self { last_viewport: None }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        let viewport = Viewport::new(rect.left(), rect.top(), rect.width(), rect.height());
        if self.last_viewport != Some(viewport) {
            tracing::debug!("Viewport resized to {}x{}", rect.width(), rect.height());
            self.last_viewport = Some(viewport);
        }
        state.session.set_viewport(viewport);

        // ── Camera controls ─────────────────────────────
        self.handle_camera(&response, ui, state);

        // ── Point picking ─────────────────────────────
        self.handle_click(&response, state);

        if state.session.is_create_mode() && response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        let painter = ui.painter_at(rect);
        renderer::paint_scene(&painter, rect, state);

        // ── Overlays ─────────────────────────────────────
        self.draw_overlays(&painter, rect, state);
    }

    fn handle_camera(&mut self, response: &egui::Response, ui: &Ui, state: &mut AppState) {
        let controls = state.session.controls_mut();

        // Primary or middle drag → orbit (ignored while points are being collected)
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            controls.rotate(delta.x, delta.y);
        }

        // Secondary drag → pan
        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            let scale = controls.camera.distance * PAN_SPEED;
            controls.pan(-delta.x * scale, delta.y * scale);
        }

        // Scroll → zoom
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                controls.zoom((scroll * ZOOM_SPEED).clamp(-0.5, 0.5));
            }
        }
    }

    fn handle_click(&mut self, response: &egui::Response, state: &mut AppState) {
        if !response.clicked() || !state.session.is_create_mode() {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };

        match state.session.on_pointer_click(pos.x, pos.y) {
            Ok(PickOutcome::Completed { index }) => {
                tracing::info!("Cuboid #{} created", index + 1);
                state.last_error = None;
            }
            Ok(PickOutcome::Collected { count, point }) => {
                tracing::debug!("Picked point {count}/{PICKS_PER_CUBOID} at {point}");
                state.last_error = None;
            }
            Ok(PickOutcome::Missed) => {
                tracing::debug!("Click at ({:.0}, {:.0}) hit nothing", pos.x, pos.y);
            }
            Ok(PickOutcome::Ignored) => {}
            Err(e) => {
                tracing::warn!("Pick rejected: {e}");
                state.last_error = Some(e.to_string());
            }
        }
    }

    fn draw_overlays(&self, painter: &egui::Painter, rect: egui::Rect, state: &AppState) {
        if !state.session.is_create_mode() {
            return;
        }

        // Create-mode frame and hint in the top-left corner
        painter.rect_stroke(
            rect.shrink(1.0),
            0.0,
            egui::Stroke::new(2.0, CREATE_MODE_ACCENT),
            egui::StrokeKind::Inside,
        );
        let hint = format!(
            "{}: {} / {}",
            t("tb.create_cuboid"),
            state.session.picked_count(),
            PICKS_PER_CUBOID
        );
        painter.text(
            rect.left_top() + egui::vec2(10.0, 10.0),
            egui::Align2::LEFT_TOP,
            hint,
            egui::FontId::proportional(14.0),
            CREATE_MODE_ACCENT,
        );
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}
