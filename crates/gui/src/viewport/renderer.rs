//! Painter-based scene rendering: point cloud, pick markers and cuboid wireframes

use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke};
use glam::{Mat4, Vec2, Vec3};
use shared::{CuboidDescriptor, Rgb};

use crate::state::{AppState, ViewportSettings};

use super::scene::{NodeId, Renderable, Viewport};

pub fn color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Brighten a color toward white by `amount` (0..=1)
fn highlight(color: Color32, amount: f32) -> Color32 {
    let lift = |c: u8| (c as f32 + (255.0 - c as f32) * amount).round() as u8;
    Color32::from_rgb(lift(color.r()), lift(color.g()), lift(color.b()))
}

/// Every n-th point is drawn so that at most `max_drawn` points reach the painter
pub fn point_stride(len: usize, max_drawn: usize) -> usize {
    if max_drawn == 0 {
        return usize::MAX;
    }
    len.div_ceil(max_drawn).max(1)
}

/// World → screen projection with clip-space culling, built once per frame.
pub struct Projector {
    view_proj: Mat4,
    viewport: Viewport,
}

impl Projector {
    pub fn new(view_proj: Mat4, viewport: Viewport) -> Self {
        Self { view_proj, viewport }
    }

    /// Screen position of `point`, None when it falls outside the view frustum
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_proj * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
            return None;
        }
        Some(self.viewport.to_screen(Vec2::new(ndc.x, ndc.y)))
    }

    /// Like [`Projector::project`] but only rejects points behind the eye,
    /// so line segments leaving the screen still get drawn (the painter clips them).
    pub fn project_unclipped(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_proj * point.extend(1.0);
        if clip.w <= 1e-4 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(self.viewport.to_screen(Vec2::new(ndc.x, ndc.y)))
    }
}

fn pos2(v: Vec2) -> Pos2 {
    Pos2::new(v.x, v.y)
}

/// Draw the whole session scene into `rect`
pub fn paint_scene(painter: &Painter, rect: Rect, state: &AppState) {
    let settings = &state.settings.viewport;
    painter.rect_filled(rect, 0.0, color32(settings.background_color));

    let session = &state.session;
    let viewport = *session.viewport();
    if viewport.is_empty() {
        return;
    }
    let camera = &session.controls().camera;
    let projector = Projector::new(camera.view_projection(viewport.aspect()), viewport);
    let hovered: Option<NodeId> = state.hovered_cuboid.and_then(|i| session.cuboid_node(i));

    // Points first, then wireframes, then markers on top
    session.scene().walk(|node| {
        if let (true, Renderable::PointCloud(cloud)) = (node.visible, &node.renderable) {
            paint_points(painter, &projector, cloud.points(), settings);
        }
    });
    session.scene().walk(|node| {
        if let (true, Renderable::Cuboid(cuboid)) = (node.visible, &node.renderable) {
            paint_cuboid(painter, &projector, cuboid, settings, hovered == Some(node.id));
        }
    });
    session.scene().walk(|node| {
        if let (true, Renderable::Marker { position, color }) = (node.visible, &node.renderable) {
            if let Some(screen) = projector.project(*position) {
                painter.circle(
                    pos2(screen),
                    settings.marker_size,
                    color32(*color),
                    Stroke::new(1.0, Color32::BLACK),
                );
            }
        }
    });

    paint_axis_labels(painter, &projector, rect);
}

fn paint_points(painter: &Painter, projector: &Projector, points: &[Vec3], settings: &ViewportSettings) {
    let stride = point_stride(points.len(), settings.max_drawn_points);
    let color = color32(settings.point_color);
    let half = egui::vec2(settings.point_size, settings.point_size) * 0.5;

    let mut mesh = egui::Mesh::default();
    for point in points.iter().step_by(stride) {
        if let Some(screen) = projector.project(*point) {
            let center = pos2(screen);
            mesh.add_colored_rect(Rect::from_min_max(center - half, center + half), color);
        }
    }
    if !mesh.is_empty() {
        painter.add(Shape::mesh(mesh));
    }
}

fn paint_cuboid(
    painter: &Painter,
    projector: &Projector,
    cuboid: &CuboidDescriptor,
    settings: &ViewportSettings,
    hovered: bool,
) {
    let base = color32(cuboid.color);
    let stroke = if hovered {
        Stroke::new(settings.wireframe_thickness * 2.0, highlight(base, 0.4))
    } else {
        Stroke::new(settings.wireframe_thickness, base)
    };

    for (a, b) in cuboid.edges() {
        if let (Some(a), Some(b)) = (projector.project_unclipped(a), projector.project_unclipped(b)) {
            painter.line_segment([pos2(a), pos2(b)], stroke);
        }
    }
}

/// Axis labels at a fixed distance from the origin
fn paint_axis_labels(painter: &Painter, projector: &Projector, rect: Rect) {
    let labels = [
        (Vec3::X, "X", Color32::from_rgb(220, 70, 70)),
        (Vec3::Y, "Y", Color32::from_rgb(70, 200, 70)),
        (Vec3::Z, "Z", Color32::from_rgb(70, 110, 220)),
    ];

    let Some(origin) = projector.project(Vec3::ZERO) else {
        return;
    };
    for (axis, label, color) in labels {
        let Some(tip) = projector.project(axis * 1.5) else {
            continue;
        };
        painter.line_segment([pos2(origin), pos2(tip)], Stroke::new(1.0, color));
        if rect.contains(pos2(tip)) {
            painter.text(
                pos2(tip),
                egui::Align2::LEFT_BOTTOM,
                label,
                egui::FontId::monospace(12.0),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::camera::ArcBallCamera;

    fn projector() -> Projector {
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
        let camera = ArcBallCamera::new();
        Projector::new(camera.view_projection(viewport.aspect()), viewport)
    }

    #[test]
    fn test_stride_caps_drawn_points() {
        assert_eq!(point_stride(0, 100), 1);
        assert_eq!(point_stride(100, 100), 1);
        assert_eq!(point_stride(101, 100), 2);
        assert_eq!(point_stride(1_000_000, 200_000), 5);
    }

    #[test]
    fn test_camera_target_projects_to_viewport_center() {
        let screen = projector().project(Vec3::ZERO).expect("target is visible");
        assert!((screen.x - 400.0).abs() < 1e-3);
        assert!((screen.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_points_behind_the_eye_are_culled() {
        let camera = ArcBallCamera::new();
        let eye = camera.eye_position();
        let behind = eye + (eye - camera.target).normalize() * 5.0;
        assert!(projector().project(behind).is_none());
        assert!(projector().project_unclipped(behind).is_none());
    }

    #[test]
    fn test_highlight_moves_toward_white() {
        let c = highlight(Color32::from_rgb(100, 0, 200), 0.5);
        assert!(c.r() > 100 && c.g() > 0 && c.b() > 200);
        assert_eq!(highlight(Color32::BLACK, 1.0), Color32::WHITE);
    }
}
