use glam::{Mat4, Vec2, Vec3};

use crate::state::settings::CameraSettings;

use super::picking::{Aabb, Ray};
use super::scene::Viewport;

/// Arc-ball camera for the 3D viewport
#[derive(Clone, Debug, PartialEq)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    /// Eye at (0, 0, 10) looking at the origin
    pub fn new() -> Self {
        Self::from_settings(&CameraSettings::default())
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: settings.distance,
            target: Vec3::ZERO,
            fov: settings.fov_degrees.to_radians(),
            near: settings.near,
            far: settings.far,
        }
    }

    /// Rotate by the given angles in degrees
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(self.near * 2.0, self.far * 0.5);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        let offset = right * dx + up * dy;
        self.target += offset;
    }

    /// Aim at the center of `bounds` from far enough to see all of it
    pub fn frame(&mut self, bounds: &Aabb) {
        let radius = (bounds.size().length() * 0.5).max(self.near);
        self.target = bounds.center();
        self.distance = (radius / (self.fov * 0.5).sin()).clamp(self.near * 2.0, self.far * 0.5);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a world point to screen coordinates; None behind the camera
    pub fn project(&self, point: Vec3, viewport: &Viewport) -> Option<Vec2> {
        let vp = self.view_projection(viewport.aspect());
        let p = vp * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        Some(viewport.to_screen(Vec2::new(ndc.x, ndc.y)))
    }

    /// Ray from the eye through a point in normalized device coordinates
    pub fn ndc_ray(&self, ndc: Vec2, aspect: f32) -> Ray {
        let eye = self.eye_position();
        let forward = (self.target - eye).normalize_or_zero();
        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * aspect;

        let direction = (forward
            + self.right_vector() * (ndc.x * half_width)
            + self.up_vector() * (ndc.y * half_height))
            .normalize_or_zero();

        Ray {
            origin: eye,
            direction,
        }
    }
}

/// Damped orbit controller around an [`ArcBallCamera`].
///
/// Rotation can be switched off while pointer input is reserved for picking;
/// pan and zoom stay available.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub camera: ArcBallCamera,
    enable_rotate: bool,
    pub enable_damping: bool,
    /// Fraction of the pending rotation applied per tick
    pub damping_factor: f32,
    /// Degrees per pixel of drag
    pub rotate_speed: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    home: ArcBallCamera,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

impl OrbitControls {
    pub fn new(camera: ArcBallCamera) -> Self {
        let settings = CameraSettings::default();
        Self {
            home: camera.clone(),
            camera,
            enable_rotate: true,
            enable_damping: settings.enable_damping,
            damping_factor: settings.damping_factor,
            rotate_speed: settings.rotate_speed,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
        }
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        let mut controls = Self::new(ArcBallCamera::from_settings(settings));
        controls.enable_damping = settings.enable_damping;
        controls.damping_factor = settings.damping_factor.clamp(0.01, 1.0);
        controls.rotate_speed = settings.rotate_speed;
        controls
    }

    pub fn rotate_enabled(&self) -> bool {
        self.enable_rotate
    }

    /// Disabling also drops any rotation still being damped out
    pub fn set_rotate_enabled(&mut self, enabled: bool) {
        self.enable_rotate = enabled;
        if !enabled {
            self.pending_yaw = 0.0;
            self.pending_pitch = 0.0;
        }
    }

    /// Orbit by a pointer drag in pixels. Returns false when rotation is disabled.
    pub fn rotate(&mut self, dx: f32, dy: f32) -> bool {
        if !self.enable_rotate {
            return false;
        }
        let (yaw, pitch) = (dx * self.rotate_speed, dy * self.rotate_speed);
        if self.enable_damping {
            self.pending_yaw += yaw;
            self.pending_pitch += pitch;
        } else {
            self.camera.rotate(yaw, pitch);
        }
        true
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.camera.pan(dx, dy);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }

    /// Advance damping by one frame. Returns true while the camera is still moving.
    pub fn update(&mut self) -> bool {
        if !self.enable_damping || !self.is_moving() {
            return false;
        }
        let yaw = self.pending_yaw * self.damping_factor;
        let pitch = self.pending_pitch * self.damping_factor;
        self.camera.rotate(yaw, pitch);
        self.pending_yaw -= yaw;
        self.pending_pitch -= pitch;

        if self.pending_yaw.abs() < 1e-3 {
            self.pending_yaw = 0.0;
        }
        if self.pending_pitch.abs() < 1e-3 {
            self.pending_pitch = 0.0;
        }
        true
    }

    pub fn is_moving(&self) -> bool {
        self.pending_yaw != 0.0 || self.pending_pitch != 0.0
    }

    /// Back to the home view
    pub fn reset(&mut self) {
        self.camera = self.home.clone();
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
    }

    /// Frame `bounds` and make that the new home view
    pub fn frame_bounds(&mut self, bounds: &Aabb) {
        self.camera.frame(bounds);
        self.home = self.camera.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn test_default_eye() {
        let cam = ArcBallCamera::new();
        assert!(cam.eye_position().abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-5));
        assert!((cam.fov - 75f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_project_target_to_center() {
        let cam = ArcBallCamera::new();
        let p = cam.project(Vec3::ZERO, &viewport()).unwrap();
        assert!(p.abs_diff_eq(Vec2::new(400.0, 300.0), 1e-3));
    }

    #[test]
    fn test_project_behind_camera() {
        let cam = ArcBallCamera::new();
        assert!(cam.project(Vec3::new(0.0, 0.0, 20.0), &viewport()).is_none());
    }

    #[test]
    fn test_ndc_ray_through_projected_point() {
        let cam = ArcBallCamera::new();
        let vp = viewport();
        let world = Vec3::new(2.0, 1.5, -1.0);
        let screen = cam.project(world, &vp).unwrap();
        let ray = cam.ndc_ray(vp.to_ndc(screen).unwrap(), vp.aspect());
        let t = ray.closest_t(world);
        assert!(ray.at(t).distance(world) < 1e-2);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut cam = ArcBallCamera::new();
        cam.rotate(0.0, 500.0);
        assert_eq!(cam.pitch, 1.5);
    }

    #[test]
    fn test_frame_bounds_sees_everything() {
        let mut cam = ArcBallCamera::new();
        let bounds = Aabb {
            min: Vec3::new(10.0, 10.0, 0.0),
            max: Vec3::new(30.0, 20.0, 4.0),
        };
        cam.frame(&bounds);
        assert_eq!(cam.target, bounds.center());
        let vp = viewport();
        for corner in [bounds.min, bounds.max] {
            assert!(cam.project(corner, &vp).is_some());
        }
    }

    #[test]
    fn test_rotate_disabled_is_ignored() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        controls.set_rotate_enabled(false);
        let before = controls.camera.clone();
        assert!(!controls.rotate(40.0, 10.0));
        assert_eq!(controls.camera, before);

        controls.set_rotate_enabled(true);
        assert!(controls.rotate(40.0, 10.0));
        assert_ne!(controls.camera, before);
    }

    #[test]
    fn test_damping_settles() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = true;
        controls.damping_factor = 0.5;
        controls.rotate_speed = 1.0;
        controls.rotate(10.0, 0.0);
        assert!(controls.is_moving());

        let mut ticks = 0;
        while controls.update() {
            ticks += 1;
            assert!(ticks < 100);
        }
        assert!(!controls.is_moving());
        assert!((controls.camera.yaw - 10f32.to_radians()).abs() < 1e-3);
    }

    #[test]
    fn test_disabling_rotation_drops_pending_motion() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = true;
        controls.rotate(30.0, 30.0);
        controls.set_rotate_enabled(false);
        assert!(!controls.is_moving());
        assert!(!controls.update());
    }

    #[test]
    fn test_reset_returns_home() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        controls.rotate(45.0, 20.0);
        controls.pan(1.0, 1.0);
        controls.reset();
        assert_eq!(controls.camera, ArcBallCamera::new());
    }
}
