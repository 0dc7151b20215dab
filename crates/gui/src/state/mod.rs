pub mod markers;
pub mod session;
pub mod settings;
pub mod store;

pub use markers::{PickBuffer, TransientMarkers, PICKS_PER_CUBOID};
pub use session::{AnnotationSession, PickOutcome, SessionEvent, SessionSnapshot, SessionState};
pub use settings::{AnnotationSettings, AppSettings, CameraSettings, Language, UiSettings, ViewportSettings};
pub use store::CuboidStore;

use crate::viewport::camera::OrbitControls;
use crate::viewport::scene::{RenderContext, Viewport};

/// Panel visibility flags
pub struct PanelVisibility {
    pub cuboid_list: bool,
    pub status_bar: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            cuboid_list: true,
            status_bar: true,
        }
    }
}

/// Combined application state
pub struct AppState {
    pub session: AnnotationSession,
    pub settings: AppSettings,
    pub panels: PanelVisibility,
    /// Cuboid under the pointer in the list panel
    pub hovered_cuboid: Option<usize>,
    /// Last error shown in the status bar
    pub last_error: Option<String>,
    /// Show settings window
    pub show_settings_window: bool,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        let context = RenderContext::new(
            OrbitControls::from_settings(&settings.camera),
            Viewport::default(),
        );
        let session = AnnotationSession::new(context, &settings.annotation)
            .with_marker_color(settings.viewport.marker_color);
        Self {
            session,
            settings,
            panels: PanelVisibility::default(),
            hovered_cuboid: None,
            last_error: None,
            show_settings_window: false,
        }
    }

    /// Push edited settings into the live session and persist them.
    /// The camera pose is kept; only the control tuning changes.
    pub fn apply_settings(&mut self) {
        self.session.apply_settings(&self.settings.annotation);
        self.session.set_marker_color(self.settings.viewport.marker_color);

        let camera = &self.settings.camera;
        let controls = self.session.controls_mut();
        controls.rotate_speed = camera.rotate_speed;
        controls.enable_damping = camera.enable_damping;
        controls.damping_factor = camera.damping_factor.clamp(0.01, 1.0);

        self.settings.save();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppSettings::load())
    }
}
