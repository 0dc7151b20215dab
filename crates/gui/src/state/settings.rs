//! Application settings

use serde::{Deserialize, Serialize};
use shared::{OrientationPolicy, Rgb};

use crate::error::{AnnotationError, AnnotationResult};
use crate::geometry::DEFAULT_MIN_SEPARATION;

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Ru,
}

/// Cuboid creation behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSettings {
    /// How the third pick orients the box
    pub orientation_policy: OrientationPolicy,
    /// Stay in create mode after a cuboid is finished
    pub keep_create_mode: bool,
    /// Picks closer than this (world units) are rejected as coincident
    pub min_separation: f32,
    /// Max ray-to-point distance (world units) for hitting a cloud point
    pub pick_threshold: f32,
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            orientation_policy: OrientationPolicy::AxisAligned,
            keep_create_mode: false,
            min_separation: DEFAULT_MIN_SEPARATION,
            pick_threshold: 0.1,
        }
    }
}

/// Camera and orbit controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Initial distance from the target
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    /// Degrees of orbit per pixel dragged
    pub rotate_speed: f32,
    pub enable_damping: bool,
    /// Fraction of pending rotation applied each frame (0.01 - 1.0)
    pub damping_factor: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            distance: 10.0,
            near: 0.1,
            far: 1000.0,
            rotate_speed: 0.5,
            enable_damping: true,
            damping_factor: 0.25,
        }
    }
}

/// Viewport drawing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub background_color: Rgb,
    pub point_color: Rgb,
    /// Point radius in pixels
    pub point_size: f32,
    pub marker_color: Rgb,
    /// Marker radius in pixels
    pub marker_size: f32,
    pub wireframe_thickness: f32,
    /// Width of the cuboid list panel
    pub side_panel_width: f32,
    /// Upper bound on points drawn per frame (clouds are strided down to it)
    pub max_drawn_points: usize,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: Rgb::new(20, 20, 24),
            point_color: Rgb::new(200, 200, 210),
            point_size: 1.2,
            marker_color: Rgb::new(255, 210, 40),
            marker_size: 5.0,
            wireframe_thickness: 1.5,
            side_panel_width: 300.0,
            max_drawn_points: 200_000,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    pub language: Language,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Language::En,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub annotation: AnnotationSettings,
    pub camera: CameraSettings,
    pub viewport: ViewportSettings,
    pub ui: UiSettings,
}

impl AppSettings {
    pub fn from_json(json: &str) -> AnnotationResult<Self> {
        serde_json::from_str(json).map_err(|e| AnnotationError::Settings(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "cuboid-annotator", "cuboid-annotator")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                tracing::warn!("Ignoring {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(dir) = path.parent() {
            if std::fs::create_dir_all(dir).is_err() {
                return;
            }
        }
        if let Err(e) = std::fs::write(&path, self.to_json()) {
            tracing::warn!("Failed to save settings to {}: {e}", path.display());
        }
    }
}
