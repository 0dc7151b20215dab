// Library crate: the annotation core, headless harness and scripting interface.
// GUI-specific modules (app, ui, viewport panel and drawing) stay in the binary crate.

pub mod command;
pub mod error;
pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod palette;
pub mod state;

/// Scene, camera and picking. The egui panel that draws them lives in the binary.
pub mod viewport {
    pub mod camera;
    pub mod picking;
    pub mod point_cloud;
    pub mod scene;
}
