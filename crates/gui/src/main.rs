mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::fixtures`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use annotator_lib::error;
pub use annotator_lib::fixtures;
pub use annotator_lib::state;

use annotator_lib::viewport::point_cloud::PointCloud;
use app::AnnotatorApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cuboid_annotator=info,annotator_lib=info".into()),
        )
        .init();

    // Parse --pcd <path> argument
    let initial_cloud = parse_pcd_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Cuboid Annotator")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "cuboid-annotator",
        native_options,
        Box::new(move |cc| Ok(Box::new(AnnotatorApp::new(cc, initial_cloud)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_pcd_arg() -> Option<PointCloud> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--pcd" && i + 1 < args.len() {
            let path = &args[i + 1];
            match PointCloud::load_pcd(path) {
                Ok(cloud) => return Some(cloud),
                Err(e) => tracing::error!("Failed to load {path}: {e}"),
            }
            break;
        }
        i += 1;
    }
    None
}
