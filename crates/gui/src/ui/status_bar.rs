use egui::Ui;

use crate::app::CREATE_MODE_ACCENT;
use crate::i18n::t;
use crate::state::{AppState, SessionState};

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        match state.session.point_cloud() {
            Some(cloud) => ui.weak(format!("{}: {}", t("status.points"), cloud.len())),
            None => ui.weak(t("status.no_cloud")),
        };

        ui.separator();
        ui.weak(format!("{}: {}", t("status.cuboids"), state.session.cuboids().len()));
        ui.separator();

        match state.session.state() {
            SessionState::Collecting(n) => {
                ui.colored_label(
                    CREATE_MODE_ACCENT,
                    format!("{n} {}", t("status.points_selected")),
                );
                ui.separator();
                ui.weak(t("hint.pick"));
                ui.weak(t("hint.esc"));
            }
            SessionState::Idle => {
                ui.weak(t("status.ready"));
            }
        }

        if let Some(err) = &state.last_error {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(255, 110, 100), err);
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("Cuboid Annotator v", env!("CARGO_PKG_VERSION")));
        });
    });
}
