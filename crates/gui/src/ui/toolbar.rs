//! Toolbar actions and UI

use egui::Ui;

use crate::i18n::t;
use crate::state::AppState;

// ── Public actions (callable from menus and shortcuts too) ───

pub fn action_toggle_create(state: &mut AppState) {
    state.session.toggle_create_mode();
    state.last_error = None;
}

pub fn action_reset_camera(state: &mut AppState) {
    state.session.reset_camera();
}

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        let creating = state.session.is_create_mode();
        let create = ui
            .selectable_label(creating, t("tb.create_cuboid"))
            .on_hover_text(t("tb.create_cuboid_tip"));
        if create.clicked() {
            action_toggle_create(state);
        }

        if creating && ui.button(t("tb.cancel")).clicked() {
            state.session.disable_create_mode();
        }

        ui.separator();

        if ui.button(t("tb.reset_camera")).clicked() {
            action_reset_camera(state);
        }

        ui.separator();
        ui.weak(crate::app::policy_label(state.session.orientation_policy()));
    });
}
