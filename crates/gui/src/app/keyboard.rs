//! Keyboard shortcut handling

use eframe::egui;

use crate::state::AppState;
use crate::ui::toolbar;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (escape, toggle, reset) = ctx.input(|i| {
        let plain = !i.modifiers.command && !i.modifiers.alt;
        (
            i.key_pressed(egui::Key::Escape),
            plain && i.key_pressed(egui::Key::C),
            plain && i.key_pressed(egui::Key::R),
        )
    });

    // Escape: abandon the current pick sequence
    if escape && state.session.is_create_mode() {
        state.session.disable_create_mode();
    }
    // C: toggle create mode
    if toggle {
        toolbar::action_toggle_create(state);
    }
    // R: back to the home view
    if reset {
        toolbar::action_reset_camera(state);
    }
}
