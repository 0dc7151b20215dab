//! Application menu bar and settings window

use eframe::egui;
use shared::{OrientationPolicy, Rgb};

use crate::i18n::{lang, set_lang, t};
use crate::state::{AppSettings, AppState, Language};
use crate::ui::toolbar;
use crate::viewport::point_cloud::PointCloud;
use crate::viewport::renderer::color32;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.open")).clicked() {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title(t("menu.open_title"))
                .add_filter("PCD", &["pcd"])
                .pick_file()
            {
                match PointCloud::load_pcd(&path) {
                    Ok(cloud) => {
                        state.session.load_point_cloud(cloud);
                        state.last_error = None;
                    }
                    Err(e) => {
                        tracing::error!("Failed to load {}: {e}", path.display());
                        state.last_error = Some(format!("{}: {e}", t("error.load")));
                    }
                }
            }
        }
        if ui.button(t("menu.demo")).clicked() {
            super::load_demo_scene(state);
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.panels.cuboid_list, t("menu.cuboid_list"));
        ui.checkbox(&mut state.panels.status_bar, t("menu.status_bar"));
        ui.separator();
        if ui.button(t("menu.reset_camera")).clicked() {
            toolbar::action_reset_camera(state);
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for (language, label) in [(Language::En, "English"), (Language::Ru, "Русский")] {
                if ui.selectable_label(lang() == language, label).clicked() {
                    set_lang(language);
                    state.settings.ui.language = language;
                    state.settings.save();
                    ui.close_menu();
                }
            }
        });
    });
}

pub fn policy_label(policy: OrientationPolicy) -> &'static str {
    match policy {
        OrientationPolicy::AxisAligned => t("policy.axis_aligned"),
        OrientationPolicy::ThreePointFrame => t("policy.three_point_frame"),
    }
}

/// Show the annotate menu
pub fn annotate_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.annotate"), |ui| {
        let creating = state.session.is_create_mode();
        if ui.selectable_label(creating, t("tb.create_cuboid")).clicked() {
            toolbar::action_toggle_create(state);
            ui.close_menu();
        }
        ui.separator();
        ui.label(t("menu.orientation"));
        let mut changed = false;
        for &policy in OrientationPolicy::all() {
            changed |= ui
                .radio_value(
                    &mut state.settings.annotation.orientation_policy,
                    policy,
                    policy_label(policy),
                )
                .changed();
        }
        changed |= ui
            .checkbox(&mut state.settings.annotation.keep_create_mode, t("menu.keep_create"))
            .changed();
        if changed {
            state.apply_settings();
        }
        ui.separator();
        if ui.button(t("menu.settings")).clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

/// Show the settings window
pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(380.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_annotation_settings(ui, state);
                show_camera_settings(ui, state);
                show_viewport_settings(ui, state);
                show_ui_settings(ui, state);
                show_settings_buttons(ui, state);
            });
        });
    state.show_settings_window = open;
}

fn show_annotation_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.annotation"));
    let annotation = &mut state.settings.annotation;
    ui.horizontal(|ui| {
        ui.label(t("menu.orientation"));
        egui::ComboBox::from_id_salt("policy_combo")
            .selected_text(policy_label(annotation.orientation_policy))
            .show_ui(ui, |ui| {
                for &policy in OrientationPolicy::all() {
                    ui.selectable_value(&mut annotation.orientation_policy, policy, policy_label(policy));
                }
            });
    });
    ui.checkbox(&mut annotation.keep_create_mode, t("menu.keep_create"));
    ui.horizontal(|ui| {
        ui.label(t("settings.pick_threshold"));
        ui.add(
            egui::DragValue::new(&mut annotation.pick_threshold)
                .speed(0.01)
                .range(0.001..=5.0),
        );
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.min_separation"));
        ui.add(
            egui::DragValue::new(&mut annotation.min_separation)
                .speed(0.0001)
                .range(0.0..=1.0),
        );
    });
    ui.add_space(10.0);
}

fn show_camera_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.camera"));
    let camera = &mut state.settings.camera;
    ui.horizontal(|ui| {
        ui.label(t("settings.rotate_speed"));
        ui.add(egui::Slider::new(&mut camera.rotate_speed, 0.05..=2.0));
    });
    ui.checkbox(&mut camera.enable_damping, t("settings.damping"));
    ui.add_enabled_ui(camera.enable_damping, |ui| {
        ui.horizontal(|ui| {
            ui.label(t("settings.damping_factor"));
            ui.add(egui::Slider::new(&mut camera.damping_factor, 0.01..=1.0));
        });
    });
    ui.add_space(10.0);
}

fn color_row(ui: &mut egui::Ui, label: &str, rgb: &mut Rgb) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut color = color32(*rgb);
        if ui.color_edit_button_srgba(&mut color).changed() {
            *rgb = Rgb::new(color.r(), color.g(), color.b());
        }
    });
}

fn show_viewport_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.viewport"));
    let viewport = &mut state.settings.viewport;
    color_row(ui, t("settings.bg_color"), &mut viewport.background_color);
    color_row(ui, t("settings.point_color"), &mut viewport.point_color);
    color_row(ui, t("settings.marker_color"), &mut viewport.marker_color);

    ui.horizontal(|ui| {
        ui.label(t("settings.point_size"));
        ui.add(
            egui::DragValue::new(&mut viewport.point_size)
                .speed(0.1)
                .range(0.5..=6.0)
                .suffix(" px"),
        );
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.wireframe"));
        ui.add(
            egui::DragValue::new(&mut viewport.wireframe_thickness)
                .speed(0.1)
                .range(0.5..=5.0)
                .suffix(" px"),
        );
    });
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            state.apply_settings();
        }
        if ui.button(t("settings.reset")).clicked() {
            state.settings = AppSettings::default();
            state.apply_settings();
        }
        if ui.button(t("settings.close")).clicked() {
            state.show_settings_window = false;
        }
    });
}
