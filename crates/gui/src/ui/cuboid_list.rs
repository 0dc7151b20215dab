//! Cuboid list panel: one row per stored cuboid, hover highlights it in the viewport

use egui::Ui;
use glam::Vec3;

use crate::i18n::t;
use crate::state::AppState;
use crate::viewport::renderer::color32;

fn fmt_vec(v: Vec3) -> String {
    format!("{:.2}, {:.2}, {:.2}", v.x, v.y, v.z)
}

pub fn show(ui: &mut Ui, state: &mut AppState) {
    let cuboids = state.session.cuboids();

    ui.horizontal(|ui| {
        ui.heading(t("list.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({})", cuboids.len()));
        });
    });
    ui.separator();

    if cuboids.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("list.empty"));
        });
        return;
    }

    let mut hovered = None;
    for (index, cuboid) in cuboids.iter().enumerate() {
        let row = ui
            .group(|ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    let (swatch, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, color32(cuboid.color));
                    ui.strong(format!("#{}", index + 1));
                    if !cuboid.is_axis_aligned() {
                        ui.weak(t("list.oriented"));
                    }
                });
                egui::Grid::new(("cuboid_row", index))
                    .num_columns(2)
                    .spacing([8.0, 2.0])
                    .show(ui, |ui| {
                        ui.weak(t("list.center"));
                        ui.monospace(fmt_vec(cuboid.center));
                        ui.end_row();
                        ui.weak(t("list.size"));
                        ui.monospace(fmt_vec(cuboid.size));
                        ui.end_row();
                    });
            })
            .response;

        if row.contains_pointer() {
            hovered = Some(index);
        }
    }
    state.hovered_cuboid = hovered;
}
