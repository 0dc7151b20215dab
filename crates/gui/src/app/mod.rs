//! Main application module

mod keyboard;
mod menus;
mod styles;

pub use menus::policy_label;
pub use styles::CREATE_MODE_ACCENT;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{cuboid_list, status_bar, toolbar};
use crate::viewport::point_cloud::PointCloud;
use crate::viewport::ViewportPanel;

/// Main application
pub struct AnnotatorApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl AnnotatorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_cloud: Option<PointCloud>) -> Self {
        let mut state = AppState::default();
        crate::i18n::set_lang(state.settings.ui.language);

        // CLI argument takes priority, then the built-in demo scene
        match initial_cloud {
            Some(cloud) => state.session.load_point_cloud(cloud),
            None => load_demo_scene(&mut state),
        }

        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let last_font_size = state.settings.ui.font_size;

        Self {
            state,
            viewport: ViewportPanel::new(),
            last_font_size,
        }
    }
}

/// Replace the cloud with the synthetic demo scene
pub(crate) fn load_demo_scene(state: &mut AppState) {
    match crate::fixtures::annotation_scene() {
        Ok(cloud) => state.session.load_point_cloud(cloud),
        Err(e) => state.last_error = Some(e.to_string()),
    }
}

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        keyboard::handle_keyboard(ctx, &mut self.state);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state);
                menus::annotate_menu(ui, &mut self.state);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state);

        // ── Toolbar ───────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.state);
            });

        // ── Status bar ───────────────────────────────────────
        if self.state.panels.status_bar {
            egui::TopBottomPanel::bottom("status_bar")
                .exact_height(22.0)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
                )
                .show(ctx, |ui| {
                    status_bar::show(ui, &self.state);
                });
        }

        // ── Right panel: cuboid list ─────────────────────────
        self.state.hovered_cuboid = None;
        if self.state.panels.cuboid_list {
            egui::SidePanel::right("cuboid_list")
                .default_width(self.state.settings.viewport.side_panel_width)
                .width_range(200.0..=500.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("cuboid_scroll")
                        .show(ui, |ui| {
                            cuboid_list::show(ui, &mut self.state);
                        });
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });

        if self.state.session.tick() {
            ctx.request_repaint();
        }
    }
}
