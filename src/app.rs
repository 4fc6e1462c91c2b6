use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ReelDashApp {
    pub state: AppState,
}

impl ReelDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ReelDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(280.0)
            .min_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: filtered movie table ----
        if self.state.show_table {
            egui::TopBottomPanel::bottom("movie_table")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    panels::movie_table(ui, &self.state);
                });
        }

        // ---- Central panel: metric cards + charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if self.state.dataset.is_some() {
                    panels::metric_row(ui, &self.state);
                    ui.separator();
                }
                charts::chart_grid(ui, &self.state);
            });
        });
    }
}
