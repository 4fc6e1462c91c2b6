use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{CARD_BG, CARD_LABEL, CARD_VALUE};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let bounds = match &state.dataset {
        None => {
            ui.label("No dataset loaded.");
            return;
        }
        Some(ds) => match ds.bounds {
            Some(b) => b,
            None => {
                ui.label("The dataset has no rows.");
                return;
            }
        },
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Genre multi-select ----
            let n_selected = state.criteria.genres.len();
            let n_total = state.genre_options.len();
            let header_text = if n_selected == 0 {
                format!("Select Genre(s)  (all {n_total})")
            } else {
                format!("Select Genre(s)  ({n_selected}/{n_total})")
            };

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("genres")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_genres();
                        }
                        if ui
                            .small_button("Clear")
                            .on_hover_text("No genre filter")
                            .clicked()
                        {
                            state.clear_genres();
                        }
                    });

                    let mut toggled = None;
                    for genre in &state.genre_options {
                        let mut checked = state.criteria.genres.contains(genre);
                        if ui.checkbox(&mut checked, genre).changed() {
                            toggled = Some(genre.clone());
                        }
                    }
                    if let Some(genre) = toggled {
                        state.toggle_genre(&genre);
                    }
                });
            ui.separator();

            // ---- Release year ----
            ui.strong("Release Year");
            let (mut lo, mut hi) = state.criteria.year_range;
            let lo_changed = ui
                .add(Slider::new(&mut lo, bounds.year_min..=bounds.year_max).text("from"))
                .changed();
            let hi_changed = ui
                .add(Slider::new(&mut hi, bounds.year_min..=bounds.year_max).text("to"))
                .changed();
            if lo_changed || hi_changed {
                state.set_year_range(lo, hi);
            }
            ui.separator();

            // ---- Rating ----
            ui.strong("Rating Range");
            let (mut lo, mut hi) = state.criteria.rating_range;
            let range = bounds.rating_min..=bounds.rating_max;
            let lo_changed = ui
                .add(Slider::new(&mut lo, range.clone()).step_by(0.1).text("min"))
                .changed();
            let hi_changed = ui
                .add(Slider::new(&mut hi, range).step_by(0.1).text("max"))
                .changed();
            if lo_changed || hi_changed {
                state.set_rating_range(lo, hi);
            }
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// The row of four headline numbers above the charts.
pub fn metric_row(ui: &mut Ui, state: &AppState) {
    let summary = &state.view.summary;
    let cards = [
        ("📊", "Total Movies", summary.total_label()),
        ("⭐", "Avg Rating", summary.rating_label()),
        ("🔥", "Avg Popularity", summary.popularity_label()),
        ("📅", "Year Range", summary.year_range_label()),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (icon, label, value)) in cols.iter_mut().zip(cards) {
            metric_card(col, icon, label, &value);
        }
    });
}

fn metric_card(ui: &mut Ui, icon: &str, label: &str, value: &str) {
    egui::Frame::default()
        .fill(CARD_BG)
        .corner_radius(16.0)
        .inner_margin(14.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(icon).size(30.0));
                ui.label(RichText::new(label).color(CARD_LABEL).strong().size(16.0));
                ui.label(RichText::new(value).color(CARD_VALUE).strong().size(28.0));
            });
        });
}

// ---------------------------------------------------------------------------
// Movie table
// ---------------------------------------------------------------------------

/// Filtered movies as a striped table (one row per scatter point).
pub fn movie_table(ui: &mut Ui, state: &AppState) {
    let points = &state.view.scatter;
    if points.is_empty() {
        ui.label("No movies match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(200.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(80.0))
        .header(20.0, |mut header| {
            for name in ["Title", "Year", "Rating", "Popularity"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, points.len(), |mut row| {
                let p = &points[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(&p.title);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(p.year.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.1}", p.rating));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.1}", p.popularity));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload data").clicked() {
                state.reload();
                ui.close_menu();
            }
            if ui.button("Export view…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let file = ds
                .source
                .as_deref()
                .and_then(|p| p.file_name())
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{file}: {} movies loaded, {} visible",
                ds.len(),
                state.view.summary.total
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.show_table, "Movie table")
            .clicked()
        {
            state.show_table = !state.show_table;
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open movie dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard view")
        .add_filter("JSON", &["json"])
        .set_file_name("dashboard_view.json")
        .save_file();

    if let Some(path) = file {
        state.status_message = Some(match state.export_view(&path) {
            Ok(()) => format!("Exported to {}", path.display()),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                format!("Error: {e:#}")
            }
        });
    }
}
