use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

use crate::color::{ACCENT, CARD_BG, Gradient, TIP, pastel_palette};
use crate::data::aggregate::{GenreCount, GenrePopularity, ScatterPoint, YearPoint};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 330.0;

/// Share of the radius each pie slice is pulled outwards.
const PIE_PULL: f32 = 0.06;

/// Colour steps of the scatter scale.
const SCATTER_BINS: usize = 16;

// ---------------------------------------------------------------------------
// 2x2 chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the four charts in the central panel.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to start  (File → Open…)");
        });
        return;
    }

    let view = &state.view;
    let top_n = state.config.top_n;

    ui.columns(2, |cols| {
        chart_card(&mut cols[0], &format!("Genre Distribution (Top {top_n})"), |ui| {
            genre_pie(ui, &view.genre_counts)
        });
        chart_card(&mut cols[1], "Movies Released Per Year (+ Examples)", |ui| {
            year_line(ui, &view.year_series)
        });
    });
    ui.add_space(8.0);
    ui.columns(2, |cols| {
        chart_card(&mut cols[0], "💯 Popularity vs Average Rating", |ui| {
            rating_scatter(ui, &view.scatter)
        });
        chart_card(&mut cols[1], "Avg Popularity by Genre", |ui| {
            popularity_bars(ui, &view.genre_popularity)
        });
    });
}

fn chart_card(ui: &mut Ui, title: &str, body: impl FnOnce(&mut Ui)) {
    egui::Frame::default()
        .fill(CARD_BG)
        .corner_radius(16.0)
        .inner_margin(12.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(title).strong().size(18.0));
            body(ui);
        });
}

fn empty_chart(ui: &mut Ui) {
    ui.allocate_ui(Vec2::new(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("no data");
        });
    });
}

// ---------------------------------------------------------------------------
// Pie: genre distribution
// ---------------------------------------------------------------------------

fn genre_pie(ui: &mut Ui, counts: &[GenreCount]) {
    let total: usize = counts.iter().map(|c| c.count).sum();
    if total == 0 {
        empty_chart(ui);
        return;
    }

    let size = Vec2::new(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let radius = rect.height().min(rect.width()) * 0.38;
    let center = rect.center();
    let colors = pastel_palette(counts.len());

    let mut start = -TAU / 4.0;
    for (entry, color) in counts.iter().zip(colors) {
        let share = entry.count as f32 / total as f32;
        let sweep = share * TAU;
        let mid = start + sweep / 2.0;
        let offset = Vec2::angled(mid) * radius * PIE_PULL;
        let slice_center = center + offset;

        for shape in slice_shapes(slice_center, radius, start, sweep, color) {
            painter.add(shape);
        }

        let label_pos = slice_center + Vec2::angled(mid) * radius * 0.65;
        painter.text(
            label_pos,
            Align2::CENTER_CENTER,
            format!("{}\n{:.1}%", entry.genre, share * 100.0),
            FontId::proportional(13.0),
            Color32::from_rgb(0x24, 0x27, 0x3a),
        );
        start += sweep;
    }

    painter.text(
        Pos2::new(center.x, rect.bottom() - 8.0),
        Align2::CENTER_BOTTOM,
        "💡 Tip: Use the genre filter to focus the dashboard",
        FontId::proportional(13.0),
        TIP,
    );
}

/// A slice as convex polygons of at most a quarter turn each.
fn slice_shapes(center: Pos2, radius: f32, start: f32, sweep: f32, fill: Color32) -> Vec<Shape> {
    let pieces = (sweep / (TAU / 4.0)).ceil().max(1.0) as usize;
    let piece_sweep = sweep / pieces as f32;
    let steps_per_piece = ((piece_sweep / TAU) * 128.0).ceil().max(2.0) as usize;

    (0..pieces)
        .map(|p| {
            let a0 = start + p as f32 * piece_sweep;
            let mut points = Vec::with_capacity(steps_per_piece + 2);
            points.push(center);
            for s in 0..=steps_per_piece {
                let a = a0 + piece_sweep * s as f32 / steps_per_piece as f32;
                points.push(center + Vec2::angled(a) * radius);
            }
            Shape::convex_polygon(points, fill, Stroke::new(1.0, fill))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Line: movies per year
// ---------------------------------------------------------------------------

fn year_line(ui: &mut Ui, series: &[YearPoint]) {
    if series.is_empty() {
        empty_chart(ui);
        return;
    }

    let coords: Vec<[f64; 2]> = series
        .iter()
        .map(|p| [p.year as f64, p.count as f64])
        .collect();
    let hover: Vec<(i32, usize, String)> = series
        .iter()
        .map(|p| (p.year, p.count, p.examples.join(", ")))
        .collect();

    Plot::new("year_line")
        .height(CHART_HEIGHT)
        .x_axis_label("Release_Year")
        .y_axis_label("Count")
        .allow_scroll(false)
        .label_formatter(move |_name, value| {
            let year = value.x.round() as i32;
            match hover.iter().find(|(y, _, _)| *y == year) {
                Some((y, count, examples)) => format!("{y}: {count} movies\n{examples}"),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .color(ACCENT)
                    .width(2.0)
                    .name("Count"),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .color(ACCENT)
                    .radius(3.5),
            );
        });
}

// ---------------------------------------------------------------------------
// Scatter: popularity vs rating
// ---------------------------------------------------------------------------

fn rating_scatter(ui: &mut Ui, points: &[ScatterPoint]) {
    if points.is_empty() {
        empty_chart(ui);
        return;
    }

    let gradient = Gradient::scatter();
    let lo = points.iter().map(|p| p.popularity).fold(f64::INFINITY, f64::min);
    let hi = points
        .iter()
        .map(|p| p.popularity)
        .fold(f64::NEG_INFINITY, f64::max);
    let hover: Vec<(f64, f64, String)> = points
        .iter()
        .map(|p| (p.rating, p.popularity, format!("{} ({})", p.title, p.year)))
        .collect();

    Plot::new("rating_scatter")
        .height(CHART_HEIGHT)
        .x_axis_label("Vote_Average")
        .y_axis_label("Popularity")
        .label_formatter(move |_name, value| {
            // Nearest movie to the cursor, in plot units.
            hover
                .iter()
                .min_by(|a, b| {
                    let da = (a.0 - value.x).powi(2) + ((a.1 - value.y) / hi.max(1.0)).powi(2);
                    let db = (b.0 - value.x).powi(2) + ((b.1 - value.y) / hi.max(1.0)).powi(2);
                    da.total_cmp(&db)
                })
                .map(|(r, p, label)| format!("{label}\nrating {r:.1}, popularity {p:.1}"))
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (bin, coords) in colour_bins(points, lo, hi).into_iter().enumerate() {
                if coords.is_empty() {
                    continue;
                }
                let t = bin as f64 / (SCATTER_BINS - 1) as f64;
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .color(gradient.at(t))
                        .radius(2.5),
                );
            }
        });
}

/// Group points by popularity so each colour is drawn as one series.
fn colour_bins(points: &[ScatterPoint], lo: f64, hi: f64) -> Vec<Vec<[f64; 2]>> {
    let mut bins = vec![Vec::new(); SCATTER_BINS];
    let span = hi - lo;
    for p in points {
        let t = if span > 0.0 { (p.popularity - lo) / span } else { 0.0 };
        let bin = ((t * (SCATTER_BINS - 1) as f64).round() as usize).min(SCATTER_BINS - 1);
        bins[bin].push([p.rating, p.popularity]);
    }
    bins
}

// ---------------------------------------------------------------------------
// Horizontal bars: mean popularity by genre
// ---------------------------------------------------------------------------

fn popularity_bars(ui: &mut Ui, means: &[GenrePopularity]) {
    if means.is_empty() {
        empty_chart(ui);
        return;
    }

    let gradient = Gradient::bars();
    let lo = means.iter().map(|m| m.mean_popularity).fold(f64::INFINITY, f64::min);
    let hi = means
        .iter()
        .map(|m| m.mean_popularity)
        .fold(f64::NEG_INFINITY, f64::max);

    // Highest bar on top: the first entry gets the largest y.
    let n = means.len();
    let bars: Vec<Bar> = means
        .iter()
        .enumerate()
        .map(|(i, m)| {
            Bar::new((n - 1 - i) as f64, m.mean_popularity)
                .name(format!("{}: {:.1}", m.genre, m.mean_popularity))
                .fill(gradient.scaled(m.mean_popularity, lo, hi))
                .width(0.65)
        })
        .collect();
    let labels: Vec<String> = means.iter().rev().map(|m| m.genre.clone()).collect();

    Plot::new("popularity_bars")
        .height(CHART_HEIGHT)
        .x_axis_label("Avg Popularity")
        .allow_drag(false)
        .allow_scroll(false)
        .show_grid([true, false])
        .y_axis_formatter(move |mark, _range| {
            let v = mark.value;
            if (v - v.round()).abs() > f64::EPSILON || v < 0.0 {
                return String::new();
            }
            labels.get(v as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().element_formatter(Box::new(
                |bar, _chart| format!("{:.1}", bar.value),
            )));
        });
}
