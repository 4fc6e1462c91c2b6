use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::config::DashboardConfig;
use crate::data::aggregate::{DashboardView, build_view};
use crate::data::cache::{self, DatasetCache};
use crate::data::filter::{FilterCriteria, filter};
use crate::data::genre::extract_genres;
use crate::data::model::Movies;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every control change goes through one of the methods below, which
/// rebuild `view` from the cached table. Rendering only reads.
pub struct AppState {
    pub config: DashboardConfig,

    cache: &'static DatasetCache,

    /// Shared table (None until a load succeeds).
    pub dataset: Option<Arc<Movies>>,

    /// Sorted genre labels offered by the multi-select.
    pub genre_options: BTreeSet<String>,

    /// Current control values.
    pub criteria: FilterCriteria,

    /// Chart tables and metrics for `criteria` (cached).
    pub view: DashboardView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the movie table panel is expanded.
    pub show_table: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_cache(config, cache::global())
    }

    pub fn with_cache(config: DashboardConfig, cache: &'static DatasetCache) -> Self {
        let criteria = FilterCriteria::defaults(&Movies::default(), &BTreeSet::new(), &config);
        Self {
            config,
            cache,
            dataset: None,
            genre_options: BTreeSet::new(),
            criteria,
            view: DashboardView::default(),
            status_message: None,
            show_table: false,
        }
    }

    /// Load the configured dataset through the cache.
    pub fn load_configured(&mut self) -> Result<(), DataError> {
        let movies = self.cache.get_or_load(&self.config.data_path)?;
        self.set_dataset(movies);
        Ok(())
    }

    /// Ingest a table: rebuild genre options, reset controls to defaults.
    pub fn set_dataset(&mut self, movies: Arc<Movies>) {
        self.genre_options = extract_genres(&movies);
        self.criteria = FilterCriteria::defaults(&movies, &self.genre_options, &self.config);
        self.dataset = Some(movies);
        self.status_message = None;
        self.refilter();
    }

    /// Switch to another file. On failure the current table stays.
    pub fn open_path(&mut self, path: PathBuf) {
        match self.cache.get_or_load(&path) {
            Ok(movies) => {
                self.config.data_path = path;
                self.set_dataset(movies);
            }
            Err(e) => {
                log::error!("Failed to open dataset: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the cached table and read the file again.
    ///
    /// Control values survive a reload; ranges keep their current positions.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        match self.cache.get_or_load(&self.config.data_path) {
            Ok(movies) => {
                let criteria = self.criteria.clone();
                self.set_dataset(movies);
                self.criteria = criteria;
                self.refilter();
                self.status_message = Some("Data reloaded".to_string());
            }
            Err(e) => {
                log::error!("Failed to reload dataset: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Recompute `view` after a control change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            self.view = DashboardView::default();
            return;
        };
        let rows = filter(&ds.records, &self.criteria);
        log::debug!("{} of {} movies match {:?}", rows.len(), ds.len(), self.criteria);
        self.view = build_view(&rows, &self.criteria, &self.config);
    }

    /// Toggle a single genre in the multi-select.
    pub fn toggle_genre(&mut self, genre: &str) {
        if !self.criteria.genres.remove(genre) {
            self.criteria.genres.insert(genre.to_string());
        }
        self.refilter();
    }

    /// Select every genre option.
    pub fn select_all_genres(&mut self) {
        self.criteria.genres = self.genre_options.clone();
        self.refilter();
    }

    /// Empty selection, i.e. no genre filter.
    pub fn clear_genres(&mut self) {
        self.criteria.genres.clear();
        self.refilter();
    }

    /// Set the year range; the ends are swapped if given in reverse.
    pub fn set_year_range(&mut self, a: i32, b: i32) {
        self.criteria.year_range = (a.min(b), a.max(b));
        self.refilter();
    }

    /// Set the rating range; the ends are swapped if given in reverse.
    pub fn set_rating_range(&mut self, a: f64, b: f64) {
        self.criteria.rating_range = (a.min(b), a.max(b));
        self.refilter();
    }

    /// Restore the default control values for the current table.
    pub fn reset_filters(&mut self) {
        let empty = Movies::default();
        let movies = self.dataset.as_deref().unwrap_or(&empty);
        self.criteria = FilterCriteria::defaults(movies, &self.genre_options, &self.config);
        self.refilter();
    }

    /// Write the current view as pretty JSON.
    pub fn export_view(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.view)
            .context("writing dashboard view")?;
        log::info!("Exported dashboard view to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::MovieRecord;

    fn leaked_cache() -> &'static DatasetCache {
        Box::leak(Box::new(DatasetCache::new()))
    }

    fn state_with_sample() -> AppState {
        let mut state = AppState::with_cache(DashboardConfig::default(), leaked_cache());
        state.set_dataset(Arc::new(Movies::from_records(vec![
            MovieRecord::new("A", &["Action", "Drama"], 2015, 7.5, 50.0),
            MovieRecord::new("B", &["Drama"], 2015, 8.0, 30.0),
            MovieRecord::new("C", &["Comedy"], 2020, 6.0, 90.0),
            MovieRecord::new("D", &["Horror"], 2005, 3.0, 5.0),
        ])));
        state
    }

    #[test]
    fn new_dataset_applies_default_controls() {
        let state = state_with_sample();
        let genres: Vec<&str> = state.criteria.genres.iter().map(String::as_str).collect();
        assert_eq!(genres, vec!["Action", "Comedy", "Drama", "Horror"]);
        assert_eq!(state.criteria.year_range, (2010, 2020));
        assert_eq!(state.criteria.rating_range, (3.0, 8.0));
        assert_eq!(state.view.summary.total, 3);
    }

    #[test]
    fn control_changes_recompute_the_view() {
        let mut state = state_with_sample();

        state.clear_genres();
        state.toggle_genre("Drama");
        assert_eq!(state.view.summary.total, 2);
        assert_eq!(state.view.genre_counts[0].genre, "Drama");

        state.set_rating_range(9.0, 7.9);
        assert_eq!(state.criteria.rating_range, (7.9, 9.0));
        assert_eq!(state.view.summary.total, 1);

        state.set_rating_range(9.5, 10.0);
        assert_eq!(state.view.summary.total, 0);
        assert_eq!(state.view.summary.rating_label(), "no data");

        state.reset_filters();
        assert_eq!(state.view.summary.total, 3);
    }

    #[test]
    fn year_range_changes_show_in_summary() {
        let mut state = state_with_sample();
        state.clear_genres();
        state.set_year_range(2020, 2000);
        assert_eq!(state.view.summary.year_range_label(), "2000 - 2020");
        assert_eq!(state.view.summary.total, 4);
    }

    #[test]
    fn failed_open_keeps_the_current_table() {
        let mut state = state_with_sample();
        state.open_path(PathBuf::from("/missing/movies.csv"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(state.dataset.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn reload_reads_the_file_again_and_keeps_controls() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Title,Genre,Release_Year,Vote_Average,Popularity").unwrap();
        writeln!(file, "A,\"['Drama']\",2015,7.5,50").unwrap();
        file.flush().unwrap();

        let config = DashboardConfig {
            data_path: file.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        let mut state = AppState::with_cache(config, leaked_cache());
        state.load_configured().unwrap();
        assert_eq!(state.view.summary.total, 1);

        state.set_rating_range(0.0, 10.0);
        writeln!(file, "B,\"['Drama']\",2015,9.9,10").unwrap();
        file.flush().unwrap();

        state.reload();
        assert_eq!(state.dataset.as_ref().unwrap().len(), 2);
        assert_eq!(state.criteria.rating_range, (0.0, 10.0));
        assert_eq!(state.view.summary.total, 2);
    }

    #[test]
    fn export_writes_the_view_as_json() {
        let state = state_with_sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");

        state.export_view(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["summary"]["total"], 3);
        assert_eq!(json["scatter"].as_array().unwrap().len(), 3);
    }
}
