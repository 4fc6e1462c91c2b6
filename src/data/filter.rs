use std::collections::BTreeSet;

use crate::config::DashboardConfig;

use super::model::{MovieRecord, Movies};

// ---------------------------------------------------------------------------
// Filter criteria: what the sidebar controls currently select
// ---------------------------------------------------------------------------

/// Immutable snapshot of the sidebar controls.
///
/// Ranges are inclusive on both ends. An empty `genres` set means
/// "no genre filter".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub genres: BTreeSet<String>,
    pub year_range: (i32, i32),
    pub rating_range: (f64, f64),
}

impl FilterCriteria {
    /// Default control state for a freshly loaded table:
    /// * first `default_genre_count` genre options (already sorted),
    /// * years from `max(default_year_floor, min)` to the dataset max,
    /// * the full rating span.
    pub fn defaults(
        movies: &Movies,
        genre_options: &BTreeSet<String>,
        config: &DashboardConfig,
    ) -> Self {
        let genres = genre_options
            .iter()
            .take(config.default_genre_count)
            .cloned()
            .collect();

        let (year_range, rating_range) = match movies.bounds {
            Some(b) => {
                let low = config.default_year_floor.max(b.year_min).min(b.year_max);
                ((low, b.year_max), (b.rating_min, b.rating_max))
            }
            None => (
                (config.default_year_floor, config.default_year_floor),
                (0.0, 10.0),
            ),
        };

        Self {
            genres,
            year_range,
            rating_range,
        }
    }

    /// Whether a single movie passes all three predicates.
    pub fn matches(&self, movie: &MovieRecord) -> bool {
        let (year_lo, year_hi) = self.year_range;
        let (rating_lo, rating_hi) = self.rating_range;

        (year_lo..=year_hi).contains(&movie.release_year)
            && (rating_lo..=rating_hi).contains(&movie.vote_average)
            && self.matches_genre(movie)
    }

    /// Any selected genre is enough (OR across the selection).
    fn matches_genre(&self, movie: &MovieRecord) -> bool {
        self.genres.is_empty() || movie.genre_labels().iter().any(|g| self.genres.contains(g))
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows passing a [`FilterCriteria`], in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredMovies<'a> {
    pub rows: Vec<&'a MovieRecord>,
}

impl<'a> FilteredMovies<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a MovieRecord> + '_ {
        self.rows.iter().copied()
    }
}

/// Keep the rows matching `criteria`.
///
/// Accepts the full table (`&movies.records`) or an already filtered view
/// (`filtered.iter()`), so filtering can be re-applied.
pub fn filter<'a, I>(rows: I, criteria: &FilterCriteria) -> FilteredMovies<'a>
where
    I: IntoIterator<Item = &'a MovieRecord>,
{
    FilteredMovies {
        rows: rows.into_iter().filter(|m| criteria.matches(m)).collect(),
    }
}
