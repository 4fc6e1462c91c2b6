use std::path::PathBuf;

// ---------------------------------------------------------------------------
// MovieRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single movie (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    /// Display title; empty when the source cell was missing.
    pub title: String,
    pub release_year: i32,
    /// Average vote, 0–10.
    pub vote_average: f64,
    /// Non-negative popularity score.
    pub popularity: f64,
    /// Parsed genre labels. `None` when the cell was missing or malformed;
    /// such rows take part in year/rating views only.
    pub genres: Option<Vec<String>>,
}

impl MovieRecord {
    /// Row with parsed genres, as built by the tests.
    #[cfg(test)]
    pub fn new(
        title: &str,
        genres: &[&str],
        release_year: i32,
        vote_average: f64,
        popularity: f64,
    ) -> Self {
        Self {
            title: title.to_string(),
            release_year,
            vote_average,
            popularity,
            genres: Some(genres.iter().map(|g| g.to_string()).collect()),
        }
    }

    /// Genre labels, empty for rows without parsed genres.
    pub fn genre_labels(&self) -> &[String] {
        self.genres.as_deref().unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// DatasetBounds – min/max of the slider-driving columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetBounds {
    pub year_min: i32,
    pub year_max: i32,
    pub rating_min: f64,
    pub rating_max: f64,
}

// ---------------------------------------------------------------------------
// Movies – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed column bounds.
#[derive(Debug, Clone, Default)]
pub struct Movies {
    pub records: Vec<MovieRecord>,
    /// File the table was read from, if any.
    pub source: Option<PathBuf>,
    /// `None` for an empty table.
    pub bounds: Option<DatasetBounds>,
    /// Rows whose genre cell was missing or malformed.
    pub without_genres: usize,
}

impl Movies {
    /// Build bounds and counters from the loaded records.
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        let bounds = records.iter().fold(None, |acc: Option<DatasetBounds>, m| {
            Some(match acc {
                None => DatasetBounds {
                    year_min: m.release_year,
                    year_max: m.release_year,
                    rating_min: m.vote_average,
                    rating_max: m.vote_average,
                },
                Some(b) => DatasetBounds {
                    year_min: b.year_min.min(m.release_year),
                    year_max: b.year_max.max(m.release_year),
                    rating_min: b.rating_min.min(m.vote_average),
                    rating_max: b.rating_max.max(m.vote_average),
                },
            })
        });
        let without_genres = records.iter().filter(|m| m.genres.is_none()).count();

        Movies {
            records,
            source: None,
            bounds,
            without_genres,
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Number of movies.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_all_rows() {
        let movies = Movies::from_records(vec![
            MovieRecord::new("A", &["Drama"], 2015, 7.5, 50.0),
            MovieRecord::new("B", &["Drama"], 1999, 8.1, 30.0),
            MovieRecord::new("C", &["Comedy"], 2020, 4.2, 90.0),
        ]);
        assert_eq!(
            movies.bounds,
            Some(DatasetBounds {
                year_min: 1999,
                year_max: 2020,
                rating_min: 4.2,
                rating_max: 8.1,
            })
        );
        assert_eq!(movies.without_genres, 0);
    }

    #[test]
    fn empty_table_has_no_bounds() {
        let movies = Movies::from_records(Vec::new());
        assert!(movies.is_empty());
        assert_eq!(movies.bounds, None);
    }

    #[test]
    fn rows_without_genres_are_counted() {
        let mut broken = MovieRecord::new("X", &[], 2001, 5.0, 1.0);
        broken.genres = None;
        let movies = Movies::from_records(vec![broken.clone()]);
        assert_eq!(movies.without_genres, 1);
        assert!(broken.genre_labels().is_empty());
    }
}
