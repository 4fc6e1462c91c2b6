use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::config::DashboardConfig;

use super::filter::{FilterCriteria, FilteredMovies};

// ---------------------------------------------------------------------------
// Chart-ready tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub count: usize,
    /// Up to N distinct non-empty titles, first seen first.
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub rating: f64,
    pub popularity: f64,
    pub title: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenrePopularity {
    pub genre: String,
    pub mean_popularity: f64,
}

/// Headline numbers for the metric cards.
///
/// Means are `None` for an empty selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub mean_rating: Option<f64>,
    pub mean_popularity: Option<f64>,
    pub year_range: (i32, i32),
}

const NO_DATA: &str = "no data";

impl Summary {
    pub fn total_label(&self) -> String {
        self.total.to_string()
    }

    pub fn rating_label(&self) -> String {
        self.mean_rating
            .map_or_else(|| NO_DATA.to_string(), |v| format!("{v:.2}"))
    }

    pub fn popularity_label(&self) -> String {
        self.mean_popularity
            .map_or_else(|| NO_DATA.to_string(), |v| format!("{v:.1}"))
    }

    pub fn year_range_label(&self) -> String {
        format!("{} - {}", self.year_range.0, self.year_range.1)
    }
}

/// Everything the dashboard renders for one filter state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub summary: Summary,
    pub genre_counts: Vec<GenreCount>,
    pub year_series: Vec<YearPoint>,
    pub scatter: Vec<ScatterPoint>,
    pub genre_popularity: Vec<GenrePopularity>,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            total: 0,
            mean_rating: None,
            mean_popularity: None,
            year_range: (0, 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Recompute every chart table and metric from the filtered rows.
pub fn build_view(
    rows: &FilteredMovies<'_>,
    criteria: &FilterCriteria,
    config: &DashboardConfig,
) -> DashboardView {
    DashboardView {
        summary: summary(rows, criteria.year_range),
        genre_counts: genre_counts(rows, config.top_n),
        year_series: year_series(rows, config.example_titles),
        scatter: scatter_points(rows),
        genre_popularity: genre_popularity(rows, config.top_n),
    }
}

pub fn summary(rows: &FilteredMovies<'_>, year_range: (i32, i32)) -> Summary {
    Summary {
        total: rows.len(),
        mean_rating: mean(rows.iter().map(|m| m.vote_average)),
        mean_popularity: mean(rows.iter().map(|m| m.popularity)),
        year_range,
    }
}

/// Occurrences of each genre label, most frequent first, top `top_n`.
///
/// Ties keep the order in which genres were first met.
pub fn genre_counts(rows: &FilteredMovies<'_>, top_n: usize) -> Vec<GenreCount> {
    let mut counts: Vec<GenreCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for genre in rows.iter().flat_map(|m| m.genre_labels()) {
        match index.get(genre.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(genre.as_str(), counts.len());
                counts.push(GenreCount {
                    genre: genre.clone(),
                    count: 1,
                });
            }
        }
    }

    // `sort_by` is stable.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}

/// Movies per observed release year, ascending by year.
pub fn year_series(rows: &FilteredMovies<'_>, max_examples: usize) -> Vec<YearPoint> {
    let mut years: BTreeMap<i32, YearPoint> = BTreeMap::new();

    for movie in rows.iter() {
        let point = years.entry(movie.release_year).or_insert_with(|| YearPoint {
            year: movie.release_year,
            count: 0,
            examples: Vec::new(),
        });
        point.count += 1;

        if point.examples.len() < max_examples
            && !movie.title.is_empty()
            && !point.examples.contains(&movie.title)
        {
            point.examples.push(movie.title.clone());
        }
    }

    years.into_values().collect()
}

pub fn scatter_points(rows: &FilteredMovies<'_>) -> Vec<ScatterPoint> {
    rows.iter()
        .map(|m| ScatterPoint {
            rating: m.vote_average,
            popularity: m.popularity,
            title: m.title.clone(),
            year: m.release_year,
        })
        .collect()
}

/// Mean popularity per genre, highest first, top `top_n`.
///
/// A movie with several genres contributes to each of them.
pub fn genre_popularity(rows: &FilteredMovies<'_>, top_n: usize) -> Vec<GenrePopularity> {
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for movie in rows.iter() {
        for genre in movie.genre_labels() {
            let i = *index.entry(genre.as_str()).or_insert_with(|| {
                groups.push((genre.as_str(), 0.0, 0));
                groups.len() - 1
            });
            groups[i].1 += movie.popularity;
            groups[i].2 += 1;
        }
    }

    let mut means: Vec<GenrePopularity> = groups
        .into_iter()
        .filter_map(|(genre, sum, n)| {
            mean_of(sum, n).map(|mean_popularity| GenrePopularity {
                genre: genre.to_string(),
                mean_popularity,
            })
        })
        .collect();

    means.sort_by(|a, b| b.mean_popularity.total_cmp(&a.mean_popularity));
    means.truncate(top_n);
    means
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    mean_of(sum, n)
}

fn mean_of(sum: f64, n: usize) -> Option<f64> {
    (n > 0).then(|| sum / n as f64).filter(|m| m.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter;
    use crate::data::model::{MovieRecord, Movies};

    fn scenario() -> Movies {
        Movies::from_records(vec![
            MovieRecord::new("A", &["Action", "Drama"], 2015, 7.5, 50.0),
            MovieRecord::new("B", &["Drama"], 2015, 8.0, 30.0),
            MovieRecord::new("C", &["Comedy"], 2020, 6.0, 90.0),
        ])
    }

    fn criteria(genres: &[&str], ratings: (f64, f64)) -> FilterCriteria {
        FilterCriteria {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            year_range: (2010, 2020),
            rating_range: ratings,
        }
    }

    fn all(movies: &Movies) -> FilteredMovies<'_> {
        FilteredMovies {
            rows: movies.records.iter().collect(),
        }
    }

    #[test]
    fn drama_scenario() {
        let movies = scenario();
        let c = criteria(&["Drama"], (0.0, 10.0));
        let rows = filter(&movies.records, &c);
        let view = build_view(&rows, &c, &DashboardConfig::default());

        assert_eq!(
            view.genre_counts,
            vec![
                GenreCount { genre: "Drama".into(), count: 2 },
                GenreCount { genre: "Action".into(), count: 1 },
            ]
        );
        assert_eq!(
            view.year_series,
            vec![YearPoint {
                year: 2015,
                count: 2,
                examples: vec!["A".into(), "B".into()],
            }]
        );
        assert_eq!(
            view.genre_popularity,
            vec![
                GenrePopularity { genre: "Action".into(), mean_popularity: 50.0 },
                GenrePopularity { genre: "Drama".into(), mean_popularity: 40.0 },
            ]
        );
        assert_eq!(view.scatter.len(), 2);
        assert_eq!(view.summary.total, 2);
        assert_eq!(view.summary.rating_label(), "7.75");
        assert_eq!(view.summary.popularity_label(), "40.0");
        assert_eq!(view.summary.year_range_label(), "2010 - 2020");
    }

    #[test]
    fn empty_selection_degrades_gracefully() {
        let movies = scenario();
        let c = criteria(&[], (9.5, 10.0));
        let rows = filter(&movies.records, &c);
        let view = build_view(&rows, &c, &DashboardConfig::default());

        assert_eq!(view.summary.total, 0);
        assert_eq!(view.summary.total_label(), "0");
        assert_eq!(view.summary.mean_rating, None);
        assert_eq!(view.summary.rating_label(), "no data");
        assert_eq!(view.summary.popularity_label(), "no data");
        assert!(view.genre_counts.is_empty());
        assert!(view.year_series.is_empty());
        assert!(view.scatter.is_empty());
        assert!(view.genre_popularity.is_empty());
    }

    #[test]
    fn genre_counts_truncate_and_keep_first_seen_ties() {
        let genres = ["G1", "G2", "G3", "G4", "G5", "G6", "G7", "G8", "G9"];
        let mut records: Vec<MovieRecord> = genres
            .iter()
            .map(|&g| MovieRecord::new(g, &[g], 2015, 5.0, 1.0))
            .collect();
        records.push(MovieRecord::new("x", &["G9"], 2015, 5.0, 1.0));
        let movies = Movies::from_records(records);
        let rows = all(&movies);

        let counts = genre_counts(&rows, 7);
        let names: Vec<&str> = counts.iter().map(|c| c.genre.as_str()).collect();
        assert_eq!(names, vec!["G9", "G1", "G2", "G3", "G4", "G5", "G6"]);
        assert!(counts.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn genre_popularity_keeps_the_seven_highest_means() {
        // G1 has the lowest mean popularity, G9 the highest.
        let records: Vec<MovieRecord> = (1..=9)
            .map(|i| {
                let genre = format!("G{i}");
                MovieRecord::new(&genre, &[genre.as_str()], 2015, 5.0, i as f64 * 10.0)
            })
            .collect();
        let movies = Movies::from_records(records);
        let rows = all(&movies);

        let means = genre_popularity(&rows, 7);
        assert_eq!(means.len(), 7);
        assert!(means
            .windows(2)
            .all(|w| w[0].mean_popularity >= w[1].mean_popularity));
        let names: Vec<&str> = means.iter().map(|m| m.genre.as_str()).collect();
        assert_eq!(names, vec!["G9", "G8", "G7", "G6", "G5", "G4", "G3"]);
        assert!(!names.contains(&"G1") && !names.contains(&"G2"));
        assert_eq!(means[0].mean_popularity, 90.0);
    }

    #[test]
    fn genre_count_total_matches_exploded_pairs() {
        let movies = scenario();
        let rows = all(&movies);
        let counts = genre_counts(&rows, usize::MAX);
        let pairs: usize = rows.iter().map(|m| m.genre_labels().len()).sum();
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), pairs);
    }

    #[test]
    fn rows_without_genres_only_feed_year_and_rating_views() {
        let mut broken = MovieRecord::new("Z", &[], 2018, 9.0, 400.0);
        broken.genres = None;
        let movies = Movies::from_records(vec![
            MovieRecord::new("A", &["Drama"], 2018, 7.0, 10.0),
            broken,
        ]);
        let rows = all(&movies);

        assert_eq!(genre_counts(&rows, 7).len(), 1);
        assert_eq!(genre_popularity(&rows, 7)[0].mean_popularity, 10.0);
        assert_eq!(year_series(&rows, 3)[0].count, 2);
        assert_eq!(scatter_points(&rows).len(), 2);
    }

    #[test]
    fn year_examples_are_distinct_nonempty_and_capped() {
        let movies = Movies::from_records(vec![
            MovieRecord::new("", &["Drama"], 2001, 5.0, 1.0),
            MovieRecord::new("A", &["Drama"], 2001, 5.0, 1.0),
            MovieRecord::new("A", &["Drama"], 2001, 5.0, 1.0),
            MovieRecord::new("B", &["Drama"], 2001, 5.0, 1.0),
            MovieRecord::new("C", &["Drama"], 2001, 5.0, 1.0),
            MovieRecord::new("D", &["Drama"], 2001, 5.0, 1.0),
            MovieRecord::new("E", &["Drama"], 1999, 5.0, 1.0),
        ]);
        let series = year_series(&all(&movies), 3);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].year, 1999);
        assert_eq!(series[1].count, 6);
        assert_eq!(series[1].examples, vec!["A", "B", "C"]);
        assert!(series.iter().all(|p| p.count > 0));
    }

    #[test]
    fn genre_popularity_stays_within_group_bounds() {
        let movies = Movies::from_records(vec![
            MovieRecord::new("A", &["Drama", "War"], 2001, 5.0, 12.5),
            MovieRecord::new("B", &["Drama"], 2002, 5.0, 100.0),
            MovieRecord::new("C", &["War", "Drama"], 2003, 5.0, 3.0),
        ]);
        let rows = all(&movies);

        for entry in genre_popularity(&rows, 7) {
            let pops: Vec<f64> = rows
                .iter()
                .filter(|m| m.genre_labels().contains(&entry.genre))
                .map(|m| m.popularity)
                .collect();
            let lo = pops.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = pops.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(lo <= entry.mean_popularity && entry.mean_popularity <= hi);
        }
    }

    #[test]
    fn scatter_has_one_point_per_row() {
        let movies = scenario();
        let points = scatter_points(&all(&movies));
        assert_eq!(
            points[2],
            ScatterPoint {
                rating: 6.0,
                popularity: 90.0,
                title: "C".into(),
                year: 2020,
            }
        );
    }

    #[test]
    fn view_serializes_for_export() {
        let movies = scenario();
        let c = criteria(&[], (0.0, 10.0));
        let view = build_view(&filter(&movies.records, &c), &c, &DashboardConfig::default());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["summary"]["total"], 3);
        assert_eq!(json["genre_counts"][0]["genre"], "Drama");
        assert!(json["summary"]["mean_rating"].is_number());
    }
}
