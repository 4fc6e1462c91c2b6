/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Movies (genre cells parsed once)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one shared Arc<Movies> per process
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / rating / genre predicates → FilteredMovies
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  four chart tables + summary metrics
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod genre;
pub mod loader;
pub mod model;
