use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeListArray,
    ListArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::DataError;

use super::genre::parse_genre_list;
use super::model::{MovieRecord, Movies};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a movie table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – `Title, Genre, Release_Year, Vote_Average, Popularity`
/// * `.json`    – `[{ "Title": ..., "Genre": ..., ... }, ...]`
/// * `.parquet` – same column names; `Genre` as text or a list of strings
pub fn load_file(path: &Path) -> Result<Movies, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(anyhow::anyhow!("Unsupported file extension: .{other}")),
    };

    match loaded {
        Ok(records) => {
            let movies = Movies::from_records(records).with_source(path);
            log::info!(
                "Loaded {} movies from {} ({} without usable genres)",
                movies.len(),
                path.display(),
                movies.without_genres
            );
            Ok(movies)
        }
        Err(e) => Err(DataError::unavailable(path, &e)),
    }
}

/// Columns a CSV header must name.
const REQUIRED_COLUMNS: [&str; 5] = [
    "Title",
    "Genre",
    "Release_Year",
    "Vote_Average",
    "Popularity",
];

// ---------------------------------------------------------------------------
// Row assembly shared by all formats
// ---------------------------------------------------------------------------

/// Raw genre cell before parsing.
enum GenreCell {
    Missing,
    Encoded(String),
    List(Vec<String>),
    /// Present but neither text nor a list of strings.
    Malformed(String),
}

/// Validate one row and parse its genre cell.
///
/// Numeric problems are fatal; a malformed genre cell only drops the
/// row's genres and is reported as a warning.
fn build_record(
    row: usize,
    title: Option<String>,
    genre: GenreCell,
    release_year: i64,
    vote_average: f64,
    popularity: f64,
) -> Result<MovieRecord> {
    let release_year = i32::try_from(release_year)
        .ok()
        .with_context(|| format!("Row {row}: Release_Year {release_year} out of range"))?;
    if !vote_average.is_finite() || !(0.0..=10.0).contains(&vote_average) {
        bail!("Row {row}: Vote_Average {vote_average} outside 0–10");
    }
    if !popularity.is_finite() || popularity < 0.0 {
        bail!("Row {row}: Popularity {popularity} is not a non-negative number");
    }

    let genres = match genre {
        GenreCell::Missing => None,
        GenreCell::List(labels) => Some(labels),
        GenreCell::Malformed(reason) => {
            log::warn!("Row {row}: skipping genres of {title:?}: {reason}");
            None
        }
        GenreCell::Encoded(text) if text.trim().is_empty() => None,
        GenreCell::Encoded(text) => match parse_genre_list(&text) {
            Ok(labels) => Some(labels),
            Err(e) => {
                log::warn!("Row {row}: skipping genres of {title:?}: {e}");
                None
            }
        },
    };

    Ok(MovieRecord {
        title: title.unwrap_or_default(),
        release_year,
        vote_average,
        popularity,
        genres,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV row. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct CsvMovie {
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Genre", default)]
    genre: Option<String>,
    #[serde(rename = "Release_Year")]
    release_year: i64,
    #[serde(rename = "Vote_Average")]
    vote_average: f64,
    #[serde(rename = "Popularity")]
    popularity: f64,
}

/// CSV layout:  header row with column names.
/// `Genre` holds a serialized list: `"['Action', 'Drama']"`.
fn load_csv(path: &Path) -> Result<Vec<MovieRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?;
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!("CSV missing '{col}' column");
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvMovie>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        let genre = raw.genre.map_or(GenreCell::Missing, GenreCell::Encoded);
        records.push(build_record(
            row_no,
            raw.title,
            genre,
            raw.release_year,
            raw.vote_average,
            raw.popularity,
        )?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Title": "Spider-Man: No Way Home",
///     "Genre": "['Action', 'Adventure']",
///     "Release_Year": 2021,
///     "Vote_Average": 8.3,
///     "Popularity": 5083.954
///   },
///   ...
/// ]
/// ```
///
/// `Genre` may also be a plain JSON array of strings.
fn load_json(path: &Path) -> Result<Vec<MovieRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let title = match obj.get("Title") {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        let genre = json_genre(obj.get("Genre"));
        let release_year = json_number(obj.get("Release_Year"), i, "Release_Year")?;
        if release_year.fract() != 0.0 {
            bail!("Row {i}: Release_Year {release_year} is not an integer");
        }
        let vote_average = json_number(obj.get("Vote_Average"), i, "Vote_Average")?;
        let popularity = json_number(obj.get("Popularity"), i, "Popularity")?;

        records.push(build_record(
            i,
            title,
            genre,
            release_year as i64,
            vote_average,
            popularity,
        )?);
    }

    Ok(records)
}

fn json_number(val: Option<&JsonValue>, row: usize, col: &str) -> Result<f64> {
    val.and_then(JsonValue::as_f64)
        .with_context(|| format!("Row {row}: missing or non-numeric '{col}'"))
}

fn json_genre(val: Option<&JsonValue>) -> GenreCell {
    match val {
        None | Some(JsonValue::Null) => GenreCell::Missing,
        Some(JsonValue::String(s)) => GenreCell::Encoded(s.clone()),
        Some(JsonValue::Array(items)) => {
            let mut labels = Vec::with_capacity(items.len());
            for (j, v) in items.iter().enumerate() {
                match v.as_str() {
                    Some(label) => labels.push(label.to_string()),
                    None => {
                        return GenreCell::Malformed(format!("Genre[{j}] is not a string: {v}"));
                    }
                }
            }
            GenreCell::List(labels)
        }
        Some(other) => GenreCell::Malformed(format!("unexpected Genre value {other}")),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expected Parquet schema:
///
/// | column         | type                              |
/// |----------------|-----------------------------------|
/// | `Title`        | Utf8 (nullable)                   |
/// | `Genre`        | Utf8 or List<Utf8> (nullable)     |
/// | `Release_Year` | Int32 / Int64                     |
/// | `Vote_Average` | Float32 / Float64 / Int32 / Int64 |
/// | `Popularity`   | Float32 / Float64 / Int32 / Int64 |
fn load_parquet(path: &Path) -> Result<Vec<MovieRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let title_col = column(&batch, "Title")?;
        let genre_col = column(&batch, "Genre")?;
        let year_col = column(&batch, "Release_Year")?;
        let rating_col = column(&batch, "Vote_Average")?;
        let pop_col = column(&batch, "Popularity")?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let title = extract_string(title_col, row)
                .with_context(|| format!("Row {row_no}: failed to read 'Title'"))?;
            let genre = extract_genre(genre_col, row)
                .with_context(|| format!("Row {row_no}: failed to read 'Genre'"))?;
            let year = extract_i64(year_col, row)
                .with_context(|| format!("Row {row_no}: failed to read 'Release_Year'"))?;
            let rating = extract_f64(rating_col, row)
                .with_context(|| format!("Row {row_no}: failed to read 'Vote_Average'"))?;
            let popularity = extract_f64(pop_col, row)
                .with_context(|| format!("Row {row_no}: failed to read 'Popularity'"))?;

            records.push(build_record(row_no, title, genre, year, rating, popularity)?);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn extract_string(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => Ok(Some(col.as_string::<i32>().value(row).to_string())),
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(row).to_string())),
        other => bail!("Expected Utf8 column, got {other:?}"),
    }
}

/// `Genre` is either serialized text or a List / LargeList of strings.
fn extract_genre(col: &ArrayRef, row: usize) -> Result<GenreCell> {
    if col.is_null(row) {
        return Ok(GenreCell::Missing);
    }

    let values_array = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            return Ok(extract_string(col, row)?.map_or(GenreCell::Missing, GenreCell::Encoded));
        }
        DataType::List(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<ListArray>()
                .context("expected ListArray")?;
            list_arr.value(row)
        }
        DataType::LargeList(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<LargeListArray>()
                .context("expected LargeListArray")?;
            list_arr.value(row)
        }
        other => bail!("Expected Utf8 or List column, got {other:?}"),
    };

    let strings = values_array
        .as_any()
        .downcast_ref::<StringArray>()
        .with_context(|| {
            format!(
                "List inner type is {:?}, expected Utf8",
                values_array.data_type()
            )
        })?;
    Ok(GenreCell::List(
        strings.iter().flatten().map(str::to_string).collect(),
    ))
}

fn extract_i64(col: &ArrayRef, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value");
    }
    if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Ok(arr.value(row) as i64)
    } else {
        bail!("Expected Int32 or Int64, got {:?}", col.data_type())
    }
}

fn extract_f64(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Ok(arr.value(row) as f64)
    } else {
        bail!(
            "Expected Float32, Float64, Int32 or Int64, got {:?}",
            col.data_type()
        )
    }
}
