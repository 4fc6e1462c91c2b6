use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Write a synthetic netflix_movies_cleaned.csv for the dashboard")]
struct Args {
    /// Also write netflix_movies_cleaned.parquet.
    #[arg(long)]
    parquet: bool,

    /// Number of movies to generate.
    #[arg(long, default_value_t = 2000)]
    rows: usize,

    /// PRNG seed; the same seed always yields the same table.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const GENRES: [&str; 19] = [
    "Action",
    "Adventure",
    "Animation",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "History",
    "Horror",
    "Music",
    "Mystery",
    "Romance",
    "Science Fiction",
    "TV Movie",
    "Thriller",
    "War",
    "Western",
];

const ADJECTIVES: [&str; 12] = [
    "Silent", "Crimson", "Last", "Hidden", "Broken", "Golden", "Midnight", "Lost", "Wild",
    "Frozen", "Electric", "Distant",
];

const NOUNS: [&str; 12] = [
    "Harbor", "Empire", "Garden", "Signal", "Frontier", "Echo", "Kingdom", "Voyage", "Witness",
    "Horizon", "Machine", "Promise",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One output row, using the dataset's column names.
#[derive(Serialize)]
struct SampleMovie {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Genre")]
    genre: String,
    #[serde(rename = "Release_Year")]
    release_year: i64,
    #[serde(rename = "Vote_Average")]
    vote_average: f64,
    #[serde(rename = "Popularity")]
    popularity: f64,
}

fn serialize_genres(genres: &[&str]) -> String {
    let quoted: Vec<String> = genres.iter().map(|g| format!("'{g}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn generate_movies(n: usize, rng: &mut SimpleRng) -> Vec<SampleMovie> {
    (0..n)
        .map(|i| {
            let title = format!(
                "The {} {}{}",
                ADJECTIVES[rng.below(ADJECTIVES.len())],
                NOUNS[rng.below(NOUNS.len())],
                if i % 5 == 0 { format!(" {}", 2 + rng.below(3)) } else { String::new() }
            );

            let mut genres: Vec<&str> = Vec::new();
            for _ in 0..1 + rng.below(3) {
                let g = GENRES[rng.below(GENRES.len())];
                if !genres.contains(&g) {
                    genres.push(g);
                }
            }

            let vote_average = (rng.gauss(6.4, 1.1).clamp(0.0, 10.0) * 10.0).round() / 10.0;
            // Long-tailed popularity, loosely tied to rating.
            let popularity =
                ((rng.gauss(3.0 + vote_average * 0.15, 0.9)).exp() * 10.0).round() / 10.0;

            SampleMovie {
                title,
                genre: serialize_genres(&genres),
                release_year: 1980 + rng.below(45) as i64,
                vote_average,
                popularity,
            }
        })
        .collect()
}

fn write_parquet(movies: &[SampleMovie], output_path: &str) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Title", DataType::Utf8, false),
        Field::new("Genre", DataType::Utf8, false),
        Field::new("Release_Year", DataType::Int64, false),
        Field::new("Vote_Average", DataType::Float64, false),
        Field::new("Popularity", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(movies.iter().map(|m| &m.title))),
            Arc::new(StringArray::from_iter_values(movies.iter().map(|m| &m.genre))),
            Arc::new(Int64Array::from_iter_values(movies.iter().map(|m| m.release_year))),
            Arc::new(Float64Array::from_iter_values(movies.iter().map(|m| m.vote_average))),
            Arc::new(Float64Array::from_iter_values(movies.iter().map(|m| m.popularity))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {} movies to {output_path}", movies.len());
}

fn main() {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let movies = generate_movies(args.rows, &mut rng);

    let output_path = "netflix_movies_cleaned.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    for movie in &movies {
        writer.serialize(movie).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
    println!("Wrote {} movies to {output_path}", movies.len());

    if args.parquet {
        write_parquet(&movies, "netflix_movies_cleaned.parquet");
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn parquet_flag_is_parsed() {
        let args = Args::try_parse_from(["generate_sample", "--parquet"]).unwrap();
        assert!(args.parquet);
        assert_eq!(args.rows, 2000);
        assert_eq!(args.seed, 42);
    }

    #[test]
    fn misspelled_flag_is_an_error() {
        let err = Args::try_parse_from(["generate_sample", "--parqet"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn same_seed_gives_the_same_movies() {
        let a = generate_movies(20, &mut SimpleRng::new(7));
        let b = generate_movies(20, &mut SimpleRng::new(7));
        let key = |m: &SampleMovie| (m.title.clone(), m.genre.clone(), m.release_year);
        assert_eq!(a.iter().map(key).collect::<Vec<_>>(), b.iter().map(key).collect::<Vec<_>>());
        assert!(a.iter().all(|m| (0.0..=10.0).contains(&m.vote_average) && m.popularity >= 0.0));
    }
}
