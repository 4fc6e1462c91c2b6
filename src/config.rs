use std::path::PathBuf;

use clap::Parser;

/// Dataset read when nothing else is configured.
pub const DEFAULT_DATA_PATH: &str = "netflix_movies_cleaned.csv";

/// Environment variable overriding the dataset path.
pub const DATA_PATH_ENV: &str = "REEL_DASH_DATA";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    /// Entries kept by the genre distribution and genre popularity charts.
    pub top_n: usize,
    /// Genres pre-selected in the sidebar.
    pub default_genre_count: usize,
    /// Lower bound of the default year range unless the data starts later.
    pub default_year_floor: i32,
    /// Example titles listed per year in the release chart.
    pub example_titles: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_n: 7,
            default_genre_count: 5,
            default_year_floor: 2010,
            example_titles: 3,
        }
    }
}

/// Command line of the dashboard binary.
#[derive(Parser, Debug)]
#[command(about = "Interactive movie dataset dashboard")]
pub struct Cli {
    /// Movie table to load (.csv, .json or .parquet).
    #[arg(value_name = "PATH", env = DATA_PATH_ENV, default_value = DEFAULT_DATA_PATH)]
    data_path: PathBuf,
}

impl DashboardConfig {
    /// Resolve from the process: CLI argument, then `REEL_DASH_DATA`, then the default.
    ///
    /// Exits with clap's usage message on `--help` or a bad argument.
    pub fn from_env() -> Self {
        Self::from_cli(Cli::parse())
    }

    fn from_cli(cli: Cli) -> Self {
        let data_path = if cli.data_path.as_os_str().to_string_lossy().trim().is_empty() {
            PathBuf::from(DEFAULT_DATA_PATH)
        } else {
            cli.data_path
        };

        Self {
            data_path,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn parse(args: &[&str]) -> Result<DashboardConfig, clap::Error> {
        let argv = std::iter::once("reel-dash").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(DashboardConfig::from_cli)
    }

    #[test]
    fn positional_argument_sets_the_data_path() {
        let c = parse(&["movies.parquet"]).unwrap();
        assert_eq!(c.data_path, PathBuf::from("movies.parquet"));
        assert_eq!(c.top_n, 7);
    }

    #[test]
    fn help_is_not_taken_as_a_path() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = parse(&["--verbose"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn blank_argument_falls_back_to_default() {
        let c = parse(&["  "]).unwrap();
        assert_eq!(c, DashboardConfig::default());
        assert_eq!(c.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
