use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

/// Failure to produce a usable movie table. Fatal at startup.
#[derive(Debug, Error)]
pub enum DataError {
    /// The input file is missing, unreadable, or does not match the schema.
    #[error("dataset unavailable ({path}): {reason}")]
    Unavailable { path: PathBuf, reason: String },
}

impl DataError {
    /// Wrap a loader failure, keeping the whole `anyhow` context chain.
    pub fn unavailable(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        DataError::Unavailable {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Genre field errors
// ---------------------------------------------------------------------------

/// What went wrong while parsing a serialized genre list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreParseErrorKind {
    ExpectedOpenBracket,
    ExpectedQuote(char),
    ExpectedCommaOrClose(char),
    UnterminatedString,
    UnexpectedEnd,
    TrailingInput(char),
}

impl std::fmt::Display for GenreParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpectedOpenBracket => write!(f, "expected '['"),
            Self::ExpectedQuote(c) => write!(f, "expected a quoted label, found {c:?}"),
            Self::ExpectedCommaOrClose(c) => write!(f, "expected ',' or ']', found {c:?}"),
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::UnexpectedEnd => write!(f, "unexpected end of input"),
            Self::TrailingInput(c) => write!(f, "trailing input starting with {c:?}"),
        }
    }
}

/// A malformed `Genre` cell. Recovered per row by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed genre list at byte {offset}: {kind}")]
pub struct GenreParseError {
    pub offset: usize,
    pub kind: GenreParseErrorKind,
}
