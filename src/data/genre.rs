use std::collections::BTreeSet;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{GenreParseError, GenreParseErrorKind};

use super::model::Movies;

// ---------------------------------------------------------------------------
// Serialized genre list parser
// ---------------------------------------------------------------------------

/// Parse a bracketed list of quoted labels, e.g. `['Action', "Sci-Fi"]`.
///
/// Only this small grammar is accepted; nothing in the cell is evaluated.
/// Labels are returned verbatim and in order, duplicates included.
pub fn parse_genre_list(text: &str) -> Result<Vec<String>, GenreParseError> {
    let mut cursor = Cursor::new(text);

    cursor.skip_ws();
    cursor.expect_open()?;

    let mut labels = Vec::new();
    cursor.skip_ws();
    if cursor.eat(']') {
        cursor.finish()?;
        return Ok(labels);
    }

    loop {
        cursor.skip_ws();
        // Tolerate a trailing comma: `['Drama',]`
        if !labels.is_empty() && cursor.eat(']') {
            break;
        }
        labels.push(cursor.quoted()?);
        cursor.skip_ws();
        match cursor.next() {
            Some((_, ',')) => continue,
            Some((_, ']')) => break,
            Some((offset, c)) => {
                return Err(GenreParseError {
                    offset,
                    kind: GenreParseErrorKind::ExpectedCommaOrClose(c),
                })
            }
            None => return Err(cursor.end_error()),
        }
    }

    cursor.finish()?;
    Ok(labels)
}

struct Cursor<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            len: text.len(),
        }
    }

    fn next(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn skip_ws(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn eat(&mut self, want: char) -> bool {
        self.chars.next_if(|&(_, c)| c == want).is_some()
    }

    fn end_error(&self) -> GenreParseError {
        GenreParseError {
            offset: self.len,
            kind: GenreParseErrorKind::UnexpectedEnd,
        }
    }

    fn expect_open(&mut self) -> Result<(), GenreParseError> {
        match self.next() {
            Some((_, '[')) => Ok(()),
            Some((offset, _)) => Err(GenreParseError {
                offset,
                kind: GenreParseErrorKind::ExpectedOpenBracket,
            }),
            None => Err(self.end_error()),
        }
    }

    fn quoted(&mut self) -> Result<String, GenreParseError> {
        let (start, quote) = match self.next() {
            Some((offset, c @ ('\'' | '"'))) => (offset, c),
            Some((offset, c)) => {
                return Err(GenreParseError {
                    offset,
                    kind: GenreParseErrorKind::ExpectedQuote(c),
                })
            }
            None => return Err(self.end_error()),
        };

        let mut label = String::new();
        while let Some((_, c)) = self.next() {
            match c {
                '\\' => match self.next() {
                    Some((_, '\\')) => label.push('\\'),
                    Some((_, '\'')) => label.push('\''),
                    Some((_, '"')) => label.push('"'),
                    Some((_, 'n')) => label.push('\n'),
                    Some((_, 't')) => label.push('\t'),
                    Some((_, other)) => {
                        label.push('\\');
                        label.push(other);
                    }
                    None => break,
                },
                c if c == quote => return Ok(label),
                c => label.push(c),
            }
        }

        Err(GenreParseError {
            offset: start,
            kind: GenreParseErrorKind::UnterminatedString,
        })
    }

    fn finish(&mut self) -> Result<(), GenreParseError> {
        self.skip_ws();
        match self.next() {
            None => Ok(()),
            Some((offset, c)) => Err(GenreParseError {
                offset,
                kind: GenreParseErrorKind::TrailingInput(c),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Genre options
// ---------------------------------------------------------------------------

/// Union of all genre labels in the table, sorted lexicographically.
///
/// Rows whose genre cell failed to parse were already reported by the
/// loader and contribute nothing here.
pub fn extract_genres(movies: &Movies) -> BTreeSet<String> {
    let genres: BTreeSet<String> = movies
        .records
        .iter()
        .flat_map(|m| m.genre_labels())
        .cloned()
        .collect();

    log::debug!(
        "{} distinct genres across {} movies ({} without genres)",
        genres.len(),
        movies.len(),
        movies.without_genres
    );
    genres
}
