//! Parsing of typed passage references such as `John 3:16`.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::catalog::{Catalog, ALL_VERSES};
use crate::selection::{Field, Selection};

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?P<book>(?:[1-3]\s*)?[a-z][a-z' ]*?)",
        r"\s*(?:(?P<chapter>\d+)(?::(?P<verse>\d+|all))?)?\s*$",
    ))
    .expect("reference pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("could not read passage reference '{0}'")]
    Malformed(String),

    #[error("unknown book '{0}'")]
    UnknownBook(String),

    #[error("{book} has chapters 1-{max}, got {chapter}")]
    ChapterOutOfRange { book: String, chapter: u32, max: u32 },

    #[error("verses run 1-{max}, got {verse}")]
    VerseOutOfRange { verse: u32, max: u32 },
}

/// A parsed passage. `verse` is either a number or `"all"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageRef {
    pub book: String,
    pub chapter: Option<u32>,
    pub verse: Option<String>,
}

impl PassageRef {
    /// Applies the passage on top of an existing selection. Parts the
    /// reference does not mention are left as they were.
    pub fn apply_to(&self, selection: &Selection) -> Selection {
        let mut next = selection.with(Field::Book, self.book.as_str());
        if let Some(chapter) = self.chapter {
            next = next.with(Field::Chapter, chapter.to_string());
        }
        if let Some(verse) = &self.verse {
            next = next.with(Field::Verse, verse.as_str());
        }
        next
    }
}

pub fn parse(input: &str, catalog: &Catalog) -> Result<PassageRef, ReferenceError> {
    let caps = REFERENCE_RE
        .captures(input)
        .ok_or_else(|| ReferenceError::Malformed(input.trim().to_string()))?;

    let raw_book = spaced_ordinal(caps["book"].trim());
    let book = catalog
        .resolve_book(&raw_book)
        .ok_or_else(|| ReferenceError::UnknownBook(raw_book.clone()))?
        .to_string();

    let chapter = match caps.name("chapter") {
        Some(m) => {
            let chapter: u32 = m
                .as_str()
                .parse()
                .map_err(|_| ReferenceError::Malformed(input.trim().to_string()))?;
            let range = catalog.chapters_for(&book);
            if !range.contains(&chapter) {
                return Err(ReferenceError::ChapterOutOfRange {
                    book,
                    chapter,
                    max: *range.end(),
                });
            }
            Some(chapter)
        }
        None => None,
    };

    let verse = match caps.name("verse") {
        Some(m) if m.as_str().eq_ignore_ascii_case(ALL_VERSES) => Some(ALL_VERSES.to_string()),
        Some(m) => {
            let verse: u32 = m
                .as_str()
                .parse()
                .map_err(|_| ReferenceError::Malformed(input.trim().to_string()))?;
            if !catalog.verses().contains(&verse) {
                return Err(ReferenceError::VerseOutOfRange {
                    verse,
                    max: catalog.max_verse,
                });
            }
            Some(verse.to_string())
        }
        None => None,
    };

    Ok(PassageRef { book, chapter, verse })
}

/// "1john" -> "1 john"
fn spaced_ordinal(book: &str) -> String {
    let mut chars = book.chars();
    match (chars.next(), chars.next()) {
        (Some(d), Some(c)) if d.is_ascii_digit() && c.is_alphabetic() => {
            format!("{} {}", d, &book[1..])
        }
        _ => book.to_string(),
    }
}
