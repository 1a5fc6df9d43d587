//! Reference lists offered by the selection form.
//!
//! The built-in lists cover the 66 book Protestant canon, a handful of public
//! domain commentaries, and the languages and scrape types the form knows
//! about. A catalog can also be injected from a JSON file so that real
//! per-book chapter counts can be supplied without touching code.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

use crate::selection::Field;

/// Verse option meaning "the whole chapter".
pub const ALL_VERSES: &str = "all";

pub const DEFAULT_MAX_CHAPTER: u32 = 50;
pub const DEFAULT_MAX_VERSE: u32 = 30;
/// Upper bound for any chapter or verse count a catalog may declare.
pub const MAX_COUNT: u32 = 1000;

const BOOKS: [&str; 66] = [
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Songs",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

const COMMENTARIES: [&str; 8] = [
    "Matthew Henry Commentary",
    "Barnes' Notes",
    "Jamieson-Fausset-Brown",
    "Adam Clarke Commentary",
    "Albert Barnes",
    "John Gill's Exposition",
    "Geneva Study Bible",
    "King James Bible Commentary",
];

const LANGUAGES: [&str; 13] = [
    "English",
    "Spanish",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Russian",
    "Chinese",
    "Japanese",
    "Korean",
    "Arabic",
    "Hebrew",
    "Greek",
];

const SCRAPE_TYPES: [(&str, &str, &str); 5] = [
    ("bibleproject", "Bible Project", "Scrape Bible project content"),
    ("commentary", "Commentary", "Extract biblical commentaries"),
    ("languages", "Languages", "Multi-language Bible content"),
    ("questions", "Questions", "Bible study questions"),
    ("summary", "Summary", "Chapter and verse summaries"),
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog has no {0}")]
    Empty(&'static str),

    #[error("catalog declares {count} {what}, at most {max} allowed")]
    TooLarge {
        what: &'static str,
        count: u32,
        max: u32,
    },
}

/// Kind of content a future backend would extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeType {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub books: Vec<String>,
    pub commentaries: Vec<String>,
    pub languages: Vec<String>,
    pub scrape_types: Vec<ScrapeType>,
    pub max_chapter: u32,
    pub max_verse: u32,
    /// Optional real chapter counts, keyed by book name.
    pub book_chapters: HashMap<String, u32>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            books: BOOKS.iter().map(|s| s.to_string()).collect(),
            commentaries: COMMENTARIES.iter().map(|s| s.to_string()).collect(),
            languages: LANGUAGES.iter().map(|s| s.to_string()).collect(),
            scrape_types: SCRAPE_TYPES
                .iter()
                .map(|(id, name, description)| ScrapeType {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect(),
            max_chapter: DEFAULT_MAX_CHAPTER,
            max_verse: DEFAULT_MAX_VERSE,
            book_chapters: HashMap::new(),
        }
    }
}

impl Catalog {
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub async fn load_from_json(path: &Path) -> Result<Self, CatalogError> {
        let content = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json_str(&content)?;
        log::info!(
            "Loaded catalog from {} ({} books, {} scrape types)",
            path.display(),
            catalog.books.len(),
            catalog.scrape_types.len()
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.books.is_empty() {
            return Err(CatalogError::Empty("books"));
        }
        if self.scrape_types.is_empty() {
            return Err(CatalogError::Empty("scrape types"));
        }
        if self.max_chapter == 0 {
            return Err(CatalogError::Empty("chapters"));
        }
        if self.max_verse == 0 {
            return Err(CatalogError::Empty("verses"));
        }

        let counts = [("chapters", self.max_chapter), ("verses", self.max_verse)]
            .into_iter()
            .chain(self.book_chapters.values().map(|&n| ("chapters", n)));
        for (what, count) in counts {
            if count > MAX_COUNT {
                return Err(CatalogError::TooLarge { what, count, max: MAX_COUNT });
            }
        }
        Ok(())
    }

    /// Chapter numbers offered for `book`. Without injected counts this is
    /// the same fixed range for every book.
    pub fn chapters_for(&self, book: &str) -> RangeInclusive<u32> {
        let count = self
            .book_chapters
            .get(book)
            .copied()
            .filter(|&n| n > 0)
            .unwrap_or(self.max_chapter);
        1..=count
    }

    pub fn verses(&self) -> RangeInclusive<u32> {
        1..=self.max_verse
    }

    /// Verse values in menu order: "all" first, then the numbers.
    pub fn verse_options(&self) -> Vec<String> {
        std::iter::once(ALL_VERSES.to_string())
            .chain(self.verses().map(|v| v.to_string()))
            .collect()
    }

    pub fn scrape_type(&self, id: &str) -> Option<&ScrapeType> {
        self.scrape_types.iter().find(|t| t.id == id)
    }

    /// Values a dropdown for `field` offers, given the book currently chosen.
    pub fn options(&self, field: Field, book: &str) -> Vec<String> {
        match field {
            Field::Book => self.books.clone(),
            Field::Chapter => self.chapters_for(book).map(|c| c.to_string()).collect(),
            Field::Verse => self.verse_options(),
            Field::Commentary => self.commentaries.clone(),
            Field::Language => self.languages.clone(),
            Field::ScrapeType => self.scrape_types.iter().map(|t| t.id.clone()).collect(),
        }
    }

    /// Human label for a stored value; scrape types show their name.
    pub fn display_value(&self, field: Field, value: &str) -> String {
        match field {
            Field::ScrapeType => self
                .scrape_type(value)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| value.to_string()),
            Field::Verse if value == ALL_VERSES => "All verses".to_string(),
            _ => value.to_string(),
        }
    }

    /// The catalog's own spelling of `value` for `field`, if it is one of the
    /// offered options. Scrape types also match on their display name.
    pub fn canonical(&self, field: Field, book: &str, value: &str) -> Option<String> {
        let wanted = normalize(value);
        if field == Field::ScrapeType {
            return self
                .scrape_types
                .iter()
                .find(|t| normalize(&t.id) == wanted || normalize(&t.name) == wanted)
                .map(|t| t.id.clone());
        }
        self.options(field, book)
            .into_iter()
            .find(|o| normalize(o) == wanted)
    }

    /// Canonical book name for loosely typed input ("song of  songs").
    pub fn resolve_book(&self, name: &str) -> Option<&str> {
        let wanted = normalize(name);
        self.books
            .iter()
            .find(|b| normalize(b) == wanted)
            .map(|b| b.as_str())
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_sizes() {
        let catalog = Catalog::default();
        assert_eq!(catalog.books.len(), 66);
        assert_eq!(catalog.commentaries.len(), 8);
        assert_eq!(catalog.languages.len(), 13);
        assert_eq!(catalog.scrape_types.len(), 5);
        assert_eq!(catalog.books.first().map(String::as_str), Some("Genesis"));
        assert_eq!(catalog.books.last().map(String::as_str), Some("Revelation"));
    }

    #[test]
    fn test_ranges_do_not_depend_on_book() {
        let catalog = Catalog::default();
        assert_eq!(catalog.chapters_for("Obadiah"), 1..=50);
        assert_eq!(catalog.chapters_for("Psalms"), 1..=50);
        assert_eq!(catalog.verses(), 1..=30);
    }

    #[test]
    fn test_verse_options_start_with_all() {
        let options = Catalog::default().verse_options();
        assert_eq!(options.len(), 31);
        assert_eq!(options[0], ALL_VERSES);
        assert_eq!(options[1], "1");
        assert_eq!(options[30], "30");
    }

    #[test]
    fn test_injected_chapter_counts() {
        let catalog = Catalog::from_json_str(r#"{"book_chapters": {"Jude": 1, "Psalms": 150}}"#)
            .unwrap();
        assert_eq!(catalog.chapters_for("Jude"), 1..=1);
        assert_eq!(catalog.chapters_for("Psalms"), 1..=150);
        assert_eq!(catalog.chapters_for("John"), 1..=50);
        // Missing lists fall back to the defaults
        assert_eq!(catalog.books.len(), 66);
    }

    #[test]
    fn test_empty_books_rejected() {
        let err = Catalog::from_json_str(r#"{"books": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Empty("books")));
    }

    #[test]
    fn test_oversized_counts_rejected() {
        let err = Catalog::from_json_str(r#"{"max_chapter": 65534}"#).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::TooLarge { what: "chapters", count: 65534, .. }
        ));

        let err = Catalog::from_json_str(r#"{"max_verse": 4000000000}"#).unwrap_err();
        assert!(matches!(err, CatalogError::TooLarge { what: "verses", .. }));

        let err = Catalog::from_json_str(r#"{"book_chapters": {"Psalms": 5000}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::TooLarge { count: 5000, .. }));

        let catalog = Catalog::from_json_str(r#"{"max_chapter": 1000}"#).unwrap();
        assert_eq!(catalog.chapters_for("John"), 1..=MAX_COUNT);
    }

    #[test]
    fn test_resolve_book() {
        let catalog = Catalog::default();
        assert_eq!(catalog.resolve_book("john"), Some("John"));
        assert_eq!(catalog.resolve_book("  song of   SONGS "), Some("Song of Songs"));
        assert_eq!(catalog.resolve_book("1 john"), Some("1 John"));
        assert_eq!(catalog.resolve_book("Hezekiah"), None);
    }

    #[test]
    fn test_canonical_values() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.canonical(Field::ScrapeType, "", "Bible Project").as_deref(),
            Some("bibleproject")
        );
        assert_eq!(
            catalog.canonical(Field::Commentary, "", "barnes' notes").as_deref(),
            Some("Barnes' Notes")
        );
        assert_eq!(catalog.canonical(Field::Verse, "", "ALL").as_deref(), Some("all"));
        assert_eq!(catalog.canonical(Field::Chapter, "John", "51"), None);
        assert_eq!(catalog.canonical(Field::Language, "", "Klingon"), None);
    }

    #[test]
    fn test_display_value() {
        let catalog = Catalog::default();
        assert_eq!(catalog.display_value(Field::ScrapeType, "bibleproject"), "Bible Project");
        assert_eq!(catalog.display_value(Field::Verse, "all"), "All verses");
        assert_eq!(catalog.display_value(Field::Book, "Ruth"), "Ruth");
    }
}
