//! UI-agnostic selection state
//!
//! A `Selection` is never mutated in place. Every user choice produces a new
//! value through `Selection::with`, so the validity predicate can be checked
//! without any rendering code around it.

use serde::{Deserialize, Serialize};

/// One of the six form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Book,
    Chapter,
    Verse,
    ScrapeType,
    Commentary,
    Language,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Book => "book",
            Field::Chapter => "chapter",
            Field::Verse => "verse",
            Field::ScrapeType => "scrape_type",
            Field::Commentary => "commentary",
            Field::Language => "language",
        }
    }

    /// Fields in form order: scripture card first, then scraping options.
    pub fn all() -> [Field; 6] {
        [
            Field::Book,
            Field::Chapter,
            Field::Verse,
            Field::ScrapeType,
            Field::Commentary,
            Field::Language,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Book => "Bible Book",
            Field::Chapter => "Chapter",
            Field::Verse => "Verse (Optional)",
            Field::ScrapeType => "Scrape Type",
            Field::Commentary => "Commentary Type",
            Field::Language => "Language",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Book => "Select a book",
            Field::Chapter => "Chapter",
            Field::Verse => "Verse",
            Field::ScrapeType => "Select scrape type",
            Field::Commentary => "Select commentary",
            Field::Language => "Select language",
        }
    }

    /// Short name used on the configuration badges.
    pub fn badge(&self) -> &'static str {
        match self {
            Field::Book => "Book",
            Field::Chapter => "Chapter",
            Field::Verse => "Verse",
            Field::ScrapeType => "Type",
            Field::Commentary => "Commentary",
            Field::Language => "Language",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Field::Book | Field::Chapter | Field::ScrapeType)
    }
}

/// The six user-chosen parameters. An empty string means "not chosen".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub book: String,
    pub chapter: String,
    pub verse: String,
    pub commentary: String,
    pub language: String,
    pub scrape_type: String,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `field` replaced by `value`. Other fields are
    /// left alone; picking a book does not reset chapter or verse.
    pub fn with(&self, field: Field, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        *next.slot_mut(field) = value.into();
        next
    }

    /// Returns a copy with `field` unset.
    pub fn without(&self, field: Field) -> Self {
        self.with(field, String::new())
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Book => &self.book,
            Field::Chapter => &self.chapter,
            Field::Verse => &self.verse,
            Field::ScrapeType => &self.scrape_type,
            Field::Commentary => &self.commentary,
            Field::Language => &self.language,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Book => &mut self.book,
            Field::Chapter => &mut self.chapter,
            Field::Verse => &mut self.verse,
            Field::ScrapeType => &mut self.scrape_type,
            Field::Commentary => &mut self.commentary,
            Field::Language => &mut self.language,
        }
    }

    pub fn is_set(&self, field: Field) -> bool {
        !self.get(field).is_empty()
    }

    /// Book, chapter and scrape type are chosen.
    pub fn is_valid(&self) -> bool {
        !self.book.is_empty() && !self.chapter.is_empty() && !self.scrape_type.is_empty()
    }

    /// Required fields still missing, in form order.
    pub fn missing(&self) -> Vec<&'static str> {
        Field::all()
            .into_iter()
            .filter(|f| f.is_required() && !self.is_set(*f))
            .map(|f| f.as_str())
            .collect()
    }

    /// "Field: value" chips for every chosen field, in form order.
    pub fn badges(&self) -> Vec<String> {
        Field::all()
            .into_iter()
            .filter(|f| self.is_set(*f))
            .map(|f| format!("{}: {}", f.badge(), self.get(f)))
            .collect()
    }
}
