use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::selection::Selection;

pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScrapeError {
    /// Required fields were left empty
    #[error("missing required field(s): {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    /// Submit was pressed while the form was invalid or already loading
    #[error("form is not ready to submit")]
    NotReady,

    #[error("scrape was cancelled")]
    Cancelled,

    #[error("backend error: {0}")]
    Backend(String),
}

/// What a backend is asked to fetch. Built only from a valid selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub book: String,
    pub chapter: String,
    pub verse: String,
    pub commentary: String,
    pub language: String,
    pub scrape_type: String,
}

impl TryFrom<&Selection> for ScrapeRequest {
    type Error = ScrapeError;

    fn try_from(selection: &Selection) -> Result<Self, Self::Error> {
        if !selection.is_valid() {
            return Err(ScrapeError::Incomplete(selection.missing()));
        }
        Ok(Self {
            book: selection.book.clone(),
            chapter: selection.chapter.clone(),
            verse: selection.verse.clone(),
            commentary: selection.commentary.clone(),
            language: selection.language.clone(),
            scrape_type: selection.scrape_type.clone(),
        })
    }
}

impl ScrapeRequest {
    /// "John 3:16"; unset verse leaves a trailing colon, as the form shows it.
    pub fn passage(&self) -> String {
        format!("{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// Seam for whatever actually produces content for a request.
#[async_trait]
pub trait ScrapeBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn scrape(&self, request: &ScrapeRequest) -> Result<String, ScrapeError>;
}

/// Stand-in backend: waits, then echoes the request back as text.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait]
impl ScrapeBackend for SimulatedBackend {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn scrape(&self, request: &ScrapeRequest) -> Result<String, ScrapeError> {
        log::debug!("Simulating scrape of {} for {:?}", request.passage(), self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(render_placeholder(request))
    }
}

pub fn render_placeholder(request: &ScrapeRequest) -> String {
    format!(
        "Scraping results for {}\nType: {}\nCommentary: {}\nLanguage: {}\n\n\
         This would contain the actual scraped content from Bible Hub...",
        request.passage(),
        request.scrape_type,
        request.commentary,
        request.language,
    )
}
