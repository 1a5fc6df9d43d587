//! Selection form controller
//!
//! Owns the current selection, the loading flag, the last result and the
//! in-flight scrape task. Nothing here knows about rendering; the terminal
//! front end and the headless CLI both drive the same controller.

use futures_util::FutureExt;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};

use crate::catalog::Catalog;
use crate::scrape::{ScrapeBackend, ScrapeError, ScrapeRequest};
use crate::selection::{Field, Selection};

pub struct FormController {
    catalog: Arc<Catalog>,
    backend: Arc<dyn ScrapeBackend>,
    selection: Selection,
    loading: bool,
    result: Option<String>,
    last_error: Option<String>,
    task: Option<JoinHandle<Result<String, ScrapeError>>>,
}

impl FormController {
    pub fn new(catalog: Arc<Catalog>, backend: Arc<dyn ScrapeBackend>) -> Self {
        Self {
            catalog,
            backend,
            selection: Selection::new(),
            loading: false,
            result: None,
            last_error: None,
            task: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replaces one field. The result and loading flag are untouched, so a
    /// displayed result stays until the next submit.
    pub fn select(&mut self, field: Field, value: impl Into<String>) {
        self.selection = self.selection.with(field, value);
    }

    pub fn clear(&mut self, field: Field) {
        self.selection = self.selection.without(field);
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Dropdown values for `field`, given the book currently chosen.
    pub fn options(&self, field: Field) -> Vec<String> {
        self.catalog.options(field, &self.selection.book)
    }

    pub fn is_valid(&self) -> bool {
        self.selection.is_valid()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.loading
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn badges(&self) -> Vec<String> {
        self.selection.badges()
    }

    /// Starts a scrape for the current selection. Must be called from within
    /// a tokio runtime.
    pub fn submit(&mut self) -> Result<(), ScrapeError> {
        if self.loading {
            log::debug!("Submit ignored: scrape already running");
            return Err(ScrapeError::NotReady);
        }
        let request = ScrapeRequest::try_from(&self.selection)?;

        log::info!(
            "Scrape started: {} type={} backend={}",
            request.passage(),
            request.scrape_type,
            self.backend.name()
        );

        let backend = Arc::clone(&self.backend);
        self.task = Some(tokio::spawn(async move { backend.scrape(&request).await }));
        self.loading = true;
        self.last_error = None;
        Ok(())
    }

    /// Applies the outcome of a task that has already finished. Returns
    /// `None` while the task is still running or when nothing was submitted.
    pub fn poll(&mut self) -> Option<Result<(), ScrapeError>> {
        let handle = self.task.as_mut().filter(|t| t.is_finished())?;
        let joined = handle.now_or_never()?;
        self.task = None;
        Some(self.finish(joined))
    }

    /// Waits for the running task and applies its outcome.
    pub async fn wait(&mut self) -> Result<(), ScrapeError> {
        match self.task.take() {
            Some(handle) => {
                let joined = handle.await;
                self.finish(joined)
            }
            None => Ok(()),
        }
    }

    /// Aborts the running task. The previous result, if any, is kept.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(handle) => {
                handle.abort();
                self.loading = false;
                log::info!("Scrape cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancels any running scrape and empties the selection.
    pub fn reset(&mut self) {
        self.cancel();
        self.selection = Selection::new();
        self.last_error = None;
    }

    fn finish(
        &mut self,
        joined: Result<Result<String, ScrapeError>, JoinError>,
    ) -> Result<(), ScrapeError> {
        self.loading = false;
        match joined {
            Ok(Ok(text)) => {
                log::info!("Scrape finished ({} bytes)", text.len());
                self.result = Some(text);
                self.last_error = None;
                Ok(())
            }
            Ok(Err(e)) => {
                log::error!("Scrape failed: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
            Err(e) if e.is_cancelled() => Err(ScrapeError::Cancelled),
            Err(e) => {
                log::error!("Scrape task panicked: {}", e);
                let err = ScrapeError::Backend(e.to_string());
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::{SimulatedBackend, DEFAULT_DELAY};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn controller() -> FormController {
        FormController::new(
            Arc::new(Catalog::default()),
            Arc::new(SimulatedBackend::default()),
        )
    }

    fn fill(c: &mut FormController) {
        c.select(Field::Book, "Genesis");
        c.select(Field::Chapter, "1");
        c.select(Field::ScrapeType, "commentary");
    }

    /// Flags when a scrape body runs to completion.
    struct FlagBackend {
        completed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ScrapeBackend for FlagBackend {
        fn name(&self) -> &str {
            "flag"
        }

        async fn scrape(&self, _request: &ScrapeRequest) -> Result<String, ScrapeError> {
            tokio::time::sleep(DEFAULT_DELAY).await;
            self.completed.store(true, Ordering::SeqCst);
            Ok("done".to_string())
        }
    }

    /// Succeeds on the first call, fails afterwards.
    struct FlakyBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ScrapeBackend for FlakyBackend {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn scrape(&self, _request: &ScrapeRequest) -> Result<String, ScrapeError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok("first".to_string())
            } else {
                Err(ScrapeError::Backend("boom".to_string()))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_rejected_when_invalid() {
        let mut c = controller();
        c.select(Field::Book, "Genesis");
        assert!(!c.can_submit());
        assert!(matches!(c.submit(), Err(ScrapeError::Incomplete(_))));
        assert!(!c.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_lasts_for_delay() {
        let mut c = controller();
        fill(&mut c);
        let started = Instant::now();
        c.submit().unwrap();
        assert!(c.is_loading());
        assert!(!c.can_submit());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(c.poll().is_none());
        assert!(c.is_loading());
        assert!(c.result().is_none());

        c.wait().await.unwrap();
        assert!(started.elapsed() >= DEFAULT_DELAY);
        assert!(!c.is_loading());
        let text = c.result().unwrap();
        assert!(text.contains("Genesis 1"));
        assert!(text.contains("commentary"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_applies_finished_task() {
        let mut c = controller();
        fill(&mut c);
        c.submit().unwrap();
        tokio::time::sleep(Duration::from_millis(2100)).await;
        // Give the spawned task a chance to observe its timer
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(matches!(c.poll(), Some(Ok(()))));
        assert!(!c.is_loading());
        assert!(c.result().is_some());
        assert!(c.poll().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_loading_rejected() {
        let mut c = controller();
        fill(&mut c);
        c.submit().unwrap();
        assert_eq!(c.submit(), Err(ScrapeError::NotReady));
        c.wait().await.unwrap();
        assert!(c.can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reselect_does_not_touch_result() {
        let mut c = controller();
        fill(&mut c);
        c.submit().unwrap();
        c.wait().await.unwrap();
        let before = c.result().unwrap().to_string();

        c.select(Field::Book, "Exodus");
        c.select(Field::Language, "Greek");
        assert_eq!(c.result(), Some(before.as_str()));

        c.submit().unwrap();
        c.wait().await.unwrap();
        assert!(c.result().unwrap().contains("Exodus 1"));
        assert!(c.result().unwrap().contains("Language: Greek"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_stale_result() {
        let completed = Arc::new(AtomicBool::new(false));
        let mut c = FormController::new(
            Arc::new(Catalog::default()),
            Arc::new(FlagBackend { completed: completed.clone() }),
        );
        fill(&mut c);
        c.submit().unwrap();
        assert!(c.cancel());
        assert!(!c.is_loading());
        assert!(!c.cancel());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(c.poll().is_none());
        assert!(c.result().is_none());
        assert!(!completed.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_running_task() {
        let completed = Arc::new(AtomicBool::new(false));
        let mut c = FormController::new(
            Arc::new(Catalog::default()),
            Arc::new(FlagBackend { completed: completed.clone() }),
        );
        fill(&mut c);
        c.submit().unwrap();
        drop(c);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!completed.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_failure_keeps_previous_result() {
        let mut c = FormController::new(
            Arc::new(Catalog::default()),
            Arc::new(FlakyBackend { calls: AtomicUsize::new(0) }),
        );
        fill(&mut c);
        c.submit().unwrap();
        c.wait().await.unwrap();
        assert_eq!(c.result(), Some("first"));

        c.submit().unwrap();
        let err = c.wait().await.unwrap_err();
        assert_eq!(err, ScrapeError::Backend("boom".to_string()));
        assert!(!c.is_loading());
        assert_eq!(c.result(), Some("first"));
        assert_eq!(c.last_error(), Some("backend error: boom"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_selection_only() {
        let mut c = controller();
        fill(&mut c);
        c.submit().unwrap();
        c.wait().await.unwrap();
        c.reset();
        assert_eq!(c.selection(), &Selection::new());
        assert!(c.result().is_some());
        assert!(!c.is_valid());
    }

    #[test]
    fn test_options_follow_catalog() {
        let c = controller();
        assert_eq!(c.options(Field::Book).len(), 66);
        assert_eq!(c.options(Field::Chapter).len(), 50);
        assert_eq!(c.options(Field::Verse).len(), 31);
        assert_eq!(c.options(Field::ScrapeType)[0], "bibleproject");
    }
}
