use crate::error::SyncError;
use crate::list::{ListSynchronizer, ListView};
use crate::search::SearchDebouncer;
use cinescope_models::{AddSource, AddTarget, MovieId, WatchlistItem};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// The watchlist page: the saved list, its search box and the add-by-title form
#[derive(Clone)]
pub struct WatchlistView {
    list: ListSynchronizer<WatchlistItem>,
    search: SearchDebouncer,
    submitting: Arc<AtomicBool>,
}

impl WatchlistView {
    pub fn new(list: ListSynchronizer<WatchlistItem>, search: SearchDebouncer) -> Self {
        Self {
            list,
            search,
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn list(&self) -> &ListSynchronizer<WatchlistItem> {
        &self.list
    }

    pub fn search(&self) -> &SearchDebouncer {
        &self.search
    }

    pub fn view(&self) -> ListView<WatchlistItem> {
        self.list.view()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub async fn load(&self) -> Result<(), SyncError> {
        self.list.load().await
    }

    pub async fn remove(&self, movie_id: MovieId) -> Result<(), SyncError> {
        self.list.remove_item(movie_id).await
    }

    /// Save a search candidate. The search box is emptied only once the add is confirmed.
    pub async fn add_from_search(&self, movie_id: MovieId) -> Result<(), SyncError> {
        self.list.add_item(movie_id, AddSource::WatchlistSearch).await?;
        self.search.clear();
        Ok(())
    }

    /// Save a movie by its title.
    ///
    /// Returns `Ok(false)` for a blank title, which is ignored without a call.
    pub async fn add_by_title(&self, title: &str) -> Result<bool, SyncError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(false);
        }
        if self.submitting.swap(true, Ordering::SeqCst) {
            return Err(SyncError::SubmissionInFlight);
        }
        let epoch = self.list.epoch();

        let result = self
            .list
            .service()
            .add_to_watchlist(&AddTarget::Title(title.to_string()))
            .await;
        self.submitting.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => {
                info!(operation = "add_by_title", title = %title, "Movie added to watchlist");
                // A failed reload shows up in the list's error slot
                if self.list.epoch() == epoch {
                    let _ = self.list.load().await;
                }
                Ok(true)
            }
            Err(e) => {
                warn!(operation = "add_by_title", title = %title, error = %e, "Add failed");
                Err(SyncError::Add {
                    movie_id: None,
                    message: "Failed to add movie.",
                    source: e,
                })
            }
        }
    }
}
