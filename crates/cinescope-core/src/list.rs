use crate::diff::{remove_by_id, remove_duplicates_by_id, HasMovieId};
use crate::error::SyncError;
use cinescope_api::{ApiError, CatalogService};
use cinescope_models::{AddSource, AddTarget, MovieId, OperationKind, PendingMarker, SuggestionItem, TrendingMovie, WatchlistItem};
use futures::future::BoxFuture;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Watchlist,
    Suggested,
    Trending,
}

impl ListKind {
    pub fn name(self) -> &'static str {
        match self {
            ListKind::Watchlist => "watchlist",
            ListKind::Suggested => "suggested",
            ListKind::Trending => "trending",
        }
    }

    pub fn load_failure_message(self) -> &'static str {
        match self {
            ListKind::Watchlist => "Failed to load watchlist.",
            ListKind::Suggested => "Failed to load suggestions.",
            ListKind::Trending => "Failed to load trending movies.",
        }
    }

    pub fn add_failure_message(self) -> &'static str {
        match self {
            ListKind::Suggested => "Failed to add movie to watchlist.",
            _ => "Failed to add movie.",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            ListKind::Watchlist => "Your watchlist is empty.",
            ListKind::Suggested => "No suggestions available at this time.",
            ListKind::Trending => "No trending movies right now.",
        }
    }
}

/// A record kind that can back a synchronized list
pub trait ListItem: HasMovieId + Clone + Send + Sync + 'static {
    const KIND: ListKind;

    /// Fetch the complete current list from the service
    fn fetch(service: &dyn CatalogService) -> BoxFuture<'_, Result<Vec<Self>, ApiError>>;
}

impl ListItem for WatchlistItem {
    const KIND: ListKind = ListKind::Watchlist;

    fn fetch(service: &dyn CatalogService) -> BoxFuture<'_, Result<Vec<Self>, ApiError>> {
        service.get_watchlist()
    }
}

impl ListItem for SuggestionItem {
    const KIND: ListKind = ListKind::Suggested;

    fn fetch(service: &dyn CatalogService) -> BoxFuture<'_, Result<Vec<Self>, ApiError>> {
        service.get_suggestions()
    }
}

impl ListItem for TrendingMovie {
    const KIND: ListKind = ListKind::Trending;

    fn fetch(service: &dyn CatalogService) -> BoxFuture<'_, Result<Vec<Self>, ApiError>> {
        service.get_trending()
    }
}

/// Local copy of one remote list plus its in-flight bookkeeping
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    loading: bool,
    loaded: bool,
    error: Option<String>,
    pending: HashMap<MovieId, OperationKind>,
    /// Ids this list successfully added; re-adding them is refused
    added: HashSet<MovieId>,
    load_generation: u64,
    /// Bumped by every reset; calls that started in an older epoch settle without effect
    epoch: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            loaded: false,
            error: None,
            pending: HashMap::new(),
            added: HashSet::new(),
            load_generation: 0,
            epoch: 0,
        }
    }
}

impl<T: ListItem> ListState<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending(&self, movie_id: MovieId) -> Option<PendingMarker> {
        self.pending.get(&movie_id).map(|&operation| PendingMarker {
            target_id: movie_id,
            operation,
        })
    }

    pub fn pending_markers(&self) -> Vec<PendingMarker> {
        let mut markers: Vec<PendingMarker> = self
            .pending
            .iter()
            .map(|(&target_id, &operation)| PendingMarker { target_id, operation })
            .collect();
        markers.sort_by_key(|marker| marker.target_id);
        markers
    }

    pub fn is_added(&self, movie_id: MovieId) -> bool {
        self.added.contains(&movie_id)
    }

    /// Whether an add for `movie_id` would be accepted right now
    pub fn can_add(&self, movie_id: MovieId) -> bool {
        !self.pending.contains_key(&movie_id) && !self.added.contains(&movie_id)
    }

    pub fn view(&self) -> ListView<T> {
        if self.loading || (!self.loaded && self.error.is_none()) {
            ListView::Loading
        } else if let Some(message) = &self.error {
            ListView::Failed(message.clone())
        } else if self.items.is_empty() {
            ListView::Empty(T::KIND.empty_message())
        } else {
            ListView::Items(self.items.clone())
        }
    }
}

/// What a page shows for a list
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<T> {
    Loading,
    Failed(String),
    Empty(&'static str),
    Items(Vec<T>),
}

/// Keeps one displayed list consistent with the service.
///
/// Remote calls are never cancelled; correctness under interleaving comes from
/// two rules. A reload only lands if it is the most recent one issued, and a
/// confirmed removal filters whatever list is current when it settles.
pub struct ListSynchronizer<T: ListItem> {
    service: Arc<dyn CatalogService>,
    state: Arc<watch::Sender<ListState<T>>>,
}

impl<T: ListItem> Clone for ListSynchronizer<T> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: ListItem> ListSynchronizer<T> {
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self {
            service,
            state: Arc::new(state),
        }
    }

    pub fn kind(&self) -> ListKind {
        T::KIND
    }

    pub(crate) fn service(&self) -> &Arc<dyn CatalogService> {
        &self.service
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.state.borrow().items.clone()
    }

    pub fn view(&self) -> ListView<T> {
        self.state.borrow().view()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn pending(&self, movie_id: MovieId) -> Option<PendingMarker> {
        self.state.borrow().pending(movie_id)
    }

    pub fn can_add(&self, movie_id: MovieId) -> bool {
        self.state.borrow().can_add(movie_id)
    }

    /// Forget everything, e.g. after the session ends
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            let (generation, epoch) = (state.load_generation, state.epoch);
            *state = ListState::default();
            // Keep counting so calls still in flight cannot land afterwards
            state.load_generation = generation + 1;
            state.epoch = epoch + 1;
        });
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.state.borrow().epoch
    }

    /// Replace the local list with the service's current one.
    ///
    /// On failure the list's error slot is set and the error returned; nothing is retried.
    /// A load superseded by a newer one changes nothing and returns `Ok(())`.
    pub async fn load(&self) -> Result<(), SyncError> {
        let kind = T::KIND;
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.load_generation += 1;
            generation = state.load_generation;
            state.loading = true;
            state.error = None;
        });
        debug!(operation = "load", list = kind.name(), generation, "Loading list");

        let outcome = T::fetch(self.service.as_ref()).await;
        let (items, failure) = match outcome {
            Ok(items) => (Some(items), None),
            Err(e) => (None, Some(e)),
        };
        let fetched = items.as_ref().map(Vec::len);

        let applied = self.state.send_if_modified(|state| {
            if state.load_generation != generation {
                return false;
            }
            state.loading = false;
            state.loaded = true;
            match items {
                Some(items) => {
                    state.items = remove_duplicates_by_id(items);
                    state.error = None;
                }
                None => state.error = Some(kind.load_failure_message().to_string()),
            }
            true
        });

        if !applied {
            // A newer load owns the error slot, so this outcome is not reported either way
            debug!(operation = "load", list = kind.name(), generation, failed = failure.is_some(), "Discarded superseded load");
            return Ok(());
        }

        match failure {
            None => {
                debug!(operation = "load", list = kind.name(), count = fetched.unwrap_or(0), "List replaced");
                Ok(())
            }
            Some(source) => {
                warn!(operation = "load", list = kind.name(), error = %source, "List load failed");
                Err(SyncError::Load {
                    message: kind.load_failure_message(),
                    source,
                })
            }
        }
    }

    /// Save `movie_id` to the watchlist.
    ///
    /// Refused without a remote call while an add or remove for the same id is
    /// in flight, or once this list has already added it. On success the
    /// `source` decides the local effect: a suggestion leaves the list at once,
    /// a search pick triggers a full reload because only the server has the
    /// enriched record.
    pub async fn add_item(&self, movie_id: MovieId, source: AddSource) -> Result<(), SyncError> {
        let kind = T::KIND;
        let epoch = self.claim(movie_id, OperationKind::Add)?;
        debug!(operation = "add_item", list = kind.name(), movie_id = %movie_id, source = ?source, "Adding movie");

        let result = self.service.add_to_watchlist(&AddTarget::Id(movie_id)).await;

        let current = self.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            state.pending.remove(&movie_id);
            if result.is_ok() {
                state.added.insert(movie_id);
                if source == AddSource::Suggested {
                    remove_by_id(&mut state.items, movie_id);
                }
            }
            true
        });

        match result {
            Ok(()) => {
                info!(operation = "add_item", list = kind.name(), movie_id = %movie_id, "Movie added to watchlist");
                if !current {
                    debug!(operation = "add_item", list = kind.name(), movie_id = %movie_id, "List was reset meanwhile; local state left alone");
                } else if source == AddSource::WatchlistSearch {
                    // The load records its own failure in the error slot
                    let _ = self.load().await;
                }
                Ok(())
            }
            Err(e) => {
                warn!(operation = "add_item", list = kind.name(), movie_id = %movie_id, error = %e, "Add failed");
                Err(SyncError::Add {
                    movie_id: Some(movie_id),
                    message: kind.add_failure_message(),
                    source: e,
                })
            }
        }
    }

    /// Delete `movie_id` remotely, then drop it from the list current at completion time
    pub async fn remove_item(&self, movie_id: MovieId) -> Result<(), SyncError> {
        let kind = T::KIND;
        let epoch = self.claim(movie_id, OperationKind::Remove)?;
        debug!(operation = "remove_item", list = kind.name(), movie_id = %movie_id, "Removing movie");

        let result = self.service.remove_from_watchlist(movie_id).await;

        self.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            state.pending.remove(&movie_id);
            if result.is_ok() {
                remove_by_id(&mut state.items, movie_id);
                state.added.remove(&movie_id);
            }
            true
        });

        match result {
            Ok(()) => {
                info!(operation = "remove_item", list = kind.name(), movie_id = %movie_id, "Movie removed from watchlist");
                Ok(())
            }
            Err(e) => {
                warn!(operation = "remove_item", list = kind.name(), movie_id = %movie_id, error = %e, "Remove failed");
                Err(SyncError::Remove { movie_id, source: e })
            }
        }
    }

    /// Place a pending marker for `movie_id`, or refuse if the id is busy or already added.
    ///
    /// Returns the epoch the marker belongs to.
    fn claim(&self, movie_id: MovieId, operation: OperationKind) -> Result<u64, SyncError> {
        let mut refusal = None;
        let mut epoch = 0;
        self.state.send_if_modified(|state| {
            epoch = state.epoch;
            if state.pending.contains_key(&movie_id) {
                refusal = Some(SyncError::InFlight(movie_id));
                return false;
            }
            if operation == OperationKind::Add && state.added.contains(&movie_id) {
                refusal = Some(SyncError::AlreadyAdded(movie_id));
                return false;
            }
            state.pending.insert(movie_id, operation);
            true
        });

        match refusal {
            Some(err) => {
                debug!(list = T::KIND.name(), movie_id = %movie_id, reason = %err, "Request refused locally");
                Err(err)
            }
            None => Ok(epoch),
        }
    }
}
