use crate::diff::remove_duplicates_by_id;
use crate::error::FailureKind;
use cinescope_api::CatalogService;
use cinescope_models::SearchCandidate;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Query text, the candidates shown for it, and the dispatch cursors
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    results: Vec<SearchCandidate>,
    /// Sequence number of the most recently dispatched search
    latest_dispatched: u64,
    /// Sequence number whose outcome is currently displayed
    applied: u64,
    /// A quiet-period timer is running
    armed: bool,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchCandidate] {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.armed || self.applied != self.latest_dispatched
    }
}

struct Inner {
    service: Arc<dyn CatalogService>,
    quiet_period: Duration,
    state: watch::Sender<SearchState>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

/// Turns keystrokes into as few catalog searches as possible.
///
/// Each input restarts the quiet-period timer. When it expires the current
/// query is dispatched with a fresh sequence number; a response is shown only
/// if no later search has been dispatched since. Must be driven from inside a
/// tokio runtime.
#[derive(Clone)]
pub struct SearchDebouncer {
    inner: Arc<Inner>,
}

impl SearchDebouncer {
    pub fn new(service: Arc<dyn CatalogService>, quiet_period: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(Inner {
                service,
                quiet_period,
                state,
                timer: Mutex::new(None),
            }),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.inner.quiet_period
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    pub fn query(&self) -> String {
        self.inner.state.borrow().query.clone()
    }

    pub fn results(&self) -> Vec<SearchCandidate> {
        self.inner.state.borrow().results.clone()
    }

    pub fn is_searching(&self) -> bool {
        self.inner.state.borrow().is_searching()
    }

    /// Record a new value of the search box and rearm the timer
    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.state.send_modify(|state| {
            state.query = text;
            state.armed = true;
        });

        let inner = Arc::clone(&self.inner);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(inner.quiet_period).await;
            inner.fire();
        });
        self.replace_timer(Some(timer));
    }

    /// Empty the query and the candidates. Anything still in flight is ignored when it lands.
    pub fn clear(&self) {
        self.replace_timer(None);
        self.inner.state.send_modify(|state| {
            state.query.clear();
            state.results.clear();
            state.armed = false;
            state.latest_dispatched += 1;
            state.applied = state.latest_dispatched;
        });
        debug!(operation = "search", "Search cleared");
    }

    /// Wait until no timer is armed and the latest dispatch has been applied
    pub async fn settled(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|state| !state.is_searching()).await;
    }

    fn replace_timer(&self, next: Option<JoinHandle<()>>) {
        if let Ok(mut slot) = self.inner.timer.lock() {
            if let Some(previous) = std::mem::replace(&mut *slot, next) {
                previous.abort();
            }
        }
    }
}

impl Inner {
    /// Quiet period elapsed: dispatch the current query
    fn fire(self: &Arc<Self>) {
        let mut dispatch = None;
        self.state.send_modify(|state| {
            state.armed = false;
            state.latest_dispatched += 1;
            let seq = state.latest_dispatched;
            let query = state.query.trim();
            if query.is_empty() {
                state.results.clear();
                state.applied = seq;
            } else {
                dispatch = Some((seq, query.to_string()));
            }
        });

        let Some((seq, query)) = dispatch else {
            debug!(operation = "search", "Blank query, nothing dispatched");
            return;
        };

        // The call runs in its own task so rearming the timer never cancels it
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            inner.search(seq, query).await;
        });
    }

    async fn search(&self, seq: u64, query: String) {
        debug!(operation = "search", seq, query = %query, "Dispatching search");
        let results = match self.service.search_catalog(&query).await {
            Ok(candidates) => {
                let with_posters: Vec<SearchCandidate> =
                    candidates.into_iter().filter(SearchCandidate::has_poster).collect();
                remove_duplicates_by_id(with_posters)
            }
            Err(e) => {
                warn!(
                    operation = "search",
                    kind = ?FailureKind::SearchFailure,
                    seq,
                    query = %query,
                    error = %e,
                    "Search failed"
                );
                Vec::new()
            }
        };

        let count = results.len();
        let applied = self.state.send_if_modified(|state| {
            if seq != state.latest_dispatched {
                return false;
            }
            state.results = results;
            state.applied = seq;
            true
        });

        if applied {
            debug!(operation = "search", seq, count, "Search results applied");
        } else {
            debug!(operation = "search", seq, "Discarded stale search response");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{candidate, ids, Call, FakeCatalog};

    const QUIET: Duration = Duration::from_millis(400);

    fn debouncer(fake: &FakeCatalog) -> SearchDebouncer {
        SearchDebouncer::new(fake.as_service(), QUIET)
    }

    fn searches(fake: &FakeCatalog) -> Vec<String> {
        fake.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Search(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_dispatches_only_final_value() {
        let fake = FakeCatalog::new();
        fake.set_catalog(vec![candidate(1, "Heat", Some("/heat.jpg"))]);
        let search = debouncer(&fake);

        for text in ["h", "he", "hea", "heat"] {
            search.input(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(searches(&fake).is_empty());

        search.settled().await;
        assert_eq!(searches(&fake), vec!["heat".to_string()]);
        assert_eq!(ids(&search.results()), vec![1]);
        assert!(!search.is_searching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_never_overwrites_newer_one() {
        let fake = FakeCatalog::new();
        fake.set_catalog(vec![
            candidate(1, "Alien", Some("/alien.jpg")),
            candidate(2, "Heat", Some("/heat.jpg")),
        ]);
        fake.delay(Call::Search("alien".to_string()), Duration::from_millis(1000));
        let search = debouncer(&fake);

        // S1 dispatched at 400ms, lands at 1400ms
        search.input("alien");
        tokio::time::sleep(Duration::from_millis(450)).await;
        // S2 dispatched at 850ms, lands immediately
        search.input("heat");
        search.settled().await;
        assert_eq!(ids(&search.results()), vec![2]);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(searches(&fake), vec!["alien".to_string(), "heat".to_string()]);
        assert_eq!(ids(&search.results()), vec![2]);
        assert_eq!(search.query(), "heat");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_clears_without_call() {
        let fake = FakeCatalog::new();
        fake.set_catalog(vec![candidate(1, "Heat", Some("/heat.jpg"))]);
        let search = debouncer(&fake);

        search.input("heat");
        search.settled().await;
        assert_eq!(ids(&search.results()), vec![1]);

        search.input("   ");
        search.settled().await;
        assert!(search.results().is_empty());
        assert_eq!(searches(&fake).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_candidates_without_posters_are_hidden() {
        let fake = FakeCatalog::new();
        fake.set_catalog(vec![
            candidate(1, "Ran", Some("/ran.jpg")),
            candidate(2, "Rango", None),
            candidate(3, "Rancho", Some("  ")),
        ]);
        let search = debouncer(&fake);

        search.input("ran");
        search.settled().await;
        assert_eq!(ids(&search.results()), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_search_shows_nothing() {
        let fake = FakeCatalog::new();
        fake.set_catalog(vec![candidate(1, "Heat", Some("/heat.jpg"))]);
        fake.fail(Call::Search("heat".to_string()));
        let search = debouncer(&fake);

        search.input("heat");
        search.settled().await;
        assert!(search.results().is_empty());
        assert!(!search.is_searching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_discards_in_flight_response() {
        let fake = FakeCatalog::new();
        fake.set_catalog(vec![candidate(1, "Heat", Some("/heat.jpg"))]);
        fake.delay(Call::Search("heat".to_string()), Duration::from_millis(200));
        let search = debouncer(&fake);

        search.input("heat");
        tokio::time::sleep(Duration::from_millis(450)).await;
        search.clear();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(searches(&fake).len(), 1);
        assert!(search.results().is_empty());
        assert_eq!(search.query(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_armed_timer() {
        let fake = FakeCatalog::new();
        let search = debouncer(&fake);

        search.input("heat");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.clear();
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert!(searches(&fake).is_empty());
        assert!(!search.is_searching());
    }
}
