// In-memory catalog service for engine tests. Responses are computed from
// the server-side state at the moment the (optionally delayed) call settles.

use async_trait::async_trait;
use cinescope_api::{ApiError, CatalogService};
use cinescope_models::{AddTarget, MovieId, SearchCandidate, SuggestionItem, TrendingMovie, WatchlistItem};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Call {
    VerifySession,
    Login(String),
    Logout,
    Register(String),
    Trending,
    Suggestions,
    Watchlist,
    Search(String),
    Add(AddTarget),
    Remove(MovieId),
}

#[derive(Default)]
struct ServerState {
    session_valid: bool,
    accepted_password: Option<String>,
    registered: HashSet<String>,
    logout_failures: usize,
    watchlist: Vec<WatchlistItem>,
    suggestions: Vec<SuggestionItem>,
    trending: Vec<TrendingMovie>,
    catalog: Vec<SearchCandidate>,
    failing: HashSet<Call>,
    delays: HashMap<Call, Duration>,
    calls: Vec<Call>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeCatalog {
    state: Arc<Mutex<ServerState>>,
}

pub(crate) fn saved(id: u64, title: &str) -> WatchlistItem {
    WatchlistItem {
        movie_id: MovieId::new(id),
        title: title.to_string(),
        genres: "Drama".to_string(),
        actors: "Someone Famous".to_string(),
        release_date: None,
        popularity_score: Some(10.0),
        actor_classification: Some("A-list".to_string()),
        poster_url: Some(format!("https://img.example/{}.jpg", id)),
        thumbnail_url: None,
        overview: None,
    }
}

pub(crate) fn suggested(id: u64, title: &str) -> SuggestionItem {
    SuggestionItem {
        movie_id: MovieId::new(id),
        title: title.to_string(),
        poster_url: Some(format!("https://img.example/{}.jpg", id)),
        overview: None,
        release_date: None,
        rating: Some(7.5),
    }
}

pub(crate) fn candidate(id: u64, title: &str, poster: Option<&str>) -> SearchCandidate {
    SearchCandidate {
        external_id: MovieId::new(id),
        title: title.to_string(),
        poster_path: poster.map(str::to_string),
        release_date: None,
    }
}

pub(crate) fn ids<T: crate::diff::HasMovieId>(items: &[T]) -> Vec<u64> {
    items.iter().map(|item| item.movie_id().get()).collect()
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_service(&self) -> Arc<dyn CatalogService> {
        Arc::new(self.clone())
    }

    fn with<R>(&self, f: impl FnOnce(&mut ServerState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn set_session_valid(&self, valid: bool) {
        self.with(|s| s.session_valid = valid);
    }

    pub fn accept_password(&self, password: &str) {
        self.with(|s| s.accepted_password = Some(password.to_string()));
    }

    pub fn mark_registered(&self, email: &str) {
        self.with(|s| {
            s.registered.insert(email.to_string());
        });
    }

    pub fn fail_next_logouts(&self, count: usize) {
        self.with(|s| s.logout_failures = count);
    }

    pub fn set_watchlist(&self, items: Vec<WatchlistItem>) {
        self.with(|s| s.watchlist = items);
    }

    pub fn set_suggestions(&self, items: Vec<SuggestionItem>) {
        self.with(|s| s.suggestions = items);
    }

    pub fn set_trending(&self, items: Vec<TrendingMovie>) {
        self.with(|s| s.trending = items);
    }

    pub fn set_catalog(&self, items: Vec<SearchCandidate>) {
        self.with(|s| s.catalog = items);
    }

    pub fn fail(&self, call: Call) {
        self.with(|s| {
            s.failing.insert(call);
        });
    }

    pub fn heal(&self, call: &Call) {
        self.with(|s| {
            s.failing.remove(call);
        });
    }

    pub fn delay(&self, call: Call, delay: Duration) {
        self.with(|s| {
            s.delays.insert(call, delay);
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with(|s| s.calls.clone())
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.with(|s| s.calls.iter().filter(|c| matches(c)).count())
    }

    pub fn server_watchlist(&self) -> Vec<WatchlistItem> {
        self.with(|s| s.watchlist.clone())
    }

    /// Record the call, wait out any configured delay, then report whether it should fail
    async fn begin(&self, call: Call) -> Result<(), ApiError> {
        let (delay, failing) = self.with(|s| {
            s.calls.push(call.clone());
            (s.delays.get(&call).copied(), s.failing.contains(&call))
        });
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if failing {
            return Err(ApiError::status(500, "Internal Server Error"));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn verify_session(&self) -> Result<(), ApiError> {
        self.begin(Call::VerifySession).await?;
        if self.with(|s| s.session_valid) {
            Ok(())
        } else {
            Err(ApiError::status(401, "Unauthorized"))
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.begin(Call::Login(email.to_string())).await?;
        self.with(|s| {
            if s.accepted_password.as_deref() == Some(password) {
                s.session_valid = true;
                Ok(())
            } else {
                Err(ApiError::status(401, "Invalid email or password"))
            }
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.begin(Call::Logout).await?;
        self.with(|s| {
            if s.logout_failures > 0 {
                s.logout_failures -= 1;
                return Err(ApiError::status(503, "Service Unavailable"));
            }
            s.session_valid = false;
            Ok(())
        })
    }

    async fn register(&self, email: &str, _password: &str) -> Result<(), ApiError> {
        self.begin(Call::Register(email.to_string())).await?;
        self.with(|s| {
            if s.registered.insert(email.to_string()) {
                Ok(())
            } else {
                Err(ApiError::status(409, "Email already registered"))
            }
        })
    }

    async fn get_trending(&self) -> Result<Vec<TrendingMovie>, ApiError> {
        self.begin(Call::Trending).await?;
        Ok(self.with(|s| s.trending.clone()))
    }

    async fn get_suggestions(&self) -> Result<Vec<SuggestionItem>, ApiError> {
        self.begin(Call::Suggestions).await?;
        Ok(self.with(|s| s.suggestions.clone()))
    }

    async fn search_catalog(&self, title: &str) -> Result<Vec<SearchCandidate>, ApiError> {
        self.begin(Call::Search(title.to_string())).await?;
        let needle = title.to_lowercase();
        Ok(self.with(|s| {
            s.catalog
                .iter()
                .filter(|c| c.title.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }))
    }

    async fn get_watchlist(&self) -> Result<Vec<WatchlistItem>, ApiError> {
        self.begin(Call::Watchlist).await?;
        Ok(self.with(|s| s.watchlist.clone()))
    }

    async fn add_to_watchlist(&self, target: &AddTarget) -> Result<(), ApiError> {
        self.begin(Call::Add(target.clone())).await?;
        self.with(|s| {
            let found = match target {
                AddTarget::Id(id) => s
                    .catalog
                    .iter()
                    .find(|c| c.external_id == *id)
                    .map(|c| (c.external_id, c.title.clone()))
                    .or_else(|| {
                        s.suggestions
                            .iter()
                            .find(|m| m.movie_id == *id)
                            .map(|m| (m.movie_id, m.title.clone()))
                    }),
                AddTarget::Title(title) => s
                    .catalog
                    .iter()
                    .find(|c| c.title.eq_ignore_ascii_case(title))
                    .map(|c| (c.external_id, c.title.clone())),
            };
            let (id, title) = found.ok_or_else(|| ApiError::status(404, "Movie not found"))?;
            if !s.watchlist.iter().any(|item| item.movie_id == id) {
                s.watchlist.push(saved(id.get(), &title));
            }
            Ok(())
        })
    }

    async fn remove_from_watchlist(&self, movie_id: MovieId) -> Result<(), ApiError> {
        self.begin(Call::Remove(movie_id)).await?;
        self.with(|s| {
            let before = s.watchlist.len();
            s.watchlist.retain(|item| item.movie_id != movie_id);
            if s.watchlist.len() == before {
                Err(ApiError::status(404, "Movie not in watchlist"))
            } else {
                Ok(())
            }
        })
    }
}
