use async_trait::async_trait;
use cinescope_models::{AddTarget, MovieId, SearchCandidate, SuggestionItem, TrendingMovie, WatchlistItem};
use crate::error::ApiError;

/// The remote catalog, recommendation and account service.
///
/// Every call is authenticated by an opaque session credential that the
/// implementation attaches on its own; callers never see it.
#[async_trait]
pub trait CatalogService: Send + Sync {
    // Session
    async fn verify_session(&self) -> Result<(), ApiError>;
    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn register(&self, email: &str, password: &str) -> Result<(), ApiError>;

    // Browsing
    async fn get_trending(&self) -> Result<Vec<TrendingMovie>, ApiError>;
    async fn get_suggestions(&self) -> Result<Vec<SuggestionItem>, ApiError>;
    async fn search_catalog(&self, title: &str) -> Result<Vec<SearchCandidate>, ApiError>;

    // Watchlist
    async fn get_watchlist(&self) -> Result<Vec<WatchlistItem>, ApiError>;
    async fn add_to_watchlist(&self, target: &AddTarget) -> Result<(), ApiError>;
    async fn remove_from_watchlist(&self, movie_id: MovieId) -> Result<(), ApiError>;
}
