use crate::error::ApiError;
use crate::http::api;
use crate::traits::CatalogService;
use async_trait::async_trait;
use cinescope_config::ApiConfig;
use cinescope_models::{AddTarget, MovieId, SearchCandidate, SuggestionItem, TrendingMovie, WatchlistItem};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// reqwest-backed `CatalogService`.
///
/// The session cookie set by the login endpoint lives in the client's
/// in-memory cookie store and is dropped with the process.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Arc<Client>,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(base_url));
        }

        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(concat!("cinescope/", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(base_url = %base_url, "Created catalog client");
        Ok(Self {
            client: Arc::new(client),
            base_url,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CatalogService for HttpCatalogClient {
    async fn verify_session(&self) -> Result<(), ApiError> {
        api::verify_session(&self.client, &self.base_url).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        api::login(&self.client, &self.base_url, email, password).await?;
        info!("Logged in to catalog service");
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        api::logout(&self.client, &self.base_url).await
    }

    async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        api::register(&self.client, &self.base_url, email, password).await
    }

    async fn get_trending(&self) -> Result<Vec<TrendingMovie>, ApiError> {
        api::get_trending(&self.client, &self.base_url).await
    }

    async fn get_suggestions(&self) -> Result<Vec<SuggestionItem>, ApiError> {
        api::get_suggestions(&self.client, &self.base_url).await
    }

    async fn search_catalog(&self, title: &str) -> Result<Vec<SearchCandidate>, ApiError> {
        api::search_catalog(&self.client, &self.base_url, title).await
    }

    async fn get_watchlist(&self) -> Result<Vec<WatchlistItem>, ApiError> {
        api::get_watchlist(&self.client, &self.base_url).await
    }

    async fn add_to_watchlist(&self, target: &AddTarget) -> Result<(), ApiError> {
        api::add_to_watchlist(&self.client, &self.base_url, target).await
    }

    async fn remove_from_watchlist(&self, movie_id: MovieId) -> Result<(), ApiError> {
        api::remove_from_watchlist(&self.client, &self.base_url, movie_id).await
    }
}
