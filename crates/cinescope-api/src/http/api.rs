use chrono::NaiveDate;
use cinescope_models::{AddTarget, MovieId, SearchCandidate, SuggestionItem, TrendingMovie, WatchlistItem};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Genres and cast arrive either pre-joined or as arrays depending on the endpoint version
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl TextOrList {
    fn joined(self) -> String {
        match self {
            TextOrList::Text(text) => text,
            TextOrList::List(items) => items.join(", "),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWatchlistItem {
    movie_id: MovieId,
    title: String,
    genres: Option<TextOrList>,
    actors: Option<TextOrList>,
    release_date: Option<String>,
    popularity_score: Option<f64>,
    actor_classification: Option<String>,
    poster_url: Option<String>,
    thumbnail_url: Option<String>,
    overview: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSuggestion {
    movie_id: MovieId,
    title: String,
    poster_url: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    rating: Option<f64>,
}

/// Catalog (TMDB-shaped) record used by trending and search
#[derive(Debug, Deserialize)]
struct WireCatalogMovie {
    id: MovieId,
    #[serde(default)]
    title: String,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTrendingPage {
    #[serde(default)]
    results: Vec<WireCatalogMovie>,
}

/// Accepts "2024-05-01" as well as full timestamps; blank means unknown
pub(crate) fn parse_release_date(raw: Option<String>) -> Option<NaiveDate> {
    let raw = raw?;
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl From<WireWatchlistItem> for WatchlistItem {
    fn from(wire: WireWatchlistItem) -> Self {
        WatchlistItem {
            movie_id: wire.movie_id,
            title: wire.title,
            genres: wire.genres.map(TextOrList::joined).unwrap_or_default(),
            actors: wire.actors.map(TextOrList::joined).unwrap_or_default(),
            release_date: parse_release_date(wire.release_date),
            popularity_score: wire.popularity_score,
            actor_classification: wire.actor_classification,
            poster_url: wire.poster_url,
            thumbnail_url: wire.thumbnail_url,
            overview: wire.overview,
        }
    }
}

impl From<WireSuggestion> for SuggestionItem {
    fn from(wire: WireSuggestion) -> Self {
        SuggestionItem {
            movie_id: wire.movie_id,
            title: wire.title,
            poster_url: wire.poster_url,
            overview: wire.overview,
            release_date: parse_release_date(wire.release_date),
            rating: wire.rating,
        }
    }
}

impl From<WireCatalogMovie> for TrendingMovie {
    fn from(wire: WireCatalogMovie) -> Self {
        TrendingMovie {
            id: wire.id,
            title: wire.title,
            poster_path: wire.poster_path,
            vote_average: wire.vote_average,
            release_date: parse_release_date(wire.release_date),
        }
    }
}

impl From<WireCatalogMovie> for SearchCandidate {
    fn from(wire: WireCatalogMovie) -> Self {
        SearchCandidate {
            external_id: wire.id,
            title: wire.title,
            poster_path: wire.poster_path,
            release_date: parse_release_date(wire.release_date),
        }
    }
}

/// Turn a non-2xx response into `ApiError::Status`, keeping the body as the message
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::status(status.as_u16(), body))
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub async fn verify_session(client: &Client, base_url: &str) -> Result<(), ApiError> {
    let response = client.get(format!("{}/auth/check", base_url)).send().await?;
    ensure_success(response).await?;
    Ok(())
}

pub async fn login(client: &Client, base_url: &str, email: &str, password: &str) -> Result<(), ApiError> {
    let response = client
        .post(format!("{}/auth/login", base_url))
        .json(&Credentials { email, password })
        .send()
        .await?;
    ensure_success(response).await?;
    Ok(())
}

pub async fn logout(client: &Client, base_url: &str) -> Result<(), ApiError> {
    let response = client.post(format!("{}/auth/logout", base_url)).send().await?;
    ensure_success(response).await?;
    Ok(())
}

pub async fn register(client: &Client, base_url: &str, email: &str, password: &str) -> Result<(), ApiError> {
    let response = client
        .post(format!("{}/auth/register", base_url))
        .json(&Credentials { email, password })
        .send()
        .await?;
    ensure_success(response).await?;
    Ok(())
}

pub async fn get_trending(client: &Client, base_url: &str) -> Result<Vec<TrendingMovie>, ApiError> {
    let response = client.get(format!("{}/trending", base_url)).send().await?;
    let page: WireTrendingPage = decode(ensure_success(response).await?).await?;
    debug!(count = page.results.len(), "Fetched trending movies");
    Ok(page.results.into_iter().map(TrendingMovie::from).collect())
}

pub async fn get_suggestions(client: &Client, base_url: &str) -> Result<Vec<SuggestionItem>, ApiError> {
    let response = client
        .get(format!("{}/recommendation/suggested", base_url))
        .send()
        .await?;
    let items: Vec<WireSuggestion> = decode(ensure_success(response).await?).await?;
    debug!(count = items.len(), "Fetched suggestions");
    Ok(items.into_iter().map(SuggestionItem::from).collect())
}

pub async fn get_watchlist(client: &Client, base_url: &str) -> Result<Vec<WatchlistItem>, ApiError> {
    let response = client.get(format!("{}/watchlist", base_url)).send().await?;
    let items: Vec<WireWatchlistItem> = decode(ensure_success(response).await?).await?;
    debug!(count = items.len(), "Fetched watchlist");
    Ok(items.into_iter().map(WatchlistItem::from).collect())
}

pub async fn search_catalog(client: &Client, base_url: &str, title: &str) -> Result<Vec<SearchCandidate>, ApiError> {
    let response = client
        .get(format!("{}/search", base_url))
        .query(&[("title", title)])
        .send()
        .await?;
    let items: Vec<WireCatalogMovie> = decode(ensure_success(response).await?).await?;
    debug!(query = title, count = items.len(), "Catalog search returned");
    Ok(items.into_iter().map(SearchCandidate::from).collect())
}

pub async fn add_to_watchlist(client: &Client, base_url: &str, target: &AddTarget) -> Result<(), ApiError> {
    let request = client.post(format!("{}/watchlist", base_url));
    let request = match target {
        AddTarget::Id(movie_id) => request.query(&[("movieId", movie_id.to_string())]),
        AddTarget::Title(title) => request.query(&[("title", title.as_str())]),
    };
    let response = request.send().await?;
    ensure_success(response).await?;
    Ok(())
}

pub async fn remove_from_watchlist(client: &Client, base_url: &str, movie_id: MovieId) -> Result<(), ApiError> {
    let id = movie_id.to_string();
    let response = client
        .delete(format!("{}/watchlist/{}", base_url, urlencoding::encode(&id)))
        .send()
        .await?;
    ensure_success(response).await?;
    Ok(())
}
