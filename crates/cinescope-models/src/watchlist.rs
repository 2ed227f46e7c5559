use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::movie::MovieId;

/// Canonical saved record, enriched by the server (genres, cast, popularity).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistItem {
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub actors: String,
    pub release_date: Option<NaiveDate>,
    pub popularity_score: Option<f64>,
    /// Server-side tier derived from the cast's popularity
    pub actor_classification: Option<String>,
    pub poster_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub overview: Option<String>,
}

impl WatchlistItem {
    /// Thumbnail when the server produced one, otherwise the full poster
    pub fn image_url(&self) -> Option<&str> {
        self.thumbnail_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| self.poster_url.as_deref().filter(|url| !url.is_empty()))
    }
}
