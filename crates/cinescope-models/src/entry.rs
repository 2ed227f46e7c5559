use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::movie::MovieId;
use crate::search::SearchCandidate;
use crate::suggestion::SuggestionItem;
use crate::trending::TrendingMovie;
use crate::watchlist::WatchlistItem;

/// One movie record in whichever shape the service produced it.
///
/// Views that only need identity, title and artwork work against this type
/// instead of matching on each record shape separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogEntry {
    Candidate(SearchCandidate),
    Saved(WatchlistItem),
    Suggested(SuggestionItem),
    Trending(TrendingMovie),
}

impl CatalogEntry {
    pub fn id(&self) -> MovieId {
        match self {
            CatalogEntry::Candidate(c) => c.external_id,
            CatalogEntry::Saved(w) => w.movie_id,
            CatalogEntry::Suggested(s) => s.movie_id,
            CatalogEntry::Trending(t) => t.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CatalogEntry::Candidate(c) => &c.title,
            CatalogEntry::Saved(w) => &w.title,
            CatalogEntry::Suggested(s) => &s.title,
            CatalogEntry::Trending(t) => &t.title,
        }
    }

    pub fn release_date(&self) -> Option<NaiveDate> {
        match self {
            CatalogEntry::Candidate(c) => c.release_date,
            CatalogEntry::Saved(w) => w.release_date,
            CatalogEntry::Suggested(s) => s.release_date,
            CatalogEntry::Trending(t) => t.release_date,
        }
    }

    /// Artwork reference. Relative catalog paths for candidates and trending
    /// titles, absolute URLs for server-enriched records.
    pub fn artwork(&self) -> Option<&str> {
        let art = match self {
            CatalogEntry::Candidate(c) => c.poster_path.as_deref(),
            CatalogEntry::Saved(w) => w.image_url(),
            CatalogEntry::Suggested(s) => s.poster_url.as_deref(),
            CatalogEntry::Trending(t) => t.poster_path.as_deref(),
        };
        art.filter(|a| !a.trim().is_empty())
    }
}

impl From<SearchCandidate> for CatalogEntry {
    fn from(candidate: SearchCandidate) -> Self {
        CatalogEntry::Candidate(candidate)
    }
}

impl From<WatchlistItem> for CatalogEntry {
    fn from(item: WatchlistItem) -> Self {
        CatalogEntry::Saved(item)
    }
}

impl From<SuggestionItem> for CatalogEntry {
    fn from(item: SuggestionItem) -> Self {
        CatalogEntry::Suggested(item)
    }
}

impl From<TrendingMovie> for CatalogEntry {
    fn from(movie: TrendingMovie) -> Self {
        CatalogEntry::Trending(movie)
    }
}
