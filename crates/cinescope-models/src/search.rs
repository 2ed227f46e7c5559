use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::movie::MovieId;

/// Typeahead hit from the catalog. Lacks the enrichment of a `WatchlistItem`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCandidate {
    pub external_id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl SearchCandidate {
    pub fn has_poster(&self) -> bool {
        self.poster_path
            .as_deref()
            .map(|path| !path.trim().is_empty())
            .unwrap_or(false)
    }
}
