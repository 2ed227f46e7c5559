// Id-keyed helpers shared by every list the client displays

use cinescope_models::{CatalogEntry, MovieId, SearchCandidate, SuggestionItem, TrendingMovie, WatchlistItem};
use std::collections::HashSet;
use tracing::debug;

pub trait HasMovieId {
    fn movie_id(&self) -> MovieId;
}

impl HasMovieId for WatchlistItem {
    fn movie_id(&self) -> MovieId {
        self.movie_id
    }
}

impl HasMovieId for SuggestionItem {
    fn movie_id(&self) -> MovieId {
        self.movie_id
    }
}

impl HasMovieId for TrendingMovie {
    fn movie_id(&self) -> MovieId {
        self.id
    }
}

impl HasMovieId for SearchCandidate {
    fn movie_id(&self) -> MovieId {
        self.external_id
    }
}

impl HasMovieId for CatalogEntry {
    fn movie_id(&self) -> MovieId {
        self.id()
    }
}

/// Keep the first record for each id, preserving order
pub fn remove_duplicates_by_id<T: HasMovieId>(items: Vec<T>) -> Vec<T> {
    let before = items.len();
    let mut seen = HashSet::with_capacity(before);
    let deduped: Vec<T> = items
        .into_iter()
        .filter(|item| seen.insert(item.movie_id()))
        .collect();

    if deduped.len() != before {
        debug!(
            "remove_duplicates_by_id: input_count={}, result_count={}",
            before,
            deduped.len()
        );
    }
    deduped
}

/// Drop `movie_id` from `items` in place. Returns whether anything was removed.
pub fn remove_by_id<T: HasMovieId>(items: &mut Vec<T>, movie_id: MovieId) -> bool {
    let before = items.len();
    items.retain(|item| item.movie_id() != movie_id);
    items.len() != before
}
