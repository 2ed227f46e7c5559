use serde::{Deserialize, Serialize};
use crate::movie::MovieId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Add,
    Remove,
}

/// In-flight add or remove for one id. Lives exactly as long as the call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingMarker {
    pub target_id: MovieId,
    pub operation: OperationKind,
}

/// Where an add was initiated; decides the local effect once it succeeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AddSource {
    /// Picked from the suggestions list: drop it from that list.
    Suggested,
    /// Picked from watchlist search: reload the canonical watchlist.
    WatchlistSearch,
}

/// What `add-to-watchlist` is asked to save.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddTarget {
    Id(MovieId),
    Title(String),
}

impl AddTarget {
    pub fn movie_id(&self) -> Option<MovieId> {
        match self {
            AddTarget::Id(id) => Some(*id),
            AddTarget::Title(_) => None,
        }
    }
}

impl From<MovieId> for AddTarget {
    fn from(id: MovieId) -> Self {
        AddTarget::Id(id)
    }
}
