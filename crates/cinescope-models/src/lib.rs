pub mod display;
pub mod entry;
pub mod movie;
pub mod pending;
pub mod search;
pub mod session;
pub mod suggestion;
pub mod trending;
pub mod watchlist;

pub use display::{format_rating, format_release_date, poster_url};
pub use entry::CatalogEntry;
pub use movie::{MovieId, ParseMovieIdError};
pub use pending::{AddSource, AddTarget, OperationKind, PendingMarker};
pub use search::SearchCandidate;
pub use session::SessionStatus;
pub use suggestion::SuggestionItem;
pub use trending::TrendingMovie;
pub use watchlist::WatchlistItem;
