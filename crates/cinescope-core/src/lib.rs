pub mod context;
pub mod diff;
pub mod error;
pub mod forms;
pub mod guard;
pub mod list;
pub mod search;
pub mod session;
pub mod watchlist;

#[cfg(test)]
mod fake;

pub use context::AppContext;
pub use diff::{remove_by_id, remove_duplicates_by_id, HasMovieId};
pub use error::{FailureKind, FormError, SessionError, SyncError};
pub use forms::{LoginForm, RegisterForm, REGISTERED_NOTICE};
pub use guard::{GuardDecision, Route, RouteGuard};
pub use list::{ListItem, ListKind, ListState, ListSynchronizer, ListView};
pub use search::{SearchDebouncer, SearchState};
pub use session::SessionStore;
pub use watchlist::WatchlistView;
