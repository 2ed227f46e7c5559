use cinescope_api::ApiError;
use cinescope_models::MovieId;
use thiserror::Error;

/// User-visible failure categories. Each one has its own presentation:
/// silent, inline on a form, inline in a list, a blocking notice, or only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    SessionCheckFailure,
    LoginFailure,
    RegisterFailure,
    LogoutFailure,
    ListLoadFailure,
    ItemAddFailure,
    ItemRemoveFailure,
    SearchFailure,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{message}")]
    Load {
        message: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("{message}")]
    Add {
        movie_id: Option<MovieId>,
        message: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("Failed to delete movie.")]
    Remove {
        movie_id: MovieId,
        #[source]
        source: ApiError,
    },

    #[error("movie {0} already has a request in flight")]
    InFlight(MovieId),

    #[error("movie {0} is already on the watchlist")]
    AlreadyAdded(MovieId),

    #[error("a title is already being added")]
    SubmissionInFlight,
}

impl SyncError {
    /// Failure category, or `None` for local rejections that never reached the service
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            SyncError::Load { .. } => Some(FailureKind::ListLoadFailure),
            SyncError::Add { .. } => Some(FailureKind::ItemAddFailure),
            SyncError::Remove { .. } => Some(FailureKind::ItemRemoveFailure),
            SyncError::InFlight(_) | SyncError::AlreadyAdded(_) | SyncError::SubmissionInFlight => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Logout failed. You are still signed in; try again.")]
    Logout(#[source] ApiError),
}

impl SessionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SessionError::Logout(_) => FailureKind::LogoutFailure,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Remote rejection, carrying the text shown inline on the form
    #[error("{message}")]
    Rejected { kind: FailureKind, message: String },
}
