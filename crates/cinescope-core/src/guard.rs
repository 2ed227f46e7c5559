use cinescope_models::SessionStatus;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Trending,
    Watchlist,
    Suggestions,
}

impl Route {
    /// Where the root path and unknown paths lead
    pub const DEFAULT: Route = Route::Trending;

    pub const NAVIGATION: [Route; 3] = [Route::Trending, Route::Watchlist, Route::Suggestions];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Trending => "/trending",
            Route::Watchlist => "/watchlist",
            Route::Suggestions => "/suggested",
        }
    }

    /// Stable name for logs and JSON output
    pub fn name(self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Register => "register",
            Route::Trending => "trending",
            Route::Watchlist => "watchlist",
            Route::Suggestions => "suggested",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Trending => "Trending",
            Route::Watchlist => "My Watchlist",
            Route::Suggestions => "Suggested",
        }
    }

    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    /// Match a client path. Query strings, fragments and a trailing slash are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim();
        let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        match path {
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/trending" => Some(Route::Trending),
            "/watchlist" => Some(Route::Watchlist),
            "/suggested" => Some(Route::Suggestions),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session check still running: show a neutral placeholder, nothing protected
    Pending,
    Redirect(Route),
    Render(Route),
}

/// Admits or redirects navigation according to the session status
#[derive(Clone)]
pub struct RouteGuard {
    session: watch::Receiver<SessionStatus>,
}

impl RouteGuard {
    pub fn new(session: watch::Receiver<SessionStatus>) -> Self {
        Self { session }
    }

    /// Decision for `path` under `status`
    pub fn evaluate(status: SessionStatus, path: &str) -> GuardDecision {
        let route = match Route::from_path(path) {
            Some(route) => route,
            None => return GuardDecision::Redirect(Route::DEFAULT),
        };
        if !route.is_protected() {
            return GuardDecision::Render(route);
        }
        match status {
            SessionStatus::Checking => GuardDecision::Pending,
            SessionStatus::Unauthenticated => GuardDecision::Redirect(Route::Login),
            SessionStatus::Authenticated => GuardDecision::Render(route),
        }
    }

    /// Decision for `path` under the current status
    pub fn decide(&self, path: &str) -> GuardDecision {
        let status = *self.session.borrow();
        Self::evaluate(status, path)
    }

    /// Decision for `path` once the session check has settled. Never `Pending`.
    pub async fn resolve(&self, path: &str) -> GuardDecision {
        let mut session = self.session.clone();
        let status = match session.wait_for(|status| status.is_settled()).await {
            Ok(status) => *status,
            Err(_) => *self.session.borrow(),
        };
        Self::evaluate(status, path)
    }

    /// Follow redirects from `path` to the route that actually renders
    pub async fn admit(&self, path: &str) -> Route {
        let mut target = path.to_string();
        // Redirect chains are at most unknown -> trending -> login
        for _ in 0..3 {
            match self.resolve(&target).await {
                GuardDecision::Render(route) => {
                    debug!(path = %path, route = route.name(), "Navigation admitted");
                    return route;
                }
                GuardDecision::Redirect(route) => {
                    debug!(from = %target, to = route.path(), "Navigation redirected");
                    target = route.path().to_string();
                }
                GuardDecision::Pending => {}
            }
        }
        Route::Login
    }
}
