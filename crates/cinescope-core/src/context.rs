use crate::error::{SessionError, SyncError};
use crate::forms::{LoginForm, RegisterForm};
use crate::guard::{Route, RouteGuard};
use crate::list::ListSynchronizer;
use crate::search::SearchDebouncer;
use crate::session::SessionStore;
use crate::watchlist::WatchlistView;
use cinescope_api::CatalogService;
use cinescope_config::SearchConfig;
use cinescope_models::{SessionStatus, SuggestionItem, TrendingMovie};
use std::sync::Arc;
use tracing::debug;

/// Application-scoped state handed to every page.
///
/// One instance per process; each list kind owns its own synchronizer so the
/// "already added" bookkeeping never leaks between lists.
pub struct AppContext {
    service: Arc<dyn CatalogService>,
    session: Arc<SessionStore>,
    guard: RouteGuard,
    trending: ListSynchronizer<TrendingMovie>,
    watchlist: WatchlistView,
    suggestions: ListSynchronizer<SuggestionItem>,
}

impl AppContext {
    pub fn new(service: Arc<dyn CatalogService>, search: &SearchConfig) -> Self {
        let session = Arc::new(SessionStore::new(Arc::clone(&service)));
        let guard = RouteGuard::new(session.subscribe());
        let watchlist = WatchlistView::new(
            ListSynchronizer::new(Arc::clone(&service)),
            SearchDebouncer::new(Arc::clone(&service), search.quiet_period()),
        );
        Self {
            trending: ListSynchronizer::new(Arc::clone(&service)),
            suggestions: ListSynchronizer::new(Arc::clone(&service)),
            service,
            session,
            guard,
            watchlist,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn trending(&self) -> &ListSynchronizer<TrendingMovie> {
        &self.trending
    }

    pub fn watchlist(&self) -> &WatchlistView {
        &self.watchlist
    }

    pub fn suggestions(&self) -> &ListSynchronizer<SuggestionItem> {
        &self.suggestions
    }

    pub fn login_form(&self) -> LoginForm {
        LoginForm::new(Arc::clone(&self.service), Arc::clone(&self.session))
    }

    pub fn register_form(&self) -> RegisterForm {
        RegisterForm::new(Arc::clone(&self.service))
    }

    /// Run the boot-time session verification
    pub async fn boot(&self) -> SessionStatus {
        self.session.boot().await
    }

    /// Navigate to `path`: follow the guard's redirects, then load the admitted page's list.
    ///
    /// A failed load is not an error here; it lives in that list's error slot.
    pub async fn open(&self, path: &str) -> Route {
        let route = self.guard.admit(path).await;
        if let Err(e) = self.reload(route).await {
            debug!(route = route.name(), error = %e, "Page opened with a load failure");
        }
        route
    }

    /// End the session. On success every list is forgotten.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.session.logout().await?;
        self.trending.reset();
        self.watchlist.list().reset();
        self.watchlist.search().clear();
        self.suggestions.reset();
        Ok(())
    }

    /// Reload the list behind `route`, if it has one
    pub async fn reload(&self, route: Route) -> Result<(), SyncError> {
        match route {
            Route::Trending => self.trending.load().await,
            Route::Watchlist => self.watchlist.load().await,
            Route::Suggestions => self.suggestions.load().await,
            Route::Login | Route::Register => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{candidate, ids, saved, suggested, Call, FakeCatalog};
    use crate::list::ListView;
    use cinescope_models::{AddTarget, MovieId};
    use std::time::Duration;

    fn context(fake: &FakeCatalog) -> AppContext {
        AppContext::new(fake.as_service(), &SearchConfig::default())
    }

    #[tokio::test]
    async fn test_signed_out_navigation_lands_on_login() {
        let fake = FakeCatalog::new();
        let app = context(&fake);
        app.boot().await;

        assert_eq!(app.open("/watchlist").await, Route::Login);
        assert_eq!(fake.count(|c| *c == Call::Watchlist), 0);
    }

    #[tokio::test]
    async fn test_login_then_open_loads_the_page() {
        let fake = FakeCatalog::new();
        fake.accept_password("pw");
        fake.set_suggestions(vec![suggested(3, "Ran")]);
        let app = context(&fake);
        app.boot().await;

        let next = app.login_form().submit("ana@example.com", "pw").await.unwrap();
        assert_eq!(next, Route::Trending);

        assert_eq!(app.open("/suggested").await, Route::Suggestions);
        assert_eq!(ids(&app.suggestions().items()), vec![3]);
    }

    #[tokio::test]
    async fn test_root_opens_trending_feed() {
        let fake = FakeCatalog::new();
        fake.set_session_valid(true);
        fake.set_trending(vec![TrendingMovie {
            id: cinescope_models::MovieId::new(693134),
            title: "Dune: Part Two".to_string(),
            poster_path: Some("/d2.jpg".to_string()),
            vote_average: Some(8.2),
            release_date: None,
        }]);
        let app = context(&fake);
        app.boot().await;

        assert_eq!(app.open("/").await, Route::Trending);
        assert_eq!(ids(&app.trending().items()), vec![693134]);
        assert_eq!(fake.count(|c| *c == Call::Trending), 1);
    }

    #[tokio::test]
    async fn test_open_with_failing_load_still_renders() {
        let fake = FakeCatalog::new();
        fake.set_session_valid(true);
        fake.fail(Call::Trending);
        let app = context(&fake);
        app.boot().await;

        assert_eq!(app.open("/").await, Route::Trending);
        assert_eq!(
            app.trending().view(),
            ListView::Failed("Failed to load trending movies.".to_string())
        );
    }

    #[tokio::test]
    async fn test_logout_forgets_lists() {
        let fake = FakeCatalog::new();
        fake.set_session_valid(true);
        fake.set_watchlist(vec![saved(1, "Alien")]);
        let app = context(&fake);
        app.boot().await;
        app.open("/watchlist").await;
        assert_eq!(ids(&app.watchlist().list().items()), vec![1]);

        app.logout().await.unwrap();
        assert_eq!(app.session().status(), SessionStatus::Unauthenticated);
        assert!(app.watchlist().list().items().is_empty());
        assert_eq!(app.open("/watchlist").await, Route::Login);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_without_boot_opens_protected_page() {
        let fake = FakeCatalog::new();
        fake.accept_password("pw");
        fake.set_watchlist(vec![saved(1, "Alien")]);
        let app = context(&fake);

        app.login_form().submit("ana@example.com", "pw").await.unwrap();
        assert_eq!(app.session().status(), SessionStatus::Authenticated);

        let opened = tokio::time::timeout(Duration::from_secs(3600), app.open("/watchlist")).await;
        assert_eq!(opened.unwrap(), Route::Watchlist);
        assert_eq!(ids(&app.watchlist().list().items()), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_in_flight_across_logout_leaves_lists_empty() {
        let fake = FakeCatalog::new();
        fake.set_session_valid(true);
        fake.set_catalog(vec![candidate(42, "Heat", Some("/heat.jpg"))]);
        fake.delay(Call::Add(AddTarget::Id(MovieId::new(42))), Duration::from_millis(200));
        let app = context(&fake);
        app.boot().await;
        app.open("/watchlist").await;

        let (added, logged_out) = tokio::join!(app.watchlist().add_from_search(MovieId::new(42)), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            app.logout().await
        });
        added.unwrap();
        logged_out.unwrap();

        assert_eq!(app.session().status(), SessionStatus::Unauthenticated);
        assert!(app.watchlist().list().items().is_empty());
        assert_eq!(app.watchlist().list().error(), None);
        assert!(app.watchlist().list().can_add(MovieId::new(42)));
        assert_eq!(
            fake.calls(),
            vec![Call::VerifySession, Call::Watchlist, Call::Add(AddTarget::Id(MovieId::new(42))), Call::Logout]
        );
    }
}
