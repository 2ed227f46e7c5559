use crate::error::{FailureKind, SessionError};
use cinescope_api::CatalogService;
use cinescope_models::SessionStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Process-wide authentication state.
///
/// Starts in `Checking`, leaves it exactly once when the boot verification
/// settles, and afterwards only moves through `login()` and `logout()`.
/// Consumers observe transitions through [`SessionStore::subscribe`].
pub struct SessionStore {
    service: Arc<dyn CatalogService>,
    status: watch::Sender<SessionStatus>,
    verification_started: AtomicBool,
    /// Transition requested while still `Checking`; applied when verification settles
    deferred: Mutex<Option<SessionStatus>>,
}

impl SessionStore {
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        let (status, _) = watch::channel(SessionStatus::Checking);
        Self {
            service,
            status,
            verification_started: AtomicBool::new(false),
            deferred: Mutex::new(None),
        }
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Run the one-time session verification.
    ///
    /// Only the first call reaches the service; later calls wait for that
    /// verification to settle and return the resulting status.
    pub async fn boot(&self) -> SessionStatus {
        if self.verification_started.swap(true, Ordering::SeqCst) {
            return self.settled().await;
        }
        if self.status().is_settled() {
            // login() or logout() already decided the status before any check ran
            debug!(operation = "verify_session", "Session already settled; skipping verification");
            return self.status();
        }

        debug!(operation = "verify_session", "Verifying session");
        let verified = match self.service.verify_session().await {
            Ok(()) => SessionStatus::Authenticated,
            Err(e) => {
                // Silent: an invalid credential simply means signed out
                debug!(
                    operation = "verify_session",
                    kind = ?FailureKind::SessionCheckFailure,
                    error = %e,
                    "Session verification failed"
                );
                SessionStatus::Unauthenticated
            }
        };

        let status = self.take_deferred().unwrap_or(verified);
        self.status.send_replace(status);
        info!(operation = "verify_session", status = ?status, "Session check complete");
        status
    }

    /// Wait until the boot verification has settled
    pub async fn settled(&self) -> SessionStatus {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|status| status.is_settled()).await {
            Ok(status) => *status,
            Err(_) => self.status(),
        };
        settled
    }

    /// Mark the session authenticated.
    ///
    /// The caller must already hold a successful remote login; no call is made here.
    pub fn login(&self) {
        if self.checking() {
            debug!("Login recorded during session check; applying once the check settles");
            self.defer(SessionStatus::Authenticated);
            return;
        }
        self.transition(SessionStatus::Authenticated);
    }

    /// End the session remotely.
    ///
    /// On failure the status stays as it was and the error is returned so the
    /// user can see it and retry.
    pub async fn logout(&self) -> Result<(), SessionError> {
        match self.service.logout().await {
            Ok(()) => {
                if self.checking() {
                    self.defer(SessionStatus::Unauthenticated);
                } else {
                    self.transition(SessionStatus::Unauthenticated);
                }
                Ok(())
            }
            Err(e) => {
                warn!(operation = "logout", error = %e, "Logout failed; session left unchanged");
                Err(SessionError::Logout(e))
            }
        }
    }

    /// Whether a boot verification is running right now
    fn checking(&self) -> bool {
        self.verification_started.load(Ordering::SeqCst) && !self.status().is_settled()
    }

    fn transition(&self, next: SessionStatus) {
        let changed = self.status.send_if_modified(|status| {
            if *status == next {
                return false;
            }
            *status = next;
            true
        });
        if changed {
            info!(status = ?next, "Session status changed");
        }
    }

    fn defer(&self, next: SessionStatus) {
        if let Ok(mut deferred) = self.deferred.lock() {
            *deferred = Some(next);
        }
    }

    fn take_deferred(&self) -> Option<SessionStatus> {
        self.deferred.lock().ok().and_then(|mut deferred| deferred.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeCatalog};
    use std::time::Duration;

    #[tokio::test]
    async fn test_boot_without_credential_is_unauthenticated() {
        let fake = FakeCatalog::new();
        let store = SessionStore::new(fake.as_service());
        assert_eq!(store.status(), SessionStatus::Checking);

        assert_eq!(store.boot().await, SessionStatus::Unauthenticated);
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_boot_with_valid_credential_is_authenticated() {
        let fake = FakeCatalog::new();
        fake.set_session_valid(true);
        let store = SessionStore::new(fake.as_service());

        assert_eq!(store.boot().await, SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_verification_runs_once() {
        let fake = FakeCatalog::new();
        fake.set_session_valid(true);
        let store = SessionStore::new(fake.as_service());

        store.boot().await;
        fake.set_session_valid(false);
        assert_eq!(store.boot().await, SessionStatus::Authenticated);
        assert_eq!(fake.count(|c| *c == Call::VerifySession), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checking_holds_until_verification_settles() {
        let fake = FakeCatalog::new();
        fake.set_session_valid(true);
        fake.delay(Call::VerifySession, Duration::from_millis(300));
        let store = SessionStore::new(fake.as_service());
        let mut rx = store.subscribe();

        let (booted, observed) = tokio::join!(store.boot(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let during = store.status();
            rx.changed().await.unwrap();
            (during, *rx.borrow())
        });

        assert_eq!(booted, SessionStatus::Authenticated);
        // Exactly one transition, straight out of Checking
        assert_eq!(observed, (SessionStatus::Checking, SessionStatus::Authenticated));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_boot_shares_single_verification() {
        let fake = FakeCatalog::new();
        fake.delay(Call::VerifySession, Duration::from_millis(200));
        let store = SessionStore::new(fake.as_service());

        let (first, second) = tokio::join!(store.boot(), store.boot());
        assert_eq!(first, SessionStatus::Unauthenticated);
        assert_eq!(second, SessionStatus::Unauthenticated);
        assert_eq!(fake.count(|c| *c == Call::VerifySession), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_during_check_is_applied_after_settlement() {
        let fake = FakeCatalog::new();
        fake.delay(Call::VerifySession, Duration::from_millis(200));
        let store = SessionStore::new(fake.as_service());

        let (booted, during) = tokio::join!(store.boot(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            store.login();
            store.status()
        });

        assert_eq!(during, SessionStatus::Checking);
        assert_eq!(booted, SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_login_without_boot_applies_immediately() {
        let fake = FakeCatalog::new();
        fake.set_session_valid(false);
        let store = SessionStore::new(fake.as_service());

        store.login();
        assert_eq!(store.status(), SessionStatus::Authenticated);

        // A later boot keeps the decided status and makes no call
        assert_eq!(store.boot().await, SessionStatus::Authenticated);
        assert_eq!(fake.count(|c| *c == Call::VerifySession), 0);
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let fake = FakeCatalog::new();
        let store = SessionStore::new(fake.as_service());
        store.boot().await;

        store.login();
        assert_eq!(store.status(), SessionStatus::Authenticated);

        store.logout().await.unwrap();
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
        assert_eq!(fake.count(|c| *c == Call::Logout), 1);
    }

    #[tokio::test]
    async fn test_failed_logout_is_surfaced_and_retryable() {
        let fake = FakeCatalog::new();
        fake.set_session_valid(true);
        fake.fail_next_logouts(1);
        let store = SessionStore::new(fake.as_service());
        store.boot().await;

        let err = store.logout().await.unwrap_err();
        assert_eq!(err.kind(), crate::FailureKind::LogoutFailure);
        assert_eq!(store.status(), SessionStatus::Authenticated);

        store.logout().await.unwrap();
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
    }
}
