use crate::error::{FailureKind, FormError};
use crate::guard::Route;
use crate::session::SessionStore;
use cinescope_api::{ApiError, CatalogService};
use std::sync::Arc;
use tracing::{info, warn};

pub const REGISTERED_NOTICE: &str = "Registration successful! Please log in.";

fn required(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(())
}

fn rejected(kind: FailureKind, error: &ApiError, fallback: &str) -> FormError {
    FormError::Rejected {
        kind,
        message: error.server_message().unwrap_or(fallback).to_string(),
    }
}

pub struct LoginForm {
    service: Arc<dyn CatalogService>,
    session: Arc<SessionStore>,
}

impl LoginForm {
    pub fn new(service: Arc<dyn CatalogService>, session: Arc<SessionStore>) -> Self {
        Self { service, session }
    }

    /// Authenticate remotely and, only then, mark the session signed in.
    ///
    /// Returns the route to show next.
    pub async fn submit(&self, email: &str, password: &str) -> Result<Route, FormError> {
        required(email, "Email")?;
        required(password, "Password")?;

        match self.service.login(email.trim(), password).await {
            Ok(()) => {
                self.session.login();
                info!(operation = "login", "Signed in");
                Ok(Route::Trending)
            }
            Err(e) => {
                warn!(operation = "login", error = %e, "Login rejected");
                Err(rejected(FailureKind::LoginFailure, &e, "Login failed"))
            }
        }
    }
}

pub struct RegisterForm {
    service: Arc<dyn CatalogService>,
}

impl RegisterForm {
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        Self { service }
    }

    /// Create an account. A mismatched confirmation never reaches the service.
    pub async fn submit(&self, email: &str, password: &str, confirmation: &str) -> Result<Route, FormError> {
        required(email, "Email")?;
        required(password, "Password")?;
        if password != confirmation {
            return Err(FormError::PasswordMismatch);
        }

        match self.service.register(email.trim(), password).await {
            Ok(()) => {
                info!(operation = "register", "Account created");
                Ok(Route::Login)
            }
            Err(e) => {
                warn!(operation = "register", error = %e, "Registration rejected");
                Err(rejected(FailureKind::RegisterFailure, &e, "Registration failed"))
            }
        }
    }
}
