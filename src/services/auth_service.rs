//! Auth service layer.
//!
//! Login, logout and token re-validation on top of the shared [`Session`].

use crate::domain::is_valid_email;
use crate::error::{ApiError, ApiResult};
use crate::models::{LoginRequest, User};
use crate::repositories::AuthRepository;
use crate::session::Session;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Log in, store the token in the session and return the user.
    async fn login(&self, email: &str, password: &str) -> ApiResult<User>;

    /// Forget the token in memory and in storage.
    async fn logout(&self) -> ApiResult<()>;

    /// Re-validate a stored token against the backend.
    ///
    /// Returns `None` when there is no token or the backend rejected it; the
    /// session is cleared in the latter case.
    async fn check_auth(&self) -> ApiResult<Option<User>>;

    /// The user of the current session, if authenticated.
    fn current_user(&self) -> Option<User>;
}

/// Default implementation of AuthService.
pub struct AuthServiceImpl {
    repository: Arc<dyn AuthRepository>,
    session: Arc<Session>,
}

/// Validation helper functions.
impl AuthServiceImpl {
    fn validate_credentials(email: &str, password: &str) -> Result<(), String> {
        if email.trim().is_empty() {
            return Err("Email cannot be empty".to_string());
        }
        if !is_valid_email(email.trim()) {
            return Err(format!("Invalid email address: {}", email.trim()));
        }
        if password.is_empty() {
            return Err("Password cannot be empty".to_string());
        }
        Ok(())
    }
}

impl AuthServiceImpl {
    pub fn new(repository: Arc<dyn AuthRepository>, session: Arc<Session>) -> Self {
        Self {
            repository,
            session,
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        Self::validate_credentials(email, password).map_err(ApiError::Validation)?;

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let token = self.repository.login(&request).await?;
        self.session.set_token(token.access_token)?;

        match self.repository.current_user().await {
            Ok(user) => {
                self.session.set_user(user.clone())?;
                tracing::info!("Logged in as {}", user.email);
                Ok(user)
            }
            Err(e) => {
                // A token we cannot resolve to a user is useless
                self.session.clear()?;
                Err(e)
            }
        }
    }

    async fn logout(&self) -> ApiResult<()> {
        self.session.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    async fn check_auth(&self) -> ApiResult<Option<User>> {
        if !self.session.has_token() {
            return Ok(None);
        }

        match self.repository.current_user().await {
            Ok(user) => {
                self.session.set_user(user.clone())?;
                Ok(Some(user))
            }
            Err(ApiError::Unauthorized(_)) | Err(ApiError::Forbidden(_)) => {
                tracing::info!("Stored session token was rejected; clearing it");
                self.session.clear()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn current_user(&self) -> Option<User> {
        self.session.user()
    }
}
