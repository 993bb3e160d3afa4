//! Authentication service.
//!
//! Credentials go to a credential-verification endpoint which returns an
//! opaque bearer token and the granted role, or a failure. Client-side
//! validation rejects obviously malformed input before any network call.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use roster_model::{Credentials, LoginOutcome, login_invalidates};

use crate::api_client::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;
use crate::users::UserDirectory;

const LOGIN_PATH: &str = "auth/login";
const MIN_PASSWORD_LEN: usize = 6;

/// Authentication operations available to the console.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Submit credentials; on success the session is established.
    async fn login(&self, credentials: Credentials) -> ClientResult<LoginOutcome>;

    /// End the session, clearing memory, storage, and cached data.
    async fn logout(&self) -> ClientResult<()>;
}

/// Form-level validation, applied before submission.
pub fn validate_credentials(credentials: &Credentials) -> ClientResult<()> {
    let email = credentials.email.trim();
    if email.is_empty() {
        return Err(ClientError::Validation("email is required".into()));
    }
    let looks_like_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !looks_like_email {
        return Err(ClientError::Validation(format!(
            "not a valid email address: {email}"
        )));
    }
    if credentials.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// [`AuthService`] backed by the HTTP login endpoint.
pub struct HttpAuthService {
    api: ApiClient,
    session: Arc<SessionStore>,
    directory: Arc<UserDirectory>,
}

impl HttpAuthService {
    /// Wire the service and push any restored session token into the
    /// API client so requests are authenticated from the first call.
    pub async fn new(
        api: ApiClient,
        session: Arc<SessionStore>,
        directory: Arc<UserDirectory>,
    ) -> Self {
        let token = session.snapshot().token;
        api.set_token(token).await;
        Self {
            api,
            session,
            directory,
        }
    }
}

impl std::fmt::Debug for HttpAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuthService")
            .field("session", &self.session)
            .finish()
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, credentials: Credentials) -> ClientResult<LoginOutcome> {
        validate_credentials(&credentials)?;

        let outcome: LoginOutcome = match self.api.post(LOGIN_PATH, &credentials).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("[Auth] Login failed: {e}");
                return Err(e);
            }
        };

        self.api.set_token(Some(outcome.token.clone())).await;
        self.session
            .set_auth(outcome.token.clone(), outcome.role)?;
        // Auth-scoped cached results are no longer valid for the new
        // session.
        self.directory.invalidate(&login_invalidates());

        info!("[Auth] Logged in with role {}", outcome.role);
        Ok(outcome)
    }

    async fn logout(&self) -> ClientResult<()> {
        self.session.logout()?;
        self.api.set_token(None).await;
        self.directory.clear_cache();
        Ok(())
    }
}
