//! Auth Bridge: the hosted identity service that issues and verifies sessions.
//!
//! The app never stores credentials. It holds the service's access/refresh
//! tokens in HttpOnly cookies and asks the service who they belong to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::SessionUser;

pub mod cookies;
pub mod gotrue;
pub mod handlers;
pub mod pkce;
pub mod session;

#[cfg(test)]
pub mod fake;

pub use gotrue::GoTrueClient;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid auth URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Tokens issued by the auth service for one signed-in browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: SessionUser,
}

/// Contract with the identity service.
///
/// Carried in `AppState` as `Arc<dyn AuthBridge>`.
#[async_trait]
pub trait AuthBridge: Send + Sync {
    /// `Ok(None)` when the token is expired, revoked, or unknown.
    async fn get_user(&self, access_token: &str) -> Result<Option<SessionUser>, AuthError>;

    /// `Ok(None)` when the refresh token is no longer valid.
    async fn refresh_session(&self, refresh_token: &str)
        -> Result<Option<AuthSession>, AuthError>;

    async fn exchange_code(&self, code: &str, verifier: &str) -> Result<AuthSession, AuthError>;

    /// Emails a one-time sign-in link that lands on `redirect_to` with a `code`.
    async fn send_magic_link(
        &self,
        email: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<(), AuthError>;

    /// URL the browser is sent to for provider sign-in.
    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<String, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}
