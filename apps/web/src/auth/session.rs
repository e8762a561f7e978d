use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use std::convert::Infallible;
use tracing::{debug, warn};

use crate::auth::cookies::{self, ACCESS_TOKEN, REFRESH_TOKEN};
use crate::auth::{AuthBridge, AuthSession};
use crate::models::user::SessionUser;
use crate::state::AppState;

/// Result of looking up the caller's session for one request.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSession {
    pub user: Option<SessionUser>,
    /// New tokens issued during this lookup, to be written back as cookies.
    pub refreshed: Option<AuthSession>,
}

/// Resolves the caller from the session cookies.
///
/// Tries the access token first and falls back to the refresh token. Any
/// transport failure is logged and treated as "no session".
pub async fn resolve_session(auth: &dyn AuthBridge, jar: &CookieJar) -> ResolvedSession {
    if let Some(access_token) = cookies::value(jar, ACCESS_TOKEN) {
        match auth.get_user(access_token).await {
            Ok(Some(user)) => {
                return ResolvedSession {
                    user: Some(user),
                    refreshed: None,
                }
            }
            Ok(None) => debug!("Access token no longer valid"),
            Err(e) => {
                warn!("Auth service unavailable while resolving session: {e}");
                return ResolvedSession::default();
            }
        }
    }

    let Some(refresh_token) = cookies::value(jar, REFRESH_TOKEN) else {
        return ResolvedSession::default();
    };

    match auth.refresh_session(refresh_token).await {
        Ok(Some(session)) => {
            debug!("Refreshed session for user {}", session.user.id);
            ResolvedSession {
                user: Some(session.user.clone()),
                refreshed: Some(session),
            }
        }
        Ok(None) => ResolvedSession::default(),
        Err(e) => {
            warn!("Auth service unavailable while refreshing session: {e}");
            ResolvedSession::default()
        }
    }
}

/// The verified caller, if any.
///
/// Reuses the lookup the session gate stored on the request; resolves
/// independently when the gate did not run.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<SessionUser>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(resolved) = parts.extensions.get::<ResolvedSession>() {
            return Ok(CurrentUser(resolved.user.clone()));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let resolved = resolve_session(state.auth.as_ref(), &jar).await;
        Ok(CurrentUser(resolved.user))
    }
}
