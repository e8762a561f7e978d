//! Sign-in surface: login page, magic link, OAuth start, code-exchange
//! callback, and sign-out.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::cookies::{self, ACCESS_TOKEN, CODE_VERIFIER};
use crate::auth::pkce::PkcePair;
use crate::auth::session::CurrentUser;
use crate::errors::AppError;
use crate::gate::{APP_AREA, LOGIN_PATH};
use crate::pages::views::LoginPage;
use crate::state::AppState;

pub const CALLBACK_FAILED_PATH: &str = "/login?error=auth_callback_failed";

const MAGIC_LINK_SENT: &str = "Check your email for a secure sign-in link.";
const MAGIC_LINK_FAILED: &str = "Unable to send sign-in link. Check configuration and try again.";

/// Post-login destination. Only same-origin absolute paths are accepted.
pub fn safe_next(raw: Option<&str>) -> String {
    match raw {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\") =>
        {
            path.to_string()
        }
        _ => APP_AREA.to_string(),
    }
}

fn provider_label(provider: &str) -> String {
    let mut chars = provider.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn oauth_failed_message(provider: &str) -> String {
    format!(
        "{} sign-in failed. Check provider settings and try again.",
        provider_label(provider)
    )
}

fn render_login(
    state: &AppState,
    next: String,
    message: Option<String>,
    auth_failed: bool,
) -> Result<Html<String>, AppError> {
    Ok(Html(
        LoginPage {
            next,
            provider_label: provider_label(&state.config.oauth_provider),
            message,
            auth_failed,
        }
        .render()?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
    pub error: Option<String>,
}

/// GET /login
pub async fn handle_login_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<LoginQuery>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to(APP_AREA).into_response());
    }

    let next = safe_next(params.next.as_deref());
    Ok(render_login(&state, next, None, params.error.is_some())?.into_response())
}

#[derive(Debug, Deserialize)]
pub struct MagicLinkForm {
    #[serde(default)]
    pub email: String,
    pub next: Option<String>,
}

/// POST /login/magic-link
pub async fn handle_magic_link(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<MagicLinkForm>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let next = safe_next(form.next.as_deref());
    let email = form.email.trim();

    let (jar, message) = if email.is_empty() {
        (jar, MAGIC_LINK_FAILED)
    } else {
        let pkce = PkcePair::generate();
        let redirect_to = state.config.callback_url(&next);

        match state
            .auth
            .send_magic_link(email, &redirect_to, &pkce.challenge)
            .await
        {
            Ok(()) => {
                info!("Magic link requested");
                let secure = state.config.cookie_secure;
                (cookies::store_verifier(jar, &pkce.verifier, secure), MAGIC_LINK_SENT)
            }
            Err(e) => {
                warn!("Magic link request failed: {e}");
                (jar, MAGIC_LINK_FAILED)
            }
        }
    };

    let page = render_login(&state, next, Some(message.to_string()), false)?;
    Ok((jar, page))
}

#[derive(Debug, Deserialize)]
pub struct OAuthForm {
    pub next: Option<String>,
}

/// POST /login/oauth
pub async fn handle_oauth_start(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<OAuthForm>,
) -> Result<Response, AppError> {
    let next = safe_next(form.next.as_deref());
    let provider = state.config.oauth_provider.clone();
    let pkce = PkcePair::generate();
    let redirect_to = state.config.callback_url(&next);

    match state
        .auth
        .authorize_url(&provider, &redirect_to, &pkce.challenge)
    {
        Ok(url) => {
            let jar = cookies::store_verifier(jar, &pkce.verifier, state.config.cookie_secure);
            Ok((jar, Redirect::to(&url)).into_response())
        }
        Err(e) => {
            warn!("OAuth sign-in with {provider} could not start: {e}");
            let message = oauth_failed_message(&provider);
            Ok(render_login(&state, next, Some(message), false)?.into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub next: Option<String>,
}

/// GET /auth/callback
pub async fn handle_auth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let next = safe_next(params.next.as_deref());
    let code = params.code.as_deref().filter(|c| !c.is_empty());
    let verifier = cookies::value(&jar, CODE_VERIFIER).map(str::to_string);

    if let (Some(code), Some(verifier)) = (code, verifier) {
        match state.auth.exchange_code(code, &verifier).await {
            Ok(session) => {
                info!("Signed in user {}", session.user.id);
                let jar = cookies::store_session(jar, &session, state.config.cookie_secure);
                let jar = cookies::clear_verifier(jar);
                return (jar, Redirect::to(&next)).into_response();
            }
            Err(e) => warn!("Auth code exchange failed: {e}"),
        }
    } else {
        warn!("Auth callback without code or verifier");
    }

    (cookies::clear_verifier(jar), Redirect::to(CALLBACK_FAILED_PATH)).into_response()
}

/// POST /logout
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(token) = cookies::value(&jar, ACCESS_TOKEN) {
        if let Err(e) = state.auth.sign_out(token).await {
            warn!("Sign-out could not reach auth service: {e}");
        }
    }

    (cookies::clear_session(jar), Redirect::to(LOGIN_PATH))
}
