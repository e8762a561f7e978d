//! Session Gate: request-level redirect policy based on authentication state.
//!
//! Runs in front of every route. It resolves the session once, stores the
//! result on the request for downstream extractors, writes refreshed tokens
//! back as cookies, and redirects before any page or handler logic runs.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::auth::cookies;
use crate::auth::session::{resolve_session, ResolvedSession};
use crate::state::AppState;

pub const APP_AREA: &str = "/app";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    /// Anonymous request into the app area; `next` is where to return after
    /// sign-in.
    RedirectToLogin { next: String },
    /// Signed-in request for the login page.
    RedirectToApp,
}

impl GateDecision {
    pub fn location(&self) -> Option<String> {
        match self {
            GateDecision::Pass => None,
            GateDecision::RedirectToLogin { next } => {
                let next: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
                Some(format!("{LOGIN_PATH}?next={next}"))
            }
            GateDecision::RedirectToApp => Some(APP_AREA.to_string()),
        }
    }
}

/// `/app` itself or anything below `/app/`. `/apple` or `/application` are
/// separate routes and stay public.
pub fn is_app_area(path: &str) -> bool {
    path == APP_AREA
        || path
            .strip_prefix(APP_AREA)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Page to come back to after sign-in. Form posts return to the dashboard
/// since their action paths only accept POST.
fn return_path(method: &Method, path: &str) -> String {
    if *method == Method::GET || *method == Method::HEAD {
        path.to_string()
    } else {
        APP_AREA.to_string()
    }
}

/// Pure redirect policy. The query string of the original request is not
/// carried anywhere.
pub fn decide(method: &Method, path: &str, signed_in: bool) -> GateDecision {
    if is_app_area(path) && !signed_in {
        return GateDecision::RedirectToLogin {
            next: return_path(method, path),
        };
    }
    if path == LOGIN_PATH && signed_in {
        return GateDecision::RedirectToApp;
    }
    GateDecision::Pass
}

/// Axum middleware wrapping the whole router.
pub async fn session_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let resolved = resolve_session(state.auth.as_ref(), &jar).await;
    let path = request.uri().path().to_string();
    let decision = decide(request.method(), &path, resolved.user.is_some());
    let jar = write_back(jar, &resolved, state.config.cookie_secure);

    if let Some(location) = decision.location() {
        debug!("Session gate: {path} -> {location}");
        return (jar, Redirect::to(&location)).into_response();
    }

    request.extensions_mut().insert(resolved);
    let response = next.run(request).await;
    (jar, response).into_response()
}

fn write_back(jar: CookieJar, resolved: &ResolvedSession, secure: bool) -> CookieJar {
    match &resolved.refreshed {
        Some(session) => cookies::store_session(jar, session, secure),
        None => jar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_app_request_redirects_with_next() {
        assert_eq!(
            decide(&Method::GET, "/app/jobs", false),
            GateDecision::RedirectToLogin {
                next: "/app/jobs".to_string()
            }
        );
        assert_eq!(
            decide(&Method::GET, "/app/jobs", false).location().as_deref(),
            Some("/login?next=%2Fapp%2Fjobs")
        );
    }

    #[test]
    fn test_anonymous_form_post_returns_to_dashboard() {
        let decision = decide(&Method::POST, "/app/bullets/update", false);
        assert_eq!(
            decision,
            GateDecision::RedirectToLogin {
                next: "/app".to_string()
            }
        );
        assert_eq!(decision.location().as_deref(), Some("/login?next=%2Fapp"));
    }

    #[test]
    fn test_signed_in_app_request_passes() {
        assert_eq!(decide(&Method::GET, "/app", true), GateDecision::Pass);
        assert_eq!(decide(&Method::POST, "/app/bullets/update", true), GateDecision::Pass);
    }

    #[test]
    fn test_signed_in_login_request_goes_to_app() {
        assert_eq!(decide(&Method::GET, "/login", true), GateDecision::RedirectToApp);
        assert_eq!(
            GateDecision::RedirectToApp.location().as_deref(),
            Some("/app")
        );
    }

    #[test]
    fn test_anonymous_login_and_public_pages_pass() {
        assert_eq!(decide(&Method::GET, "/login", false), GateDecision::Pass);
        assert_eq!(decide(&Method::GET, "/", false), GateDecision::Pass);
        assert_eq!(decide(&Method::GET, "/auth/callback", false), GateDecision::Pass);
        assert_eq!(decide(&Method::POST, "/login/magic-link", true), GateDecision::Pass);
    }

    #[test]
    fn test_app_area_is_segment_bounded() {
        assert!(is_app_area("/app"));
        assert!(is_app_area("/app/"));
        assert!(is_app_area("/app/jobs/delete"));
        assert!(!is_app_area("/apple"));
        assert!(!is_app_area("/"));
        assert!(!is_app_area("/application"));
    }
}
