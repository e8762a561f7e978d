use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::auth::AuthSession;

pub const ACCESS_TOKEN: &str = "rp-access-token";
pub const REFRESH_TOKEN: &str = "rp-refresh-token";
pub const CODE_VERIFIER: &str = "rp-code-verifier";

const SESSION_MAX_AGE_DAYS: i64 = 400;
const VERIFIER_MAX_AGE_MINUTES: i64 = 10;

fn base(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Stores the session tokens on the jar.
pub fn store_session(jar: CookieJar, session: &AuthSession, secure: bool) -> CookieJar {
    let mut access = base(ACCESS_TOKEN, session.access_token.clone(), secure);
    access.set_max_age(Duration::days(SESSION_MAX_AGE_DAYS));
    let mut refresh = base(REFRESH_TOKEN, session.refresh_token.clone(), secure);
    refresh.set_max_age(Duration::days(SESSION_MAX_AGE_DAYS));
    jar.add(access).add(refresh)
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_TOKEN).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN).path("/"))
}

pub fn store_verifier(jar: CookieJar, verifier: &str, secure: bool) -> CookieJar {
    let mut cookie = base(CODE_VERIFIER, verifier.to_string(), secure);
    cookie.set_max_age(Duration::minutes(VERIFIER_MAX_AGE_MINUTES));
    jar.add(cookie)
}

pub fn clear_verifier(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(CODE_VERIFIER).path("/"))
}

/// Non-empty cookie value.
pub fn value<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
}
