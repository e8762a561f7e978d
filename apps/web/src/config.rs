use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub auth_url: String,
    pub auth_anon_key: String,
    /// Public origin of this app, used to build the auth callback URL.
    pub site_url: String,
    pub oauth_provider: String,
    pub cookie_secure: bool,
    pub run_migrations: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            auth_url: require_env("AUTH_URL")?
                .trim_end_matches('/')
                .to_string(),
            auth_anon_key: require_env("AUTH_ANON_KEY")?,
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            oauth_provider: std::env::var("OAUTH_PROVIDER")
                .unwrap_or_else(|_| "google".to_string()),
            cookie_secure: flag_env("COOKIE_SECURE", true)?,
            run_migrations: flag_env("RUN_MIGRATIONS", false)?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Absolute URL the auth service sends the browser back to after sign-in.
    pub fn callback_url(&self, next_path: &str) -> String {
        let next: String = url::form_urlencoded::byte_serialize(next_path.as_bytes()).collect();
        format!("{}/auth/callback?next={}", self.site_url, next)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn flag_env(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => parse_flag(&raw).with_context(|| format!("{key} must be true or false")),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/rolepilot_test".to_string(),
            auth_url: "https://auth.test".to_string(),
            auth_anon_key: "anon".to_string(),
            site_url: "http://localhost:8080".to_string(),
            oauth_provider: "google".to_string(),
            cookie_secure: false,
            run_migrations: false,
            port: 8080,
            rust_log: "debug".to_string(),
        }
    }
}
