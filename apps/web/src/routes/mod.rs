pub mod health;

use axum::{
    http::Uri,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::actions::handlers as actions;
use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::gate::session_gate;
use crate::pages::handlers as pages;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::handle_landing))
        .route("/health", get(health::health_handler))
        // Sign-in
        .route("/login", get(auth::handle_login_page))
        .route("/login/magic-link", post(auth::handle_magic_link))
        .route("/login/oauth", post(auth::handle_oauth_start))
        .route("/auth/callback", get(auth::handle_auth_callback))
        .route("/logout", post(auth::handle_logout))
        // App area
        .route("/app", get(pages::handle_dashboard))
        .route("/app/jobs", post(actions::handle_create_job))
        .route("/app/jobs/update", post(actions::handle_update_job))
        .route("/app/jobs/delete", post(actions::handle_delete_job))
        .route("/app/bullets", post(actions::handle_create_bullet))
        .route("/app/bullets/update", post(actions::handle_update_bullet))
        .route("/app/bullets/delete", post(actions::handle_delete_bullet))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), session_gate))
        .with_state(state)
}
