use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::debug;

use crate::actions::APP_PATH;
use crate::auth::session::CurrentUser;
use crate::errors::AppError;
use crate::gate::GateDecision;
use crate::pages::views::{DashboardPage, LandingPage};
use crate::state::AppState;

pub const SAVE_FAILED_NOTICE: &str = "Could not save your changes. Please try again.";

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub notice: Option<String>,
}

fn notice_text(code: Option<&str>) -> Option<&'static str> {
    match code? {
        "save_failed" => Some(SAVE_FAILED_NOTICE),
        _ => None,
    }
}

/// GET /
pub async fn handle_landing() -> Result<Html<String>, AppError> {
    Ok(Html(LandingPage {}.render()?))
}

/// GET /app
///
/// Served from the page cache until a mutation revalidates the path. A render
/// that overlapped a mutation is returned but not cached. Pages carrying a
/// notice are rendered fresh and not cached.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<DashboardQuery>,
) -> Result<Response, AppError> {
    let Some(user) = user else {
        let decision = GateDecision::RedirectToLogin {
            next: APP_PATH.to_string(),
        };
        let location = decision.location().unwrap_or_else(|| APP_PATH.to_string());
        return Ok(Redirect::to(&location).into_response());
    };

    let notice = notice_text(params.notice.as_deref());
    if notice.is_none() {
        if let Some(html) = state.pages.get(APP_PATH, user.id).await {
            debug!("Dashboard cache hit for user {}", user.id);
            return Ok(Html(html).into_response());
        }
    }

    let generation = state.pages.generation(APP_PATH).await;
    let jobs = state.store.list_jobs(user.id).await?;
    let bullets = state.store.list_bullets(user.id).await?;
    let html = DashboardPage::new(user.email.clone().unwrap_or_default(), notice, &jobs, &bullets)
        .render()?;

    if notice.is_none() {
        state
            .pages
            .insert(APP_PATH, user.id, generation, html.clone())
            .await;
    }

    Ok(Html(html).into_response())
}
