//! Axum route handlers for the job and bullet forms.

use axum::{extract::State, response::Redirect, Form};
use tracing::{debug, error, info, warn};

use crate::actions::{bullets, jobs, MutationOutcome, APP_PATH};
use crate::auth::session::CurrentUser;
use crate::forms::FormInput;
use crate::state::AppState;

/// Where the browser lands when the store rejected a write.
pub const SAVE_FAILED_PATH: &str = "/app?notice=save_failed";

type FormPairs = Form<Vec<(String, String)>>;

/// Logs the outcome, marks the dashboard stale if the store was reached, and
/// picks the redirect. Store failures get a generic notice; the cause stays
/// in the log.
async fn finish(state: &AppState, action: &str, outcome: MutationOutcome) -> Redirect {
    match &outcome {
        MutationOutcome::Applied { rows } => info!("{action}: applied ({rows} row(s))"),
        MutationOutcome::SkippedUnauthenticated => {
            warn!("{action}: skipped, no authenticated session")
        }
        MutationOutcome::SkippedInvalid { field } => {
            debug!("{action}: skipped, missing or invalid '{field}'")
        }
        MutationOutcome::StoreFailed(e) => error!("{action}: record store failure: {e}"),
    }

    if outcome.reached_store() {
        state.pages.revalidate_path(APP_PATH).await;
    }

    match outcome {
        MutationOutcome::StoreFailed(_) => Redirect::to(SAVE_FAILED_PATH),
        _ => Redirect::to(APP_PATH),
    }
}

/// POST /app/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(pairs): FormPairs,
) -> Redirect {
    let form = FormInput::from(pairs);
    let outcome = jobs::create_job(state.store.as_ref(), user.as_ref(), &form).await;
    finish(&state, "create_job", outcome).await
}

/// POST /app/jobs/update
pub async fn handle_update_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(pairs): FormPairs,
) -> Redirect {
    let form = FormInput::from(pairs);
    let outcome = jobs::update_job(state.store.as_ref(), user.as_ref(), &form).await;
    finish(&state, "update_job", outcome).await
}

/// POST /app/jobs/delete
pub async fn handle_delete_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(pairs): FormPairs,
) -> Redirect {
    let form = FormInput::from(pairs);
    let outcome = jobs::delete_job(state.store.as_ref(), user.as_ref(), &form).await;
    finish(&state, "delete_job", outcome).await
}

/// POST /app/bullets
pub async fn handle_create_bullet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(pairs): FormPairs,
) -> Redirect {
    let form = FormInput::from(pairs);
    let outcome = bullets::create_bullet(state.store.as_ref(), user.as_ref(), &form).await;
    finish(&state, "create_bullet", outcome).await
}

/// POST /app/bullets/update
pub async fn handle_update_bullet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(pairs): FormPairs,
) -> Redirect {
    let form = FormInput::from(pairs);
    let outcome = bullets::update_bullet(state.store.as_ref(), user.as_ref(), &form).await;
    finish(&state, "update_bullet", outcome).await
}

/// POST /app/bullets/delete
pub async fn handle_delete_bullet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(pairs): FormPairs,
) -> Redirect {
    let form = FormInput::from(pairs);
    let outcome = bullets::delete_bullet(state.store.as_ref(), user.as_ref(), &form).await;
    finish(&state, "delete_bullet", outcome).await
}
