//! Mutation handlers: one form post, one row written.
//!
//! Each handler resolves the caller, normalizes the form, and performs a
//! single insert/update/delete. Nothing here returns an HTTP error; the
//! outcome is logged and the browser is sent back to the dashboard.

use std::future::Future;

use uuid::Uuid;

use crate::forms::FormInput;
use crate::models::user::SessionUser;
use crate::store::{OwnedRow, StoreError};

pub mod bullets;
pub mod handlers;
pub mod jobs;

/// Page that displays jobs and bullets; marked stale after every write.
pub const APP_PATH: &str = "/app";

#[derive(Debug)]
pub enum MutationOutcome {
    /// The write ran. `rows` is 0 when the target id is unknown or not owned.
    Applied { rows: u64 },
    SkippedUnauthenticated,
    SkippedInvalid { field: &'static str },
    StoreFailed(StoreError),
}

impl MutationOutcome {
    /// Whether a write was attempted against the record store.
    pub fn reached_store(&self) -> bool {
        matches!(
            self,
            MutationOutcome::Applied { .. } | MutationOutcome::StoreFailed(_)
        )
    }
}

/// Runs the steps every handler shares, in order: authenticate, validate,
/// write once. `validate` sees the verified caller so owner ids are taken
/// from the session only.
pub(crate) async fn guarded<T, W, Fut>(
    user: Option<&SessionUser>,
    validate: impl FnOnce(&SessionUser) -> Result<T, &'static str>,
    write: W,
) -> MutationOutcome
where
    W: FnOnce(T) -> Fut,
    Fut: Future<Output = Result<u64, StoreError>>,
{
    let Some(caller) = user else {
        return MutationOutcome::SkippedUnauthenticated;
    };

    let planned = match validate(caller) {
        Ok(planned) => planned,
        Err(field) => return MutationOutcome::SkippedInvalid { field },
    };

    match write(planned).await {
        Ok(rows) => MutationOutcome::Applied { rows },
        Err(e) => MutationOutcome::StoreFailed(e),
    }
}

/// Ownership filter for the row named by the form's `id` field.
pub(crate) fn target_row(
    form: &FormInput,
    caller: &SessionUser,
) -> Result<OwnedRow, &'static str> {
    let raw = form.optional_string("id").ok_or("id")?;
    let id = Uuid::parse_str(&raw).map_err(|_| "id")?;
    Ok(OwnedRow::new(id, caller))
}
