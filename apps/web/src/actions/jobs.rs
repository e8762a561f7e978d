use crate::actions::{guarded, target_row, MutationOutcome};
use crate::forms::FormInput;
use crate::models::job::JobFields;
use crate::models::user::SessionUser;
use crate::store::RecordStore;

/// Normalizes the job form. `company` and `role_title` are required;
/// everything else degrades to its default.
pub fn job_fields(form: &FormInput) -> Result<JobFields, &'static str> {
    let company = form.optional_string("company").ok_or("company")?;
    let role_title = form.optional_string("role_title").ok_or("role_title")?;

    Ok(JobFields {
        company,
        role_title,
        status: form.job_status("status"),
        location: form.optional_string("location"),
        job_url: form.optional_string("job_url"),
        notes: form.optional_string("notes"),
        archived: form.checkbox("archived"),
    })
}

pub async fn create_job(
    store: &dyn RecordStore,
    user: Option<&SessionUser>,
    form: &FormInput,
) -> MutationOutcome {
    guarded(
        user,
        |caller| Ok((caller.id, job_fields(form)?)),
        |(owner, fields)| async move {
            store.insert_job(owner, &fields).await.map(|_| 1_u64)
        },
    )
    .await
}

pub async fn update_job(
    store: &dyn RecordStore,
    user: Option<&SessionUser>,
    form: &FormInput,
) -> MutationOutcome {
    guarded(
        user,
        |caller| Ok((target_row(form, caller)?, job_fields(form)?)),
        |(target, fields)| async move { store.update_job(target, &fields).await },
    )
    .await
}

pub async fn delete_job(
    store: &dyn RecordStore,
    user: Option<&SessionUser>,
    form: &FormInput,
) -> MutationOutcome {
    guarded(
        user,
        |caller| target_row(form, caller),
        |target| async move { store.delete_job(target).await },
    )
    .await
}
