use crate::actions::{guarded, target_row, MutationOutcome};
use crate::forms::FormInput;
use crate::models::bullet::{BulletFields, DEFAULT_CATEGORY};
use crate::models::user::SessionUser;
use crate::store::RecordStore;

/// Normalizes the bullet form. Only the bullet text is required.
pub fn bullet_fields(form: &FormInput) -> Result<BulletFields, &'static str> {
    let bullet = form.optional_string("bullet").ok_or("bullet")?;

    Ok(BulletFields {
        category: form
            .optional_string("category")
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        bullet,
        impact: form.optional_string("impact"),
        role_title: form.optional_string("role_title"),
        company: form.optional_string("company"),
        skills: form.skill_list("skills"),
    })
}

pub async fn create_bullet(
    store: &dyn RecordStore,
    user: Option<&SessionUser>,
    form: &FormInput,
) -> MutationOutcome {
    guarded(
        user,
        |caller| Ok((caller.id, bullet_fields(form)?)),
        |(owner, fields)| async move {
            store.insert_bullet(owner, &fields).await.map(|_| 1_u64)
        },
    )
    .await
}

pub async fn update_bullet(
    store: &dyn RecordStore,
    user: Option<&SessionUser>,
    form: &FormInput,
) -> MutationOutcome {
    guarded(
        user,
        |caller| Ok((target_row(form, caller)?, bullet_fields(form)?)),
        |(target, fields)| async move { store.update_bullet(target, &fields).await },
    )
    .await
}

pub async fn delete_bullet(
    store: &dyn RecordStore,
    user: Option<&SessionUser>,
    form: &FormInput,
) -> MutationOutcome {
    guarded(
        user,
        |caller| target_row(form, caller),
        |target| async move { store.delete_bullet(target).await },
    )
    .await
}
