//! Record Store: row-level access to the `jobs` and `bullet_bank` tables.
//!
//! Every update and delete goes through an [`OwnedRow`] filter, which pairs
//! the row id with the session user's id. There is no way to address a row
//! by id alone.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::bullet::{BulletFields, BulletRow};
use crate::models::job::{JobFields, JobRow};
use crate::models::user::SessionUser;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(e.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// A row that belongs to exactly one user.
pub trait Owned {
    fn id(&self) -> Uuid;
    fn owner(&self) -> Uuid;
}

/// Ownership filter: `id = X AND owner = caller`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedRow {
    id: Uuid,
    owner: Uuid,
}

impl OwnedRow {
    /// The owner half always comes from the verified session.
    pub fn new(id: Uuid, caller: &SessionUser) -> Self {
        Self {
            id,
            owner: caller.id,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn matches<R: Owned>(&self, row: &R) -> bool {
        row.id() == self.id && row.owner() == self.owner
    }
}

/// Persistence seam for both record types.
///
/// Carried in `AppState` as `Arc<dyn RecordStore>`. Update and delete report
/// the number of rows affected; zero is not an error.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_job(&self, owner: Uuid, job: &JobFields) -> Result<JobRow, StoreError>;
    async fn update_job(&self, target: OwnedRow, job: &JobFields) -> Result<u64, StoreError>;
    async fn delete_job(&self, target: OwnedRow) -> Result<u64, StoreError>;
    /// Newest first.
    async fn list_jobs(&self, owner: Uuid) -> Result<Vec<JobRow>, StoreError>;

    async fn insert_bullet(
        &self,
        owner: Uuid,
        bullet: &BulletFields,
    ) -> Result<BulletRow, StoreError>;
    async fn update_bullet(
        &self,
        target: OwnedRow,
        bullet: &BulletFields,
    ) -> Result<u64, StoreError>;
    async fn delete_bullet(&self, target: OwnedRow) -> Result<u64, StoreError>;
    /// Newest first.
    async fn list_bullets(&self, owner: Uuid) -> Result<Vec<BulletRow>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job_owned_by(owner: Uuid) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            user_id: owner,
            company: "Acme".to_string(),
            role_title: "Engineer".to_string(),
            status: "saved".to_string(),
            location: None,
            job_url: None,
            notes: None,
            archived: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owned_row_requires_id_and_owner() {
        let alice = SessionUser {
            id: Uuid::new_v4(),
            email: None,
        };
        let bob = SessionUser {
            id: Uuid::new_v4(),
            email: None,
        };
        let row = job_owned_by(alice.id);

        assert!(OwnedRow::new(row.id, &alice).matches(&row));
        assert!(!OwnedRow::new(row.id, &bob).matches(&row));
        assert!(!OwnedRow::new(Uuid::new_v4(), &alice).matches(&row));
    }

    #[test]
    fn test_pool_exhaustion_is_unavailable() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
    }
}
