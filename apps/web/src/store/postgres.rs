use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::bullet::{BulletFields, BulletRow};
use crate::models::job::{JobFields, JobRow};
use crate::store::{OwnedRow, RecordStore, StoreError};

/// Record store backed by the hosted Postgres database.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert_job(&self, owner: Uuid, job: &JobFields) -> Result<JobRow, StoreError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (user_id, company, role_title, status, location, job_url, notes, archived)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(owner)
        .bind(&job.company)
        .bind(&job.role_title)
        .bind(job.status.as_str())
        .bind(&job.location)
        .bind(&job.job_url)
        .bind(&job.notes)
        .bind(job.archived)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted job {} for user {owner}", row.id);
        Ok(row)
    }

    async fn update_job(&self, target: OwnedRow, job: &JobFields) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET company = $3, role_title = $4, status = $5, location = $6,
                job_url = $7, notes = $8, archived = $9
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(target.id())
        .bind(target.owner())
        .bind(&job.company)
        .bind(&job.role_title)
        .bind(job.status.as_str())
        .bind(&job.location)
        .bind(&job.job_url)
        .bind(&job.notes)
        .bind(job.archived)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_job(&self, target: OwnedRow) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND user_id = $2")
            .bind(target.id())
            .bind(target.owner())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_jobs(&self, owner: Uuid) -> Result<Vec<JobRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_bullet(
        &self,
        owner: Uuid,
        bullet: &BulletFields,
    ) -> Result<BulletRow, StoreError> {
        let row = sqlx::query_as::<_, BulletRow>(
            r#"
            INSERT INTO bullet_bank
                (user_id, category, bullet, impact, role_title, company, skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(owner)
        .bind(&bullet.category)
        .bind(&bullet.bullet)
        .bind(&bullet.impact)
        .bind(&bullet.role_title)
        .bind(&bullet.company)
        .bind(&bullet.skills)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted bullet {} for user {owner}", row.id);
        Ok(row)
    }

    async fn update_bullet(
        &self,
        target: OwnedRow,
        bullet: &BulletFields,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE bullet_bank
            SET category = $3, bullet = $4, impact = $5, role_title = $6,
                company = $7, skills = $8
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(target.id())
        .bind(target.owner())
        .bind(&bullet.category)
        .bind(&bullet.bullet)
        .bind(&bullet.impact)
        .bind(&bullet.role_title)
        .bind(&bullet.company)
        .bind(&bullet.skills)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_bullet(&self, target: OwnedRow) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM bullet_bank WHERE id = $1 AND user_id = $2")
            .bind(target.id())
            .bind(target.owner())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_bullets(&self, owner: Uuid) -> Result<Vec<BulletRow>, StoreError> {
        Ok(sqlx::query_as::<_, BulletRow>(
            "SELECT * FROM bullet_bank WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }
}
