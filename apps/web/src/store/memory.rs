//! In-process record store for tests. Applies the same ownership filter as
//! the Postgres store so handler properties can be checked without a database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::models::bullet::{BulletFields, BulletRow};
use crate::models::job::{JobFields, JobRow};
use crate::store::{Owned, OwnedRow, RecordStore, StoreError};

#[derive(Default)]
struct Tables {
    jobs: Vec<JobRow>,
    bullets: Vec<BulletRow>,
    ticks: i64,
}

impl Tables {
    /// Strictly increasing timestamps so "newest first" is deterministic.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.timestamp_opt(self.ticks, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Stops one `list_jobs` call after it has read its rows.
#[derive(Default)]
pub struct ListPause {
    /// Notified once the rows are read.
    pub reached: Notify,
    /// Notify to let the call return.
    pub resume: Notify,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
    job_list_pause: Mutex<Option<Arc<ListPause>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write return `StoreError::Unavailable`.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Holds the next `list_jobs` between reading and returning its rows.
    pub fn pause_next_job_list(&self) -> Arc<ListPause> {
        let pause = Arc::new(ListPause::default());
        *self.job_list_pause.lock().unwrap() = Some(pause.clone());
        pause
    }

    pub fn jobs(&self) -> Vec<JobRow> {
        self.tables.lock().unwrap().jobs.clone()
    }

    pub fn bullets(&self) -> Vec<BulletRow> {
        self.tables.lock().unwrap().bullets.clone()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

fn apply_to_owned<R: Owned>(
    rows: &mut [R],
    target: OwnedRow,
    mut apply: impl FnMut(&mut R),
) -> u64 {
    let mut affected = 0;
    for row in rows.iter_mut().filter(|row| target.matches(&**row)) {
        apply(row);
        affected += 1;
    }
    affected
}

fn remove_owned<R: Owned>(rows: &mut Vec<R>, target: OwnedRow) -> u64 {
    let before = rows.len();
    rows.retain(|row| !target.matches(row));
    (before - rows.len()) as u64
}

fn newest_first<R: Owned + Clone>(
    rows: &[R],
    owner: Uuid,
    created_at: impl Fn(&R) -> DateTime<Utc>,
) -> Vec<R> {
    let mut owned: Vec<R> = rows.iter().filter(|r| r.owner() == owner).cloned().collect();
    owned.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
    owned
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_job(&self, owner: Uuid, job: &JobFields) -> Result<JobRow, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let row = JobRow {
            id: Uuid::new_v4(),
            user_id: owner,
            company: job.company.clone(),
            role_title: job.role_title.clone(),
            status: job.status.as_str().to_string(),
            location: job.location.clone(),
            job_url: job.job_url.clone(),
            notes: job.notes.clone(),
            archived: job.archived,
            created_at: tables.next_timestamp(),
        };
        tables.jobs.push(row.clone());
        Ok(row)
    }

    async fn update_job(&self, target: OwnedRow, job: &JobFields) -> Result<u64, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(apply_to_owned(&mut tables.jobs, target, |row| {
            row.company = job.company.clone();
            row.role_title = job.role_title.clone();
            row.status = job.status.as_str().to_string();
            row.location = job.location.clone();
            row.job_url = job.job_url.clone();
            row.notes = job.notes.clone();
            row.archived = job.archived;
        }))
    }

    async fn delete_job(&self, target: OwnedRow) -> Result<u64, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(remove_owned(&mut tables.jobs, target))
    }

    async fn list_jobs(&self, owner: Uuid) -> Result<Vec<JobRow>, StoreError> {
        let rows = {
            let tables = self.tables.lock().unwrap();
            newest_first(&tables.jobs, owner, |r| r.created_at)
        };

        let pause = self.job_list_pause.lock().unwrap().take();
        if let Some(pause) = pause {
            pause.reached.notify_one();
            pause.resume.notified().await;
        }
        Ok(rows)
    }

    async fn insert_bullet(
        &self,
        owner: Uuid,
        bullet: &BulletFields,
    ) -> Result<BulletRow, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let row = BulletRow {
            id: Uuid::new_v4(),
            user_id: owner,
            category: bullet.category.clone(),
            bullet: bullet.bullet.clone(),
            impact: bullet.impact.clone(),
            role_title: bullet.role_title.clone(),
            company: bullet.company.clone(),
            skills: bullet.skills.clone(),
            created_at: tables.next_timestamp(),
        };
        tables.bullets.push(row.clone());
        Ok(row)
    }

    async fn update_bullet(
        &self,
        target: OwnedRow,
        bullet: &BulletFields,
    ) -> Result<u64, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(apply_to_owned(&mut tables.bullets, target, |row| {
            row.category = bullet.category.clone();
            row.bullet = bullet.bullet.clone();
            row.impact = bullet.impact.clone();
            row.role_title = bullet.role_title.clone();
            row.company = bullet.company.clone();
            row.skills = bullet.skills.clone();
        }))
    }

    async fn delete_bullet(&self, target: OwnedRow) -> Result<u64, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(remove_owned(&mut tables.bullets, target))
    }

    async fn list_bullets(&self, owner: Uuid) -> Result<Vec<BulletRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(&tables.bullets, owner, |r| r.created_at))
    }
}
