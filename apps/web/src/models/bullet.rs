use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::Owned;

pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BulletRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub bullet: String,
    pub impact: Option<String>,
    pub role_title: Option<String>,
    pub company: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Owned for BulletRow {
    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Uuid {
        self.user_id
    }
}

/// Writable bullet columns, already normalized from form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletFields {
    pub category: String,
    pub bullet: String,
    pub impact: Option<String>,
    pub role_title: Option<String>,
    pub company: Option<String>,
    pub skills: Vec<String>,
}
