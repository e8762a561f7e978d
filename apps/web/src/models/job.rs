use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::Owned;

/// Pipeline stage of a tracked application. Closed set; unknown input
/// falls back to `Saved` through [`JobStatus::parse_or_default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Archived,
}

impl JobStatus {
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Saved,
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offer,
        JobStatus::Rejected,
        JobStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Saved => "saved",
            JobStatus::Applied => "applied",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
            JobStatus::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Saved => "Saved",
            JobStatus::Applied => "Applied",
            JobStatus::Interviewing => "Interviewing",
            JobStatus::Offer => "Offer",
            JobStatus::Rejected => "Rejected",
            JobStatus::Archived => "Archived",
        }
    }

    /// Exact, case-sensitive match against the six tokens. Anything else,
    /// including absence, yields `Saved`. Never an error.
    pub fn parse_or_default(raw: Option<&str>) -> JobStatus {
        raw.and_then(|value| Self::ALL.into_iter().find(|s| s.as_str() == value))
            .unwrap_or_default()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub role_title: String,
    pub status: String,
    pub location: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl JobRow {
    pub fn status(&self) -> JobStatus {
        JobStatus::parse_or_default(Some(&self.status))
    }
}

impl Owned for JobRow {
    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Uuid {
        self.user_id
    }
}

/// Writable job columns, already normalized from form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFields {
    pub company: String,
    pub role_title: String,
    pub status: JobStatus,
    pub location: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
    pub archived: bool,
}
