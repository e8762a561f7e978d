use askama::Template;

use crate::models::bullet::BulletRow;
use crate::models::job::{JobRow, JobStatus};

pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn status_options(current: JobStatus) -> Vec<StatusOption> {
    JobStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
            selected: status == current,
        })
        .collect()
}

pub struct JobView {
    pub id: String,
    pub company: String,
    pub role_title: String,
    pub status_label: &'static str,
    pub statuses: Vec<StatusOption>,
    pub location: String,
    pub job_url: String,
    pub notes: String,
    pub archived: bool,
    pub created: String,
}

impl From<&JobRow> for JobView {
    fn from(row: &JobRow) -> Self {
        let status = row.status();
        Self {
            id: row.id.to_string(),
            company: row.company.clone(),
            role_title: row.role_title.clone(),
            status_label: status.label(),
            statuses: status_options(status),
            location: row.location.clone().unwrap_or_default(),
            job_url: row.job_url.clone().unwrap_or_default(),
            notes: row.notes.clone().unwrap_or_default(),
            archived: row.archived,
            created: row.created_at.format("%b %-d, %Y").to_string(),
        }
    }
}

pub struct BulletView {
    pub id: String,
    pub category: String,
    pub bullet: String,
    pub impact: String,
    pub role_title: String,
    pub company: String,
    /// Comma-joined so the edit field re-parses to the same list.
    pub skills: String,
    pub created: String,
}

impl From<&BulletRow> for BulletView {
    fn from(row: &BulletRow) -> Self {
        Self {
            id: row.id.to_string(),
            category: row.category.clone(),
            bullet: row.bullet.clone(),
            impact: row.impact.clone().unwrap_or_default(),
            role_title: row.role_title.clone().unwrap_or_default(),
            company: row.company.clone().unwrap_or_default(),
            skills: row.skills.join(", "),
            created: row.created_at.format("%b %-d, %Y").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingPage {}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub next: String,
    pub provider_label: String,
    pub message: Option<String>,
    pub auth_failed: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub email: String,
    pub notice: Option<&'static str>,
    pub new_job_statuses: Vec<StatusOption>,
    pub jobs: Vec<JobView>,
    pub bullets: Vec<BulletView>,
}

impl DashboardPage {
    pub fn new(
        email: String,
        notice: Option<&'static str>,
        jobs: &[JobRow],
        bullets: &[BulletRow],
    ) -> Self {
        Self {
            email,
            notice,
            new_job_statuses: status_options(JobStatus::default()),
            jobs: jobs.iter().map(JobView::from).collect(),
            bullets: bullets.iter().map(BulletView::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub title: &'a str,
    pub message: &'a str,
}
