//! Normalization of raw form submissions into typed values.
//!
//! Every helper is total: malformed input degrades to the documented default
//! instead of producing an error, so a sloppy form post never blocks a write
//! on an optional field.

use crate::models::job::JobStatus;

/// Value an HTML checkbox submits when it is ticked.
pub const CHECKED_MARKER: &str = "on";

/// Flat field-name → value mapping of one form post.
///
/// Repeated keys keep the first value, matching how browsers and most
/// form readers resolve a single-valued lookup.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pairs: Vec<(String, String)>,
}

impl FormInput {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed value of `name`; absent or blank → `None`.
    pub fn optional_string(&self, name: &str) -> Option<String> {
        optional_string(self.get(name))
    }

    pub fn job_status(&self, name: &str) -> JobStatus {
        JobStatus::parse_or_default(self.get(name))
    }

    pub fn skill_list(&self, name: &str) -> Vec<String> {
        skill_list(self.get(name))
    }

    pub fn checkbox(&self, name: &str) -> bool {
        checkbox(self.get(name))
    }
}

impl From<Vec<(String, String)>> for FormInput {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

pub fn optional_string(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits a comma-separated list, trimming each segment and dropping blanks.
/// Order is preserved and duplicates are kept.
pub fn skill_list(value: Option<&str>) -> Vec<String> {
    let Some(raw) = value else {
        return Vec::new();
    };

    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn checkbox(value: Option<&str>) -> bool {
    value == Some(CHECKED_MARKER)
}
