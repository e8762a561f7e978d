use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller, as verified by the auth service.
/// Record ownership is always taken from here, never from form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}
