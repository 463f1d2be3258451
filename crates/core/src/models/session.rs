//! Session models

use crate::models::group::{Group, Permissions};
use crate::models::user::UserNested;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An anonymous session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalSession {
    pub created_at: DateTime<Utc>,
    pub ip: String,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub created_at: DateTime<Utc>,
    pub ip: String,
    pub token: String,
    pub groups: Vec<Group>,
    pub permissions: Permissions,
    pub force_reset: bool,
    pub user: UserNested,
}
