//! Machine learning model release models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published release of a machine learning model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MLModelRelease {
    #[serde(alias = "_id")]
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub download_url: String,
    pub github_url: String,
    pub name: String,
    pub published_at: DateTime<Utc>,
    pub ready: bool,
    pub size: i64,
}
