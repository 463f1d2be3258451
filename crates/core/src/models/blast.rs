//! NuVs BLAST models

use crate::models::task::TaskNested;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A NCBI BLAST run against a NuVs contig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuvsBlast {
    #[serde(alias = "_id")]
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_checked_at: DateTime<Utc>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub rid: Option<String>,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub result: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub task: Option<TaskNested>,
}
