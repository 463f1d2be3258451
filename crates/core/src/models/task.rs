//! Task models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A task reference nested in another model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNested {
    #[serde(alias = "_id")]
    pub id: i64,
}

/// A long-running maintenance task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: i64,
    pub complete: bool,
    pub context: HashMap<String, serde_json::Value>,
    pub count: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub file_size: Option<i64>,
    pub progress: i64,
    pub step: String,
    #[serde(rename = "type")]
    pub kind: String,
}

pub type TaskMinimal = Task;
