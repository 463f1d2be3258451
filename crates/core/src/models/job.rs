//! Job models

use crate::models::searchresult::SearchResult;
use crate::models::user::UserNested;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Cancelled,
    Complete,
    Error,
    Preparing,
    Running,
    Timeout,
    Terminated,
    Waiting,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Cancelled => "cancelled",
            JobState::Complete => "complete",
            JobState::Error => "error",
            JobState::Preparing => "preparing",
            JobState::Running => "running",
            JobState::Timeout => "timeout",
            JobState::Terminated => "terminated",
            JobState::Waiting => "waiting",
        };

        write!(f, "{name}")
    }
}

/// An error that ended a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobError {
    pub details: Vec<String>,
    pub traceback: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The ping status of an acquired job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPing {
    /// The time the job was last pinged.
    pub pinged_at: DateTime<Utc>,
}

/// One entry in a job's status record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    pub error: Option<JobError>,
    pub progress: i64,
    #[serde(default)]
    pub stage: Option<String>,
    pub state: JobState,
    #[serde(default)]
    pub step_description: Option<String>,
    #[serde(default)]
    pub step_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A job reference nested in another model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobNested {
    #[serde(alias = "_id")]
    pub id: String,
}

/// The job representation used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMinimal {
    #[serde(alias = "_id")]
    pub id: String,

    /// Whether the job has been archived.
    pub archived: bool,

    /// The time the job was created.
    pub created_at: DateTime<Utc>,

    /// The progress of the job as a percentage from 0 to 100.
    pub progress: i64,

    /// The current stage of the job.
    pub stage: Option<String>,

    /// The current state of the job.
    pub state: JobState,

    /// The user that created the job.
    pub user: UserNested,

    /// The workflow the job runs.
    pub workflow: String,
}

/// The complete job representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(alias = "_id")]
    pub id: String,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub progress: i64,
    pub stage: Option<String>,
    pub state: JobState,
    pub user: UserNested,
    pub workflow: String,

    /// Whether the job has been acquired by a worker.
    #[serde(default)]
    pub acquired: bool,

    /// The arguments used to run the job.
    pub args: HashMap<String, serde_json::Value>,

    /// The status record of the job.
    pub status: Vec<JobStatus>,

    /// The ping status; `None` until a worker acquires the job.
    pub ping: Option<JobPing>,
}

/// A job returned from acquisition, carrying its one-time worker key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAcquired {
    #[serde(alias = "_id")]
    pub id: String,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub progress: i64,
    pub stage: Option<String>,
    pub state: JobState,
    pub user: UserNested,
    pub workflow: String,
    #[serde(default)]
    pub acquired: bool,
    pub args: HashMap<String, serde_json::Value>,
    pub status: Vec<JobStatus>,
    pub ping: Option<JobPing>,

    /// Proves the identity of the worker in later requests. Returned once.
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSearchResult {
    #[serde(flatten)]
    pub search: SearchResult,
    pub counts: HashMap<String, serde_json::Value>,
    pub documents: Vec<JobMinimal>,
}
