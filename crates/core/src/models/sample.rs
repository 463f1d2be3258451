//! Sample models

use crate::models::enums::LibraryType;
use crate::models::job::JobMinimal;
use crate::models::label::LabelNested;
use crate::models::searchresult::SearchResult;
use crate::models::subtraction::SubtractionNested;
use crate::models::upload::Upload;
use crate::models::user::UserNested;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sample reference nested in other models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleNested {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

/// Summary state of one workflow for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    Complete,
    Incompatible,
    None,
    Pending,
}

/// Per-workflow summary states for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleWorkflows {
    pub aodp: WorkflowState,
    pub nuvs: WorkflowState,
    pub pathoscope: WorkflowState,
}

/// A legacy workflow tag: `false` for never run, `true` for complete, or
/// the string `"ip"` while an analysis is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkflowTag {
    Ready(bool),
    InProgress(String),
}

/// Aggregated quality metrics for a sample's reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quality {
    pub bases: Vec<Vec<f64>>,
    pub composition: Vec<Vec<f64>>,
    pub count: i64,
    pub encoding: String,
    pub gc: f64,
    pub length: Vec<i64>,
    pub sequences: Vec<i64>,
}

/// A read file attached to a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Read {
    pub download_url: String,
    #[serde(alias = "_id")]
    pub id: i64,
    pub name: String,
    pub name_on_disk: String,
    pub sample: String,
    pub size: i64,
    pub upload: Option<Upload>,
    pub uploaded_at: DateTime<Utc>,
}

/// A trim cache embedded in a sample document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleCache {
    pub created_at: DateTime<Utc>,
    pub files: Vec<serde_json::Value>,
    #[serde(alias = "_id")]
    pub id: String,
    pub key: String,
    pub legacy: bool,
    pub missing: bool,
    pub paired: bool,
    pub quality: Quality,
    pub ready: bool,
    pub sample: SampleId,
}

/// A bare sample id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleId {
    #[serde(alias = "_id")]
    pub id: String,
}

/// The sample representation used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMinimal {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub host: String,
    pub isolate: String,
    pub job: Option<JobMinimal>,
    pub labels: Vec<LabelNested>,
    pub library_type: LibraryType,
    pub notes: String,
    pub nuvs: WorkflowTag,
    pub pathoscope: WorkflowTag,
    pub ready: bool,
    pub user: UserNested,
    pub workflows: SampleWorkflows,
}

/// The complete sample representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub host: String,
    pub isolate: String,
    pub job: Option<JobMinimal>,
    pub labels: Vec<LabelNested>,
    pub library_type: LibraryType,
    pub notes: String,
    pub nuvs: WorkflowTag,
    pub pathoscope: WorkflowTag,
    pub ready: bool,
    pub user: UserNested,
    pub workflows: SampleWorkflows,
    pub all_read: bool,
    pub all_write: bool,
    pub artifacts: Vec<serde_json::Value>,
    pub caches: Vec<SampleCache>,
    pub format: String,
    pub group: String,
    pub group_read: bool,
    pub group_write: bool,
    pub hold: bool,
    pub is_legacy: bool,
    pub locale: String,
    pub paired: bool,
    pub quality: Option<Quality>,
    pub reads: Vec<Read>,
    pub subtractions: Vec<SubtractionNested>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSearchResult {
    #[serde(flatten)]
    pub search: SearchResult,
    pub documents: Vec<SampleMinimal>,
}
