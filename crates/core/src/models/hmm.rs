//! HMM models

use crate::models::searchresult::SearchResult;
use crate::models::task::Task;
use crate::models::user::UserNested;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An installed HMM data release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HMMInstalled {
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub filename: String,
    pub html_url: String,
    #[serde(alias = "_id")]
    pub id: i64,
    pub name: String,
    pub newer: bool,
    pub published_at: DateTime<Utc>,
    pub ready: bool,
    pub size: i64,
    pub user: UserNested,
}

/// An available HMM data release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HMMRelease {
    pub body: String,
    pub content_type: String,
    pub download_url: String,
    pub etag: String,
    pub filename: String,
    pub html_url: String,
    #[serde(alias = "_id")]
    pub id: i64,
    pub name: String,
    pub newer: bool,
    pub published_at: DateTime<Utc>,
    pub retrieved_at: DateTime<Utc>,
    pub size: i64,
}

/// Install state for the HMM dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HMMStatus {
    pub errors: Vec<String>,
    pub installed: Option<HMMInstalled>,
    pub release: Option<HMMRelease>,
    pub task: Option<Task>,
    pub updating: bool,
}

/// The profile representation used in listings. `names` holds at most the
/// three most common names among the profile's entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HMMMinimal {
    #[serde(alias = "_id")]
    pub id: String,
    pub cluster: i64,
    pub count: i64,
    pub families: HashMap<String, i64>,
    pub names: Vec<String>,
}

/// An annotated sequence included in a profile's cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HMMSequenceEntry {
    pub accession: String,
    pub gi: String,
    pub name: String,
    pub organism: String,
}

/// The complete profile representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HMM {
    #[serde(alias = "_id")]
    pub id: String,
    pub cluster: i64,
    pub count: i64,
    pub families: HashMap<String, i64>,
    pub names: Vec<String>,
    pub entries: Vec<HMMSequenceEntry>,
    pub genera: HashMap<String, i64>,
    pub length: i64,
    pub mean_entropy: f64,
    pub total_entropy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HMMSearchResult {
    #[serde(flatten)]
    pub search: SearchResult,
    pub documents: Vec<HMMMinimal>,
    pub status: HashMap<String, serde_json::Value>,
}
