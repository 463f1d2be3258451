//! Reference index models

use crate::models::job::JobMinimal;
use crate::models::reference::ReferenceNested;
use crate::models::searchresult::SearchResult;
use crate::models::user::UserNested;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An index reference nested in other models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexNested {
    #[serde(alias = "_id")]
    pub id: String,
    pub version: i64,
}

/// The index representation used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMinimal {
    #[serde(alias = "_id")]
    pub id: String,
    pub version: i64,
    pub change_count: i64,
    pub created_at: DateTime<Utc>,
    pub has_files: bool,
    pub job: Option<JobMinimal>,
    pub modified_otu_count: i64,
    pub reference: ReferenceNested,
    pub user: UserNested,
    pub ready: bool,
}

/// A user that contributed changes built into an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexContributor {
    #[serde(alias = "_id")]
    pub id: String,
    pub handle: String,
    pub count: i64,
}

/// An OTU whose changes are included in an index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOTU {
    pub change_count: i64,
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

/// A data file belonging to a built index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFile {
    pub download_url: String,
    #[serde(alias = "_id")]
    pub id: i64,
    pub index: String,
    pub name: String,
    pub size: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The complete index representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    #[serde(alias = "_id")]
    pub id: String,
    pub version: i64,
    pub change_count: i64,
    pub created_at: DateTime<Utc>,
    pub has_files: bool,
    pub job: Option<JobMinimal>,
    pub modified_otu_count: i64,
    pub reference: ReferenceNested,
    pub user: UserNested,
    pub ready: bool,
    pub contributors: Vec<IndexContributor>,
    pub files: Vec<IndexFile>,
    pub manifest: HashMap<String, i64>,
    pub otus: Vec<IndexOTU>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSearchResult {
    #[serde(flatten)]
    pub search: SearchResult,
    pub documents: Vec<IndexMinimal>,
    pub modified_otu_count: i64,
    pub total_otu_count: i64,
    pub change_count: i64,
}
