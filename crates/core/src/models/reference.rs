//! Reference models

use crate::models::searchresult::SearchResult;
use crate::models::task::Task;
use crate::models::user::UserMinimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The reference another reference was cloned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceClonedFrom {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

/// The kind of sequence data a reference holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceDataType {
    Barcode,
    Genome,
}

/// A user or group entry with per-reference rights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub handle: String,
    pub active: bool,
    pub b2c: Option<crate::models::user::UserB2C>,
    pub b2c_display_name: Option<String>,
    pub b2c_family_name: Option<String>,
    pub b2c_given_name: Option<String>,
    pub b2c_oid: Option<String>,
    pub count: i64,
    pub build: bool,
    pub created_at: DateTime<Utc>,
    pub modify: bool,
    pub modify_otu: bool,
    pub remove: bool,
}

/// The remote repository a reference tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRemotesFrom {
    pub errors: Vec<serde_json::Value>,
    pub slug: String,
}

/// An installed remote reference release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceInstalled {
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
    pub user: UserMinimal,
}

/// An available remote reference release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRelease {
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

/// A completed index build belonging to a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceBuild {
    pub created_at: DateTime<Utc>,
    #[serde(alias = "_id")]
    pub id: String,
    pub version: i64,
    pub user: UserMinimal,
    pub has_json: bool,
}

/// A reference pointer nested in other models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceNested {
    #[serde(alias = "_id")]
    pub id: String,
}

/// The reference representation used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMinimal {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub cloned_from: Option<ReferenceClonedFrom>,
    pub created_at: DateTime<Utc>,
    pub data_type: ReferenceDataType,
    pub groups: Vec<ReferenceUser>,
    #[serde(default)]
    pub installed: Option<ReferenceInstalled>,
    pub internal_control: String,
    pub latest_build: ReferenceBuild,
    pub name: String,
    pub organism: String,
    pub otu_count: i64,
    #[serde(default)]
    pub release: Option<ReferenceRelease>,
    #[serde(default)]
    pub remotes_from: Option<ReferenceRemotesFrom>,
    pub task: Task,
    #[serde(default)]
    pub updating: Option<bool>,
    pub unbuilt_change_count: i64,
    pub user: UserMinimal,
    pub users: Vec<ReferenceUser>,
}

/// The complete reference representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub cloned_from: Option<ReferenceClonedFrom>,
    pub created_at: DateTime<Utc>,
    pub data_type: ReferenceDataType,
    pub groups: Vec<ReferenceUser>,
    #[serde(default)]
    pub installed: Option<ReferenceInstalled>,
    pub internal_control: String,
    pub latest_build: ReferenceBuild,
    pub name: String,
    pub organism: String,
    pub otu_count: i64,
    #[serde(default)]
    pub release: Option<ReferenceRelease>,
    #[serde(default)]
    pub remotes_from: Option<ReferenceRemotesFrom>,
    pub task: Task,
    #[serde(default)]
    pub updating: Option<bool>,
    pub unbuilt_change_count: i64,
    pub user: UserMinimal,
    pub users: Vec<ReferenceUser>,
    pub contributors: Vec<ReferenceUser>,
    pub description: String,
    pub restrict_source_types: bool,
    pub source_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSearchResult {
    #[serde(flatten)]
    pub search: SearchResult,
    pub documents: Vec<ReferenceMinimal>,
    pub official_installed: bool,
}
