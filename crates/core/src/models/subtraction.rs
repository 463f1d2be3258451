//! Subtraction models

use crate::models::job::JobMinimal;
use crate::models::sample::SampleNested;
use crate::models::searchresult::SearchResult;
use crate::models::user::UserNested;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base composition of a subtraction genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NucleotideComposition {
    pub a: f64,
    pub c: f64,
    pub g: f64,
    pub t: f64,
    pub n: f64,
}

/// A data file belonging to a subtraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtractionFile {
    pub download_url: String,
    #[serde(alias = "_id")]
    pub id: i64,
    pub name: String,
    pub size: i64,
    pub subtraction: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The id of the upload a subtraction was built from: an integer for
/// current uploads, a string for legacy ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubtractionUploadId {
    Number(i64),
    Legacy(String),
}

/// The upload a subtraction was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtractionUpload {
    #[serde(alias = "_id")]
    pub id: SubtractionUploadId,
    pub name: String,
}

/// A subtraction reference nested in other models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtractionNested {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

/// The subtraction representation used in listings and websocket messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtractionMinimal {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub count: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub file: SubtractionUpload,
    pub job: Option<JobMinimal>,
    pub nickname: String,
    pub ready: bool,
    pub user: Option<UserNested>,
}

/// The complete subtraction representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtraction {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub count: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub file: SubtractionUpload,
    pub job: Option<JobMinimal>,
    pub nickname: String,
    pub ready: bool,
    pub user: Option<UserNested>,
    pub files: Vec<SubtractionFile>,
    pub gc: Option<NucleotideComposition>,
    pub linked_samples: Vec<SampleNested>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtractionSearchResult {
    #[serde(flatten)]
    pub search: SearchResult,
    pub ready_count: i64,
    pub documents: Vec<SubtractionMinimal>,
}
