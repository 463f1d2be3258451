//! Upload models

use crate::models::searchresult::SearchResult;
use crate::models::user::UserNested;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file uploaded by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMinimal {
    #[serde(alias = "_id")]
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub name_on_disk: String,
    pub ready: bool,
    pub removed: bool,
    pub removed_at: Option<DateTime<Utc>>,
    pub reserved: bool,
    pub size: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub user: UserNested,
}

pub type Upload = UploadMinimal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSearchResult {
    #[serde(flatten)]
    pub search: SearchResult,
    pub items: Vec<UploadMinimal>,
}
