//! History change models

use crate::models::enums::HistoryMethod;
use crate::models::reference::ReferenceNested;
use crate::models::searchresult::SearchResult;
use crate::models::user::UserMinimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The index a change was built into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryIndex {
    #[serde(alias = "_id")]
    pub id: String,
    pub version: i64,
}

/// The OTU version recorded on a change. The string form holds the
/// `"removed"` sentinel written when the OTU was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryOTUVersion {
    Number(i64),
    Removed(String),
}

/// The OTU a change applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryOTU {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub version: HistoryOTUVersion,
}

/// The change representation used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMinimal {
    pub created_at: DateTime<Utc>,
    pub description: String,
    #[serde(alias = "_id")]
    pub id: String,
    pub index: HistoryIndex,
    pub method_name: HistoryMethod,
    pub otu: HistoryOTU,
    pub reference: ReferenceNested,
    pub user: UserMinimal,
}

/// The complete change representation, including the stored diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub created_at: DateTime<Utc>,
    pub description: String,
    #[serde(alias = "_id")]
    pub id: String,
    pub index: HistoryIndex,
    pub method_name: HistoryMethod,
    pub otu: HistoryOTU,
    pub reference: ReferenceNested,
    pub user: UserMinimal,
    pub diff: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySearchResult {
    #[serde(flatten)]
    pub search: SearchResult,
    pub documents: Vec<HistoryMinimal>,
}
