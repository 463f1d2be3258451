//! OTU models

use crate::models::history::HistoryMinimal;
use crate::models::reference::ReferenceMinimal;
use crate::models::user::UserMinimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The OTU representation used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OTUMinimal {
    pub abbreviation: String,
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub reference: ReferenceMinimal,
    pub verified: bool,
    pub version: i64,
}

/// The remote counterpart of an OTU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OTURemote {
    #[serde(alias = "_id")]
    pub id: String,
}

/// A sequence record attached to an isolate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OTUSequence {
    pub accession: String,
    pub definition: String,
    pub host: String,
    #[serde(alias = "_id")]
    pub id: String,
    pub reference: ReferenceMinimal,
    pub remote: OTURemote,
    pub segment: String,
    pub sequence: String,
}

/// An isolate grouping sequences within an OTU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OTUIsolate {
    pub default: bool,
    #[serde(alias = "_id")]
    pub id: String,
    pub sequences: Vec<OTUSequence>,
    pub source_name: String,
    pub source_type: String,
}

/// A segment slot in an OTU schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OTUSegment {
    pub molecule: String,
    pub name: String,
    pub required: bool,
}

/// Verification issues recorded against an OTU. Either a flag or a map of
/// issue details keyed by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OTUIssues {
    Flag(bool),
    Details(HashMap<String, serde_json::Value>),
}

/// The complete OTU representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OTU {
    pub abbreviation: String,
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub reference: ReferenceMinimal,
    pub verified: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub imported: bool,
    pub isolates: Vec<OTUIsolate>,
    #[serde(default)]
    pub issues: Option<OTUIssues>,
    #[serde(default)]
    pub last_indexed_version: Option<i64>,
    #[serde(default)]
    pub most_recent_change: Option<HistoryMinimal>,
    pub remote_id: OTURemote,
    pub schema: Vec<OTUSegment>,
    pub user: UserMinimal,
}
