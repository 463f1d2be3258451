//! Group and permission models

use crate::models::user::UserNested;
use serde::{Deserialize, Serialize};

/// The permissions possessed by a user or group.
///
/// Missing fields deserialize to `false`, so partial permission documents
/// are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub cancel_job: bool,
    #[serde(default)]
    pub create_ref: bool,
    #[serde(default)]
    pub create_sample: bool,
    #[serde(default)]
    pub modify_hmm: bool,
    #[serde(default)]
    pub modify_subtraction: bool,
    #[serde(default)]
    pub remove_file: bool,
    #[serde(default)]
    pub remove_job: bool,
    #[serde(default)]
    pub upload_file: bool,
}

/// A group identifier: an integer for current groups, a string for legacy
/// ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupId {
    Number(i64),
    Legacy(String),
}

/// A minimal representation of a group for nesting in other models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMinimal {
    /// The unique ID of the group.
    #[serde(alias = "_id")]
    pub id: GroupId,

    /// The legacy ID of the group, if it predates integer ids.
    #[serde(default)]
    pub legacy_id: Option<String>,

    /// The display name of the group.
    pub name: String,
}

/// The complete group representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(alias = "_id")]
    pub id: GroupId,
    #[serde(default)]
    pub legacy_id: Option<String>,
    pub name: String,
    pub permissions: Permissions,
    pub users: Vec<UserNested>,
}
