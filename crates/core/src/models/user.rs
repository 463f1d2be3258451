//! User models

use crate::models::enums::AdministratorRole;
use crate::models::group::{GroupMinimal, Permissions};
use crate::models::searchresult::SearchResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A minimal representation of a user for nesting in other models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNested {
    /// The unique ID of the user.
    #[serde(alias = "_id")]
    pub id: String,

    /// The user's handle.
    pub handle: String,
}

/// Identity fields for users backed by Azure AD B2C.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserB2C {
    pub display_name: Option<String>,
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub oid: String,
}

/// The user representation used in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMinimal {
    #[serde(alias = "_id")]
    pub id: String,
    pub handle: String,
    pub active: bool,
    pub b2c: Option<UserB2C>,
    pub b2c_display_name: Option<String>,
    pub b2c_family_name: Option<String>,
    pub b2c_given_name: Option<String>,
    pub b2c_oid: Option<String>,
}

/// The complete user representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub handle: String,
    pub active: bool,
    pub b2c: Option<UserB2C>,
    pub b2c_display_name: Option<String>,
    pub b2c_family_name: Option<String>,
    pub b2c_given_name: Option<String>,
    pub b2c_oid: Option<String>,
    pub administrator_role: Option<AdministratorRole>,
    pub force_reset: bool,
    pub groups: Vec<GroupMinimal>,
    pub last_password_change: DateTime<Utc>,
    pub permissions: Permissions,
    pub primary_group: Option<GroupMinimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSearchResult {
    #[serde(flatten)]
    pub search: SearchResult,
    pub items: Vec<User>,
}
