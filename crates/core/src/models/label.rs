//! Label models

use crate::models::validators::deserialize_hex_color;
use serde::{Deserialize, Serialize};

/// A label for categorizing samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelNested {
    #[serde(alias = "_id")]
    pub id: i64,

    /// The display color, normalized to an uppercase hex code.
    #[serde(deserialize_with = "deserialize_hex_color")]
    pub color: String,

    pub description: String,
    pub name: String,
}

/// The full label representation, including its sample count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(alias = "_id")]
    pub id: i64,
    #[serde(deserialize_with = "deserialize_hex_color")]
    pub color: String,
    pub description: String,
    pub name: String,

    /// The number of samples assigned the label.
    pub count: i64,
}

/// At this time the minimal representation is the full one.
pub type LabelMinimal = Label;
