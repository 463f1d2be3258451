//! Instance settings model

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_hmm_slug() -> String {
    "virion/virion-hmm".to_string()
}

fn default_minimum_password_length() -> i64 {
    8
}

fn default_source_types() -> Vec<String> {
    vec!["isolate".to_string(), "strain".to_string()]
}

/// Application-wide settings stored as a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sample_group: Option<String>,
    #[serde(default = "default_true")]
    pub sample_group_read: bool,
    #[serde(default)]
    pub sample_group_write: bool,
    #[serde(default = "default_true")]
    pub sample_all_read: bool,
    #[serde(default)]
    pub sample_all_write: bool,
    #[serde(default = "default_true")]
    pub sample_unique_names: bool,
    #[serde(default = "default_hmm_slug")]
    pub hmm_slug: String,
    #[serde(default)]
    pub enable_api: bool,
    #[serde(default = "default_true")]
    pub enable_sentry: bool,
    #[serde(default = "default_minimum_password_length")]
    pub minimum_password_length: i64,
    #[serde(default = "default_source_types")]
    pub default_source_types: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_group: None,
            sample_group_read: true,
            sample_group_write: false,
            sample_all_read: true,
            sample_all_write: false,
            sample_unique_names: true,
            hmm_slug: default_hmm_slug(),
            enable_api: false,
            enable_sentry: true,
            minimum_password_length: 8,
            default_source_types: default_source_types(),
        }
    }
}
