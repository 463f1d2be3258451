//! Analysis models
//!
//! Older analysis documents predate the `updated_at` field. Both analysis
//! structs deserialize through a wire struct that falls back to `created_at`
//! when `updated_at` is absent.

use crate::models::index::IndexNested;
use crate::models::job::JobMinimal;
use crate::models::ml::MLModelRelease;
use crate::models::reference::ReferenceNested;
use crate::models::searchresult::SearchResult;
use crate::models::subtraction::SubtractionNested;
use crate::models::user::UserNested;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The sample an analysis was run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSample {
    #[serde(alias = "_id")]
    pub id: String,
}

/// The analysis representation used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnalysisMinimalWire")]
pub struct AnalysisMinimal {
    pub created_at: DateTime<Utc>,
    pub id: String,
    pub index: IndexNested,
    pub job: Option<JobMinimal>,
    pub ml: Option<MLModelRelease>,
    pub ready: bool,
    pub reference: ReferenceNested,
    pub sample: AnalysisSample,
    pub subtractions: Vec<SubtractionNested>,
    pub updated_at: DateTime<Utc>,
    pub user: UserNested,
    pub workflow: String,
}

#[derive(Deserialize)]
struct AnalysisMinimalWire {
    created_at: DateTime<Utc>,
    #[serde(alias = "_id")]
    id: String,
    index: IndexNested,
    #[serde(default)]
    job: Option<JobMinimal>,
    #[serde(default)]
    ml: Option<MLModelRelease>,
    ready: bool,
    reference: ReferenceNested,
    sample: AnalysisSample,
    subtractions: Vec<SubtractionNested>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    user: UserNested,
    workflow: String,
}

impl From<AnalysisMinimalWire> for AnalysisMinimal {
    fn from(wire: AnalysisMinimalWire) -> Self {
        Self {
            created_at: wire.created_at,
            id: wire.id,
            index: wire.index,
            job: wire.job,
            ml: wire.ml,
            ready: wire.ready,
            reference: wire.reference,
            sample: wire.sample,
            subtractions: wire.subtractions,
            updated_at: wire.updated_at.unwrap_or(wire.created_at),
            user: wire.user,
            workflow: wire.workflow,
        }
    }
}

/// A result file produced by an analysis workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFile {
    pub analysis: String,
    #[serde(default)]
    pub description: Option<String>,
    pub format: String,
    #[serde(alias = "_id")]
    pub id: i64,
    pub name: String,
    pub name_on_disk: String,
    pub size: Option<i64>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// The complete analysis representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnalysisWire")]
pub struct Analysis {
    pub created_at: DateTime<Utc>,
    pub id: String,
    pub index: IndexNested,
    pub job: Option<JobMinimal>,
    pub ml: Option<MLModelRelease>,
    pub ready: bool,
    pub reference: ReferenceNested,
    pub sample: AnalysisSample,
    pub subtractions: Vec<SubtractionNested>,
    pub updated_at: DateTime<Utc>,
    pub user: UserNested,
    pub workflow: String,
    pub files: Vec<AnalysisFile>,
    pub results: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Deserialize)]
struct AnalysisWire {
    #[serde(flatten)]
    minimal: AnalysisMinimalWire,
    files: Vec<AnalysisFile>,
    #[serde(default)]
    results: Option<HashMap<String, serde_json::Value>>,
}

impl From<AnalysisWire> for Analysis {
    fn from(wire: AnalysisWire) -> Self {
        let minimal = AnalysisMinimal::from(wire.minimal);

        Self {
            created_at: minimal.created_at,
            id: minimal.id,
            index: minimal.index,
            job: minimal.job,
            ml: minimal.ml,
            ready: minimal.ready,
            reference: minimal.reference,
            sample: minimal.sample,
            subtractions: minimal.subtractions,
            updated_at: minimal.updated_at,
            user: minimal.user,
            workflow: minimal.workflow,
            files: wire.files,
            results: wire.results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSearchResult {
    #[serde(flatten)]
    pub search: SearchResult,
    pub documents: Vec<AnalysisMinimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_analysis_json() -> serde_json::Value {
        json!({
            "_id": "analysis_1",
            "created_at": "2021-03-01T09:00:00Z",
            "index": {"id": "index_1", "version": 3},
            "job": null,
            "ready": true,
            "reference": {"id": "ref_1", "data_type": "genome", "name": "Clone"},
            "sample": {"id": "sample_1"},
            "subtractions": [],
            "user": {"id": "bob", "handle": "bob"},
            "workflow": "pathoscope_bowtie"
        })
    }

    #[test]
    fn test_updated_at_defaults_to_created_at() {
        let analysis: AnalysisMinimal =
            serde_json::from_value(minimal_analysis_json()).unwrap();

        assert_eq!(analysis.updated_at, analysis.created_at);
    }

    #[test]
    fn test_updated_at_kept_when_present() {
        let mut value = minimal_analysis_json();
        value["updated_at"] = json!("2021-04-05T12:30:00Z");

        let analysis: AnalysisMinimal = serde_json::from_value(value).unwrap();

        assert_ne!(analysis.updated_at, analysis.created_at);
        assert_eq!(
            analysis.updated_at.to_rfc3339(),
            "2021-04-05T12:30:00+00:00"
        );
    }
}
