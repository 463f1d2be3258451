//! Sample projections, workflow tags, and read paths

use crate::error::Result;
use crate::mongo::{Db, Projection};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use std::path::{Path, PathBuf};

/// Fields returned for sample listings.
pub const LIST_PROJECTION: &[&str] = &[
    "_id",
    "created_at",
    "host",
    "isolate",
    "library_type",
    "pathoscope",
    "name",
    "nuvs",
    "ready",
    "user",
];

/// Fields returned for single-sample views.
pub const PROJECTION: &[&str] = &[
    "_id",
    "created_at",
    "library_type",
    "name",
    "pathoscope",
    "nuvs",
    "group",
    "group_read",
    "group_write",
    "all_read",
    "all_write",
    "ready",
    "user",
];

pub fn list_projection() -> Projection {
    Projection::fields(LIST_PROJECTION.iter().copied())
}

pub fn projection() -> Projection {
    Projection::fields(PROJECTION.iter().copied())
}

/// The fields needed for a rights check, without the id.
pub fn rights_projection() -> Projection {
    Projection::visibility([
        ("_id", false),
        ("group", true),
        ("group_read", true),
        ("group_write", true),
        ("all_read", true),
        ("all_write", true),
        ("user", true),
    ])
}

/// Derives the sample workflow tags from its analysis documents.
///
/// For each of the pathoscope and nuvs workflows the tag is `true` when a
/// finished analysis exists, `"ip"` when only unfinished analyses exist,
/// and `false` otherwise.
pub fn calculate_workflow_tags(analyses: &[Document]) -> Document {
    let mut pathoscope = Bson::Boolean(false);
    let mut nuvs = Bson::Boolean(false);

    for analysis in analyses {
        let ready = analysis.get_bool("ready").unwrap_or(false);
        let workflow = analysis.get_str("workflow").unwrap_or("");

        if pathoscope != Bson::Boolean(true) && workflow == "pathoscope_bowtie" {
            pathoscope = if ready {
                Bson::Boolean(true)
            } else {
                Bson::String("ip".to_string())
            };
        }

        if nuvs != Bson::Boolean(true) && workflow == "nuvs" {
            nuvs = if ready {
                Bson::Boolean(true)
            } else {
                Bson::String("ip".to_string())
            };
        }

        if pathoscope == Bson::Boolean(true) && nuvs == Bson::Boolean(true) {
            break;
        }
    }

    doc! {
        "pathoscope": pathoscope,
        "nuvs": nuvs,
    }
}

/// Recalculates the workflow tags for a sample and writes them back.
///
/// Returns the updated sample shaped by [`LIST_PROJECTION`], or `None` if
/// the sample no longer exists.
pub async fn recalculate_workflow_tags(db: &Db, sample_id: &str) -> Result<Option<Document>> {
    let analyses: Vec<Document> = db
        .analyses
        .find_projected(
            doc! { "sample.id": sample_id },
            &Projection::fields(["ready", "workflow"]),
        )
        .await?
        .try_collect()
        .await?;

    db.samples
        .find_one_and_update(
            doc! { "_id": sample_id },
            doc! { "$set": calculate_workflow_tags(&analyses) },
            Some(&list_projection()),
            false,
            false,
        )
        .await
}

/// The path of one read file under a sample or cache directory.
pub fn join_read_path(base_path: &Path, suffix: u32) -> PathBuf {
    base_path.join(format!("reads_{suffix}.fq.gz"))
}

/// The read file paths for a sample, one or two depending on pairedness.
pub fn join_read_paths(base_path: &Path, paired: bool) -> Vec<PathBuf> {
    if paired {
        vec![join_read_path(base_path, 1), join_read_path(base_path, 2)]
    } else {
        vec![join_read_path(base_path, 1)]
    }
}
