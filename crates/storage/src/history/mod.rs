//! OTU change history and version reconstruction

pub mod diff;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use serde_json::Value;

use crate::error::{Result, StorageError};
use crate::mongo::Db;
use crate::otus;

/// The result of rebuilding an OTU at an earlier version.
#[derive(Debug, Clone)]
pub struct PatchedOtu {
    /// The joined OTU as it exists now, if it exists at all.
    pub current: Option<Document>,
    /// The OTU rebuilt at the target version, if it existed then.
    pub patched: Option<Document>,
    /// The `_id` values of the history changes that were reverted, newest
    /// first.
    pub reverted: Vec<Bson>,
}

/// Rebuilds the joined OTU `otu_id` as it was at `version`.
///
/// Changes newer than the target version are unwound newest-first by
/// applying their inverted diffs. A change whose version is the string
/// `removed` sorts above all numeric versions and is always unwound.
pub async fn patch_to_version(
    db: &Db,
    data_path: &Path,
    otu_id: &str,
    version: i64,
) -> Result<PatchedOtu> {
    let current = otus::join(db, otu_id).await?;

    let at_target = current
        .as_ref()
        .and_then(|document| document.get("version"))
        .and_then(version_number)
        .map(|value| value == version as f64)
        .unwrap_or(false);

    if at_target {
        return Ok(PatchedOtu {
            patched: current.clone(),
            current,
            reverted: Vec::new(),
        });
    }

    let mut patched = current.clone();
    let mut reverted = Vec::new();

    let mut changes = db
        .history
        .inner()
        .find(doc! { "otu.id": otu_id })
        .sort(doc! { "otu.version": -1 })
        .await?;

    while let Some(change) = changes.try_next().await? {
        let change_version = change
            .get_document("otu")
            .ok()
            .and_then(|otu| otu.get("version"))
            .cloned()
            .unwrap_or(Bson::Null);

        let removed = matches!(&change_version, Bson::String(label) if label == "removed");

        let above_target = version_number(&change_version)
            .map(|value| value > version as f64)
            .unwrap_or(false);

        if !removed && !above_target {
            break;
        }

        if let Some(id) = change.get("_id") {
            reverted.push(id.clone());
        }

        let mut change_diff = change.get("diff").cloned().unwrap_or(Bson::Null);

        // Oversized diffs are stored on disk and marked with a sentinel.
        if matches!(&change_diff, Bson::String(label) if label == "file") {
            change_diff =
                read_diff_file(data_path, otu_id, &version_label(&change_version)).await?;
        }

        match change.get_str("method_name").unwrap_or("") {
            "remove" => {
                // The diff of a removal is the full pre-image document.
                patched = match change_diff {
                    Bson::Document(document) => Some(document),
                    _ => {
                        return Err(StorageError::InvalidDiff(
                            "removal diff must be a document".to_string(),
                        ))
                    }
                };
            }
            "create" => {
                patched = None;
            }
            _ => {
                let entries = diff::parse_diff(&change_diff)?;

                let base = patched.take().ok_or_else(|| {
                    StorageError::InvalidDiff("cannot patch a missing otu".to_string())
                })?;

                patched = match diff::patch(&diff::swap(&entries), &Bson::Document(base))? {
                    Bson::Document(document) => Some(document),
                    _ => {
                        return Err(StorageError::InvalidDiff(
                            "patched otu must be a document".to_string(),
                        ))
                    }
                };
            }
        }
    }

    Ok(PatchedOtu {
        current,
        patched,
        reverted,
    })
}

/// Builds the path of the diff file for one change of one OTU.
///
/// `otu_version` is the rendered version, either a number or `removed`.
pub fn join_diff_path(data_path: &Path, otu_id: &str, otu_version: &str) -> PathBuf {
    data_path
        .join("history")
        .join(format!("{otu_id}_{otu_version}.json"))
}

/// Reads a stored diff file back into BSON.
///
/// String values under `created_at` keys are revived as datetimes at every
/// nesting level.
pub async fn read_diff_file(data_path: &Path, otu_id: &str, otu_version: &str) -> Result<Bson> {
    let path = join_diff_path(data_path, otu_id, otu_version);
    let text = tokio::fs::read_to_string(&path).await?;
    let value: Value = serde_json::from_str(&text)?;

    Ok(json_to_bson(value))
}

/// Writes a diff to its file, rendering datetimes as ISO 8601 strings.
pub async fn write_diff_file(
    data_path: &Path,
    otu_id: &str,
    otu_version: &str,
    body: &Bson,
) -> Result<()> {
    let path = join_diff_path(data_path, otu_id, otu_version);
    let text = serde_json::to_string_pretty(&bson_to_json(body))?;

    tokio::fs::write(&path, text).await?;

    Ok(())
}

fn version_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(value) => Some(*value as f64),
        Bson::Int64(value) => Some(*value as f64),
        Bson::Double(value) => Some(*value),
        _ => None,
    }
}

fn version_label(version: &Bson) -> String {
    match version {
        Bson::String(label) => label.clone(),
        Bson::Int32(value) => value.to_string(),
        Bson::Int64(value) => value.to_string(),
        other => other.to_string(),
    }
}

fn json_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(value) => Bson::Boolean(value),
        Value::Number(number) => number
            .as_i64()
            .map(Bson::Int64)
            .or_else(|| number.as_f64().map(Bson::Double))
            .unwrap_or(Bson::Null),
        Value::String(text) => Bson::String(text),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect()),
        Value::Object(map) => {
            let mut document = Document::new();

            for (key, value) in map {
                let converted = if key == "created_at" {
                    revive_created_at(value)
                } else {
                    json_to_bson(value)
                };

                document.insert(key, converted);
            }

            Bson::Document(document)
        }
    }
}

fn revive_created_at(value: Value) -> Bson {
    if let Value::String(text) = &value {
        if let Some(datetime) = parse_created_at(text) {
            return datetime;
        }
    }

    json_to_bson(value)
}

fn parse_created_at(text: &str) -> Option<Bson> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(Bson::from(datetime.with_timezone(&Utc)));
    }

    text.parse::<NaiveDateTime>()
        .ok()
        .map(|naive| Bson::from(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)))
}

fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Null => Value::Null,
        Bson::Boolean(value) => Value::Bool(*value),
        Bson::Int32(value) => Value::Number((*value as i64).into()),
        Bson::Int64(value) => Value::Number((*value).into()),
        Bson::Double(value) => serde_json::Number::from_f64(*value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::String(text) => Value::String(text.clone()),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(document) => Value::Object(
            document
                .iter()
                .map(|(key, value)| (key.clone(), bson_to_json(value)))
                .collect(),
        ),
        Bson::DateTime(datetime) => Value::String(datetime.to_chrono().to_rfc3339()),
        other => other.clone().into_relaxed_extjson(),
    }
}
