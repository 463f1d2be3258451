//! Records of trimmed sample reads keyed by their trim parameters

use crate::error::{Result, StorageError};
use crate::mongo::{base_processor, Db, Projection};
use crate::samples::join_read_paths;
use mongodb::bson::{doc, Document};
use serde_json::Value;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use virion_core::{random_alphanumeric, timestamp, CoreError};

/// Fields returned for cache listings.
pub const PROJECTION: &[&str] = &[
    "_id",
    "created_at",
    "files",
    "hash",
    "program",
    "ready",
    "sample",
];

/// The trimming program recorded when the caller does not name one.
const DEFAULT_PROGRAM: &str = "skewer-0.2.2";

pub fn projection() -> Projection {
    Projection::fields(PROJECTION.iter().copied())
}

/// Hashes a trim parameter set for cache lookup.
///
/// The digest is the SHA-1 of the canonical JSON encoding: keys sorted,
/// `", "` between items and `": "` after keys. Stored hashes were minted
/// with this encoding, so it must not change.
pub fn calculate_cache_hash(parameters: &Value) -> String {
    let mut canonical = String::new();
    write_canonical_json(parameters, &mut canonical);

    let mut hasher = Sha1::new();
    hasher.update(canonical.as_bytes());

    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

fn write_canonical_json(value: &Value, output: &mut String) {
    match value {
        Value::Null => output.push_str("null"),
        Value::Bool(true) => output.push_str("true"),
        Value::Bool(false) => output.push_str("false"),
        Value::Number(number) => output.push_str(&number.to_string()),
        Value::String(text) => write_canonical_string(text, output),
        Value::Array(items) => {
            output.push('[');

            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    output.push_str(", ");
                }

                write_canonical_json(item, output);
            }

            output.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            output.push('{');

            for (index, (key, item)) in entries.iter().enumerate() {
                if index > 0 {
                    output.push_str(", ");
                }

                write_canonical_string(key, output);
                output.push_str(": ");
                write_canonical_json(item, output);
            }

            output.push('}');
        }
    }
}

fn write_canonical_string(text: &str, output: &mut String) {
    output.push('"');

    for ch in text.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\u{8}' => output.push_str("\\b"),
            '\u{c}' => output.push_str("\\f"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            ch if (ch as u32) < 0x20 => {
                output.push_str(&format!("\\u{:04x}", ch as u32));
            }
            ch => output.push(ch),
        }
    }

    output.push('"');
}

/// Finds a reusable cache for a sample, program, and trim parameter set.
///
/// Caches flagged `missing` are never returned. The document comes back
/// id-renamed.
pub async fn find(
    db: &Db,
    sample_id: &str,
    program: &str,
    parameters: &Value,
) -> Result<Option<Document>> {
    let document = db
        .caches
        .find_one(doc! {
            "hash": calculate_cache_hash(parameters),
            "missing": false,
            "program": program,
            "sample.id": sample_id,
        })
        .await?;

    Ok(document.map(base_processor))
}

/// Gets the cache with `cache_id`, id-renamed.
pub async fn get(db: &Db, cache_id: &str) -> Result<Document> {
    let document = db.caches.find_one(doc! { "_id": cache_id }).await?;

    match document {
        Some(document) => Ok(base_processor(document)),
        None => Err(StorageError::NotFound(format!("cache {cache_id}"))),
    }
}

/// Creates a cache record for a sample and returns it id-renamed.
///
/// The id is a random 8-character string; a duplicate-key collision retries
/// with a fresh id until the insert lands.
pub async fn create(
    db: &Db,
    sample_id: &str,
    parameters: &Value,
    paired: bool,
    legacy: bool,
    program: Option<&str>,
) -> Result<Document> {
    let hash = calculate_cache_hash(parameters);
    let parameters = mongodb::bson::to_bson(parameters)?;
    let program = program.unwrap_or(DEFAULT_PROGRAM);

    loop {
        let document = doc! {
            "_id": random_alphanumeric(8, &[]),
            "created_at": timestamp(),
            "files": [],
            "hash": hash.clone(),
            "legacy": legacy,
            "missing": false,
            "paired": paired,
            "parameters": parameters.clone(),
            "program": program,
            "ready": false,
            "sample": {
                "id": sample_id,
            },
        };

        match db.caches.insert_one(document, false).await {
            Ok(inserted) => return Ok(base_processor(inserted)),
            Err(error) if error.is_duplicate_key() => continue,
            Err(error) => return Err(error),
        }
    }
}

/// Removes the cache record and its files.
///
/// A cache directory that is already gone is not an error.
pub async fn remove(db: &Db, data_path: &Path, cache_id: &str) -> Result<()> {
    db.caches.delete_one(doc! { "_id": cache_id }, false).await?;

    let path = join_cache_path(data_path, cache_id);

    let removed = tokio::task::spawn_blocking(move || virion_core::utils::rm(&path, true))
        .await
        .map_err(|err| StorageError::Io(std::io::Error::other(err)))?;

    match removed {
        Ok(_) => Ok(()),
        Err(CoreError::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error.into()),
    }
}

/// The directory holding a cache's files.
pub fn join_cache_path(data_path: &Path, cache_id: &str) -> PathBuf {
    data_path.join("caches").join(cache_id)
}

/// The read file paths for an id-renamed cache document.
///
/// Returns `None` when the document carries no id.
pub fn join_cache_read_paths(data_path: &Path, cache: &Document) -> Option<Vec<PathBuf>> {
    let cache_id = cache.get_str("id").ok()?;
    let paired = cache.get_bool("paired").unwrap_or(false);

    Some(join_read_paths(&join_cache_path(data_path, cache_id), paired))
}
