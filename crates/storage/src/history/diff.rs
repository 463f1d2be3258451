//! Structural diffs over BSON values
//!
//! The on-disk format is a list of `[op, path, payload]` entries. `op` is
//! one of `add`, `change`, `remove`. A path is either a dotted string or an
//! array of keys and indices; the empty string and the empty array both
//! address the root. `change` carries an `[old, new]` pair; `add` and
//! `remove` carry a list of `[key-or-index, value]` pairs.

use crate::error::{Result, StorageError};
use mongodb::bson::Bson;

/// One component of a diff path.
///
/// String keys coming from dotted paths may still address arrays; they are
/// parsed as indices when the container they hit is an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathKey {
    Key(String),
    Index(usize),
}

impl PathKey {
    fn as_index(&self) -> Option<usize> {
        match self {
            PathKey::Index(index) => Some(*index),
            PathKey::Key(key) => key.parse().ok(),
        }
    }

    fn as_map_key(&self) -> Option<&str> {
        match self {
            PathKey::Key(key) => Some(key),
            PathKey::Index(_) => None,
        }
    }
}

/// One entry of a structural diff.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffEntry {
    Add {
        path: Vec<PathKey>,
        items: Vec<(PathKey, Bson)>,
    },
    Remove {
        path: Vec<PathKey>,
        items: Vec<(PathKey, Bson)>,
    },
    Change {
        path: Vec<PathKey>,
        old: Bson,
        new: Bson,
    },
}

/// Computes the diff turning `first` into `second`.
///
/// Removed array indices are listed high-to-low so they can be deleted in
/// payload order without shifting later entries.
pub fn diff(first: &Bson, second: &Bson) -> Vec<DiffEntry> {
    let mut entries = Vec::new();
    diff_node(first, second, &mut Vec::new(), &mut entries);

    entries
}

fn diff_node(first: &Bson, second: &Bson, node: &mut Vec<PathKey>, entries: &mut Vec<DiffEntry>) {
    match (first, second) {
        (Bson::Document(a), Bson::Document(b)) => {
            for (key, first_value) in a {
                if let Some(second_value) = b.get(key) {
                    node.push(PathKey::Key(key.clone()));
                    diff_node(first_value, second_value, node, entries);
                    node.pop();
                }
            }

            let added: Vec<(PathKey, Bson)> = b
                .iter()
                .filter(|(key, _)| !a.contains_key(key))
                .map(|(key, value)| (PathKey::Key(key.clone()), value.clone()))
                .collect();

            if !added.is_empty() {
                entries.push(DiffEntry::Add {
                    path: node.clone(),
                    items: added,
                });
            }

            let removed: Vec<(PathKey, Bson)> = a
                .iter()
                .filter(|(key, _)| !b.contains_key(key))
                .map(|(key, value)| (PathKey::Key(key.clone()), value.clone()))
                .collect();

            if !removed.is_empty() {
                entries.push(DiffEntry::Remove {
                    path: node.clone(),
                    items: removed,
                });
            }
        }
        (Bson::Array(a), Bson::Array(b)) => {
            let common = a.len().min(b.len());

            for index in 0..common {
                node.push(PathKey::Index(index));
                diff_node(&a[index], &b[index], node, entries);
                node.pop();
            }

            if b.len() > common {
                entries.push(DiffEntry::Add {
                    path: node.clone(),
                    items: (common..b.len())
                        .map(|index| (PathKey::Index(index), b[index].clone()))
                        .collect(),
                });
            }

            if a.len() > common {
                entries.push(DiffEntry::Remove {
                    path: node.clone(),
                    items: (common..a.len())
                        .rev()
                        .map(|index| (PathKey::Index(index), a[index].clone()))
                        .collect(),
                });
            }
        }
        (first, second) => {
            if !values_equal(first, second) {
                entries.push(DiffEntry::Change {
                    path: node.clone(),
                    old: first.clone(),
                    new: second.clone(),
                });
            }
        }
    }
}

/// Numeric values compare by value so an integer-width change is not a diff.
fn values_equal(first: &Bson, second: &Bson) -> bool {
    if let (Some(a), Some(b)) = (as_number(first), as_number(second)) {
        return a == b;
    }

    first == second
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(value) => Some(*value as f64),
        Bson::Int64(value) => Some(*value as f64),
        Bson::Double(value) => Some(*value),
        _ => None,
    }
}

/// Applies `entries` in order to a copy of `target`.
pub fn patch(entries: &[DiffEntry], target: &Bson) -> Result<Bson> {
    let mut patched = target.clone();

    for entry in entries {
        apply_entry(entry, &mut patched)?;
    }

    Ok(patched)
}

/// Inverts a diff so it applies in the opposite direction.
///
/// Add and remove payloads are reversed so inverted array deletions still
/// run high-to-low.
pub fn swap(entries: &[DiffEntry]) -> Vec<DiffEntry> {
    entries
        .iter()
        .map(|entry| match entry {
            DiffEntry::Add { path, items } => DiffEntry::Remove {
                path: path.clone(),
                items: items.iter().rev().cloned().collect(),
            },
            DiffEntry::Remove { path, items } => DiffEntry::Add {
                path: path.clone(),
                items: items.iter().rev().cloned().collect(),
            },
            DiffEntry::Change { path, old, new } => DiffEntry::Change {
                path: path.clone(),
                old: new.clone(),
                new: old.clone(),
            },
        })
        .collect()
}

fn apply_entry(entry: &DiffEntry, target: &mut Bson) -> Result<()> {
    match entry {
        DiffEntry::Add { path, items } => {
            for (key, value) in items {
                let dest = lookup_mut(target, path)?;

                match dest {
                    Bson::Document(document) => {
                        let key = key
                            .as_map_key()
                            .ok_or_else(|| invalid("integer key addressing a document"))?;

                        document.insert(key, value.clone());
                    }
                    Bson::Array(entries) => {
                        let index = key
                            .as_index()
                            .ok_or_else(|| invalid("non-integer index addressing an array"))?;

                        // Past-the-end inserts append.
                        entries.insert(index.min(entries.len()), value.clone());
                    }
                    _ => return Err(invalid("cannot add into a scalar")),
                }
            }
        }
        DiffEntry::Remove { path, items } => {
            for (key, _) in items {
                let dest = lookup_mut(target, path)?;

                match dest {
                    Bson::Document(document) => {
                        let key = key
                            .as_map_key()
                            .ok_or_else(|| invalid("integer key addressing a document"))?;

                        if document.remove(key).is_none() {
                            return Err(invalid(format!("no field {key} to remove")));
                        }
                    }
                    Bson::Array(entries) => {
                        let index = key
                            .as_index()
                            .ok_or_else(|| invalid("non-integer index addressing an array"))?;

                        if index >= entries.len() {
                            return Err(invalid(format!("no element {index} to remove")));
                        }

                        entries.remove(index);
                    }
                    _ => return Err(invalid("cannot remove from a scalar")),
                }
            }
        }
        DiffEntry::Change { path, new, .. } => {
            let (last, parent) = path
                .split_last()
                .ok_or_else(|| invalid("change entry with an empty path"))?;

            let dest = lookup_mut(target, parent)?;

            match dest {
                Bson::Document(document) => {
                    let key = last
                        .as_map_key()
                        .ok_or_else(|| invalid("integer key addressing a document"))?;

                    document.insert(key, new.clone());
                }
                Bson::Array(entries) => {
                    let index = last
                        .as_index()
                        .ok_or_else(|| invalid("non-integer index addressing an array"))?;

                    let slot = entries
                        .get_mut(index)
                        .ok_or_else(|| invalid(format!("no element {index} to change")))?;

                    *slot = new.clone();
                }
                _ => return Err(invalid("cannot change a value inside a scalar")),
            }
        }
    }

    Ok(())
}

fn lookup_mut<'a>(root: &'a mut Bson, path: &[PathKey]) -> Result<&'a mut Bson> {
    let mut value = root;

    for key in path {
        value = match value {
            Bson::Document(document) => {
                let key = key
                    .as_map_key()
                    .ok_or_else(|| invalid("integer key addressing a document"))?;

                document
                    .get_mut(key)
                    .ok_or_else(|| invalid(format!("path component {key} not found")))?
            }
            Bson::Array(entries) => {
                let index = key
                    .as_index()
                    .ok_or_else(|| invalid("non-integer index addressing an array"))?;

                entries
                    .get_mut(index)
                    .ok_or_else(|| invalid(format!("path index {index} out of range")))?
            }
            _ => return Err(invalid("path descends into a scalar")),
        };
    }

    Ok(value)
}

/// Parses a stored BSON diff into typed entries.
pub fn parse_diff(diff: &Bson) -> Result<Vec<DiffEntry>> {
    let entries = diff
        .as_array()
        .ok_or_else(|| invalid("diff must be an array"))?;

    entries.iter().map(parse_entry).collect()
}

fn parse_entry(entry: &Bson) -> Result<DiffEntry> {
    let parts = entry
        .as_array()
        .ok_or_else(|| invalid("diff entry must be an array"))?;

    if parts.len() != 3 {
        return Err(invalid("diff entry must have three elements"));
    }

    let op = parts[0]
        .as_str()
        .ok_or_else(|| invalid("diff entry op must be a string"))?;

    let path = parse_path(&parts[1])?;

    match op {
        "add" => Ok(DiffEntry::Add {
            path,
            items: parse_items(&parts[2])?,
        }),
        "remove" => Ok(DiffEntry::Remove {
            path,
            items: parse_items(&parts[2])?,
        }),
        "change" => {
            let pair = parts[2]
                .as_array()
                .ok_or_else(|| invalid("change payload must be an array"))?;

            if pair.len() != 2 {
                return Err(invalid("change payload must be an [old, new] pair"));
            }

            Ok(DiffEntry::Change {
                path,
                old: pair[0].clone(),
                new: pair[1].clone(),
            })
        }
        other => Err(invalid(format!("unknown diff op {other}"))),
    }
}

fn parse_path(path: &Bson) -> Result<Vec<PathKey>> {
    match path {
        Bson::String(dotted) if dotted.is_empty() => Ok(Vec::new()),
        Bson::String(dotted) => Ok(dotted
            .split('.')
            .map(|part| PathKey::Key(part.to_string()))
            .collect()),
        Bson::Array(parts) => parts.iter().map(parse_key).collect(),
        _ => Err(invalid("diff path must be a string or an array")),
    }
}

fn parse_key(key: &Bson) -> Result<PathKey> {
    match key {
        Bson::String(key) => Ok(PathKey::Key(key.clone())),
        Bson::Int32(index) => usize::try_from(*index)
            .map(PathKey::Index)
            .map_err(|_| invalid("negative index in diff path")),
        Bson::Int64(index) => usize::try_from(*index)
            .map(PathKey::Index)
            .map_err(|_| invalid("negative index in diff path")),
        _ => Err(invalid("diff key must be a string or an integer")),
    }
}

fn parse_items(payload: &Bson) -> Result<Vec<(PathKey, Bson)>> {
    let items = payload
        .as_array()
        .ok_or_else(|| invalid("add/remove payload must be an array"))?;

    items
        .iter()
        .map(|item| {
            let pair = item
                .as_array()
                .ok_or_else(|| invalid("payload item must be a [key, value] pair"))?;

            if pair.len() != 2 {
                return Err(invalid("payload item must be a [key, value] pair"));
            }

            Ok((parse_key(&pair[0])?, pair[1].clone()))
        })
        .collect()
}

/// Serializes typed entries back to the stored form, with array paths.
pub fn diff_to_bson(entries: &[DiffEntry]) -> Bson {
    Bson::Array(entries.iter().map(entry_to_bson).collect())
}

fn entry_to_bson(entry: &DiffEntry) -> Bson {
    match entry {
        DiffEntry::Add { path, items } => Bson::Array(vec![
            Bson::String("add".to_string()),
            path_to_bson(path),
            items_to_bson(items),
        ]),
        DiffEntry::Remove { path, items } => Bson::Array(vec![
            Bson::String("remove".to_string()),
            path_to_bson(path),
            items_to_bson(items),
        ]),
        DiffEntry::Change { path, old, new } => Bson::Array(vec![
            Bson::String("change".to_string()),
            path_to_bson(path),
            Bson::Array(vec![old.clone(), new.clone()]),
        ]),
    }
}

fn path_to_bson(path: &[PathKey]) -> Bson {
    Bson::Array(path.iter().map(key_to_bson).collect())
}

fn key_to_bson(key: &PathKey) -> Bson {
    match key {
        PathKey::Key(key) => Bson::String(key.clone()),
        PathKey::Index(index) => Bson::Int64(*index as i64),
    }
}

fn items_to_bson(items: &[(PathKey, Bson)]) -> Bson {
    Bson::Array(
        items
            .iter()
            .map(|(key, value)| Bson::Array(vec![key_to_bson(key), value.clone()]))
            .collect(),
    )
}

fn invalid(reason: impl Into<String>) -> StorageError {
    StorageError::InvalidDiff(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{bson, doc};

    fn before() -> Bson {
        bson!({
            "_id": "6116cba1",
            "abbreviation": "PVF",
            "name": "Prunus virus F",
            "version": 0,
            "isolates": [
                {
                    "id": "cab8b360",
                    "default": true,
                    "sequences": [
                        { "_id": "KX269872", "sequence": "ACGT" },
                    ],
                },
            ],
        })
    }

    fn after() -> Bson {
        bson!({
            "_id": "6116cba1",
            "abbreviation": "TST",
            "name": "Prunus virus F",
            "version": 1,
            "schema": [],
            "isolates": [
                {
                    "id": "cab8b360",
                    "default": false,
                    "sequences": [
                        { "_id": "KX269872", "sequence": "ACGT" },
                        { "_id": "KX269873", "sequence": "TGCA" },
                    ],
                },
                { "id": "1d95e3fa", "default": false, "sequences": [] },
            ],
        })
    }

    #[test]
    fn test_diff_patch_round_trip() {
        let entries = diff(&before(), &after());

        assert_eq!(patch(&entries, &before()).unwrap(), after());
    }

    #[test]
    fn test_swap_reverts() {
        let entries = diff(&before(), &after());
        let swapped = swap(&entries);

        assert_eq!(patch(&swapped, &after()).unwrap(), before());
    }

    #[test]
    fn test_diff_entry_shapes() {
        let entries = diff(&before(), &after());

        assert!(entries.iter().any(|entry| matches!(
            entry,
            DiffEntry::Change { path, .. }
                if *path == vec![PathKey::Key("abbreviation".to_string())]
        )));

        assert!(entries.iter().any(|entry| matches!(
            entry,
            DiffEntry::Add { path, items }
                if path.is_empty()
                    && items.iter().any(|(key, _)| *key == PathKey::Key("schema".to_string()))
        )));
    }

    #[test]
    fn test_removed_indices_run_high_to_low() {
        let first = bson!([1, 2, 3, 4, 5]);
        let second = bson!([1, 2, 3]);

        let entries = diff(&first, &second);

        match &entries[0] {
            DiffEntry::Remove { items, .. } => {
                let indices: Vec<_> = items.iter().map(|(key, _)| key.clone()).collect();
                assert_eq!(indices, vec![PathKey::Index(4), PathKey::Index(3)]);
            }
            other => panic!("expected a remove entry, got {other:?}"),
        }

        assert_eq!(patch(&entries, &first).unwrap(), second);
        assert_eq!(patch(&swap(&entries), &second).unwrap(), first);
    }

    #[test]
    fn test_patch_accepts_dotted_paths() {
        let stored = bson!([
            ["change", "abbreviation", ["PVF", "TST"]],
            ["add", "", [["schema", []]]],
        ]);

        let entries = parse_diff(&stored).unwrap();

        let patched = patch(&entries, &bson!({ "abbreviation": "PVF" })).unwrap();

        assert_eq!(patched, bson!({ "abbreviation": "TST", "schema": [] }));
    }

    #[test]
    fn test_patch_accepts_array_paths_with_indices() {
        let stored = bson!([
            ["change", ["isolates", 0, "default"], [true, false]],
        ]);

        let entries = parse_diff(&stored).unwrap();

        let patched = patch(
            &entries,
            &bson!({ "isolates": [{ "id": "cab8b360", "default": true }] }),
        )
        .unwrap();

        assert_eq!(
            patched,
            bson!({ "isolates": [{ "id": "cab8b360", "default": false }] })
        );
    }

    #[test]
    fn test_dotted_key_addresses_array_by_index() {
        let stored = bson!([["change", "tags.1", ["b", "c"]]]);

        let entries = parse_diff(&stored).unwrap();

        let patched = patch(&entries, &bson!({ "tags": ["a", "b"] })).unwrap();

        assert_eq!(patched, bson!({ "tags": ["a", "c"] }));
    }

    #[test]
    fn test_parse_and_serialize_round_trip() {
        let entries = diff(&before(), &after());

        let stored = diff_to_bson(&entries);
        let reparsed = parse_diff(&stored).unwrap();

        assert_eq!(reparsed, entries);
    }

    #[test]
    fn test_patch_missing_path_is_an_error() {
        let stored = bson!([["change", "missing.key", [1, 2]]]);

        let entries = parse_diff(&stored).unwrap();

        assert!(matches!(
            patch(&entries, &bson!({ "name": "x" })),
            Err(StorageError::InvalidDiff(_))
        ));
    }

    #[test]
    fn test_remove_missing_field_is_an_error() {
        let stored = bson!([["remove", "", [["gone", null]]]]);

        let entries = parse_diff(&stored).unwrap();

        assert!(matches!(
            patch(&entries, &bson!({ "name": "x" })),
            Err(StorageError::InvalidDiff(_))
        ));
    }

    #[test]
    fn test_integer_width_is_not_a_change() {
        assert!(diff(&bson!({ "version": 3_i32 }), &bson!({ "version": 3_i64 })).is_empty());
    }

    #[test]
    fn test_type_switch_is_a_whole_value_change() {
        let entries = diff(
            &bson!({ "value": { "a": 1 } }),
            &bson!({ "value": [1, 2] }),
        );

        assert_eq!(entries.len(), 1);
        assert!(matches!(&entries[0], DiffEntry::Change { .. }));

        assert_eq!(
            patch(&entries, &bson!({ "value": { "a": 1 } })).unwrap(),
            bson!({ "value": [1, 2] })
        );
    }

    #[test]
    fn test_document_round_trip() {
        let first = doc! { "a": 1, "b": { "c": [1, 2, 3] } };
        let second = doc! { "a": 2, "b": { "c": [1, 9] }, "d": true };

        let entries = diff(&Bson::Document(first.clone()), &Bson::Document(second.clone()));

        assert_eq!(
            patch(&entries, &Bson::Document(first.clone())).unwrap(),
            Bson::Document(second.clone())
        );

        assert_eq!(
            patch(&swap(&entries), &Bson::Document(second)).unwrap(),
            Bson::Document(first)
        );
    }
}
