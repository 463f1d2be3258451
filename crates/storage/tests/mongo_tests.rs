//! Wrapper behavior against a running MongoDB server.
//!
//! A local server at `mongodb://localhost:27017` is required. Every test
//! works in its own throwaway database and drops it on the way out.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};
use parking_lot::Mutex;

use virion_core::utils::random_alphanumeric;
use virion_storage::history::diff::{diff, diff_to_bson};
use virion_storage::history::{patch_to_version, write_diff_file};
use virion_storage::mongo::default_bindings;
use virion_storage::{
    ChangeDispatcher, ChangeEvent, ChangeListener, Db, DatabaseConfig, Operation, Projection,
    Result, StorageError,
};

const MONGO_URL: &str = "mongodb://localhost:27017";

const OTU_ID: &str = "6116cba1";

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<ChangeEvent>>,
}

impl Recorder {
    fn take(&self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.events.lock())
    }
}

#[async_trait]
impl ChangeListener for Recorder {
    async fn handle(&self, event: &ChangeEvent) -> Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

struct TestDb {
    db: Db,
    recorder: Arc<Recorder>,
    database: mongodb::Database,
}

impl TestDb {
    async fn new() -> TestDb {
        let client = mongodb::Client::with_uri_str(MONGO_URL).await.unwrap();

        let database =
            client.database(&format!("virion_test_{}", random_alphanumeric(8, &[])));

        let recorder = Arc::new(Recorder::default());

        let dispatcher = ChangeDispatcher::new();
        dispatcher.register(recorder.clone());

        let db = Db::new(
            database.clone(),
            Some(Arc::new(dispatcher)),
            default_bindings(),
        );

        TestDb {
            db,
            recorder,
            database,
        }
    }

    async fn cleanup(self) {
        self.database.drop().await.unwrap();
    }
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_connect_checks_the_server_version() {
    let config = DatabaseConfig {
        connection_string: MONGO_URL.to_string(),
        database_name: format!("virion_test_{}", random_alphanumeric(8, &[])),
    };

    assert!(Db::connect(&config, None).await.is_ok());
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_insert_one_generates_an_id_and_dispatches() {
    let test_db = TestDb::new().await;

    let inserted = test_db
        .db
        .labels
        .insert_one(doc! { "name": "Legacy", "color": "#93a2b3" }, false)
        .await
        .unwrap();

    let id = inserted.get_str("_id").unwrap().to_string();

    assert_eq!(id.len(), 8);
    assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));

    assert_eq!(
        test_db.recorder.take(),
        vec![ChangeEvent {
            collection: "labels".to_string(),
            operation: Operation::Insert,
            ids: vec![id.clone()],
        }]
    );

    let found = test_db
        .db
        .labels
        .find_one(doc! { "_id": id })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.get_str("name").unwrap(), "Legacy");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_insert_one_with_a_taken_caller_id_propagates() {
    let test_db = TestDb::new().await;

    test_db
        .db
        .labels
        .insert_one(doc! { "_id": "l1", "name": "first" }, true)
        .await
        .unwrap();

    let error = test_db
        .db
        .labels
        .insert_one(doc! { "_id": "l1", "name": "second" }, true)
        .await
        .unwrap_err();

    assert!(error.is_duplicate_key());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_find_one_and_update_projects_and_dispatches_once() {
    let test_db = TestDb::new().await;

    test_db
        .db
        .labels
        .insert_one(doc! { "_id": "l1", "name": "Legacy", "color": "#93a2b3" }, true)
        .await
        .unwrap();

    let updated = test_db
        .db
        .labels
        .find_one_and_update(
            doc! { "_id": "l1" },
            doc! { "$set": { "name": "Updated" } },
            Some(&Projection::fields(["name"])),
            false,
            false,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        updated,
        doc! { "_id": "l1", "name": "Updated" }
    );

    let updates: Vec<ChangeEvent> = test_db
        .recorder
        .take()
        .into_iter()
        .filter(|event| event.operation == Operation::Update)
        .collect();

    assert_eq!(
        updates,
        vec![ChangeEvent {
            collection: "labels".to_string(),
            operation: Operation::Update,
            ids: vec!["l1".to_string()],
        }]
    );

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_find_one_and_update_without_match_returns_none() {
    let test_db = TestDb::new().await;

    let updated = test_db
        .db
        .labels
        .find_one_and_update(
            doc! { "_id": "missing" },
            doc! { "$set": { "name": "x" } },
            None,
            false,
            false,
        )
        .await
        .unwrap();

    assert!(updated.is_none());
    assert!(test_db.recorder.take().is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_update_one_without_match_is_silent() {
    let test_db = TestDb::new().await;

    let result = test_db
        .db
        .labels
        .update_one(
            doc! { "_id": "missing" },
            doc! { "$set": { "name": "x" } },
            false,
            false,
        )
        .await
        .unwrap();

    assert_eq!(result.matched_count, 0);
    assert!(test_db.recorder.take().is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_update_many_dispatches_an_empty_id_list() {
    let test_db = TestDb::new().await;

    test_db
        .db
        .labels
        .update_many(doc! { "name": "missing" }, doc! { "$set": { "seen": true } }, false)
        .await
        .unwrap();

    assert_eq!(
        test_db.recorder.take(),
        vec![ChangeEvent {
            collection: "labels".to_string(),
            operation: Operation::Update,
            ids: Vec::new(),
        }]
    );

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_update_many_reports_pre_scan_ids_only() {
    let test_db = TestDb::new().await;

    for (id, state) in [("j1", "waiting"), ("j2", "waiting"), ("j3", "running")] {
        test_db
            .db
            .jobs
            .insert_one(doc! { "_id": id, "state": state }, true)
            .await
            .unwrap();
    }

    test_db
        .db
        .jobs
        .update_many(
            doc! { "state": "waiting" },
            doc! { "$set": { "state": "running" } },
            false,
        )
        .await
        .unwrap();

    // Ids are resolved before the bulk write, so the event names the
    // pre-image match set. A document that only matches the query once the
    // update has run stays invisible to that call's event.
    let events = test_db.recorder.take();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].operation, Operation::Update);

    let mut ids = events[0].ids.clone();
    ids.sort();

    assert_eq!(ids, vec!["j1", "j2"]);

    let running = test_db
        .db
        .jobs
        .count_documents(doc! { "state": "running" })
        .await
        .unwrap();

    assert_eq!(running, 3);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_replace_one_returns_the_previous_document() {
    let test_db = TestDb::new().await;

    test_db
        .db
        .labels
        .insert_one(doc! { "_id": "l1", "name": "before" }, true)
        .await
        .unwrap();

    let previous = test_db
        .db
        .labels
        .replace_one(
            doc! { "_id": "l1" },
            doc! { "_id": "l1", "name": "after" },
            false,
            false,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(previous.get_str("name").unwrap(), "before");

    let stored = test_db
        .db
        .labels
        .find_one(doc! { "_id": "l1" })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.get_str("name").unwrap(), "after");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_replace_one_without_an_id_errors_after_the_write() {
    let test_db = TestDb::new().await;

    test_db
        .db
        .labels
        .insert_one(doc! { "_id": "l1", "name": "before" }, true)
        .await
        .unwrap();

    let error = test_db
        .db
        .labels
        .replace_one(doc! { "_id": "l1" }, doc! { "name": "after" }, false, false)
        .await
        .unwrap_err();

    assert!(matches!(error, StorageError::MissingId));

    // The replacement itself went through before the id check failed.
    let stored = test_db
        .db
        .labels
        .find_one(doc! { "_id": "l1" })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.get_str("name").unwrap(), "after");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_delete_many_reports_only_matched_ids() {
    let test_db = TestDb::new().await;

    for (id, keep) in [
        ("l1", false),
        ("l2", false),
        ("l3", false),
        ("l4", true),
        ("l5", true),
    ] {
        test_db
            .db
            .labels
            .insert_one(doc! { "_id": id, "keep": keep }, true)
            .await
            .unwrap();
    }

    let result = test_db
        .db
        .labels
        .delete_many(doc! { "keep": false }, false)
        .await
        .unwrap();

    assert_eq!(result.deleted_count, 3);

    let events = test_db.recorder.take();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].operation, Operation::Delete);

    let mut ids = events[0].ids.clone();
    ids.sort();

    assert_eq!(ids, vec!["l1", "l2", "l3"]);

    test_db.cleanup().await;
}

fn sequence(id: &str, sequence: &str) -> Document {
    doc! {
        "_id": id,
        "definition": "Prunus virus F segment",
        "host": "sweet cherry",
        "isolate_id": "cab8b360",
        "otu_id": OTU_ID,
        "sequence": sequence,
    }
}

/// A joined OTU at `version`, with isolate sequences merged in.
fn joined(version: i32) -> Document {
    let mut sequences = vec![sequence("KX269872", "TGTTTAAGAGATTAAACAACCGCTTTC")];

    if version >= 2 {
        sequences.push(sequence("KX269873", "CAGTTTTTAGAGATTAAACAACCGC"));
    }

    doc! {
        "_id": OTU_ID,
        "abbreviation": if version >= 1 { "TST" } else { "PVF" },
        "isolates": [
            {
                "default": true,
                "id": "cab8b360",
                "source_name": "8816-v2",
                "source_type": "isolate",
                "sequences": sequences,
            },
        ],
        "lower_name": "prunus virus f",
        "name": "Prunus virus F",
        "verified": false,
        "version": version,
    }
}

/// Splits a joined OTU into its stored `otus` and `sequences` documents.
fn stored_parts(mut joined: Document) -> (Document, Vec<Document>) {
    let mut sequences = Vec::new();

    for isolate in joined.get_array_mut("isolates").unwrap() {
        if let Bson::Document(isolate) = isolate {
            if let Some(Bson::Array(merged)) = isolate.remove("sequences") {
                for entry in merged {
                    if let Bson::Document(entry) = entry {
                        sequences.push(entry);
                    }
                }
            }
        }
    }

    (joined, sequences)
}

#[tokio::test]
#[ignore = "requires a local MongoDB server"]
async fn test_patch_to_version_rebuilds_earlier_versions() {
    let test_db = TestDb::new().await;

    let data_dir = tempfile::tempdir().unwrap();
    tokio::fs::create_dir(data_dir.path().join("history"))
        .await
        .unwrap();

    let (otu, sequences) = stored_parts(joined(2));

    test_db.db.otus.insert_one(otu, true).await.unwrap();

    for entry in sequences {
        test_db.db.sequences.insert_one(entry, true).await.unwrap();
    }

    let first_diff = diff(
        &Bson::Document(joined(0)),
        &Bson::Document(joined(1)),
    );

    let second_diff = diff(
        &Bson::Document(joined(1)),
        &Bson::Document(joined(2)),
    );

    // The newest change keeps its diff on disk behind the file sentinel.
    write_diff_file(data_dir.path(), OTU_ID, "2", &diff_to_bson(&second_diff))
        .await
        .unwrap();

    let changes = [
        doc! {
            "_id": format!("{OTU_ID}.0"),
            "method_name": "create",
            "otu": { "id": OTU_ID, "name": "Prunus virus F", "version": 0 },
            "diff": joined(0),
        },
        doc! {
            "_id": format!("{OTU_ID}.1"),
            "method_name": "edit",
            "otu": { "id": OTU_ID, "name": "Prunus virus F", "version": 1 },
            "diff": diff_to_bson(&first_diff),
        },
        doc! {
            "_id": format!("{OTU_ID}.2"),
            "method_name": "edit",
            "otu": { "id": OTU_ID, "name": "Prunus virus F", "version": 2 },
            "diff": "file",
        },
    ];

    for change in changes {
        test_db.db.history.insert_one(change, true).await.unwrap();
    }

    let rebuilt = patch_to_version(&test_db.db, data_dir.path(), OTU_ID, 0)
        .await
        .unwrap();

    assert_eq!(rebuilt.current, Some(joined(2)));
    assert_eq!(rebuilt.patched, Some(joined(0)));
    assert_eq!(
        rebuilt.reverted,
        vec![
            Bson::String(format!("{OTU_ID}.2")),
            Bson::String(format!("{OTU_ID}.1")),
        ]
    );

    let rebuilt = patch_to_version(&test_db.db, data_dir.path(), OTU_ID, 1)
        .await
        .unwrap();

    assert_eq!(rebuilt.patched, Some(joined(1)));
    assert_eq!(rebuilt.reverted, vec![Bson::String(format!("{OTU_ID}.2"))]);

    // Asking for the current version touches nothing.
    let rebuilt = patch_to_version(&test_db.db, data_dir.path(), OTU_ID, 2)
        .await
        .unwrap();

    assert_eq!(rebuilt.patched, rebuilt.current);
    assert!(rebuilt.reverted.is_empty());

    test_db.cleanup().await;
}
