//! Joining OTUs with their sequence documents

use crate::error::Result;
use crate::mongo::Db;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};

/// Fetches the OTU with `otu_id` joined with its sequences.
pub async fn join(db: &Db, otu_id: &str) -> Result<Option<Document>> {
    join_by_query(db, doc! { "_id": otu_id }).await
}

/// Fetches the first OTU matching `query` joined with its sequences.
pub async fn join_by_query(db: &Db, query: Document) -> Result<Option<Document>> {
    let document = match db.otus.find_one(query).await? {
        Some(document) => document,
        None => return Ok(None),
    };

    Ok(Some(join_document(db, document).await?))
}

/// Joins sequences into an already-fetched OTU document.
pub async fn join_document(db: &Db, document: Document) -> Result<Document> {
    let otu_id = document.get("_id").cloned().unwrap_or(Bson::Null);

    let sequences: Vec<Document> = db
        .sequences
        .find(doc! { "otu_id": otu_id })
        .await?
        .try_collect()
        .await?;

    Ok(merge_otu(&document, &sequences))
}

/// Merges `sequences` into the OTU's isolates.
///
/// Each isolate gains a `sequences` array holding the sequence documents
/// whose `isolate_id` matches it.
pub fn merge_otu(otu: &Document, sequences: &[Document]) -> Document {
    let mut merged = otu.clone();

    if let Ok(isolates) = merged.get_array_mut("isolates") {
        for isolate in isolates {
            if let Bson::Document(isolate) = isolate {
                let isolate_id = isolate.get("id").cloned().unwrap_or(Bson::Null);

                let matching: Vec<Bson> = sequences
                    .iter()
                    .filter(|sequence| sequence.get("isolate_id") == Some(&isolate_id))
                    .map(|sequence| Bson::Document(sequence.clone()))
                    .collect();

                isolate.insert("sequences", matching);
            }
        }
    }

    merged
}
