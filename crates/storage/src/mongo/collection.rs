//! Reactive wrapper over a MongoDB collection
//!
//! Every mutating operation resolves the ids it touched and reports them to
//! the change dispatcher, so interested parties can follow the collection
//! without tailing an oplog.

use crate::error::{is_duplicate_key_error, Result, StorageError};
use crate::mongo::dispatch::{ChangeDispatcher, ChangeEvent, Operation};
use crate::mongo::processor::{base_processor, Processor};
use crate::mongo::projection::Projection;
use mongodb::bson::{Bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::results::{CreateIndexResult, DeleteResult, InsertManyResult, UpdateResult};
use mongodb::{Cursor, IndexModel};
use std::sync::Arc;
use virion_core::random_alphanumeric;

/// Length of generated document ids.
const ID_LENGTH: usize = 8;

/// A change-dispatching wrapper around one `mongodb::Collection`.
#[derive(Clone)]
pub struct Collection {
    name: String,
    inner: mongodb::Collection<Document>,
    dispatcher: Option<Arc<ChangeDispatcher>>,
    processor: Option<Arc<dyn Processor>>,
    projection: Option<Projection>,
}

impl Collection {
    pub fn new(
        name: impl Into<String>,
        inner: mongodb::Collection<Document>,
        dispatcher: Option<Arc<ChangeDispatcher>>,
        processor: Option<Arc<dyn Processor>>,
        projection: Option<Projection>,
    ) -> Self {
        Self {
            name: name.into(),
            inner,
            dispatcher,
            processor,
            projection,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// The wrapped driver collection, for reads that need options the
    /// wrapper does not carry (sorts, limits, hints). Mutations should go
    /// through the wrapper so changes are dispatched.
    pub fn inner(&self) -> &mongodb::Collection<Document> {
        &self.inner
    }

    /// Reports a change on this collection to the dispatcher, if any.
    pub async fn enqueue_change(&self, operation: Operation, ids: Vec<String>) -> Result<()> {
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher
                .dispatch(&ChangeEvent {
                    collection: self.name.clone(),
                    operation,
                    ids,
                })
                .await?;
        }

        Ok(())
    }

    /// Applies the collection's configured projection to `document`.
    ///
    /// Without a configured projection the document is returned unaltered.
    pub fn apply_projection(&self, document: Document) -> Document {
        match &self.projection {
            Some(projection) => projection.apply(&document),
            None => document,
        }
    }

    /// Runs the collection's configured processor on `document`, falling
    /// back to the `_id` to `id` rename.
    pub async fn apply_processor(&self, document: Document) -> Result<Document> {
        match &self.processor {
            Some(processor) => processor.process(document).await,
            None => Ok(base_processor(document)),
        }
    }

    /// Inserts `document`, generating a random id when `_id` is absent.
    ///
    /// A duplicate-key collision on a generated id is retried once with the
    /// store assigning the identifier. A collision on a caller-supplied id
    /// propagates unchanged. Returns the document with its final id.
    pub async fn insert_one(&self, mut document: Document, silent: bool) -> Result<Document> {
        if document.contains_key("_id") {
            self.inner.insert_one(&document).await?;
        } else {
            document.insert("_id", random_alphanumeric(ID_LENGTH, &[]));

            match self.inner.insert_one(&document).await {
                Ok(_) => {}
                Err(error) if is_duplicate_key_error(&error) => {
                    // The generated id collided. Retry once and let the
                    // store pick the identifier.
                    document.remove("_id");
                    let result = self.inner.insert_one(&document).await?;
                    document.insert("_id", result.inserted_id);
                }
                Err(error) => return Err(error.into()),
            }
        }

        if !silent {
            if let Some(id) = document.get("_id") {
                self.enqueue_change(Operation::Insert, vec![id_to_string(id)])
                    .await?;
            }
        }

        Ok(document)
    }

    /// Updates one document and returns its post-update value.
    ///
    /// A per-call `projection` is applied locally to the returned document
    /// and replaces the collection default, which is not consulted here.
    pub async fn find_one_and_update(
        &self,
        query: Document,
        update: Document,
        projection: Option<&Projection>,
        upsert: bool,
        silent: bool,
    ) -> Result<Option<Document>> {
        let document = self
            .inner
            .find_one_and_update(query, update)
            .return_document(ReturnDocument::After)
            .upsert(upsert)
            .await?;

        let document = match document {
            Some(document) => document,
            None => return Ok(None),
        };

        if !silent {
            if let Some(id) = document.get("_id") {
                self.enqueue_change(Operation::Update, vec![id_to_string(id)])
                    .await?;
            }
        }

        let document = match projection {
            Some(projection) => projection.apply(&document),
            None => document,
        };

        Ok(Some(document))
    }

    /// Replaces one document and returns the previous value, shaped by the
    /// collection projection.
    ///
    /// The replacement must carry an `_id` so the change can be keyed;
    /// a missing id is a [`StorageError::MissingId`].
    pub async fn replace_one(
        &self,
        query: Document,
        replacement: Document,
        upsert: bool,
        silent: bool,
    ) -> Result<Option<Document>> {
        let mut action = self
            .inner
            .find_one_and_replace(query, &replacement)
            .upsert(upsert);

        if let Some(projection) = &self.projection {
            action = action.projection(projection.to_document());
        }

        let previous = action.await?;

        if !silent {
            let id = replacement.get("_id").ok_or(StorageError::MissingId)?;

            self.enqueue_change(Operation::Update, vec![id_to_string(id)])
                .await?;
        }

        Ok(previous)
    }

    /// Applies `update` to the first matching document.
    ///
    /// The change is keyed on the pre-image id and only dispatched when a
    /// document matched before the update ran.
    pub async fn update_one(
        &self,
        query: Document,
        update: Document,
        upsert: bool,
        silent: bool,
    ) -> Result<UpdateResult> {
        let pre_image = self.get_one_field("_id", query.clone()).await?;

        let result = self.inner.update_one(query, update).upsert(upsert).await?;

        if !silent {
            if let Some(id) = pre_image {
                self.enqueue_change(Operation::Update, vec![id_to_string(&id)])
                    .await?;
            }
        }

        Ok(result)
    }

    /// Applies `update` to every matching document.
    ///
    /// Ids are captured before the mutation, so documents that start
    /// matching because of the update itself are never reported. The update
    /// event is dispatched even when no document matched.
    pub async fn update_many(
        &self,
        query: Document,
        update: Document,
        silent: bool,
    ) -> Result<UpdateResult> {
        let updated_ids = self.distinct("_id", query.clone()).await?;

        let result = self.inner.update_many(query, update).await?;

        if !silent {
            self.enqueue_change(Operation::Update, updated_ids.iter().map(id_to_string).collect())
                .await?;
        }

        Ok(result)
    }

    /// Deletes the first matching document.
    pub async fn delete_one(&self, query: Document, silent: bool) -> Result<DeleteResult> {
        let document_id = self.get_one_field("_id", query.clone()).await?;

        let result = self.inner.delete_one(query).await?;

        if result.deleted_count > 0 && !silent {
            self.enqueue_change(
                Operation::Delete,
                document_id.iter().map(id_to_string).collect(),
            )
            .await?;
        }

        Ok(result)
    }

    /// Deletes every matching document.
    ///
    /// Unlike [`Collection::update_many`], no event is dispatched when
    /// nothing matched.
    pub async fn delete_many(&self, query: Document, silent: bool) -> Result<DeleteResult> {
        let id_list = self.distinct("_id", query.clone()).await?;

        let result = self.inner.delete_many(query).await?;

        if !silent && !id_list.is_empty() {
            self.enqueue_change(Operation::Delete, id_list.iter().map(id_to_string).collect())
                .await?;
        }

        Ok(result)
    }

    /// Returns one field of the first matching document.
    pub async fn get_one_field(&self, field: &str, query: Document) -> Result<Option<Bson>> {
        let projected = self
            .inner
            .find_one(query)
            .projection(Projection::fields([field]).to_document())
            .await?;

        Ok(projected.and_then(|document| document.get(field).cloned()))
    }

    pub async fn find_one(&self, query: Document) -> Result<Option<Document>> {
        Ok(self.inner.find_one(query).await?)
    }

    pub async fn find_one_projected(
        &self,
        query: Document,
        projection: &Projection,
    ) -> Result<Option<Document>> {
        Ok(self
            .inner
            .find_one(query)
            .projection(projection.to_document())
            .await?)
    }

    pub async fn find(&self, query: Document) -> Result<Cursor<Document>> {
        Ok(self.inner.find(query).await?)
    }

    pub async fn find_projected(
        &self,
        query: Document,
        projection: &Projection,
    ) -> Result<Cursor<Document>> {
        Ok(self
            .inner
            .find(query)
            .projection(projection.to_document())
            .await?)
    }

    pub async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Cursor<Document>> {
        Ok(self.inner.aggregate(pipeline).await?)
    }

    pub async fn count_documents(&self, query: Document) -> Result<u64> {
        Ok(self.inner.count_documents(query).await?)
    }

    pub async fn distinct(&self, field: &str, query: Document) -> Result<Vec<Bson>> {
        Ok(self.inner.distinct(field, query).await?)
    }

    pub async fn create_index(&self, index: IndexModel) -> Result<CreateIndexResult> {
        Ok(self.inner.create_index(index).await?)
    }

    pub async fn insert_many(&self, documents: Vec<Document>) -> Result<InsertManyResult> {
        Ok(self.inner.insert_many(documents).await?)
    }
}

/// Renders a document id for a change event.
fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::String(value) => value.clone(),
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}
