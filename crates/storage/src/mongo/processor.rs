//! Document post-processing applied before documents leave the storage layer

use crate::error::Result;
use async_trait::async_trait;
use mongodb::bson::Document;

/// Transforms a stored document into its outward-facing shape.
///
/// A processor is attached to a collection through its binding and runs on
/// every document returned by [`Collection::apply_processor`].
///
/// [`Collection::apply_processor`]: crate::mongo::Collection::apply_processor
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, document: Document) -> Result<Document>;
}

/// Renames the stored `_id` field to `id`.
///
/// Collections without a configured processor fall back to this. Documents
/// without an `_id` pass through unchanged.
pub fn base_processor(mut document: Document) -> Document {
    if let Some(id) = document.remove("_id") {
        document.insert("id", id);
    }

    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_base_processor_renames_id() {
        let processed = base_processor(doc! { "_id": "foo", "name": "Foo" });

        assert_eq!(processed, doc! { "name": "Foo", "id": "foo" });
        assert!(!processed.contains_key("_id"));
    }

    #[test]
    fn test_base_processor_without_id() {
        let document = doc! { "name": "Foo" };

        assert_eq!(base_processor(document.clone()), document);
    }
}
