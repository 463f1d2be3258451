//! Mongo-style projections applied on either side of the wire

use mongodb::bson::{Bson, Document};

/// A projection restricting which fields of a document are kept.
///
/// Two forms exist, mirroring the query shapes the store accepts: a plain
/// allow-list of field names, or an ordered visibility map of field name to
/// keep/drop flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Fields(Vec<String>),
    Visibility(Vec<(String, bool)>),
}

impl Projection {
    /// Builds an allow-list projection.
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Fields(fields.into_iter().map(Into::into).collect())
    }

    /// Builds a visibility-map projection.
    pub fn visibility<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Projection::Visibility(
            entries
                .into_iter()
                .map(|(key, visible)| (key.into(), visible))
                .collect(),
        )
    }

    /// Applies the projection to `document`, returning the projected copy.
    ///
    /// The rules match what the store itself would do with the equivalent
    /// projection document:
    ///
    /// - an allow-list keeps the listed fields and always keeps `_id`;
    /// - a visibility map with every flag `false` drops exactly the listed
    ///   fields (so `{"_id": false}` keeps everything else);
    /// - any other visibility map keeps the fields flagged `true`, plus
    ///   `_id` unless it is explicitly flagged `false`.
    pub fn apply(&self, document: &Document) -> Document {
        match self {
            Projection::Fields(fields) => document
                .iter()
                .filter(|(key, _)| *key == "_id" || fields.iter().any(|field| field == *key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            Projection::Visibility(entries) => {
                let exclusion = entries.iter().all(|(_, visible)| !visible);

                let keep = |key: &str| {
                    let flag = entries
                        .iter()
                        .find(|(entry, _)| entry == key)
                        .map(|(_, visible)| *visible);

                    if exclusion {
                        flag.is_none()
                    } else {
                        flag.unwrap_or(key == "_id")
                    }
                };

                document
                    .iter()
                    .filter(|(key, _)| keep(key))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            }
        }
    }

    /// Converts the projection into a driver-side projection document.
    pub fn to_document(&self) -> Document {
        match self {
            Projection::Fields(fields) => fields
                .iter()
                .map(|field| (field.clone(), Bson::Int32(1)))
                .collect(),
            Projection::Visibility(entries) => entries
                .iter()
                .map(|(key, visible)| (key.clone(), Bson::Boolean(*visible)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn sample() -> Document {
        doc! {
            "_id": "foo",
            "name": "Foo",
            "ready": true,
            "files": ["a", "b"],
        }
    }

    #[test]
    fn test_allow_list_keeps_listed_fields_and_id() {
        let projection = Projection::fields(["name"]);

        assert_eq!(
            projection.apply(&sample()),
            doc! { "_id": "foo", "name": "Foo" }
        );
    }

    #[test]
    fn test_allow_list_is_idempotent() {
        let projection = Projection::fields(["name", "ready"]);

        let once = projection.apply(&sample());
        let twice = projection.apply(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_id_only_exclusion_keeps_everything_else() {
        let projection = Projection::visibility([("_id", false)]);

        assert_eq!(
            projection.apply(&sample()),
            doc! { "name": "Foo", "ready": true, "files": ["a", "b"] }
        );
    }

    #[test]
    fn test_all_false_map_excludes_exactly_those_fields() {
        let projection = Projection::visibility([("files", false), ("ready", false)]);

        assert_eq!(
            projection.apply(&sample()),
            doc! { "_id": "foo", "name": "Foo" }
        );
    }

    #[test]
    fn test_mixed_map_includes_id_unless_excluded() {
        let included = Projection::visibility([("name", true)]);

        assert_eq!(
            included.apply(&sample()),
            doc! { "_id": "foo", "name": "Foo" }
        );

        let excluded = Projection::visibility([("_id", false), ("name", true)]);

        assert_eq!(excluded.apply(&sample()), doc! { "name": "Foo" });
    }

    #[test]
    fn test_missing_fields_are_ignored() {
        let projection = Projection::fields(["name", "host"]);

        assert_eq!(
            projection.apply(&sample()),
            doc! { "_id": "foo", "name": "Foo" }
        );
    }

    #[test]
    fn test_to_document_round_trip() {
        assert_eq!(
            Projection::fields(["name", "ready"]).to_document(),
            doc! { "name": 1, "ready": 1 }
        );

        assert_eq!(
            Projection::visibility([("_id", false), ("name", true)]).to_document(),
            doc! { "_id": false, "name": true }
        );
    }
}
