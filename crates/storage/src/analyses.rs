//! Analysis document helpers

use crate::error::Result;
use crate::mongo::Db;
use mongodb::bson::{doc, Bson};
use mongodb::results::UpdateResult;
use virion_core::timestamp;

/// Clears the BLAST record on one nuvs result and refreshes `updated_at`.
pub async fn remove_nuvs_blast(
    db: &Db,
    analysis_id: &str,
    sequence_index: i64,
) -> Result<UpdateResult> {
    db.analyses
        .update_one(
            doc! { "_id": analysis_id, "results.index": sequence_index },
            doc! {
                "$set": {
                    "results.$.blast": Bson::Null,
                    "updated_at": timestamp(),
                }
            },
            false,
            false,
        )
        .await
}
