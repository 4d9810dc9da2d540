use thiserror::Error;

use crate::geonames::FetchError;

/// Everything that can go wrong while updating one record. A failure aborts
/// that record's update entirely; other records in the batch are unaffected.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("cannot convert {value:?} to a number for field {field:?}")]
    Coercion { field: String, value: String },

    #[error("record does not match the mapping schema: {0}")]
    SchemaMismatch(String),

    #[error("unknown continent code {0:?}")]
    UnknownContinentCode(String),
}
