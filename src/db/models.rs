//! Database rows for journaled matches.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, schema};
use crate::record::MatchRecord;

/// Stored match row. `record` holds the JSON-encoded [`MatchRecord`].
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::matches)]
pub struct MatchRow {
    match_id: String,
    status: String,
    record: String,
    updated_at: NaiveDateTime,
}

impl MatchRow {
    /// Decodes the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the payload is not a valid record.
    #[instrument(skip(self), fields(match_id = %self.match_id))]
    pub fn decode(&self) -> Result<MatchRecord, DbError> {
        Ok(serde_json::from_str(&self.record)?)
    }
}

/// Row written on every committed operation; inserts or replaces.
#[derive(Debug, Clone, Insertable, AsChangeset, Getters)]
#[diesel(table_name = schema::matches)]
#[diesel(primary_key(match_id))]
pub struct NewMatchRow {
    match_id: String,
    status: String,
    record: String,
    updated_at: NaiveDateTime,
}

impl NewMatchRow {
    /// Encodes a record for storage, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the record cannot be serialized.
    #[instrument(skip(record), fields(match_id = %record.match_id()))]
    pub fn encode(record: &MatchRecord) -> Result<Self, DbError> {
        Ok(Self {
            match_id: record.match_id().to_string(),
            status: record.game().status().to_string(),
            record: serde_json::to_string(record)?,
            updated_at: chrono::Utc::now().naive_utc(),
        })
    }
}
