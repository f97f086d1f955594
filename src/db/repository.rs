//! Database repository for journaled match records.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, MatchRow, NewMatchRow, schema};
use crate::identity::MatchId;
use crate::journal::MatchJournal;
use crate::record::MatchRecord;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite-backed match journal.
#[derive(Debug, Clone)]
pub struct MatchRepository {
    db_path: String,
}

impl MatchRepository {
    /// Creates a repository for the database at the given path.
    ///
    /// Every call opens its own connection, so `":memory:"` gives each call a
    /// fresh empty database. Use a file for anything that must persist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating MatchRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn migrate(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Inserts or replaces the stored record for its match id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if encoding or the write fails.
    #[instrument(skip(self, record), fields(match_id = %record.match_id()))]
    pub fn save_match(&self, record: &MatchRecord) -> Result<(), DbError> {
        let row = NewMatchRow::encode(record)?;
        let mut conn = self.connection()?;

        diesel::insert_into(schema::matches::table)
            .values(&row)
            .on_conflict(schema::matches::match_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)?;

        debug!(status = %row.status(), "Match saved");
        Ok(())
    }

    /// Loads one match. Returns `None` if it was never journaled.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or the payload is corrupt.
    #[instrument(skip(self))]
    pub fn load_match(&self, match_id: MatchId) -> Result<Option<MatchRecord>, DbError> {
        let mut conn = self.connection()?;

        let row = schema::matches::table
            .filter(schema::matches::match_id.eq(match_id.to_string()))
            .select(MatchRow::as_select())
            .first::<MatchRow>(&mut conn)
            .optional()?;

        row.map(|r| r.decode()).transpose()
    }

    /// Loads every journaled match, ordered by match id text.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or any payload is corrupt.
    #[instrument(skip(self))]
    pub fn load_all(&self) -> Result<Vec<MatchRecord>, DbError> {
        let mut conn = self.connection()?;

        let rows = schema::matches::table
            .order(schema::matches::match_id.asc())
            .select(MatchRow::as_select())
            .load::<MatchRow>(&mut conn)?;

        let records = rows
            .iter()
            .map(MatchRow::decode)
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = records.len(), "Matches loaded");
        Ok(records)
    }

    /// Lists stored match ids with the given status name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    #[instrument(skip(self))]
    pub fn match_ids_with_status(&self, status: &str) -> Result<Vec<MatchId>, DbError> {
        let mut conn = self.connection()?;

        let ids = schema::matches::table
            .filter(schema::matches::status.eq(status))
            .select(schema::matches::match_id)
            .load::<String>(&mut conn)?;

        Ok(ids
            .into_iter()
            .filter_map(|id| match id.parse::<MatchId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(match_id = %id, error = %e, "Skipping unparsable match id");
                    None
                }
            })
            .collect())
    }
}

impl MatchJournal for MatchRepository {
    fn persist(&self, record: &MatchRecord) -> Result<(), DbError> {
        self.save_match(record)
    }
}
