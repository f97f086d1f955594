//! Durable write-ahead hook for committed match records.

use crate::db::DbError;
use crate::record::MatchRecord;

/// Durable key-value storage of match records keyed by match id.
///
/// The authority calls [`MatchJournal::persist`] with the next record before
/// swapping it in. An error aborts the operation with no state change.
pub trait MatchJournal: Send + Sync {
    /// Stores `record`, replacing any earlier version for the same id.
    fn persist(&self, record: &MatchRecord) -> Result<(), DbError>;
}
