//! SQLite journal of match records.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{MatchRow, NewMatchRow};
pub use repository::MatchRepository;
