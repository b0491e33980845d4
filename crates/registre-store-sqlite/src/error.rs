//! Error type for `registre-store-sqlite`.

use registre_core::person::PersonId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// An update or delete targeted an id with no row behind it.
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  /// Delete was called with a record that has never been saved.
  #[error("person has no id")]
  Unsaved,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
