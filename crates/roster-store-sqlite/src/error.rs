//! Error type for `roster-store-sqlite`.

use roster_core::{course::CourseId, person::PersonId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored column could not be mapped back onto a domain type.
  #[error("decode error: {0}")]
  Decode(String),

  /// Attempted to overwrite a person row that does not exist.
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  /// Attempted to overwrite a course row that does not exist.
  #[error("course not found: {0}")]
  CourseNotFound(CourseId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
