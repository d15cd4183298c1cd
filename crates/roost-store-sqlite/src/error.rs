//! Error type for `roost-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("decimal parse error: {0}")]
  Decimal(#[from] rust_decimal::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value the domain types cannot represent.
  #[error("invalid column value: {0}")]
  InvalidColumn(String),

  #[error("accommodation id already taken: {0}")]
  DuplicateAccommodation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
