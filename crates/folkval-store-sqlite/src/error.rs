//! Error type for `folkval-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] folkval_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// A ledger row vanished between duplicate detection and the update
  /// phase. The recorder's two phases are not atomic; this can only occur
  /// if a row is deleted out-of-band mid-operation.
  #[error("vote row missing for user {user_id} on proposition {proposition_id}")]
  VoteRowMissing { user_id: i64, proposition_id: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Whether `err` is a uniqueness-constraint violation — the signal that a
/// `(proposition, user)` pair has already voted.
pub(crate) fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
  )
}

/// Whether `err` is a foreign-key violation — the signal that the
/// referenced proposition does not exist.
pub(crate) fn is_foreign_key_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
  )
}
