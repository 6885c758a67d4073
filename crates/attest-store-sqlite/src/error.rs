//! Error type for `attest-store-sqlite`.

use attest_core::{Kind, Uid, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] attest_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// An attestation with this id is already stored for this kind.
  #[error("{kind} {id} already exists")]
  DuplicateId { kind: Kind, id: Uid },

  #[error("{column} out of range: {value}")]
  OutOfRange { column: &'static str, value: String },
}

impl StoreError for Error {
  fn is_duplicate_id(&self) -> bool { matches!(self, Self::DuplicateId { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
