//! Error types for `attest-core`.

use thiserror::Error;

use crate::ids::SchemaId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown schema: {0}")]
  UnknownSchema(SchemaId),

  #[error("schema {0} is registered more than once")]
  DuplicateSchema(SchemaId),

  #[error("unknown attestation kind: {0:?}")]
  UnknownKind(String),

  #[error("invalid hex for {what}: {value:?}")]
  InvalidHex { what: &'static str, value: String },

  #[error("invalid length for {what}: expected {expected} bytes, got {actual}")]
  InvalidLength {
    what:     &'static str,
    expected: usize,
    actual:   usize,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
