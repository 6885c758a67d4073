//! Error types for the attest-abi codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The payload bytes do not decode as the kind's ABI tuple (truncated,
  /// bad offsets, invalid UTF-8 in a string, ...).
  #[error("malformed payload: {0}")]
  Abi(#[from] alloy_dyn_abi::Error),

  #[error("field {field}: expected {expected}")]
  TypeMismatch {
    field:    &'static str,
    expected: &'static str,
  },

  #[error("payload has {actual} fields, layout declares {expected}")]
  FieldCount { expected: usize, actual: usize },

  #[error("field {field}: invalid number {value:?}")]
  InvalidNumber { field: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
