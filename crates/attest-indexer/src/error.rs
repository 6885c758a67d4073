//! Error types for ingestion and the JSON-RPC chain adapter.

use attest_core::{SchemaId, Uid};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why the ingestion loop stopped. Every variant is fatal: the checkpoint is
/// left at the last event that was fully processed.
#[derive(Debug, Error)]
pub enum IngestError {
  #[error("unknown schema {0}")]
  UnknownSchema(SchemaId),

  #[error("fetching attestation {uid} failed after {attempts} attempts: {source}")]
  Fetch {
    uid:      Uid,
    attempts: u32,
    #[source]
    source:   BoxError,
  },

  #[error("store error: {0}")]
  Store(#[source] BoxError),

  #[error("event source error: {0}")]
  Source(#[source] BoxError),
}

impl IngestError {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;

/// Failures talking to the chain over JSON-RPC.
#[derive(Debug, Error)]
pub enum RpcError {
  #[error("invalid rpc url: {0}")]
  Url(String),

  #[error("transport error: {0}")]
  Transport(#[from] alloy::transports::TransportError),

  #[error("contract call failed: {0}")]
  Contract(#[from] alloy::contract::Error),

  #[error("malformed log: {0}")]
  Log(#[from] alloy::sol_types::Error),

  #[error("log is missing its {0}")]
  MissingField(&'static str),

  #[error("unexpected log at block {block_number} index {log_index}")]
  UnexpectedLog { block_number: u64, log_index: u64 },

  #[error("block {0} not found")]
  MissingBlock(u64),

  #[error("block timestamp {0} out of range")]
  Timestamp(u64),
}
