//! Collaborator seams between the ingestion loop and the chain.
//!
//! [`EventSource`] yields `Attested` / `Revoked` events in canonical order;
//! [`AttestationReader`] fetches the full attestation behind an `Attested`
//! event. [`crate::rpc`] implements both over JSON-RPC; [`VecSource`] is an
//! in-memory source for fixtures and tests.

use std::{collections::VecDeque, convert::Infallible, future::Future};

use attest_core::{Address, SchemaId, Uid, store::EventPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
  Attested,
  Revoked,
}

/// One attestation registry event, as emitted on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEvent {
  pub kind:            EventKind,
  pub schema:          SchemaId,
  pub uid:             Uid,
  pub recipient:       Address,
  pub attester:        Address,
  /// Timestamp of the block containing the event, in seconds.
  pub block_timestamp: i64,
  pub position:        EventPosition,
}

/// The parts of an on-chain attestation that are not in its event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAttestation {
  /// ABI-encoded schema payload.
  pub payload: Vec<u8>,
  pub ref_uid: Uid,
}

/// Fetches attestation bodies by uid.
pub trait AttestationReader: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch(
    &self,
    uid: Uid,
  ) -> impl Future<Output = Result<FetchedAttestation, Self::Error>> + Send + '_;
}

/// An ordered stream of events, consumed in batches.
pub trait EventSource: Send {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Events strictly after `after`, in `(block_number, log_index)` order.
  ///
  /// `Some(vec![])` means nothing new yet; `None` means the source is
  /// exhausted and will never yield again.
  fn next_batch(
    &mut self,
    after: Option<EventPosition>,
  ) -> impl Future<Output = Result<Option<Vec<ChainEvent>>, Self::Error>> + Send + '_;
}

// ─── In-memory source ────────────────────────────────────────────────────────

/// Replays pre-built batches, then reports exhaustion.
#[derive(Debug, Default)]
pub struct VecSource {
  batches: VecDeque<Vec<ChainEvent>>,
}

impl VecSource {
  pub fn new(batches: impl IntoIterator<Item = Vec<ChainEvent>>) -> Self {
    Self { batches: batches.into_iter().collect() }
  }
}

impl EventSource for VecSource {
  type Error = Infallible;

  async fn next_batch(
    &mut self,
    after: Option<EventPosition>,
  ) -> Result<Option<Vec<ChainEvent>>, Infallible> {
    Ok(self.batches.pop_front().map(|batch| {
      batch
        .into_iter()
        .filter(|e| after.is_none_or(|a| e.position > a))
        .collect()
    }))
  }
}
