//! The `AttestationStore` trait and its supporting types.
//!
//! Implemented by storage backends (e.g. `attest-store-sqlite`). The indexer
//! and the API depend on this abstraction, not on a concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{Address, Kind, Uid, record::Attestation};

/// Position of an event in the chain's canonical order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EventPosition {
  pub block_number: u64,
  pub log_index:    u64,
}

impl EventPosition {
  pub const fn new(block_number: u64, log_index: u64) -> Self {
    Self { block_number, log_index }
  }
}

/// What a call to [`AttestationStore::revoke`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
  /// An active record was marked revoked.
  Revoked,
  /// The record was already revoked; its original timestamp is kept.
  AlreadyRevoked,
  /// No record exists yet. The revocation is remembered and applied if the
  /// attestation is ever inserted.
  Pending,
}

/// Error bound for store backends, letting generic callers recognise an
/// insert that collided with an existing id.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_duplicate_id(&self) -> bool;
}

/// Abstraction over an attestation entity store: one logical table per
/// [`Kind`], written by a single ingestion task and read concurrently by the
/// API.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait AttestationStore: Send + Sync {
  type Error: StoreError;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new record in the table for `record.kind()`.
  ///
  /// Fails with a duplicate-id error if the id is already stored; an existing
  /// record is never overwritten. If a revocation for this id arrived first,
  /// the record is stored already revoked.
  fn insert(
    &self,
    record: Attestation,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Mark the record `id` of `kind` as revoked at `revoked_at`.
  ///
  /// Never fails because the id is unknown; see [`RevokeOutcome::Pending`].
  fn revoke(
    &self,
    kind: Kind,
    id: Uid,
    revoked_at: i64,
  ) -> impl Future<Output = Result<RevokeOutcome, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All non-revoked records of `kind` whose recipient is `address`, oldest
  /// first.
  fn find_active(
    &self,
    kind: Kind,
    address: Address,
  ) -> impl Future<Output = Result<Vec<Attestation>, Self::Error>> + Send + '_;

  /// Retrieve a record by id, revoked or not. Returns `None` if not found.
  fn find_by_id(
    &self,
    kind: Kind,
    id: Uid,
  ) -> impl Future<Output = Result<Option<Attestation>, Self::Error>> + Send + '_;

  /// All non-revoked records of `kind`.
  fn list_active(
    &self,
    kind: Kind,
  ) -> impl Future<Output = Result<Vec<Attestation>, Self::Error>> + Send + '_;

  // ── Ingestion checkpoint ──────────────────────────────────────────────

  /// Position of the last fully-processed event, if any.
  fn checkpoint(
    &self,
  ) -> impl Future<Output = Result<Option<EventPosition>, Self::Error>> + Send + '_;

  fn set_checkpoint(
    &self,
    position: EventPosition,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
