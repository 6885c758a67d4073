//! The ingestion loop: turns ordered chain events into stored records.
//!
//! Events are applied strictly one at a time. The checkpoint is written after
//! each event succeeds, so a restart resumes at the first event that has not
//! been fully applied. Any error stops the loop with the checkpoint untouched.
//! A payload that does not decode is not an error: anyone can attest to an
//! open schema, so it is logged and skipped like a filtered event.

use std::{sync::Arc, time::Duration};

use attest_core::{
  Uid,
  record::Attestation,
  registry::{SchemaEntry, SchemaRegistry},
  store::{AttestationStore, RevokeOutcome, StoreError as _},
};
use tracing::{debug, error, info, warn};

use crate::{
  error::{IngestError, Result},
  source::{AttestationReader, ChainEvent, EventKind, EventSource, FetchedAttestation},
};

// ─── Retry policy ────────────────────────────────────────────────────────────

/// Exponential backoff for attestation fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts, including the first. Never less than one in practice.
  pub max_attempts:    u32,
  pub initial_backoff: Duration,
  pub max_backoff:     Duration,
}

impl RetryPolicy {
  /// Delay before retry number `retry` (zero-based): `initial × 2^retry`,
  /// capped at `max_backoff`.
  pub fn backoff(&self, retry: u32) -> Duration {
    self
      .initial_backoff
      .saturating_mul(2u32.saturating_pow(retry))
      .min(self.max_backoff)
  }
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts:    5,
      initial_backoff: Duration::from_millis(250),
      max_backoff:     Duration::from_secs(8),
    }
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What processing one event did. Everything but `Inserted` and `Revoked` is
/// a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Inserted,
  /// The id was already stored; the event was a replay.
  Duplicate,
  /// The attester is not on the schema's allow-list.
  Filtered,
  Revoked,
  AlreadyRevoked,
  /// The attestation is not stored yet; it will be stored revoked.
  RevokePending,
  /// The payload does not match the schema's layout; nothing was stored.
  Undecodable,
}

impl From<RevokeOutcome> for Outcome {
  fn from(outcome: RevokeOutcome) -> Self {
    match outcome {
      RevokeOutcome::Revoked => Self::Revoked,
      RevokeOutcome::AlreadyRevoked => Self::AlreadyRevoked,
      RevokeOutcome::Pending => Self::RevokePending,
    }
  }
}

// ─── Indexer ─────────────────────────────────────────────────────────────────

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);

/// The single writer to the attestation store.
pub struct Indexer<S, R> {
  registry:          Arc<SchemaRegistry>,
  pub(crate) store:  Arc<S>,
  pub(crate) reader: R,
  retry:             RetryPolicy,
  poll_interval:     Duration,
}

impl<S, R> Indexer<S, R>
where
  S: AttestationStore,
  R: AttestationReader,
{
  pub fn new(
    registry: Arc<SchemaRegistry>,
    store: Arc<S>,
    reader: R,
    retry: RetryPolicy,
  ) -> Self {
    Self { registry, store, reader, retry, poll_interval: DEFAULT_POLL_INTERVAL }
  }

  /// How long [`run`](Self::run) waits after an empty batch.
  pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
    self.poll_interval = poll_interval;
    self
  }

  /// Apply one event to the store.
  pub async fn process(&self, event: &ChainEvent) -> Result<Outcome> {
    let entry = self
      .registry
      .resolve(&event.schema)
      .map_err(|_| IngestError::UnknownSchema(event.schema))?;

    let outcome = match event.kind {
      EventKind::Attested => self.attested(entry, event).await?,
      EventKind::Revoked => self
        .store
        .revoke(entry.kind, event.uid, event.block_timestamp)
        .await
        .map_err(IngestError::store)?
        .into(),
    };

    match outcome {
      Outcome::Inserted | Outcome::Revoked => {
        debug!(kind = %entry.kind, uid = %event.uid, ?outcome, "applied event");
      }
      _ => debug!(kind = %entry.kind, uid = %event.uid, ?outcome, "event was a no-op"),
    }
    Ok(outcome)
  }

  async fn attested(&self, entry: &SchemaEntry, event: &ChainEvent) -> Result<Outcome> {
    if !entry.permits(&event.attester) {
      return Ok(Outcome::Filtered);
    }

    let fetched = self.fetch(event.uid).await?;
    let body = match attest_abi::decode(entry.kind, &fetched.payload, fetched.ref_uid) {
      Ok(body) => body,
      Err(e) => {
        warn!(
          kind = %entry.kind,
          uid = %event.uid,
          attester = %event.attester,
          error = %e,
          "skipping undecodable attestation"
        );
        return Ok(Outcome::Undecodable);
      }
    };

    let record = Attestation {
      id: event.uid,
      address: event.recipient,
      attester: event.attester,
      created_at: event.block_timestamp,
      revoked_at: None,
      body,
    };

    match self.store.insert(record).await {
      Ok(()) => Ok(Outcome::Inserted),
      Err(e) if e.is_duplicate_id() => Ok(Outcome::Duplicate),
      Err(e) => Err(IngestError::store(e)),
    }
  }

  async fn fetch(&self, uid: Uid) -> Result<FetchedAttestation> {
    let mut attempt = 0;
    loop {
      attempt += 1;
      match self.reader.fetch(uid).await {
        Ok(fetched) => return Ok(fetched),
        Err(e) if attempt < self.retry.max_attempts => {
          let delay = self.retry.backoff(attempt - 1);
          warn!(%uid, attempt, ?delay, error = %e, "attestation fetch failed, retrying");
          tokio::time::sleep(delay).await;
        }
        Err(e) => {
          return Err(IngestError::Fetch { uid, attempts: attempt, source: Box::new(e) });
        }
      }
    }
  }

  /// Consume `source` from the stored checkpoint onwards.
  ///
  /// Returns `Ok(())` once the source is exhausted, or the first error.
  pub async fn run<E>(&self, source: &mut E) -> Result<()>
  where
    E: EventSource,
  {
    let mut after = self.store.checkpoint().await.map_err(IngestError::store)?;
    info!(checkpoint = ?after, schemas = self.registry.len(), "ingestion starting");

    loop {
      let batch = source
        .next_batch(after)
        .await
        .map_err(|e| IngestError::Source(Box::new(e)))?;
      let Some(batch) = batch else {
        info!(checkpoint = ?after, "event source exhausted");
        return Ok(());
      };
      if batch.is_empty() {
        tokio::time::sleep(self.poll_interval).await;
        continue;
      }

      let mut applied = 0usize;
      for event in &batch {
        if after.is_some_and(|a| event.position <= a) {
          continue;
        }
        if let Err(e) = self.process(event).await {
          error!(position = ?event.position, uid = %event.uid, error = %e, "ingestion halted");
          return Err(e);
        }
        self
          .store
          .set_checkpoint(event.position)
          .await
          .map_err(IngestError::store)?;
        after = Some(event.position);
        applied += 1;
      }
      info!(events = applied, checkpoint = ?after, "batch processed");
    }
  }
}
