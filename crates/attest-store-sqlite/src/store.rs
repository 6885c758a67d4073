//! [`SqliteStore`]: the SQLite implementation of [`AttestationStore`].

use std::path::Path;

use attest_core::{
  Address, Kind, Uid,
  record::Attestation,
  store::{AttestationStore, EventPosition, RevokeOutcome},
};
use rusqlite::{OptionalExtension as _, types::Value};

use crate::{
  Error, Result,
  encode::{RawAttestation, columns, encode_record, placeholders, table, to_i64},
  schema::SCHEMA,
};

/// Position of `revoked_at` in the values produced by [`encode_record`].
const REVOKED_AT: usize = 4;

// ─── Store ───────────────────────────────────────────────────────────────────

/// An attestation store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `SELECT <all columns> FROM <kind table> <filter>` and decode rows.
  async fn select(
    &self,
    kind: Kind,
    filter: &'static str,
    params: Vec<Value>,
  ) -> Result<Vec<Attestation>> {
    let sql = format!(
      "SELECT {} FROM {} {filter} ORDER BY created_at, id",
      columns(kind),
      table(kind),
    );

    let raws: Vec<RawAttestation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            RawAttestation::from_row(kind, row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttestation::into_attestation).collect()
  }
}

fn to_u64(column: &'static str, v: i64) -> Result<u64> {
  u64::try_from(v).map_err(|_| Error::OutOfRange { column, value: v.to_string() })
}

// ─── AttestationStore impl ───────────────────────────────────────────────────

impl AttestationStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert(&self, record: Attestation) -> Result<()> {
    let kind     = record.kind();
    let id       = record.id;
    let id_str   = id.to_string();
    let kind_str = kind.slug();
    let mut values = encode_record(&record);

    let exists_sql = format!("SELECT 1 FROM {} WHERE id = ?1", table(kind));
    let insert_sql = format!(
      "INSERT INTO {} ({}) VALUES ({})",
      table(kind),
      columns(kind),
      placeholders(kind),
    );

    // `false` when the id was already present.
    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists = tx
          .query_row(&exists_sql, rusqlite::params![id_str], |_| Ok(true))
          .optional()?
          .unwrap_or(false);
        if exists {
          return Ok(false);
        }

        // A revocation that raced ahead of this attestation wins.
        let pending: Option<i64> = tx
          .query_row(
            "SELECT revoked_at FROM pending_revocations WHERE kind = ?1 AND id = ?2",
            rusqlite::params![kind_str, id_str],
            |r| r.get(0),
          )
          .optional()?;
        if let Some(at) = pending {
          if values[REVOKED_AT] == Value::Null {
            values[REVOKED_AT] = Value::Integer(at);
          }
          tx.execute(
            "DELETE FROM pending_revocations WHERE kind = ?1 AND id = ?2",
            rusqlite::params![kind_str, id_str],
          )?;
        }

        tx.execute(&insert_sql, rusqlite::params_from_iter(values))?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::DuplicateId { kind, id });
    }
    Ok(())
  }

  async fn revoke(&self, kind: Kind, id: Uid, revoked_at: i64) -> Result<RevokeOutcome> {
    let id_str   = id.to_string();
    let kind_str = kind.slug();

    let update_sql = format!(
      "UPDATE {} SET revoked_at = ?1 WHERE id = ?2 AND revoked_at IS NULL",
      table(kind),
    );
    let exists_sql = format!("SELECT 1 FROM {} WHERE id = ?1", table(kind));

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let updated = tx.execute(&update_sql, rusqlite::params![revoked_at, id_str])?;
        let outcome = if updated > 0 {
          RevokeOutcome::Revoked
        } else {
          let exists = tx
            .query_row(&exists_sql, rusqlite::params![id_str], |_| Ok(true))
            .optional()?
            .unwrap_or(false);
          if exists {
            RevokeOutcome::AlreadyRevoked
          } else {
            // Keep the first revocation seen for an id.
            tx.execute(
              "INSERT OR IGNORE INTO pending_revocations (kind, id, revoked_at)
               VALUES (?1, ?2, ?3)",
              rusqlite::params![kind_str, id_str, revoked_at],
            )?;
            RevokeOutcome::Pending
          }
        };

        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    Ok(outcome)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_active(&self, kind: Kind, address: Address) -> Result<Vec<Attestation>> {
    self
      .select(
        kind,
        "WHERE address = ?1 AND revoked_at IS NULL",
        vec![Value::Text(address.to_string())],
      )
      .await
  }

  async fn find_by_id(&self, kind: Kind, id: Uid) -> Result<Option<Attestation>> {
    let mut found = self
      .select(kind, "WHERE id = ?1", vec![Value::Text(id.to_string())])
      .await?;
    Ok(found.pop())
  }

  async fn list_active(&self, kind: Kind) -> Result<Vec<Attestation>> {
    self.select(kind, "WHERE revoked_at IS NULL", Vec::new()).await
  }

  // ── Checkpoint ────────────────────────────────────────────────────────────

  async fn checkpoint(&self) -> Result<Option<EventPosition>> {
    let raw: Option<(i64, i64)> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT block_number, log_index FROM checkpoint WHERE singleton = 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|(block, log)| {
        Ok(EventPosition::new(
          to_u64("block_number", block)?,
          to_u64("log_index", log)?,
        ))
      })
      .transpose()
  }

  async fn set_checkpoint(&self, position: EventPosition) -> Result<()> {
    let block = to_i64("block_number", position.block_number)?;
    let log   = to_i64("log_index", position.log_index)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO checkpoint (singleton, block_number, log_index) VALUES (1, ?1, ?2)
           ON CONFLICT (singleton) DO UPDATE
             SET block_number = excluded.block_number,
                 log_index    = excluded.log_index",
          rusqlite::params![block, log],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
