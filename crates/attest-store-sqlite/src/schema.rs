//! SQL schema for the attestation SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every kind table shares the leading columns `id, address, attester,
/// created_at, revoked_at`. Addresses and ids are stored in their canonical
/// lower-case `0x` form, so equality never needs `LOWER()`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS citizens (
    id               TEXT PRIMARY KEY,
    address          TEXT NOT NULL,
    attester         TEXT NOT NULL,
    created_at       INTEGER NOT NULL,
    revoked_at       INTEGER,           -- NULL while active; set at most once
    farcaster_id     TEXT NOT NULL,     -- uint256 in decimal
    selection_method TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS badgeholders (
    id              TEXT PRIMARY KEY,
    address         TEXT NOT NULL,
    attester        TEXT NOT NULL,
    created_at      INTEGER NOT NULL,
    revoked_at      INTEGER,
    rpgf_round      TEXT NOT NULL,
    referred_by     TEXT NOT NULL,
    referred_method TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS governance_contributions (
    id           TEXT PRIMARY KEY,
    address      TEXT NOT NULL,
    attester     TEXT NOT NULL,
    created_at   INTEGER NOT NULL,
    revoked_at   INTEGER,
    season       TEXT NOT NULL,     -- uint256 in decimal
    contribution TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS retro_funding_voters (
    id           TEXT PRIMARY KEY,
    address      TEXT NOT NULL,
    attester     TEXT NOT NULL,
    created_at   INTEGER NOT NULL,
    revoked_at   INTEGER,
    round        TEXT NOT NULL,     -- uint256 in decimal
    voter_type   TEXT NOT NULL,
    voting_group TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS votes (
    id          TEXT PRIMARY KEY,
    address     TEXT NOT NULL,
    attester    TEXT NOT NULL,
    created_at  INTEGER NOT NULL,
    revoked_at  INTEGER,
    proposal_id TEXT NOT NULL,     -- uint256 in decimal
    params      TEXT NOT NULL,
    voter_id    TEXT NOT NULL      -- the attestation's refUID
);

-- Revocations that arrived before their attestation. Consumed on insert.
CREATE TABLE IF NOT EXISTS pending_revocations (
    kind       TEXT NOT NULL,
    id         TEXT NOT NULL,
    revoked_at INTEGER NOT NULL,
    PRIMARY KEY (kind, id)
);

-- Single row: the last fully-processed event.
CREATE TABLE IF NOT EXISTS checkpoint (
    singleton    INTEGER PRIMARY KEY CHECK (singleton = 1),
    block_number INTEGER NOT NULL,
    log_index    INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS citizens_address_idx       ON citizens(address);
CREATE INDEX IF NOT EXISTS badgeholders_address_idx   ON badgeholders(address);
CREATE INDEX IF NOT EXISTS governance_address_idx     ON governance_contributions(address);
CREATE INDEX IF NOT EXISTS governance_attester_idx    ON governance_contributions(attester);
CREATE INDEX IF NOT EXISTS retro_voters_address_idx   ON retro_funding_voters(address);
CREATE INDEX IF NOT EXISTS votes_address_idx          ON votes(address);

PRAGMA user_version = 1;
";
