//! Encoding and decoding helpers between attestation records and SQLite
//! rows.
//!
//! Ids and addresses are stored as their canonical lower-case `0x` strings.
//! Timestamps are integer seconds. `uint256` payload fields are stored as
//! decimal text, since they may exceed `i64`.

use attest_core::{
  Kind,
  record::{
    Attestation, AttestationBody, BadgeholderFields, CitizenFields,
    GovernanceContributionFields, RetroFundingVoterFields, VoteFields,
  },
};
use rusqlite::{Row, types::Value};

use crate::{Error, Result};

// ─── Tables ──────────────────────────────────────────────────────────────────

pub fn table(kind: Kind) -> &'static str {
  match kind {
    Kind::Citizen => "citizens",
    Kind::Badgeholder => "badgeholders",
    Kind::GovernanceContribution => "governance_contributions",
    Kind::RetroFundingVoter => "retro_funding_voters",
    Kind::Vote => "votes",
  }
}

/// Kind-specific columns, in the order [`encode_body`] produces values and
/// [`RawAttestation::from_row`] reads them.
fn body_columns(kind: Kind) -> &'static [&'static str] {
  match kind {
    Kind::Citizen => &["farcaster_id", "selection_method"],
    Kind::Badgeholder => &["rpgf_round", "referred_by", "referred_method"],
    Kind::GovernanceContribution => &["season", "contribution"],
    Kind::RetroFundingVoter => &["round", "voter_type", "voting_group"],
    Kind::Vote => &["proposal_id", "params", "voter_id"],
  }
}

const COMMON_COLUMNS: [&str; 5] = ["id", "address", "attester", "created_at", "revoked_at"];

/// All columns of `kind`'s table, comma-separated.
pub fn columns(kind: Kind) -> String {
  COMMON_COLUMNS
    .iter()
    .chain(body_columns(kind))
    .copied()
    .collect::<Vec<_>>()
    .join(", ")
}

/// `?1, ?2, …` for every column of `kind`'s table.
pub fn placeholders(kind: Kind) -> String {
  (1..=COMMON_COLUMNS.len() + body_columns(kind).len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ")
}

// ─── Writes ──────────────────────────────────────────────────────────────────

pub fn to_i64(column: &'static str, v: u64) -> Result<i64> {
  i64::try_from(v).map_err(|_| Error::OutOfRange { column, value: v.to_string() })
}

/// Encode a full record as positional values matching [`columns`].
pub fn encode_record(record: &Attestation) -> Vec<Value> {
  let mut values = vec![
    Value::Text(record.id.to_string()),
    Value::Text(record.address.to_string()),
    Value::Text(record.attester.to_string()),
    Value::Integer(record.created_at),
    record.revoked_at.map_or(Value::Null, Value::Integer),
  ];
  values.extend(encode_body(&record.body));
  values
}

fn encode_body(body: &AttestationBody) -> Vec<Value> {
  match body {
    AttestationBody::Citizen(c) => vec![
      Value::Text(c.farcaster_id.clone()),
      Value::Text(c.selection_method.clone()),
    ],
    AttestationBody::Badgeholder(b) => vec![
      Value::Text(b.rpgf_round.clone()),
      Value::Text(b.referred_by.to_string()),
      Value::Text(b.referred_method.clone()),
    ],
    AttestationBody::GovernanceContribution(g) => vec![
      Value::Text(g.season.clone()),
      Value::Text(g.contribution.clone()),
    ],
    AttestationBody::RetroFundingVoter(r) => vec![
      Value::Text(r.round.clone()),
      Value::Text(r.voter_type.clone()),
      Value::Text(r.voting_group.clone()),
    ],
    AttestationBody::Vote(v) => vec![
      Value::Text(v.proposal_id.clone()),
      Value::Text(v.params.clone()),
      Value::Text(v.voter_id.to_string()),
    ],
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Kind-specific columns as read from SQLite, before validation.
pub enum RawBody {
  Citizen {
    farcaster_id:     String,
    selection_method: String,
  },
  Badgeholder {
    rpgf_round:      String,
    referred_by:     String,
    referred_method: String,
  },
  GovernanceContribution {
    season:       String,
    contribution: String,
  },
  RetroFundingVoter {
    round:        String,
    voter_type:   String,
    voting_group: String,
  },
  Vote {
    proposal_id: String,
    params:      String,
    voter_id:    String,
  },
}

/// Raw values read directly from a kind table row selected with [`columns`].
pub struct RawAttestation {
  pub id:         String,
  pub address:    String,
  pub attester:   String,
  pub created_at: i64,
  pub revoked_at: Option<i64>,
  pub body:       RawBody,
}

impl RawAttestation {
  pub fn from_row(kind: Kind, row: &Row<'_>) -> rusqlite::Result<Self> {
    let body = match kind {
      Kind::Citizen => RawBody::Citizen {
        farcaster_id:     row.get(5)?,
        selection_method: row.get(6)?,
      },
      Kind::Badgeholder => RawBody::Badgeholder {
        rpgf_round:      row.get(5)?,
        referred_by:     row.get(6)?,
        referred_method: row.get(7)?,
      },
      Kind::GovernanceContribution => RawBody::GovernanceContribution {
        season:       row.get(5)?,
        contribution: row.get(6)?,
      },
      Kind::RetroFundingVoter => RawBody::RetroFundingVoter {
        round:        row.get(5)?,
        voter_type:   row.get(6)?,
        voting_group: row.get(7)?,
      },
      Kind::Vote => RawBody::Vote {
        proposal_id: row.get(5)?,
        params:      row.get(6)?,
        voter_id:    row.get(7)?,
      },
    };

    Ok(Self {
      id: row.get(0)?,
      address: row.get(1)?,
      attester: row.get(2)?,
      created_at: row.get(3)?,
      revoked_at: row.get(4)?,
      body,
    })
  }

  pub fn into_attestation(self) -> Result<Attestation> {
    let body = match self.body {
      RawBody::Citizen { farcaster_id, selection_method } => {
        AttestationBody::Citizen(CitizenFields {
          farcaster_id,
          selection_method,
        })
      }
      RawBody::Badgeholder { rpgf_round, referred_by, referred_method } => {
        AttestationBody::Badgeholder(BadgeholderFields {
          rpgf_round,
          referred_by: referred_by.parse()?,
          referred_method,
        })
      }
      RawBody::GovernanceContribution { season, contribution } => {
        AttestationBody::GovernanceContribution(GovernanceContributionFields {
          season,
          contribution,
        })
      }
      RawBody::RetroFundingVoter { round, voter_type, voting_group } => {
        AttestationBody::RetroFundingVoter(RetroFundingVoterFields {
          round,
          voter_type,
          voting_group,
        })
      }
      RawBody::Vote { proposal_id, params, voter_id } => {
        AttestationBody::Vote(VoteFields {
          proposal_id,
          params,
          voter_id: voter_id.parse()?,
        })
      }
    };

    Ok(Attestation {
      id: self.id.parse()?,
      address: self.address.parse()?,
      attester: self.attester.parse()?,
      created_at: self.created_at,
      revoked_at: self.revoked_at,
      body,
    })
  }
}
