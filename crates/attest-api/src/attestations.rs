//! Handler for `GET /attestations/{address}`: every active attestation a
//! recipient holds, across all kinds, as display-ready summaries.

use attest_core::{
  Address, Kind, Uid,
  record::{Attestation, AttestationBody},
  store::AttestationStore,
};
use axum::{
  Json,
  extract::{Path, State},
};
use chrono::DateTime;
use serde::Serialize;

use crate::{ApiState, error::ApiError, parse_address};

/// One row of the cross-kind listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
  pub id:      Uid,
  pub entity:  Kind,
  pub address: Address,
  pub name:    &'static str,
  pub subtext: String,
}

impl From<&Attestation> for Summary {
  fn from(record: &Attestation) -> Self {
    Self {
      id:      record.id,
      entity:  record.kind(),
      address: record.address,
      name:    name(record.kind()),
      subtext: subtext(record),
    }
  }
}

/// Display name for a kind.
pub fn name(kind: Kind) -> &'static str {
  match kind {
    Kind::Citizen => "Citizen",
    Kind::Badgeholder => "Badgeholder",
    Kind::GovernanceContribution => "Governance Contributor",
    Kind::RetroFundingVoter => "Retro Funding Voter",
    Kind::Vote => "Voter",
  }
}

/// Secondary line for a record, derived from its kind-specific fields.
pub fn subtext(record: &Attestation) -> String {
  match &record.body {
    AttestationBody::Citizen(_) => DateTime::from_timestamp(record.created_at, 0)
      .map(|at| at.format("%b %Y").to_string())
      .unwrap_or_default(),
    AttestationBody::Badgeholder(b) => format!("Retro Funding Round {}", b.rpgf_round),
    AttestationBody::GovernanceContribution(g) => format!("Season {}", g.season),
    AttestationBody::RetroFundingVoter(r) => format!("Round {}", r.round),
    AttestationBody::Vote(v) => format!("Proposal {}", v.proposal_id),
  }
}

/// `GET /attestations/{address}`
///
/// Ordered by kind, then oldest first. An address with no active
/// attestations gets an empty array.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Path(address): Path<String>,
) -> Result<Json<Vec<Summary>>, ApiError<S::Error>>
where
  S: AttestationStore,
{
  let address = parse_address::<S::Error>(&address)?;

  let mut summaries = Vec::new();
  for kind in Kind::ALL {
    let records = state
      .store
      .find_active(kind, address)
      .await
      .map_err(ApiError::Store)?;
    summaries.extend(records.iter().map(Summary::from));
  }
  Ok(Json(summaries))
}
