//! Attestation records: the materialised rows of each kind's table.
//!
//! A record is written once, from a decoded `Attested` event. The only field
//! that ever changes afterwards is `revoked_at`, and only from `None` to
//! `Some`.

use serde::{Deserialize, Serialize};

use crate::{Address, Kind, Uid};

// ─── Kind-specific payloads ──────────────────────────────────────────────────

/// Payload of a citizenship attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitizenFields {
  /// `uint256`, rendered in decimal.
  pub farcaster_id:     String,
  /// How the citizen was selected (e.g. "Badgeholder", "Application").
  pub selection_method: String,
}

/// Payload of a badgeholder attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeholderFields {
  pub rpgf_round:      String,
  pub referred_by:     Address,
  pub referred_method: String,
}

/// Payload of a governance contribution attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceContributionFields {
  /// `uint256`, rendered in decimal.
  pub season:       String,
  pub contribution: String,
}

/// Payload of a retro funding voter attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetroFundingVoterFields {
  /// `uint256`, rendered in decimal.
  pub round:        String,
  pub voter_type:   String,
  pub voting_group: String,
}

/// Payload of a vote attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteFields {
  /// `uint256` proposal id, rendered in decimal.
  pub proposal_id: String,
  pub params:      String,
  /// The attestation this vote references (the event's `refUID`), not part
  /// of the ABI payload.
  pub voter_id:    Uid,
}

/// The typed payload of an attestation. The variant fixes the record's
/// [`Kind`].
///
/// Serialised untagged and flattened into [`Attestation`], so each kind's
/// fields sit next to the common columns in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttestationBody {
  Citizen(CitizenFields),
  Badgeholder(BadgeholderFields),
  GovernanceContribution(GovernanceContributionFields),
  RetroFundingVoter(RetroFundingVoterFields),
  Vote(VoteFields),
}

impl AttestationBody {
  pub fn kind(&self) -> Kind {
    match self {
      Self::Citizen(_) => Kind::Citizen,
      Self::Badgeholder(_) => Kind::Badgeholder,
      Self::GovernanceContribution(_) => Kind::GovernanceContribution,
      Self::RetroFundingVoter(_) => Kind::RetroFundingVoter,
      Self::Vote(_) => Kind::Vote,
    }
  }
}

// ─── Attestation ─────────────────────────────────────────────────────────────

/// One stored attestation of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
  pub id:         Uid,
  /// The recipient (subject) of the attestation.
  pub address:    Address,
  pub attester:   Address,
  /// Block timestamp of the `Attested` event, in seconds.
  pub created_at: i64,
  /// Block timestamp of the `Revoked` event; `None` while active.
  pub revoked_at: Option<i64>,
  #[serde(flatten)]
  pub body:       AttestationBody,
}

impl Attestation {
  pub fn kind(&self) -> Kind { self.body.kind() }

  pub fn is_active(&self) -> bool { self.revoked_at.is_none() }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn json_flattens_kind_fields() {
    let record = Attestation {
      id:         Uid::new([1; 32]),
      address:    Address::new([2; 20]),
      attester:   Address::new([3; 20]),
      created_at: 1_700_000_000,
      revoked_at: None,
      body:       AttestationBody::Citizen(CitizenFields {
        farcaster_id:     "42".into(),
        selection_method: "Application".into(),
      }),
    };

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["farcasterId"], json!("42"));
    assert_eq!(value["selectionMethod"], json!("Application"));
    assert_eq!(value["createdAt"], json!(1_700_000_000));
    assert_eq!(value["revokedAt"], serde_json::Value::Null);
    assert_eq!(value["address"], json!(format!("0x{}", "02".repeat(20))));

    let back: Attestation = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
    assert_eq!(back.kind(), Kind::Citizen);
  }
}
