//! Attestation kinds and their payload layouts.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Field layout ────────────────────────────────────────────────────────────

/// Primitive ABI types a payload field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
  /// `uintN`, with the bit width.
  Uint(u16),
  String,
  Address,
  Bytes32,
  Bool,
}

/// One named field of an ABI-encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
  pub name: &'static str,
  pub ty:   FieldType,
}

const fn field(name: &'static str, ty: FieldType) -> Field { Field { name, ty } }

const CITIZEN: &[Field] = &[
  field("farcasterID", FieldType::Uint(256)),
  field("selectionMethod", FieldType::String),
];

const BADGEHOLDER: &[Field] = &[
  field("rpgfRound", FieldType::String),
  field("referredBy", FieldType::Address),
  field("referredMethod", FieldType::String),
];

const GOVERNANCE_CONTRIBUTION: &[Field] = &[
  field("season", FieldType::Uint(256)),
  field("contribution", FieldType::String),
];

const RETRO_FUNDING_VOTER: &[Field] = &[
  field("round", FieldType::Uint(256)),
  field("voterType", FieldType::String),
  field("votingGroup", FieldType::String),
];

const VOTE: &[Field] = &[
  field("proposalId", FieldType::Uint(256)),
  field("params", FieldType::String),
];

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The logical entity type an attestation schema maps to. Each kind owns one
/// table in the entity store.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
  Citizen,
  Badgeholder,
  GovernanceContribution,
  RetroFundingVoter,
  Vote,
}

impl Kind {
  pub const ALL: [Kind; 5] = [
    Kind::Citizen,
    Kind::Badgeholder,
    Kind::GovernanceContribution,
    Kind::RetroFundingVoter,
    Kind::Vote,
  ];

  /// Stable identifier used in URLs, JSON keys and configuration.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn slug(self) -> &'static str {
    match self {
      Self::Citizen => "citizen",
      Self::Badgeholder => "badgeholder",
      Self::GovernanceContribution => "governance_contribution",
      Self::RetroFundingVoter => "retro_funding_voter",
      Self::Vote => "vote",
    }
  }

  pub fn from_slug(slug: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|k| k.slug() == slug)
      .ok_or_else(|| Error::UnknownKind(slug.to_owned()))
  }

  /// The ordered ABI field layout of this kind's payload.
  pub fn layout(self) -> &'static [Field] {
    match self {
      Self::Citizen => CITIZEN,
      Self::Badgeholder => BADGEHOLDER,
      Self::GovernanceContribution => GOVERNANCE_CONTRIBUTION,
      Self::RetroFundingVoter => RETRO_FUNDING_VOTER,
      Self::Vote => VOTE,
    }
  }
}

impl fmt::Display for Kind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.slug())
  }
}

impl FromStr for Kind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::from_slug(s) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slugs_round_trip() {
    for kind in Kind::ALL {
      assert_eq!(Kind::from_slug(kind.slug()).unwrap(), kind);
      let json = serde_json::to_string(&kind).unwrap();
      assert_eq!(json, format!("\"{}\"", kind.slug()));
    }
  }

  #[test]
  fn unknown_slug_is_rejected() {
    assert!(matches!(
      Kind::from_slug("delegate"),
      Err(Error::UnknownKind(s)) if s == "delegate"
    ));
  }

  #[test]
  fn every_layout_is_non_empty() {
    assert!(Kind::ALL.iter().all(|k| !k.layout().is_empty()));
  }
}
