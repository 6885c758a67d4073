//! Payload decoding: ABI bytes → `DynSolValue` tuple → typed body.
//!
//! Pipeline:
//!   payload bytes
//!     └─ tuple_type(kind).abi_decode_params() → DynSolValue::Tuple
//!          └─ Fields cursor, walked in layout order
//!               └─ one decoder per kind → AttestationBody

use alloy_dyn_abi::DynSolValue;
use attest_core::{
  Address, Kind, Uid,
  kind::Field,
  record::{
    AttestationBody, BadgeholderFields, CitizenFields, GovernanceContributionFields,
    RetroFundingVoterFields, VoteFields,
  },
};

use crate::{Error, Result, tuple_type};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Walks decoded values alongside the layout that produced them, so every
/// conversion error names the offending field.
struct Fields {
  layout: &'static [Field],
  values: std::vec::IntoIter<DynSolValue>,
  pos:    usize,
}

impl Fields {
  fn new(kind: Kind, value: DynSolValue) -> Result<Self> {
    let layout = kind.layout();
    let values = match value {
      DynSolValue::Tuple(values) => values,
      single => vec![single],
    };
    if values.len() != layout.len() {
      return Err(Error::FieldCount {
        expected: layout.len(),
        actual:   values.len(),
      });
    }
    Ok(Self { layout, values: values.into_iter(), pos: 0 })
  }

  fn next(&mut self) -> Result<(&'static str, DynSolValue)> {
    match (self.layout.get(self.pos), self.values.next()) {
      (Some(field), Some(value)) => {
        self.pos += 1;
        Ok((field.name, value))
      }
      _ => Err(Error::FieldCount {
        expected: self.layout.len(),
        actual:   self.pos,
      }),
    }
  }

  /// A `uint256` kept at full width, rendered in decimal.
  fn uint(&mut self) -> Result<String> {
    let (field, value) = self.next()?;
    match value {
      DynSolValue::Uint(v, _) => Ok(v.to_string()),
      _ => Err(Error::TypeMismatch { field, expected: "uint" }),
    }
  }

  fn string(&mut self) -> Result<String> {
    let (field, value) = self.next()?;
    match value {
      DynSolValue::String(s) => Ok(s),
      _ => Err(Error::TypeMismatch { field, expected: "string" }),
    }
  }

  fn address(&mut self) -> Result<Address> {
    let (field, value) = self.next()?;
    match value {
      DynSolValue::Address(a) => Ok(Address::new(a.0.0)),
      _ => Err(Error::TypeMismatch { field, expected: "address" }),
    }
  }
}

// ─── Per-kind decoders ───────────────────────────────────────────────────────

fn citizen(f: &mut Fields) -> Result<CitizenFields> {
  Ok(CitizenFields {
    farcaster_id:     f.uint()?,
    selection_method: f.string()?,
  })
}

fn badgeholder(f: &mut Fields) -> Result<BadgeholderFields> {
  Ok(BadgeholderFields {
    rpgf_round:      f.string()?,
    referred_by:     f.address()?,
    referred_method: f.string()?,
  })
}

fn governance_contribution(f: &mut Fields) -> Result<GovernanceContributionFields> {
  Ok(GovernanceContributionFields {
    season:       f.uint()?,
    contribution: f.string()?,
  })
}

fn retro_funding_voter(f: &mut Fields) -> Result<RetroFundingVoterFields> {
  Ok(RetroFundingVoterFields {
    round:        f.uint()?,
    voter_type:   f.string()?,
    voting_group: f.string()?,
  })
}

fn vote(f: &mut Fields, ref_uid: Uid) -> Result<VoteFields> {
  Ok(VoteFields {
    proposal_id: f.uint()?,
    params:      f.string()?,
    voter_id:    ref_uid,
  })
}

// ─── Entry point ─────────────────────────────────────────────────────────────

pub(crate) fn decode(kind: Kind, payload: &[u8], ref_uid: Uid) -> Result<AttestationBody> {
  let value = tuple_type(kind).abi_decode_params(payload)?;
  let mut f = Fields::new(kind, value)?;

  let body = match kind {
    Kind::Citizen => AttestationBody::Citizen(citizen(&mut f)?),
    Kind::Badgeholder => AttestationBody::Badgeholder(badgeholder(&mut f)?),
    Kind::GovernanceContribution => {
      AttestationBody::GovernanceContribution(governance_contribution(&mut f)?)
    }
    Kind::RetroFundingVoter => {
      AttestationBody::RetroFundingVoter(retro_funding_voter(&mut f)?)
    }
    Kind::Vote => AttestationBody::Vote(vote(&mut f, ref_uid)?),
  };
  Ok(body)
}
