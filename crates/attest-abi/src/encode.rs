//! Payload encoding: typed body → ABI bytes.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;
use attest_core::{Address, record::AttestationBody};

use crate::{Error, Result};

fn string(s: &str) -> DynSolValue { DynSolValue::String(s.to_owned()) }

fn address(a: &Address) -> DynSolValue {
  DynSolValue::Address(alloy_primitives::Address::from(*a.as_bytes()))
}

/// A `uint256` from its decimal rendering.
fn uint(field: &'static str, s: &str) -> Result<DynSolValue> {
  let v = U256::from_str_radix(s, 10).map_err(|_| Error::InvalidNumber {
    field,
    value: s.to_owned(),
  })?;
  Ok(DynSolValue::Uint(v, 256))
}

pub(crate) fn encode(body: &AttestationBody) -> Result<Vec<u8>> {
  let values = match body {
    AttestationBody::Citizen(c) => {
      vec![uint("farcasterID", &c.farcaster_id)?, string(&c.selection_method)]
    }
    AttestationBody::Badgeholder(b) => vec![
      string(&b.rpgf_round),
      address(&b.referred_by),
      string(&b.referred_method),
    ],
    AttestationBody::GovernanceContribution(g) => {
      vec![uint("season", &g.season)?, string(&g.contribution)]
    }
    AttestationBody::RetroFundingVoter(r) => vec![
      uint("round", &r.round)?,
      string(&r.voter_type),
      string(&r.voting_group),
    ],
    AttestationBody::Vote(v) => {
      vec![uint("proposalId", &v.proposal_id)?, string(&v.params)]
    }
  };
  Ok(DynSolValue::Tuple(values).abi_encode_params())
}
