//! Handler for `GET /entities/aggregated`: a snapshot of every address that
//! currently holds each kind of attestation.

use std::collections::BTreeSet;

use attest_core::{Address, Kind, record::Attestation, store::AttestationStore};
use axum::{Json, extract::State};
use serde::Serialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressEntry {
  pub address: Address,
}

/// Response body. Each list is de-duplicated and sorted by address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregated {
  pub citizen:                 Vec<AddressEntry>,
  pub badgeholder:             Vec<AddressEntry>,
  pub governance_contribution: Vec<AddressEntry>,
  pub retro_funding_voter:     Vec<AddressEntry>,
  /// Governance contributions issued by the configured community attester.
  pub community_contributors:  Vec<AddressEntry>,
}

fn entries<'a>(records: impl IntoIterator<Item = &'a Attestation>) -> Vec<AddressEntry> {
  records
    .into_iter()
    .map(|r| r.address)
    .collect::<BTreeSet<_>>()
    .into_iter()
    .map(|address| AddressEntry { address })
    .collect()
}

/// `GET /entities/aggregated`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Aggregated>, ApiError<S::Error>>
where
  S: AttestationStore,
{
  let store = &state.store;
  let list = |kind| async move { store.list_active(kind).await.map_err(ApiError::Store) };

  let citizens     = list(Kind::Citizen).await?;
  let badgeholders = list(Kind::Badgeholder).await?;
  let governance   = list(Kind::GovernanceContribution).await?;
  let voters       = list(Kind::RetroFundingVoter).await?;

  let attester = state.config.community_attester;
  let community = entries(governance.iter().filter(|r| r.attester == attester));

  Ok(Json(Aggregated {
    citizen:                 entries(&citizens),
    badgeholder:             entries(&badgeholders),
    governance_contribution: entries(&governance),
    retro_funding_voter:     entries(&voters),
    community_contributors:  community,
  }))
}
