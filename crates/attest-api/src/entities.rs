//! Handler for `GET /{kind}/{address}`.
//!
//! Returns the active records of one kind for one recipient, wrapped in an
//! object keyed by the kind's slug:
//!
//! ```json
//! { "citizen": [ { "id": "0x…", "address": "0x…", ... } ] }
//! ```
//!
//! An unknown kind and an empty result are both `404`.

use std::collections::BTreeMap;

use attest_core::{Kind, record::Attestation, store::AttestationStore};
use axum::{
  Json,
  extract::{Path, State},
};

use crate::{ApiState, error::ApiError, parse_address};

/// `GET /{kind}/{address}`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Path((slug, address)): Path<(String, String)>,
) -> Result<Json<BTreeMap<&'static str, Vec<Attestation>>>, ApiError<S::Error>>
where
  S: AttestationStore,
{
  let not_found = || ApiError::<S::Error>::NotFound(format!("{slug} not found"));

  let kind = Kind::from_slug(&slug).map_err(|_| not_found())?;
  let address = parse_address::<S::Error>(&address)?;

  let records = state
    .store
    .find_active(kind, address)
    .await
    .map_err(ApiError::Store)?;
  if records.is_empty() {
    return Err(not_found());
  }

  Ok(Json(BTreeMap::from([(kind.slug(), records)])))
}
