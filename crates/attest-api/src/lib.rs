//! Read-only JSON API over the attestation entity store.
//!
//! Exposes an axum [`Router`] backed by any
//! [`attest_core::store::AttestationStore`]. Transport concerns (TLS, request
//! tracing) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(attest_api::api_router(store.clone(), api_config))
//! ```

pub mod aggregated;
pub mod attestations;
pub mod entities;
pub mod error;

use std::sync::Arc;

use attest_core::{Address, registry::COMMUNITY_ATTESTER, store::AttestationStore};
use axum::{Router, routing::get};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Query-side settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Attester whose governance contributions are reported as
  /// `community_contributors` in the aggregated snapshot.
  #[serde(default = "default_community_attester")]
  pub community_attester: Address,
}

pub fn default_community_attester() -> Address { COMMUNITY_ATTESTER }

impl Default for ApiConfig {
  fn default() -> Self { Self { community_attester: COMMUNITY_ATTESTER } }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ApiConfig>,
}

// Manual impl: the store itself need not be `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), config: self.config.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged or nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>, config: ApiConfig) -> Router<()>
where
  S: AttestationStore + 'static,
{
  let state = ApiState { store, config: Arc::new(config) };

  Router::new()
    .route("/entities/aggregated", get(aggregated::handler::<S>))
    .route("/attestations/{address}", get(attestations::handler::<S>))
    .route("/{kind}/{address}", get(entities::handler::<S>))
    .with_state(state)
}

/// Parse a path address, accepting either case and an optional `0x`.
pub(crate) fn parse_address<E>(raw: &str) -> Result<Address, ApiError<E>> {
  raw
    .parse()
    .map_err(|e: attest_core::Error| ApiError::BadRequest(e.to_string()))
}

#[cfg(test)]
mod tests;
