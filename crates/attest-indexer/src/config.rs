//! Runtime configuration, deserialised from `config.toml` layered under
//! `ATTEST__*` environment variables.

use std::{path::PathBuf, time::Duration};

use attest_api::ApiConfig;
use attest_core::{
  Address,
  registry::{SchemaConfig, SchemaRegistry},
};
use serde::Deserialize;

use crate::ingest::RetryPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  pub store_path:         PathBuf,
  #[serde(default = "attest_api::default_community_attester")]
  pub community_attester: Address,
  pub chain:              ChainConfig,
  #[serde(default)]
  pub retry:              RetryConfig,
  /// Replaces the built-in schema table when non-empty.
  #[serde(default)]
  pub schemas:            Vec<SchemaConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
  pub rpc_url:            String,
  /// Address of the attestation registry contract.
  pub contract:           Address,
  #[serde(default)]
  pub start_block:        u64,
  #[serde(default = "default_confirmations")]
  pub confirmations:      u64,
  #[serde(default = "default_batch_size")]
  pub batch_size:         u64,
  #[serde(default = "default_poll_interval_secs")]
  pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
  pub max_attempts:       u32,
  pub initial_backoff_ms: u64,
  pub max_backoff_ms:     u64,
}

impl Default for RetryConfig {
  fn default() -> Self {
    let policy = RetryPolicy::default();
    Self {
      max_attempts:       policy.max_attempts,
      initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
      max_backoff_ms:     policy.max_backoff.as_millis() as u64,
    }
  }
}

impl From<&RetryConfig> for RetryPolicy {
  fn from(config: &RetryConfig) -> Self {
    Self {
      max_attempts:    config.max_attempts,
      initial_backoff: Duration::from_millis(config.initial_backoff_ms),
      max_backoff:     Duration::from_millis(config.max_backoff_ms),
    }
  }
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 42069 }

fn default_confirmations() -> u64 { 12 }

fn default_batch_size() -> u64 { 2000 }

fn default_poll_interval_secs() -> u64 { 4 }

impl IndexerConfig {
  /// The configured schema table, or the built-in one if none is given.
  pub fn registry(&self) -> attest_core::Result<SchemaRegistry> {
    if self.schemas.is_empty() {
      SchemaRegistry::builtin()
    } else {
      SchemaRegistry::from_config(&self.schemas)
    }
  }

  pub fn api(&self) -> ApiConfig {
    ApiConfig { community_attester: self.community_attester }
  }

  pub fn poll_interval(&self) -> Duration {
    Duration::from_secs(self.chain.poll_interval_secs)
  }
}
