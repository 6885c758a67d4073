//! JSON-RPC adapter for the EAS attestation registry contract.

use std::collections::HashMap;

use alloy::{
  primitives::{self, B256},
  providers::{Provider, ProviderBuilder, RootProvider},
  rpc::types::{BlockNumberOrTag, BlockTransactionsKind, Filter, Log},
  sol,
  sol_types::SolEvent,
  transports::http::{Client, Http},
};
use attest_core::{Address, SchemaId, Uid, store::EventPosition};
use tracing::debug;

use crate::{
  error::RpcError,
  source::{AttestationReader, ChainEvent, EventKind, EventSource, FetchedAttestation},
};

sol! {
  #[sol(rpc)]
  interface IEAS {
    struct Attestation {
      bytes32 uid;
      bytes32 schema;
      uint64 time;
      uint64 expirationTime;
      uint64 revocationTime;
      bytes32 refUID;
      address recipient;
      address attester;
      bool revocable;
      bytes data;
    }

    event Attested(address indexed recipient, address indexed attester, bytes32 uid, bytes32 indexed schemaUID);
    event Revoked(address indexed recipient, address indexed attester, bytes32 uid, bytes32 indexed schemaUID);

    function getAttestation(bytes32 uid) external view returns (Attestation memory);
  }
}

fn to_address(a: primitives::Address) -> Address { Address::new(a.0.0) }

// ─── Chain ───────────────────────────────────────────────────────────────────

/// An HTTP connection to one EAS contract.
#[derive(Clone)]
pub struct RpcChain {
  provider: RootProvider<Http<Client>>,
  contract: primitives::Address,
}

impl RpcChain {
  pub fn new(rpc_url: &str, contract: Address) -> Result<Self, RpcError> {
    let url = rpc_url
      .parse()
      .map_err(|_| RpcError::Url(rpc_url.to_owned()))?;

    Ok(Self {
      provider: ProviderBuilder::new().on_http(url),
      contract: primitives::Address::from(*contract.as_bytes()),
    })
  }

  /// An event source over this contract's logs, starting at `start_block`.
  pub fn events(&self, start_block: u64, confirmations: u64, batch_size: u64) -> RpcEventSource {
    RpcEventSource {
      chain: self.clone(),
      next_block: start_block,
      confirmations,
      batch_size: batch_size.max(1),
    }
  }

  async fn block_timestamp(
    &self,
    block_number: u64,
    cache: &mut HashMap<u64, u64>,
  ) -> Result<u64, RpcError> {
    if let Some(ts) = cache.get(&block_number) {
      return Ok(*ts);
    }
    let block = self
      .provider
      .get_block_by_number(BlockNumberOrTag::Number(block_number), BlockTransactionsKind::Hashes)
      .await?
      .ok_or(RpcError::MissingBlock(block_number))?;
    let ts = block.header.timestamp;
    cache.insert(block_number, ts);
    Ok(ts)
  }

  async fn to_event(
    &self,
    log: &Log,
    timestamps: &mut HashMap<u64, u64>,
  ) -> Result<ChainEvent, RpcError> {
    let block_number = log.block_number.ok_or(RpcError::MissingField("block_number"))?;
    let log_index = log.log_index.ok_or(RpcError::MissingField("log_index"))?;
    let topic = log.topic0().copied();

    let (kind, recipient, attester, uid, schema) = if topic == Some(IEAS::Attested::SIGNATURE_HASH) {
      let e = IEAS::Attested::decode_log(log.as_ref(), true)?.data;
      (EventKind::Attested, e.recipient, e.attester, e.uid, e.schemaUID)
    } else if topic == Some(IEAS::Revoked::SIGNATURE_HASH) {
      let e = IEAS::Revoked::decode_log(log.as_ref(), true)?.data;
      (EventKind::Revoked, e.recipient, e.attester, e.uid, e.schemaUID)
    } else {
      return Err(RpcError::UnexpectedLog { block_number, log_index });
    };

    let ts = match log.block_timestamp {
      Some(ts) => ts,
      None => self.block_timestamp(block_number, timestamps).await?,
    };

    Ok(ChainEvent {
      kind,
      schema: SchemaId::new(schema.0),
      uid: Uid::new(uid.0),
      recipient: to_address(recipient),
      attester: to_address(attester),
      block_timestamp: i64::try_from(ts).map_err(|_| RpcError::Timestamp(ts))?,
      position: EventPosition::new(block_number, log_index),
    })
  }
}

impl AttestationReader for RpcChain {
  type Error = RpcError;

  async fn fetch(&self, uid: Uid) -> Result<FetchedAttestation, RpcError> {
    let eas = IEAS::new(self.contract, self.provider.clone());
    let attestation = eas.getAttestation(B256::from(*uid.as_bytes())).call().await?._0;

    Ok(FetchedAttestation {
      payload: attestation.data.to_vec(),
      ref_uid: Uid::new(attestation.refUID.0),
    })
  }
}

// ─── Event source ────────────────────────────────────────────────────────────

/// Polls `Attested` / `Revoked` logs in block ranges, staying
/// `confirmations` blocks behind the head.
pub struct RpcEventSource {
  chain:         RpcChain,
  /// First block not yet scanned.
  next_block:    u64,
  confirmations: u64,
  batch_size:    u64,
}

impl EventSource for RpcEventSource {
  type Error = RpcError;

  async fn next_batch(
    &mut self,
    after: Option<EventPosition>,
  ) -> Result<Option<Vec<ChainEvent>>, RpcError> {
    // The checkpoint block may hold unprocessed logs after its index.
    if let Some(after) = after {
      self.next_block = self.next_block.max(after.block_number);
    }

    let head = self.chain.provider.get_block_number().await?;
    let safe = head.saturating_sub(self.confirmations);
    if self.next_block > safe {
      return Ok(Some(Vec::new()));
    }

    let from = self.next_block;
    let to = safe.min(from.saturating_add(self.batch_size - 1));
    let filter = Filter::new()
      .address(self.chain.contract)
      .event_signature(vec![IEAS::Attested::SIGNATURE_HASH, IEAS::Revoked::SIGNATURE_HASH])
      .from_block(from)
      .to_block(to);
    let logs = self.chain.provider.get_logs(&filter).await?;

    let mut timestamps = HashMap::new();
    let mut events = Vec::with_capacity(logs.len());
    for log in &logs {
      let event = self.chain.to_event(log, &mut timestamps).await?;
      if after.is_none_or(|a| event.position > a) {
        events.push(event);
      }
    }
    events.sort_by_key(|e| e.position);

    debug!(from, to, head, events = events.len(), "scanned block range");
    self.next_block = to + 1;
    Ok(Some(events))
  }
}
