//! Ingestion side of the attestation indexer.
//!
//! [`ingest::Indexer`] consumes ordered registry events from an
//! [`source::EventSource`], fetches and decodes each attestation through an
//! [`source::AttestationReader`], and writes records to an
//! [`attest_core::store::AttestationStore`]. [`rpc`] provides the JSON-RPC
//! implementations of both seams.

pub mod config;
pub mod error;
pub mod ingest;
pub mod rpc;
pub mod source;

pub use error::{IngestError, Result, RpcError};
pub use ingest::{Indexer, Outcome, RetryPolicy};
