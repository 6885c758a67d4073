//! Core types and trait definitions for the attestation indexer.
//!
//! This crate is deliberately free of chain, HTTP and database dependencies.
//! The codec, store, API and indexer crates all depend on it.

pub mod error;
pub mod ids;
pub mod kind;
pub mod record;
pub mod registry;
pub mod store;

pub use error::{Error, Result};
pub use ids::{Address, SchemaId, Uid};
pub use kind::Kind;
