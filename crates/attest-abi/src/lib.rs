//! ABI codec for attestation payloads.
//!
//! Converts between the opaque `data` bytes carried by an attestation and the
//! typed [`AttestationBody`] of its [`Kind`]. Pure synchronous; no chain,
//! HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use attest_core::{Kind, Uid};
//!
//! # let payload: Vec<u8> = vec![];
//! let body = attest_abi::decode(Kind::Citizen, &payload, Uid::default()).unwrap();
//! assert_eq!(body.kind(), Kind::Citizen);
//! ```

mod decode;
mod encode;
pub mod error;

use alloy_dyn_abi::DynSolType;
use attest_core::{
  Kind, Uid,
  kind::{Field, FieldType},
  record::AttestationBody,
};

pub use error::{Error, Result};

/// Decode `payload` as the ABI tuple declared by `kind`'s layout.
///
/// `ref_uid` is the attestation's `refUID`. It is not part of the payload and
/// is only consumed by [`Kind::Vote`], where it becomes the `voter_id`.
pub fn decode(kind: Kind, payload: &[u8], ref_uid: Uid) -> Result<AttestationBody> {
  decode::decode(kind, payload, ref_uid)
}

/// ABI-encode `body` as its kind's payload tuple. Inverse of [`decode`];
/// out-of-band fields (a vote's `voter_id`) are not encoded.
pub fn encode(body: &AttestationBody) -> Result<Vec<u8>> { encode::encode(body) }

/// The `DynSolType` tuple for `kind`'s layout.
pub fn tuple_type(kind: Kind) -> DynSolType {
  DynSolType::Tuple(kind.layout().iter().map(field_type).collect())
}

fn field_type(field: &Field) -> DynSolType {
  match field.ty {
    FieldType::Uint(bits) => DynSolType::Uint(usize::from(bits)),
    FieldType::String => DynSolType::String,
    FieldType::Address => DynSolType::Address,
    FieldType::Bytes32 => DynSolType::FixedBytes(32),
    FieldType::Bool => DynSolType::Bool,
  }
}
