//! Fixed-width hex identifiers: attestation UIDs, schema ids and addresses.
//!
//! Every identifier has exactly one canonical text form: `0x` followed by
//! lower-case hex. Parsing accepts either case and an optional `0x` prefix, so
//! mixed-case input (e.g. EIP-55 checksummed addresses) collapses to the same
//! value at the point of entry and no comparison downstream ever needs to
//! case-fold.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

macro_rules! hex_id {
  ($(#[$meta:meta])* $name:ident, $len:expr, $what:literal) => {
    $(#[$meta])*
    #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $name([u8; $len]);

    impl $name {
      /// Width in bytes.
      pub const LEN: usize = $len;

      pub const fn new(bytes: [u8; $len]) -> Self { Self(bytes) }

      pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; $len] =
          bytes.try_into().map_err(|_| Error::InvalidLength {
            what:     $what,
            expected: $len,
            actual:   bytes.len(),
          })?;
        Ok(Self(array))
      }

      pub const fn as_bytes(&self) -> &[u8; $len] { &self.0 }

      pub fn is_zero(&self) -> bool { self.0.iter().all(|b| *b == 0) }
    }

    impl FromStr for $name {
      type Err = Error;

      fn from_str(s: &str) -> Result<Self> {
        let digits = s
          .strip_prefix("0x")
          .or_else(|| s.strip_prefix("0X"))
          .unwrap_or(s);
        let mut out = [0u8; $len];
        hex::decode_to_slice(digits, &mut out).map_err(|_| Error::InvalidHex {
          what:  $what,
          value: s.to_owned(),
        })?;
        Ok(Self(out))
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
      }
    }

    impl fmt::Debug for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({self})", stringify!($name))
      }
    }

    impl From<[u8; $len]> for $name {
      fn from(bytes: [u8; $len]) -> Self { Self(bytes) }
    }

    impl Serialize for $name {
      fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
      }
    }

    impl<'de> Deserialize<'de> for $name {
      fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
      }
    }
  };
}

hex_id!(
  /// A 32-byte attestation UID, assigned by the attestation contract.
  Uid, 32, "attestation uid"
);

hex_id!(
  /// A 32-byte schema identifier.
  SchemaId, 32, "schema id"
);

hex_id!(
  /// A 20-byte account address.
  Address, 20, "address"
);
