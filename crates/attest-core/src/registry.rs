//! The schema registry: schema id → kind + attester allow-list.
//!
//! Built once at startup and never mutated afterwards; share it behind an
//! `Arc`. The payload layout is not configurable per schema. It is fixed by
//! the [`Kind`] a schema maps to, so a registry entry can only ever point a
//! schema at one of the layouts the decoder knows.

use std::collections::{HashMap, hash_map::Entry};

use serde::Deserialize;

use crate::{
  Address, Error, Kind, Result, SchemaId,
  kind::Field,
};

/// Attester of the foundation-issued schemas in the built-in table.
const FOUNDATION_ATTESTER: &str = "0x621477dba416e12df7ff0d48e14c4d20dc85d7d9";

/// Default issuer of the governance contributions reported as community
/// contributors. Governance contributions are open to any attester, so the
/// snapshot only trusts the foundation's.
pub const COMMUNITY_ATTESTER: Address = Address::new([
  0x62, 0x14, 0x77, 0xdb, 0xa4, 0x16, 0xe1, 0x2d, 0xf7, 0xff,
  0x0d, 0x48, 0xe1, 0x4c, 0x4d, 0x20, 0xdc, 0x85, 0xd7, 0xd9,
]);

/// `(schema id, kind, allow-listed attesters)`. An empty attester list means
/// the schema is open to any issuer.
const BUILTIN: &[(&str, Kind, &[&str])] = &[
  (
    "0xc35634c4ca8a54dce0a2af61a9a9a5a3067398cb3916b133238c4f6ba721bc8a",
    Kind::Citizen,
    &[FOUNDATION_ATTESTER],
  ),
  (
    "0xfdcfdad2dbe7489e0ce56b260348b7f14e8365a8a325aef9834818c00d46b31b",
    Kind::Badgeholder,
    &[FOUNDATION_ATTESTER],
  ),
  (
    "0x3743be2afa818ee40304516c153427be55931f238d961af5d98653a93192cdb3",
    Kind::GovernanceContribution,
    &[],
  ),
  (
    "0x41513aa7b99bfea09d389c74aacedaeb13c28fb748569e9e2400109cbe284ee5",
    Kind::RetroFundingVoter,
    &[FOUNDATION_ATTESTER],
  ),
  (
    "0xec3674d93b7007e918cf91ddad6be8a0ba6b9aba22ecd2d1d4ad73bb1fa2d2ee",
    Kind::Vote,
    &[],
  ),
];

// ─── Entry ───────────────────────────────────────────────────────────────────

/// A resolved schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
  pub id:        SchemaId,
  pub kind:      Kind,
  /// `None` admits any attester.
  pub attesters: Option<Vec<Address>>,
}

impl SchemaEntry {
  pub fn layout(&self) -> &'static [Field] { self.kind.layout() }

  /// Whether `attester` may issue attestations under this schema.
  pub fn permits(&self, attester: &Address) -> bool {
    self
      .attesters
      .as_ref()
      .is_none_or(|allowed| allowed.contains(attester))
  }
}

/// One `[[schemas]]` entry as it appears in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
  pub id:        String,
  pub kind:      String,
  #[serde(default)]
  pub attesters: Option<Vec<String>>,
}

impl SchemaConfig {
  fn to_entry(&self) -> Result<SchemaEntry> {
    let attesters = self
      .attesters
      .as_ref()
      .map(|list| list.iter().map(|a| a.parse()).collect::<Result<Vec<_>>>())
      .transpose()?;
    Ok(SchemaEntry {
      id: self.id.parse()?,
      kind: Kind::from_slug(&self.kind)?,
      attesters,
    })
  }
}

// ─── Registry ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
  entries: HashMap<SchemaId, SchemaEntry>,
}

impl SchemaRegistry {
  /// Build a registry from `entries`. A schema id may appear only once.
  pub fn new(entries: impl IntoIterator<Item = SchemaEntry>) -> Result<Self> {
    let mut map = HashMap::new();
    for entry in entries {
      match map.entry(entry.id) {
        Entry::Occupied(_) => return Err(Error::DuplicateSchema(entry.id)),
        Entry::Vacant(slot) => {
          slot.insert(entry);
        }
      }
    }
    Ok(Self { entries: map })
  }

  pub fn from_config(schemas: &[SchemaConfig]) -> Result<Self> {
    let entries = schemas
      .iter()
      .map(SchemaConfig::to_entry)
      .collect::<Result<Vec<_>>>()?;
    Self::new(entries)
  }

  /// The production schema table.
  pub fn builtin() -> Result<Self> {
    let entries = BUILTIN
      .iter()
      .map(|(id, kind, attesters)| -> Result<SchemaEntry> {
        let attesters = if attesters.is_empty() {
          None
        } else {
          Some(attesters.iter().map(|a| a.parse()).collect::<Result<Vec<_>>>()?)
        };
        Ok(SchemaEntry { id: id.parse()?, kind: *kind, attesters })
      })
      .collect::<Result<Vec<_>>>()?;
    Self::new(entries)
  }

  /// Look up a schema. Unknown ids are an error: the caller must not guess a
  /// layout for foreign attestation data.
  pub fn resolve(&self, id: &SchemaId) -> Result<&SchemaEntry> {
    self.entries.get(id).ok_or(Error::UnknownSchema(*id))
  }

  pub fn entries(&self) -> impl Iterator<Item = &SchemaEntry> { self.entries.values() }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
