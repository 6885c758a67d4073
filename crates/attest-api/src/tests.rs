//! Router tests against an in-memory `SqliteStore`.

use std::sync::Arc;

use attest_core::{
  Address, Kind, Uid,
  registry::COMMUNITY_ATTESTER,
  record::{
    Attestation, AttestationBody, BadgeholderFields, CitizenFields,
    GovernanceContributionFields,
  },
  store::AttestationStore,
};
use attest_store_sqlite::SqliteStore;
use axum::{
  body::Body,
  http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiConfig, api_router};

const ALICE: &str = "0x00000000000000000000000000000000000a11ce";
const BOB: &str = "0x0000000000000000000000000000000000000b0b";
const COMMUNITY: &str = "0x00000000000000000000000000000000c0ffee00";

fn addr(s: &str) -> Address { s.parse().unwrap() }

fn citizen(id: u8, recipient: &str) -> Attestation {
  Attestation {
    id: Uid::new([id; 32]),
    address: addr(recipient),
    attester: Address::new([0xaa; 20]),
    created_at: 1_736_899_200, // 2025-01-15T00:00:00Z
    revoked_at: None,
    body: AttestationBody::Citizen(CitizenFields {
      farcaster_id:     "7".into(),
      selection_method: "Application".into(),
    }),
  }
}

fn badgeholder(id: u8, recipient: &str) -> Attestation {
  Attestation {
    id: Uid::new([id; 32]),
    address: addr(recipient),
    attester: Address::new([0xaa; 20]),
    created_at: 1_700_000_000,
    revoked_at: None,
    body: AttestationBody::Badgeholder(BadgeholderFields {
      rpgf_round:      "3".into(),
      referred_by:     Address::default(),
      referred_method: "Nomination".into(),
    }),
  }
}

fn contribution(id: u8, recipient: &str, attester: &str) -> Attestation {
  Attestation {
    id: Uid::new([id; 32]),
    address: addr(recipient),
    attester: addr(attester),
    created_at: 1_700_000_000,
    revoked_at: None,
    body: AttestationBody::GovernanceContribution(GovernanceContributionFields {
      season:       "5".into(),
      contribution: "Grants Council".into(),
    }),
  }
}

async fn seeded(records: Vec<Attestation>) -> Arc<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  for record in records {
    store.insert(record).await.unwrap();
  }
  Arc::new(store)
}

async fn get(store: Arc<SqliteStore>, config: ApiConfig, uri: &str) -> (StatusCode, Value) {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  let resp = api_router(store, config).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

// ── GET /{kind}/{address} ────────────────────────────────────────────────────

#[tokio::test]
async fn entity_lookup_returns_active_records_keyed_by_kind() {
  let store = seeded(vec![citizen(1, ALICE)]).await;

  let (status, body) = get(store, ApiConfig::default(), &format!("/citizen/{ALICE}")).await;
  assert_eq!(status, StatusCode::OK);

  let records = body["citizen"].as_array().unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0]["address"], ALICE);
  assert_eq!(records[0]["farcasterId"], "7");
  assert_eq!(records[0]["selectionMethod"], "Application");
}

#[tokio::test]
async fn entity_lookup_is_case_insensitive() {
  let store = seeded(vec![citizen(1, ALICE)]).await;
  let upper = format!("0x{}", ALICE[2..].to_uppercase());

  let (status, _) = get(store, ApiConfig::default(), &format!("/citizen/{upper}")).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn entity_lookup_empty_is_404() {
  let store = seeded(vec![citizen(1, ALICE)]).await;

  let (status, body) = get(store, ApiConfig::default(), &format!("/badgeholder/{ALICE}")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body, json!({ "error": "badgeholder not found" }));
}

#[tokio::test]
async fn entity_lookup_unknown_kind_is_404() {
  let store = seeded(vec![]).await;

  let (status, body) = get(store, ApiConfig::default(), &format!("/wizard/{ALICE}")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body, json!({ "error": "wizard not found" }));
}

#[tokio::test]
async fn entity_lookup_bad_address_is_400() {
  let store = seeded(vec![]).await;

  let (status, body) = get(store, ApiConfig::default(), "/citizen/0x1234").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn entity_lookup_skips_revoked() {
  let store = seeded(vec![citizen(1, ALICE)]).await;
  store.revoke(Kind::Citizen, Uid::new([1; 32]), 1_800_000_000).await.unwrap();

  let (status, _) = get(store, ApiConfig::default(), &format!("/citizen/{ALICE}")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── GET /attestations/{address} ──────────────────────────────────────────────

#[tokio::test]
async fn attestations_list_active_across_kinds() {
  let store = seeded(vec![citizen(1, ALICE), badgeholder(2, ALICE)]).await;
  store.revoke(Kind::Badgeholder, Uid::new([2; 32]), 1_800_000_000).await.unwrap();

  let (status, body) = get(store, ApiConfig::default(), &format!("/attestations/{ALICE}")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!([{
      "id":      Uid::new([1; 32]).to_string(),
      "entity":  "citizen",
      "address": ALICE,
      "name":    "Citizen",
      "subtext": "Jan 2025",
    }])
  );
}

#[tokio::test]
async fn attestations_orders_by_kind() {
  let store = seeded(vec![
    contribution(3, ALICE, COMMUNITY),
    badgeholder(2, ALICE),
    citizen(1, ALICE),
  ])
  .await;

  let (_, body) = get(store, ApiConfig::default(), &format!("/attestations/{ALICE}")).await;
  let entities: Vec<_> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["entity"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(entities, ["citizen", "badgeholder", "governance_contribution"]);
  assert_eq!(body[1]["subtext"], "Retro Funding Round 3");
  assert_eq!(body[2]["subtext"], "Season 5");
}

#[tokio::test]
async fn attestations_unknown_address_is_empty() {
  let store = seeded(vec![citizen(1, ALICE)]).await;

  let (status, body) = get(store, ApiConfig::default(), &format!("/attestations/{BOB}")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));
}

// ── GET /entities/aggregated ─────────────────────────────────────────────────

#[tokio::test]
async fn aggregated_dedupes_and_sorts() {
  let store = seeded(vec![
    citizen(1, BOB),
    citizen(2, ALICE),
    citizen(3, BOB),
    badgeholder(4, ALICE),
  ])
  .await;
  store.revoke(Kind::Badgeholder, Uid::new([4; 32]), 1_800_000_000).await.unwrap();

  let (status, body) = get(store, ApiConfig::default(), "/entities/aggregated").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({
      "citizen":                 [{ "address": BOB }, { "address": ALICE }],
      "badgeholder":             [],
      "governance_contribution": [],
      "retro_funding_voter":     [],
      "community_contributors":  [],
    })
  );
}

#[tokio::test]
async fn aggregated_community_contributors_follow_configured_attester() {
  let store = seeded(vec![
    contribution(1, ALICE, COMMUNITY),
    contribution(2, BOB, "0x00000000000000000000000000000000000000ff"),
  ])
  .await;
  let config = ApiConfig { community_attester: addr(COMMUNITY) };

  let (_, body) = get(store, config, "/entities/aggregated").await;
  assert_eq!(
    body["governance_contribution"],
    json!([{ "address": BOB }, { "address": ALICE }])
  );
  assert_eq!(body["community_contributors"], json!([{ "address": ALICE }]));
}

#[tokio::test]
async fn aggregated_defaults_to_builtin_community_attester() {
  let foundation = COMMUNITY_ATTESTER.to_string();
  let store = seeded(vec![
    contribution(1, ALICE, COMMUNITY),
    contribution(2, BOB, &foundation),
  ])
  .await;

  let (_, body) = get(store, ApiConfig::default(), "/entities/aggregated").await;
  assert_eq!(body["community_contributors"], json!([{ "address": BOB }]));
}
