//! Integration tests for `SqliteStore` against an in-memory database.

use attest_core::{
  Address, Kind, Uid,
  record::{
    Attestation, AttestationBody, BadgeholderFields, CitizenFields,
    GovernanceContributionFields, VoteFields,
  },
  store::{AttestationStore, EventPosition, RevokeOutcome, StoreError as _},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn addr(n: u8) -> Address { Address::new([n; 20]) }

fn uid(n: u8) -> Uid { Uid::new([n; 32]) }

fn citizen(id: u8, recipient: Address, created_at: i64) -> Attestation {
  Attestation {
    id: uid(id),
    address: recipient,
    attester: addr(0xaa),
    created_at,
    revoked_at: None,
    body: AttestationBody::Citizen(CitizenFields {
      farcaster_id:     "1234".into(),
      selection_method: "Application".into(),
    }),
  }
}

fn badgeholder(id: u8, recipient: Address) -> Attestation {
  Attestation {
    id: uid(id),
    address: recipient,
    attester: addr(0xaa),
    created_at: 1_700_000_000,
    revoked_at: None,
    body: AttestationBody::Badgeholder(BadgeholderFields {
      rpgf_round:      "5".into(),
      referred_by:     addr(0x0b),
      referred_method: "Nomination".into(),
    }),
  }
}

// ─── Insert / read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_active() {
  let s = store().await;
  let alice = addr(1);

  s.insert(citizen(1, alice, 1_700_000_000)).await.unwrap();

  let found = s.find_active(Kind::Citizen, alice).await.unwrap();
  assert_eq!(found, vec![citizen(1, alice, 1_700_000_000)]);

  // Other kinds and other recipients see nothing.
  assert!(s.find_active(Kind::Badgeholder, alice).await.unwrap().is_empty());
  assert!(s.find_active(Kind::Citizen, addr(2)).await.unwrap().is_empty());
}

#[tokio::test]
async fn find_active_orders_oldest_first() {
  let s = store().await;
  let alice = addr(1);

  s.insert(citizen(2, alice, 200)).await.unwrap();
  s.insert(citizen(1, alice, 100)).await.unwrap();

  let found = s.find_active(Kind::Citizen, alice).await.unwrap();
  let times: Vec<_> = found.iter().map(|a| a.created_at).collect();
  assert_eq!(times, vec![100, 200]);
}

#[tokio::test]
async fn every_kind_round_trips() {
  let s = store().await;
  let bob = addr(2);

  let records = vec![
    citizen(1, bob, 10),
    badgeholder(2, bob),
    Attestation {
      id: uid(3),
      address: bob,
      attester: addr(0xcc),
      created_at: 30,
      revoked_at: None,
      body: AttestationBody::GovernanceContribution(GovernanceContributionFields {
        season:       "6".into(),
        contribution: "Security Council".into(),
      }),
    },
    Attestation {
      id: uid(4),
      address: bob,
      attester: addr(0xcc),
      created_at: 40,
      revoked_at: None,
      body: AttestationBody::Vote(VoteFields {
        // Larger than i64::MAX.
        proposal_id: "102821998933460159156263544808281872605936639206851804749751748763651967264110".into(),
        params:      "[0]".into(),
        voter_id:    uid(9),
      }),
    },
  ];

  for record in &records {
    s.insert(record.clone()).await.unwrap();
  }
  for record in records {
    let fetched = s.find_by_id(record.kind(), record.id).await.unwrap();
    assert_eq!(fetched, Some(record));
  }
}

#[tokio::test]
async fn full_width_integers_round_trip() {
  let s = store().await;
  let max = "115792089237316195423570785007913129639935";

  let mut record = citizen(1, addr(1), 100);
  record.body = AttestationBody::Citizen(CitizenFields {
    farcaster_id:     u64::MAX.to_string(),
    selection_method: "Application".into(),
  });
  s.insert(record.clone()).await.unwrap();

  let contribution = Attestation {
    id: uid(2),
    address: addr(1),
    attester: addr(0xcc),
    created_at: 100,
    revoked_at: None,
    body: AttestationBody::GovernanceContribution(GovernanceContributionFields {
      season:       max.into(),
      contribution: "Security Council".into(),
    }),
  };
  s.insert(contribution.clone()).await.unwrap();

  assert_eq!(s.find_by_id(Kind::Citizen, uid(1)).await.unwrap(), Some(record));
  assert_eq!(
    s.find_by_id(Kind::GovernanceContribution, uid(2)).await.unwrap(),
    Some(contribution)
  );
}

#[tokio::test]
async fn find_by_id_missing_returns_none() {
  let s = store().await;
  let result = s.find_by_id(Kind::Vote, uid(7)).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn duplicate_insert_is_rejected_without_overwrite() {
  let s = store().await;
  let alice = addr(1);
  s.insert(citizen(1, alice, 100)).await.unwrap();

  let err = s.insert(citizen(1, addr(2), 999)).await.unwrap_err();
  assert!(err.is_duplicate_id());

  let kept = s.find_by_id(Kind::Citizen, uid(1)).await.unwrap().unwrap();
  assert_eq!(kept.address, alice);
  assert_eq!(kept.created_at, 100);
}

#[tokio::test]
async fn same_id_in_different_kinds_is_independent() {
  let s = store().await;
  s.insert(citizen(1, addr(1), 100)).await.unwrap();
  s.insert(badgeholder(1, addr(1))).await.unwrap();

  assert!(s.find_by_id(Kind::Citizen, uid(1)).await.unwrap().is_some());
  assert!(s.find_by_id(Kind::Badgeholder, uid(1)).await.unwrap().is_some());
}

// ─── Revocation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn revoke_hides_record_from_active_queries() {
  let s = store().await;
  let alice = addr(1);
  s.insert(citizen(1, alice, 100)).await.unwrap();
  s.insert(citizen(2, alice, 200)).await.unwrap();

  let outcome = s.revoke(Kind::Citizen, uid(1), 500).await.unwrap();
  assert_eq!(outcome, RevokeOutcome::Revoked);

  let active = s.find_active(Kind::Citizen, alice).await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].id, uid(2));

  let listed = s.list_active(Kind::Citizen).await.unwrap();
  assert_eq!(listed.len(), 1);

  // Still retrievable by id, with its revocation time.
  let revoked = s.find_by_id(Kind::Citizen, uid(1)).await.unwrap().unwrap();
  assert_eq!(revoked.revoked_at, Some(500));
  assert!(!revoked.is_active());
}

#[tokio::test]
async fn revoke_is_idempotent_and_keeps_first_timestamp() {
  let s = store().await;
  s.insert(citizen(1, addr(1), 100)).await.unwrap();

  assert_eq!(
    s.revoke(Kind::Citizen, uid(1), 500).await.unwrap(),
    RevokeOutcome::Revoked
  );
  assert_eq!(
    s.revoke(Kind::Citizen, uid(1), 900).await.unwrap(),
    RevokeOutcome::AlreadyRevoked
  );

  let record = s.find_by_id(Kind::Citizen, uid(1)).await.unwrap().unwrap();
  assert_eq!(record.revoked_at, Some(500));
}

#[tokio::test]
async fn revoke_before_insert_is_applied_on_insert() {
  let s = store().await;
  let alice = addr(1);

  assert_eq!(
    s.revoke(Kind::Badgeholder, uid(3), 400).await.unwrap(),
    RevokeOutcome::Pending
  );
  // A second early revocation does not move the timestamp.
  assert_eq!(
    s.revoke(Kind::Badgeholder, uid(3), 800).await.unwrap(),
    RevokeOutcome::Pending
  );

  s.insert(badgeholder(3, alice)).await.unwrap();

  assert!(s.find_active(Kind::Badgeholder, alice).await.unwrap().is_empty());
  let record = s.find_by_id(Kind::Badgeholder, uid(3)).await.unwrap().unwrap();
  assert_eq!(record.revoked_at, Some(400));
}

#[tokio::test]
async fn pending_revocation_is_scoped_to_kind() {
  let s = store().await;
  let alice = addr(1);

  s.revoke(Kind::Badgeholder, uid(1), 400).await.unwrap();
  s.insert(citizen(1, alice, 100)).await.unwrap();

  assert_eq!(s.find_active(Kind::Citizen, alice).await.unwrap().len(), 1);
}

// ─── Checkpoint ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn checkpoint_starts_empty_and_overwrites() {
  let s = store().await;
  assert_eq!(s.checkpoint().await.unwrap(), None);

  s.set_checkpoint(EventPosition::new(100, 3)).await.unwrap();
  assert_eq!(s.checkpoint().await.unwrap(), Some(EventPosition::new(100, 3)));

  s.set_checkpoint(EventPosition::new(120, 0)).await.unwrap();
  assert_eq!(s.checkpoint().await.unwrap(), Some(EventPosition::new(120, 0)));
}

#[tokio::test]
async fn checkpoint_rejects_out_of_range_block() {
  let s = store().await;
  let err = s
    .set_checkpoint(EventPosition::new(u64::MAX, 0))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::OutOfRange { column: "block_number", .. }));
}

#[tokio::test]
async fn reopening_a_file_store_keeps_records() {
  let dir = tempfile::TempDir::new().unwrap();
  let path = dir.path().join("attest.sqlite");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert(citizen(1, addr(1), 100)).await.unwrap();
    s.set_checkpoint(EventPosition::new(7, 1)).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.list_active(Kind::Citizen).await.unwrap().len(), 1);
  assert_eq!(s.checkpoint().await.unwrap(), Some(EventPosition::new(7, 1)));
}
