//! Live snapshot delivery after mutations: no command refetches, every
//! open view converges through its watch channel.

use liftmosque_console::models::MosqueDraft;
use liftmosque_core::TripId;
use liftmosque_integration_tests::{TestHarness, wait_for};

#[tokio::test]
async fn test_create_appears_in_open_view() {
    let h = TestHarness::new();
    let email = h.seed_admin("root@liftmosque.app", "global_admin", None).await;
    h.sign_in(&email).await;

    let mut mosques = h.console.mosque_changes().unwrap();
    assert!(mosques.borrow().is_empty());

    h.console
        .create_mosque(&MosqueDraft {
            name: "Al-Noor".to_owned(),
            address: "1 Main St".to_owned(),
            lat: "48.85".to_owned(),
            lng: "2.35".to_owned(),
        })
        .await
        .unwrap();

    wait_for(&mut mosques, |list| {
        list.iter().any(|m| m.name == "Al-Noor")
    })
    .await;
}

#[tokio::test]
async fn test_delete_disappears_from_open_view() {
    let h = TestHarness::new();
    h.seed_trip("t1", Some("m1"), "2026-03-01T08:00:00Z").await;
    let email = h.seed_admin("root@liftmosque.app", "global_admin", None).await;
    h.sign_in(&email).await;

    let mut trips = h.console.trip_changes().unwrap();
    assert_eq!(trips.borrow().len(), 1);

    h.console.delete_trip(&TripId::from("t1")).await.unwrap();

    wait_for(&mut trips, Vec::is_empty).await;
}

#[tokio::test]
async fn test_views_stay_ordered_as_data_changes() {
    let h = TestHarness::new();
    let email = h.seed_admin("root@liftmosque.app", "global_admin", None).await;
    h.seed_mosque("m1", "Taqwa").await;
    h.sign_in(&email).await;

    let mut mosques = h.console.mosque_changes().unwrap();
    h.seed_mosque("m2", "Al-Noor").await;

    // Mosques sort by name ascending regardless of insertion order.
    wait_for(&mut mosques, |list| list.len() == 2).await;
    let names: Vec<_> = mosques.borrow().iter().map(|m| m.name.clone()).collect();
    assert_eq!(names, vec!["Al-Noor".to_owned(), "Taqwa".to_owned()]);
}

#[tokio::test]
async fn test_trips_order_newest_first() {
    let h = TestHarness::new();
    let email = h.seed_admin("root@liftmosque.app", "global_admin", None).await;
    h.seed_trip("old", Some("m1"), "2026-03-01T08:00:00Z").await;
    h.seed_trip("new", Some("m1"), "2026-03-05T08:00:00Z").await;
    h.sign_in(&email).await;

    let trips = h.console.trips();
    let ids: Vec<_> = trips.iter().map(|t| t.id.as_str().to_owned()).collect();
    assert_eq!(ids, vec!["new".to_owned(), "old".to_owned()]);
}

#[tokio::test]
async fn test_failed_write_leaves_views_unchanged() {
    let h = TestHarness::new();
    h.seed_mosque("m1", "Al-Noor").await;
    let email = h.seed_admin("root@liftmosque.app", "global_admin", None).await;
    h.sign_in(&email).await;

    h.store.set_fail_writes(true);
    let draft = MosqueDraft {
        name: "Taqwa".to_owned(),
        address: "2 Main St".to_owned(),
        lat: "1.0".to_owned(),
        lng: "2.0".to_owned(),
    };
    assert!(h.console.create_mosque(&draft).await.is_err());

    // The view still serves the last good snapshot.
    assert_eq!(h.console.mosques().len(), 1);

    // And recovers once the backend does.
    h.store.set_fail_writes(false);
    h.console.create_mosque(&draft).await.unwrap();
    let mut mosques = h.console.mosque_changes().unwrap();
    wait_for(&mut mosques, |list| list.len() == 2).await;
}
