//! Role-scoped visibility across all four collections.

use liftmosque_core::UserId;
use liftmosque_integration_tests::TestHarness;

async fn seeded() -> TestHarness {
    let h = TestHarness::new();
    h.seed_mosque("m1", "Al-Noor").await;
    h.seed_mosque("m2", "Taqwa").await;
    h.seed_trip("t1", Some("m1"), "2026-03-01T08:00:00Z").await;
    h.seed_trip("t2", Some("m2"), "2026-03-02T08:00:00Z").await;
    h.seed_trip("t3", None, "2026-03-03T08:00:00Z").await;
    h.seed_user("u1", "Amina", Some("m1")).await;
    h.seed_user("u2", "Bilal", Some("m2")).await;
    h.seed_user("u3", "Chadia", None).await;
    h.seed_report("r1", Some("m1")).await;
    h.seed_report("r2", None).await;
    h
}

#[tokio::test]
async fn test_global_admin_sees_everything() {
    let h = seeded().await;
    let email = h.seed_admin("root@liftmosque.app", "global_admin", None).await;
    h.sign_in(&email).await;

    assert_eq!(h.console.mosques().len(), 2);
    assert_eq!(h.console.trips().len(), 3);
    assert_eq!(h.console.reports().len(), 2);
    let counts = h.console.counts();
    assert_eq!(counts.mosques, 2);
    assert_eq!(counts.trips, 3);
}

#[tokio::test]
async fn test_mosque_admin_sees_only_their_mosque() {
    let h = seeded().await;
    let email = h
        .seed_admin("imam@liftmosque.app", "mosque_admin", Some("m1"))
        .await;
    h.sign_in(&email).await;

    let mosques = h.console.mosques();
    assert_eq!(mosques.len(), 1);
    assert_eq!(mosques[0].id.as_str(), "m1");

    // t3 and r2 have no mosqueId and stay hidden from a scoped admin.
    let trips = h.console.trips();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].id.as_str(), "t1");

    let reports = h.console.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id.as_str(), "r1");

    let users = h.console.users();
    // The seeded admin profile itself has mosqueId m1 and shows up too.
    assert!(users.iter().any(|u| u.id.as_str() == "u1"));
    assert!(!users.iter().any(|u| u.id.as_str() == "u2"));
    assert!(!users.iter().any(|u| u.id.as_str() == "u3"));
}

#[tokio::test]
async fn test_mosque_admin_without_assignment_is_unrestricted() {
    let h = seeded().await;
    let email = h
        .seed_admin("floating@liftmosque.app", "mosque_admin", None)
        .await;
    h.sign_in(&email).await;

    assert_eq!(h.console.mosques().len(), 2);
    assert_eq!(h.console.trips().len(), 3);
}

#[tokio::test]
async fn test_directory_resolves_names_outside_scope() {
    let h = seeded().await;
    let email = h
        .seed_admin("imam@liftmosque.app", "mosque_admin", Some("m1"))
        .await;
    h.sign_in(&email).await;

    // u2 belongs to another mosque but its name still resolves for
    // report attribution.
    assert_eq!(
        h.console.user_name(&UserId::from("u2")),
        Some("Bilal".to_owned())
    );
}
