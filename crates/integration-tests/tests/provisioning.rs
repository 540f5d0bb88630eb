//! Admin provisioning: isolated credential creation that never disturbs
//! the operator's session.

use secrecy::SecretString;

use liftmosque_console::auth::{AuthError, IdentityProvider};
use liftmosque_console::{ConsoleError, ScopePredicate, ValidationError};
use liftmosque_core::MosqueId;
use liftmosque_integration_tests::{TestHarness, wait_for};

#[tokio::test]
async fn test_operator_session_survives_provisioning() {
    let h = TestHarness::new();
    h.seed_mosque("m1", "Al-Noor").await;
    let email = h.seed_admin("root@liftmosque.app", "global_admin", None).await;
    h.sign_in(&email).await;
    let before = h.console.session();

    let new_id = h
        .console
        .create_admin(
            "imam@liftmosque.app",
            &SecretString::from("s3cret!"),
            &MosqueId::from("m1"),
        )
        .await
        .unwrap();

    // Same operator, same scope, nothing leaked.
    assert_eq!(h.console.session(), before);
    assert_eq!(
        h.provider.current_identity().unwrap().email.as_str(),
        "root@liftmosque.app"
    );
    assert_eq!(h.provider.open_context_count(), 0);

    // The profile is keyed by the new credential id.
    let mut users = h.console.user_changes().unwrap();
    wait_for(&mut users, |list| list.iter().any(|u| u.id == new_id)).await;
}

#[tokio::test]
async fn test_new_admin_signs_in_scoped() {
    let h = TestHarness::new();
    h.seed_mosque("m1", "Al-Noor").await;
    h.seed_mosque("m2", "Taqwa").await;
    let email = h.seed_admin("root@liftmosque.app", "global_admin", None).await;
    h.sign_in(&email).await;

    h.console
        .create_admin(
            "imam@liftmosque.app",
            &SecretString::from("s3cret!"),
            &MosqueId::from("m1"),
        )
        .await
        .unwrap();
    h.console.sign_out().await;

    h.console
        .sign_in("imam@liftmosque.app", &SecretString::from("s3cret!"))
        .await
        .unwrap();
    assert_eq!(
        h.console.session().scope(),
        Some(&ScopePredicate::Mosque(MosqueId::from("m1")))
    );
    assert_eq!(h.console.mosques().len(), 1);
}

#[tokio::test]
async fn test_email_in_use_leaves_everything_intact() {
    let h = TestHarness::new();
    h.seed_mosque("m1", "Al-Noor").await;
    let email = h.seed_admin("root@liftmosque.app", "global_admin", None).await;
    h.sign_in(&email).await;
    let users_before = h.console.users().len();

    let err = h
        .console
        .create_admin(
            "root@liftmosque.app",
            &SecretString::from("s3cret!"),
            &MosqueId::from("m1"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::Auth(AuthError::EmailInUse)));
    assert_eq!(h.console.users().len(), users_before);
    assert_eq!(h.provider.open_context_count(), 0);
    assert!(h.console.session().is_signed_in());
}

#[tokio::test]
async fn test_unknown_mosque_rejected_before_credential_creation() {
    let h = TestHarness::new();
    let email = h.seed_admin("root@liftmosque.app", "global_admin", None).await;
    h.sign_in(&email).await;

    let err = h
        .console
        .create_admin(
            "imam@liftmosque.app",
            &SecretString::from("s3cret!"),
            &MosqueId::from("ghost"),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ConsoleError::Validation(ValidationError::UnknownMosque(_))
    ));
    assert!(!h
        .provider
        .has_account(&liftmosque_core::Email::parse("imam@liftmosque.app").unwrap()));
}
