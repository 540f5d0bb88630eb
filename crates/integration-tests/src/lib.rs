//! Integration tests for the LiftMosque console.
//!
//! Everything runs in-process against the in-memory backends, so the
//! whole suite is plain `cargo test -p liftmosque-integration-tests`.
//!
//! [`TestHarness`] wires a seeded [`MemoryStore`] and
//! [`MemoryIdentityProvider`] into a [`Console`] and offers seeding and
//! sign-in shortcuts; the test files under `tests/` each cover one
//! behavioral area (session lifecycle, scoped visibility, live updates,
//! commands, report responses, provisioning).

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::sync::watch;

use liftmosque_console::auth::MemoryIdentityProvider;
use liftmosque_console::store::{Collection, DocumentStore, Fields, MemoryStore};
use liftmosque_console::{Console, ConsoleConfig, MissingProfilePolicy};
use liftmosque_core::Email;

/// How long to wait for a watch channel before failing the test.
pub const WAIT: Duration = Duration::from_secs(2);

/// One in-memory console with direct access to its backends.
pub struct TestHarness {
    pub store: MemoryStore,
    pub provider: MemoryIdentityProvider,
    pub console: Console<MemoryStore, MemoryIdentityProvider>,
}

impl TestHarness {
    /// Harness with the policy the environment configures (the default
    /// grant-global-admin unless `LIFTMOSQUE_MISSING_PROFILE_POLICY` says
    /// otherwise).
    #[must_use]
    pub fn new() -> Self {
        let config = ConsoleConfig::from_env().unwrap();
        Self::with_policy(config.missing_profile_policy)
    }

    /// Harness with an explicit missing-profile policy.
    #[must_use]
    pub fn with_policy(policy: MissingProfilePolicy) -> Self {
        liftmosque_console::telemetry::init();
        let store = MemoryStore::new();
        let provider = MemoryIdentityProvider::new();
        let console = Console::new(
            store.clone(),
            provider.clone(),
            ConsoleConfig {
                missing_profile_policy: policy,
            },
        );
        Self {
            store,
            provider,
            console,
        }
    }

    /// Seed a mosque document.
    pub async fn seed_mosque(&self, id: &str, name: &str) {
        self.store
            .create_with_id(
                Collection::Mosques,
                id,
                obj(json!({"name": name, "address": "1 Main St", "lat": 48.85, "lng": 2.35})),
            )
            .await
            .unwrap();
    }

    /// Seed a trip, optionally tied to a mosque.
    pub async fn seed_trip(&self, id: &str, mosque_id: Option<&str>, created_at: &str) {
        let mut fields = obj(json!({"createdAt": created_at, "seatsAvailable": 3}));
        if let Some(mosque_id) = mosque_id {
            fields.insert("mosqueId".to_owned(), Value::String(mosque_id.to_owned()));
        }
        self.store
            .create_with_id(Collection::Trips, id, fields)
            .await
            .unwrap();
    }

    /// Seed a user document, optionally tied to a mosque.
    pub async fn seed_user(&self, id: &str, name: &str, mosque_id: Option<&str>) {
        let mut fields = obj(json!({
            "firstName": name,
            "lastName": "",
            "createdAt": "2026-01-01T00:00:00Z",
        }));
        if let Some(mosque_id) = mosque_id {
            fields.insert("mosqueId".to_owned(), Value::String(mosque_id.to_owned()));
        }
        self.store
            .create_with_id(Collection::Users, id, fields)
            .await
            .unwrap();
    }

    /// Seed a pending report, optionally tied to a mosque.
    pub async fn seed_report(&self, id: &str, mosque_id: Option<&str>) {
        let mut fields = obj(json!({
            "reporterId": "u-reporter",
            "reportedUserId": "u-reported",
            "reason": "inappropriate behavior",
            "status": "pending",
            "createdAt": "2026-04-01T10:00:00Z",
        }));
        if let Some(mosque_id) = mosque_id {
            fields.insert("mosqueId".to_owned(), Value::String(mosque_id.to_owned()));
        }
        self.store
            .create_with_id(Collection::Reports, id, fields)
            .await
            .unwrap();
    }

    /// Register a credential plus a matching profile document; returns
    /// the account's email for sign-in.
    pub async fn seed_admin(&self, email: &str, role: &str, mosque_id: Option<&str>) -> String {
        let parsed = Email::parse(email).unwrap();
        let id = self.provider.register(&parsed, "pw");
        let mut fields = obj(json!({
            "role": role,
            "firstName": "Test",
            "lastName": "Admin",
            "createdAt": "2026-01-01T00:00:00Z",
        }));
        if let Some(mosque_id) = mosque_id {
            fields.insert("mosqueId".to_owned(), Value::String(mosque_id.to_owned()));
        }
        self.store
            .create_with_id(Collection::Users, id.as_str(), fields)
            .await
            .unwrap();
        email.to_owned()
    }

    /// Register a credential with no profile document; returns the email.
    pub fn seed_credential_only(&self, email: &str) -> String {
        let parsed = Email::parse(email).unwrap();
        self.provider.register(&parsed, "pw");
        email.to_owned()
    }

    /// Sign the console in as a previously seeded account.
    pub async fn sign_in(&self, email: &str) {
        self.console
            .sign_in(email, &SecretString::from("pw"))
            .await
            .unwrap();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Unwrap a `json!` object literal into a field map.
#[must_use]
pub fn obj(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

/// Wait until `rx` delivers a value satisfying `pred`, checking the
/// current value first. Panics after [`WAIT`].
pub async fn wait_for<T, F>(rx: &mut watch::Receiver<T>, mut pred: F)
where
    F: FnMut(&T) -> bool,
{
    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        if pred(&rx.borrow_and_update()) {
            return;
        }
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        assert!(
            !remaining.is_zero(),
            "timed out waiting for watched condition"
        );
        tokio::time::timeout(remaining, rx.changed())
            .await
            .expect("timed out waiting for watched condition")
            .expect("watch channel closed");
    }
}
