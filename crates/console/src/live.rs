//! Live collection views.
//!
//! A [`LiveView`] wraps a raw [`SnapshotSubscription`] and maps each
//! incoming snapshot through a build function (decode, scope filter,
//! project) into a typed value on its own watch channel. All four
//! dashboard collections plus the user directory are bundled in
//! [`LiveViews`], which the console opens as one unit at sign-in and
//! stops as one unit at sign-out.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use liftmosque_core::UserId;

use serde_json::Value;

use crate::models::{self, Mosque, Report, Trip, UserAccount};
use crate::scope::ScopePredicate;
use crate::store::{
    Collection, Document, DocumentStore, FieldFilter, OrderBy, Query, SnapshotSubscription,
};

/// A typed standing view over one query.
///
/// Holds the latest built value and re-delivers on every snapshot. `stop`
/// is idempotent; dropping the view stops it too. The underlying store
/// subscription lives inside the pump task and dies with it.
#[derive(Debug)]
pub struct LiveView<V> {
    rx: watch::Receiver<V>,
    task: JoinHandle<()>,
    stopped: Arc<AtomicBool>,
}

impl<V: Clone + Send + Sync + 'static> LiveView<V> {
    /// Open a view over `subscription`, mapping snapshots with `build`.
    /// The initial value is built synchronously from the first snapshot.
    pub fn open<F>(mut subscription: SnapshotSubscription, build: F) -> Self
    where
        F: Fn(&[Document]) -> V + Send + 'static,
    {
        let (tx, rx) = watch::channel(build(&subscription.snapshot()));
        let task = tokio::spawn(async move {
            while subscription.changed().await {
                tx.send_replace(build(&subscription.snapshot()));
            }
        });
        Self {
            rx,
            task,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The latest built value.
    #[must_use]
    pub fn current(&self) -> V {
        self.rx.borrow().clone()
    }

    /// Wait for the next value. Returns `false` once the view is stopped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Watch channel over the built values, for callers that outlive the
    /// borrow of this view.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<V> {
        self.rx.clone()
    }

}

impl<V> LiveView<V> {
    /// Stop the view and its store subscription. Idempotent.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.task.abort();
        }
    }

    /// Whether `stop` has been called (or the view dropped).
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl<V> Drop for LiveView<V> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A live, ordered, scope-filtered list of one entity type.
pub type LiveList<T> = LiveView<Vec<T>>;

/// Live id-to-display-name map over the users collection, used to
/// attribute reports. Unscoped so names resolve even for users outside
/// the operator's mosque.
pub type LiveDirectory = LiveView<HashMap<UserId, String>>;

/// Aggregate counters for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardCounts {
    pub users: usize,
    pub trips: usize,
    pub mosques: usize,
}

/// All standing views for one signed-in session.
///
/// Opened together after scope resolution and stopped together at
/// sign-out, so a session never observes views from a previous scope.
pub struct LiveViews {
    pub mosques: LiveList<Mosque>,
    pub trips: LiveList<Trip>,
    pub users: LiveList<UserAccount>,
    pub reports: LiveList<Report>,
    pub directory: LiveDirectory,
}

impl LiveViews {
    /// Open every view against `store` under `scope`.
    pub fn open<S: DocumentStore>(store: &S, scope: &ScopePredicate) -> Self {
        let mosques = {
            let scope = scope.clone();
            LiveView::open(
                store.subscribe(Query::new(Collection::Mosques, OrderBy::asc("name"))),
                move |docs| {
                    decode_list::<Mosque>(Collection::Mosques, docs)
                        .filter(|m| scope.allows_mosque(&m.id))
                        .collect()
                },
            )
        };
        let trips = {
            let scope = scope.clone();
            LiveView::open(
                store.subscribe(scoped_query(
                    Collection::Trips,
                    OrderBy::desc("createdAt"),
                    &scope,
                )),
                move |docs| {
                    decode_list::<Trip>(Collection::Trips, docs)
                        .filter(|t| scope.allows_record(t.mosque_id.as_ref()))
                        .collect()
                },
            )
        };
        let users = {
            let scope = scope.clone();
            LiveView::open(
                store.subscribe(scoped_query(
                    Collection::Users,
                    OrderBy::desc("createdAt"),
                    &scope,
                )),
                move |docs| {
                    decode_list::<UserAccount>(Collection::Users, docs)
                        .filter(|u| scope.allows_record(u.mosque_id.as_ref()))
                        .collect()
                },
            )
        };
        let reports = {
            let scope = scope.clone();
            LiveView::open(
                store.subscribe(scoped_query(
                    Collection::Reports,
                    OrderBy::desc("createdAt"),
                    &scope,
                )),
                move |docs| {
                    decode_list::<Report>(Collection::Reports, docs)
                        .filter(|r| scope.allows_record(r.mosque_id.as_ref()))
                        .collect()
                },
            )
        };
        let directory = LiveView::open(
            store.subscribe(Query::new(Collection::Users, OrderBy::desc("createdAt"))),
            |docs| {
                decode_list::<UserAccount>(Collection::Users, docs)
                    .map(|u| (u.id.clone(), u.display_name()))
                    .collect()
            },
        );

        Self {
            mosques,
            trips,
            users,
            reports,
            directory,
        }
    }

    /// Counters derived from the current snapshots.
    #[must_use]
    pub fn counts(&self) -> DashboardCounts {
        DashboardCounts {
            users: self.users.current().len(),
            trips: self.trips.current().len(),
            mosques: self.mosques.current().len(),
        }
    }

    /// Stop every view. Idempotent.
    pub fn stop_all(&self) {
        self.mosques.stop();
        self.trips.stop();
        self.users.stop();
        self.reports.stop();
        self.directory.stop();
    }
}

/// Query for a record collection under `scope`: a mosque-scoped admin's
/// `mosqueId` equality check is pushed down to the store, the scope
/// predicate in the build closure re-checks it on every snapshot.
fn scoped_query(collection: Collection, order_by: OrderBy, scope: &ScopePredicate) -> Query {
    let mut query = Query::new(collection, order_by);
    if let ScopePredicate::Mosque(mosque_id) = scope {
        query.filter = Some(FieldFilter {
            field: "mosqueId",
            value: Value::String(mosque_id.as_str().to_owned()),
        });
    }
    query
}

fn decode_list<'a, T: serde::de::DeserializeOwned + 'a>(
    collection: Collection,
    docs: &'a [Document],
) -> impl Iterator<Item = T> + 'a {
    docs.iter().filter_map(move |doc| models::decode(collection, doc))
}
