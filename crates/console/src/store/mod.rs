//! Document store seam.
//!
//! The remote backend is a realtime document database: collections of
//! schemaless documents with opaque string ids, plus standing queries that
//! push a complete, ordered result set on every change. [`DocumentStore`]
//! is the narrow interface the console consumes; [`memory::MemoryStore`]
//! is the in-process implementation used by tests and demos.

pub mod memory;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use memory::MemoryStore;

/// Raw field map of a document (everything except its id).
pub type Fields = serde_json::Map<String, Value>;

/// The collections the console operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Mosques,
    Trips,
    /// Member accounts *and* administrator profiles: a profile is a `users`
    /// document keyed by its identity's credential id.
    Users,
    Reports,
}

impl Collection {
    /// Wire name of the collection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mosques => "mosques",
            Self::Trips => "trips",
            Self::Users => "users",
            Self::Reports => "reports",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single document: opaque id plus its field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned (or caller-assigned) id.
    pub id: String,
    /// All other fields.
    pub fields: Fields,
}

/// Sort direction for an ordered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort order (field + direction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl OrderBy {
    /// Ascending order on `field`.
    #[must_use]
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Descending order on `field`.
    #[must_use]
    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

/// Equality filter pushed down to the store.
///
/// The console never relies on this alone for scoping: the scope predicate
/// is re-applied client-side to every snapshot, so visibility is correct
/// whether or not the backend honors the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: &'static str,
    pub value: Value,
}

/// A standing query over one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: Collection,
    pub order_by: OrderBy,
    pub filter: Option<FieldFilter>,
}

impl Query {
    /// Unfiltered query over `collection`, ordered by `order_by`.
    #[must_use]
    pub const fn new(collection: Collection, order_by: OrderBy) -> Self {
        Self {
            collection,
            order_by,
            filter: None,
        }
    }
}

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or backend failure.
    #[error("store backend error: {0}")]
    Backend(String),

    /// The referenced document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection that was addressed.
        collection: Collection,
        /// Id that was addressed.
        id: String,
    },

    /// Data in the store is corrupted or has an unexpected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Handle to a standing snapshot channel.
///
/// Delivers the **complete** current result set of its query on every
/// change (never deltas). `stop` is idempotent: calling it any number of
/// times is safe and has no further effect; dropping the handle stops it
/// as well. Once stopped, no further snapshots arrive.
#[derive(Debug)]
pub struct SnapshotSubscription {
    rx: watch::Receiver<Vec<Document>>,
    task: JoinHandle<()>,
    stopped: Arc<AtomicBool>,
}

impl SnapshotSubscription {
    /// Build a subscription from a snapshot channel and the pump task
    /// feeding it. Store implementations call this.
    #[must_use]
    pub fn new(rx: watch::Receiver<Vec<Document>>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            task,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The latest snapshot, marking it as seen.
    pub fn snapshot(&mut self) -> Vec<Document> {
        self.rx.borrow_and_update().clone()
    }

    /// The latest snapshot without consuming the change notification.
    #[must_use]
    pub fn current(&self) -> Vec<Document> {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot. Returns `false` once the subscription
    /// has been stopped (no more snapshots will arrive).
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Stop the subscription. Idempotent.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.task.abort();
        }
    }

    /// Whether `stop` has been called (or the handle dropped).
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Drop for SnapshotSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Collection-scoped access to the remote document database.
///
/// All mutations become visible to every open [`SnapshotSubscription`]
/// through the realtime channel; nothing in the console refetches after a
/// write. Failed writes are surfaced once and never retried automatically.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Fetch a single document, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the read fails.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create a document with a store-assigned id; returns the new id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the write fails; nothing is created.
    async fn create(&self, collection: Collection, fields: Fields) -> Result<String, StoreError>;

    /// Create a document under a caller-chosen id (used for profile records
    /// keyed by a credential id).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the write fails; nothing is created.
    async fn create_with_id(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Merge `fields` into an existing document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the document does not exist and
    /// `StoreError::Backend` if the write fails; either way the document is
    /// unchanged.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting an absent document is a no-op;
    /// deletion never cascades to referencing records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the write fails.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;

    /// Open a standing snapshot channel for `query`.
    ///
    /// The first snapshot (the current result set) is available
    /// immediately on the returned handle.
    fn subscribe(&self, query: Query) -> SnapshotSubscription;
}
