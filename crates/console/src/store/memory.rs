//! In-memory realtime document store.
//!
//! Backs tests and demos with the same contract as the remote database:
//! per-document reads and writes, plus standing queries that re-deliver the
//! full ordered result set whenever anything in the store changes. Change
//! fan-out rides a single revision watch channel; every subscription runs
//! its own pump task that recomputes its query on each revision bump.

use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use tokio::sync::watch;
use uuid::Uuid;

use super::{
    Collection, Document, DocumentStore, FieldFilter, Fields, Query, SnapshotSubscription,
    SortDirection, StoreError,
};

/// In-memory [`DocumentStore`] with realtime snapshot delivery.
///
/// Cloning is cheap and shares the same underlying data. Subscriptions
/// spawn a Tokio task, so the store must be used inside a runtime.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    collections: Mutex<HashMap<Collection, BTreeMap<String, Fields>>>,
    revision: watch::Sender<u64>,
    fail_writes: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                collections: Mutex::new(HashMap::new()),
                revision,
                fail_writes: AtomicBool::new(false),
            }),
        }
    }

    /// Make every subsequent write fail with `StoreError::Backend` until
    /// switched back off. Reads and subscriptions are unaffected.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of documents currently in `collection`.
    #[must_use]
    pub fn count(&self, collection: Collection) -> usize {
        self.inner
            .lock_collections()
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_owned()));
        }
        Ok(())
    }
}

impl StoreInner {
    fn lock_collections(&self) -> std::sync::MutexGuard<'_, HashMap<Collection, BTreeMap<String, Fields>>> {
        self.collections
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    fn run_query(&self, query: &Query) -> Vec<Document> {
        let collections = self.lock_collections();
        let Some(docs) = collections.get(&query.collection) else {
            return Vec::new();
        };

        let mut results: Vec<Document> = docs
            .iter()
            .filter(|(_, fields)| matches_filter(fields, query.filter.as_ref()))
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();

        results.sort_by(|a, b| {
            let ord = compare_field(&a.fields, &b.fields, query.order_by.field);
            match query.order_by.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        results
    }
}

fn matches_filter(fields: &Fields, filter: Option<&FieldFilter>) -> bool {
    filter.is_none_or(|f| fields.get(f.field) == Some(&f.value))
}

/// Compare two documents on one field. Documents missing the field sort
/// after documents that have it, regardless of direction.
fn compare_field(a: &Fields, b: &Fields, field: &str) -> CmpOrdering {
    match (a.get(field), b.get(field)) {
        (Some(va), Some(vb)) => compare_values(va, vb),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    }
}

/// Total order over JSON values: type rank first (null < bool < number <
/// string < array < object), then value within the type. Strings that
/// both parse as RFC 3339 timestamps compare as instants, not
/// lexicographically: serialized timestamps mix subsecond precision
/// (`...T08:00:00.123Z` vs `...T08:00:00Z`), and byte order would put
/// the later one first.
fn compare_values(a: &Value, b: &Value) -> CmpOrdering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.inner.lock_collections();
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: id.to_owned(),
                fields: fields.clone(),
            }))
    }

    async fn create(&self, collection: Collection, fields: Fields) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.create_with_id(collection, &id, fields).await?;
        Ok(id)
    }

    async fn create_with_id(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        {
            let mut collections = self.inner.lock_collections();
            collections
                .entry(collection)
                .or_default()
                .insert(id.to_owned(), fields);
        }
        self.inner.bump_revision();
        Ok(())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        {
            let mut collections = self.inner.lock_collections();
            let doc = collections
                .entry(collection)
                .or_default()
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound {
                    collection,
                    id: id.to_owned(),
                })?;
            for (key, value) in fields {
                doc.insert(key, value);
            }
        }
        self.inner.bump_revision();
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        let removed = {
            let mut collections = self.inner.lock_collections();
            collections
                .get_mut(&collection)
                .and_then(|docs| docs.remove(id))
                .is_some()
        };
        if removed {
            self.inner.bump_revision();
        }
        Ok(())
    }

    fn subscribe(&self, query: Query) -> SnapshotSubscription {
        let inner = Arc::clone(&self.inner);
        let mut rev_rx = self.inner.revision.subscribe();
        // Initial snapshot is available before the pump task ever runs.
        let (tx, rx) = watch::channel(inner.run_query(&query));

        let task = tokio::spawn(async move {
            while rev_rx.changed().await.is_ok() {
                tx.send_replace(inner.run_query(&query));
            }
        });

        SnapshotSubscription::new(rx, task)
    }
}
