//! 記憶體文件庫
//!
//! 行程內實作，供測試與沒有雲端後端的嵌入使用。
//! 每次寫入後都會向該集合的訂閱者推送完整記錄集。

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use mrp_core::document::{decimal_from_value, decimal_value};
use mrp_core::Document;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::{
    CollectionPath, DocumentStore, FieldFilter, Result, StoreError, Subscription, WriteMode,
};

/// 單一集合的狀態
struct CollectionState {
    docs: BTreeMap<String, Map<String, Value>>,
    sender: watch::Sender<Arc<Vec<Document>>>,
}

impl CollectionState {
    fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            docs: BTreeMap::new(),
            sender,
        }
    }

    fn snapshot(&self) -> Vec<Document> {
        self.docs
            .iter()
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .collect()
    }

    fn publish(&self) {
        self.sender.send_replace(Arc::new(self.snapshot()));
    }
}

/// 記憶體文件庫
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<CollectionPath, CollectionState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 鎖定並取得集合（不存在時建立）
    fn with_collection<R>(
        &self,
        collection: &CollectionPath,
        f: impl FnOnce(&mut CollectionState) -> Result<R>,
    ) -> Result<R> {
        let mut collections = self.collections.lock().map_err(|_| StoreError::Poisoned)?;
        let state = collections
            .entry(collection.clone())
            .or_insert_with(CollectionState::new);
        f(state)
    }
}

impl DocumentStore for MemoryStore {
    fn fetch_all(
        &self,
        collection: &CollectionPath,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<Document>> {
        self.with_collection(collection, |state| {
            Ok(state
                .snapshot()
                .into_iter()
                .filter(|doc| filter.map_or(true, |f| f.matches(doc)))
                .collect())
        })
    }

    fn get(&self, collection: &CollectionPath, id: &str) -> Result<Option<Document>> {
        self.with_collection(collection, |state| {
            Ok(state
                .docs
                .get(id)
                .map(|fields| Document::new(id.to_string(), fields.clone())))
        })
    }

    fn subscribe(&self, collection: &CollectionPath) -> Result<Subscription> {
        self.with_collection(collection, |state| {
            debug!("訂閱集合 {}", collection);
            Ok(Subscription::new(collection.clone(), state.sender.subscribe()))
        })
    }

    fn add(&self, collection: &CollectionPath, fields: Map<String, Value>) -> Result<String> {
        self.with_collection(collection, |state| {
            let id = Uuid::new_v4().simple().to_string();
            state.docs.insert(id.clone(), fields);
            state.publish();
            debug!("新增文件 {}/{}", collection, id);
            Ok(id)
        })
    }

    fn set(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Map<String, Value>,
        mode: WriteMode,
    ) -> Result<()> {
        self.with_collection(collection, |state| {
            match (mode, state.docs.get_mut(id)) {
                (WriteMode::Merge, Some(existing)) => existing.extend(fields),
                _ => {
                    state.docs.insert(id.to_string(), fields);
                }
            }
            state.publish();
            debug!("寫入文件 {}/{} ({:?})", collection, id, mode);
            Ok(())
        })
    }

    fn increment(
        &self,
        collection: &CollectionPath,
        id: &str,
        field: &str,
        by: Decimal,
    ) -> Result<Decimal> {
        self.with_collection(collection, |state| {
            let fields = state.docs.get_mut(id).ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

            let current = match fields.get(field) {
                Some(value) => decimal_from_value(value).map_err(|reason| StoreError::NotNumeric {
                    field: field.to_string(),
                    reason,
                })?,
                None => None,
            }
            .unwrap_or(Decimal::ZERO);

            let updated = current.saturating_add(by);
            fields.insert(field.to_string(), decimal_value(updated));
            state.publish();
            debug!("{}/{}: {} {} -> {}", collection, id, field, current, updated);
            Ok(updated)
        })
    }

    fn delete(&self, collection: &CollectionPath, id: &str) -> Result<bool> {
        self.with_collection(collection, |state| {
            let removed = state.docs.remove(id).is_some();
            if removed {
                state.publish();
                debug!("刪除文件 {}/{}", collection, id);
            }
            Ok(removed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("預期 JSON 物件"),
        }
    }

    #[test]
    fn test_add_and_fetch() {
        let store = MemoryStore::new();
        let boms = CollectionPath::boms();

        let id = store
            .add(&boms, fields(json!({"productId": "CHAIR"})))
            .unwrap();
        store
            .add(&boms, fields(json!({"productId": "TABLE"})))
            .unwrap();

        assert_eq!(store.fetch_all(&boms, None).unwrap().len(), 2);
        let doc = store.get(&boms, &id).unwrap().unwrap();
        assert_eq!(doc.get("productId"), Some(&json!("CHAIR")));
        assert!(store.get(&boms, "missing").unwrap().is_none());
    }

    #[test]
    fn test_fetch_with_filter() {
        let store = MemoryStore::new();
        let reorders = CollectionPath::reorders();
        store
            .add(&reorders, fields(json!({"adminUID": "u-1", "name": "Wood"})))
            .unwrap();
        store
            .add(&reorders, fields(json!({"adminUID": "u-2", "name": "Glue"})))
            .unwrap();

        let filter = FieldFilter::eq("adminUID".to_string(), json!("u-1"));
        let docs = store.fetch_all(&reorders, Some(&filter)).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("name"), Some(&json!("Wood")));
    }

    #[test]
    fn test_set_replace_and_merge() {
        let store = MemoryStore::new();
        let users = CollectionPath::users();

        store
            .set(&users, "u-1", fields(json!({"role": "admin", "email": "a@b.c"})), WriteMode::Replace)
            .unwrap();
        store
            .set(&users, "u-1", fields(json!({"role": "manager"})), WriteMode::Merge)
            .unwrap();

        let doc = store.get(&users, "u-1").unwrap().unwrap();
        assert_eq!(doc.get("role"), Some(&json!("manager")));
        assert_eq!(doc.get("email"), Some(&json!("a@b.c")));

        store
            .set(&users, "u-1", fields(json!({"role": "employee"})), WriteMode::Replace)
            .unwrap();
        let doc = store.get(&users, "u-1").unwrap().unwrap();
        assert!(doc.get("email").is_none());
    }

    #[rstest]
    #[case(json!(30), Decimal::from(50))]
    #[case(json!("30"), Decimal::from(50))]
    #[case(json!(""), Decimal::from(20))]
    fn test_increment_existing_value(#[case] initial: Value, #[case] expected: Decimal) {
        let store = MemoryStore::new();
        let stocks = CollectionPath::boms();
        let id = store
            .add(&stocks, fields(json!({"quantity": initial})))
            .unwrap();

        let updated = store
            .increment(&stocks, &id, "quantity", Decimal::from(20))
            .unwrap();
        assert_eq!(updated, expected);

        let doc = store.get(&stocks, &id).unwrap().unwrap();
        assert_eq!(doc.get("quantity"), Some(&decimal_value(expected)));
    }

    #[test]
    fn test_increment_missing_field_counts_as_zero() {
        let store = MemoryStore::new();
        let path = CollectionPath::boms();
        let id = store.add(&path, Map::new()).unwrap();

        let updated = store
            .increment(&path, &id, "quantity", Decimal::from(-5))
            .unwrap();
        assert_eq!(updated, Decimal::from(-5));
    }

    #[test]
    fn test_increment_errors() {
        let store = MemoryStore::new();
        let path = CollectionPath::boms();

        assert!(matches!(
            store.increment(&path, "missing", "quantity", Decimal::ONE),
            Err(StoreError::NotFound { .. })
        ));

        let id = store
            .add(&path, fields(json!({"quantity": "abc"})))
            .unwrap();
        assert!(matches!(
            store.increment(&path, &id, "quantity", Decimal::ONE),
            Err(StoreError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let path = CollectionPath::reorders();
        let id = store.add(&path, Map::new()).unwrap();

        assert!(store.delete(&path, &id).unwrap());
        assert!(!store.delete(&path, &id).unwrap());
        assert!(store.fetch_all(&path, None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_receives_full_snapshots() {
        let store = MemoryStore::new();
        let path = CollectionPath::manufacturing_orders();
        let mut subscription = store.subscribe(&path).unwrap();

        assert!(subscription.current().is_empty());
        assert!(!subscription.has_changed());

        store
            .add(&path, fields(json!({"productId": "CHAIR"})))
            .unwrap();
        let id = store
            .add(&path, fields(json!({"productId": "TABLE"})))
            .unwrap();

        // 推送的是最新的完整記錄集，而不是差異
        let docs = subscription.changed().await.unwrap();
        assert_eq!(docs.len(), 2);

        store.delete(&path, &id).unwrap();
        let docs = subscription.changed().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("productId"), Some(&json!("CHAIR")));
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = MemoryStore::new();
        let mut boms = store.subscribe(&CollectionPath::boms()).unwrap();

        store
            .add(&CollectionPath::reorders(), Map::new())
            .unwrap();
        assert!(!boms.has_changed());

        store.add(&CollectionPath::boms(), Map::new()).unwrap();
        assert!(boms.has_changed());
        assert_eq!(boms.latest().len(), 1);
    }
}
