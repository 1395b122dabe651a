use std::collections::HashMap;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::keys::{CollectionPath, DocPath};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Capability surface of the hosted document store. Services receive this as
/// an injected `Arc<dyn DocumentStore>` so tests (and the dev server) can run
/// against [`MemoryStore`] while production wires a hosted backend.
///
/// Atomicity is per document only; there are no multi-document transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocPath) -> StoreResult<Option<Value>>;

    /// Creates or overwrites the whole document.
    async fn set(&self, path: &DocPath, doc: Value) -> StoreResult<()>;

    /// Merges `fields` into an existing document. Fails with `NotFound` if
    /// the document does not exist.
    async fn update(&self, path: &DocPath, fields: Value) -> StoreResult<()>;

    async fn delete(&self, path: &DocPath) -> StoreResult<()>;

    /// All documents directly inside the collection, as (id, document) pairs.
    async fn list(&self, path: &CollectionPath) -> StoreResult<Vec<(String, Value)>>;

    /// Atomically adds `by` to a numeric field, creating the document (and
    /// the field at `by`) when absent.
    async fn increment(&self, path: &DocPath, field: &str, by: i64) -> StoreResult<i64>;

    /// Atomically appends `value` to an array field unless an equal element
    /// is already present. The document must exist.
    async fn array_union(&self, path: &DocPath, field: &str, value: Value) -> StoreResult<()>;

    /// Atomically removes every element equal to `value` from an array
    /// field. The document must exist.
    async fn array_remove(&self, path: &DocPath, field: &str, value: Value) -> StoreResult<()>;
}

pub fn decode<T: DeserializeOwned>(doc: Value) -> StoreResult<T> {
    serde_json::from_value(doc).map_err(|e| StoreError::Backend(format!("malformed document: {}", e)))
}

/// In-memory document store. Backs the integration tests and the dev server;
/// every operation holds the map lock for its full duration, which matches
/// the per-document atomicity the hosted store guarantees.
pub struct MemoryStore {
    docs: StdMutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            docs: StdMutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn as_object<'a>(doc: &'a mut Value, path: &DocPath) -> StoreResult<&'a mut Map<String, Value>> {
    doc.as_object_mut()
        .ok_or_else(|| StoreError::Backend(format!("document {} is not an object", path)))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> StoreResult<Option<Value>> {
        let docs = self.docs.lock().unwrap();
        Ok(docs.get(path.as_str()).cloned())
    }

    async fn set(&self, path: &DocPath, doc: Value) -> StoreResult<()> {
        let mut docs = self.docs.lock().unwrap();
        docs.insert(path.as_str().to_string(), doc);
        Ok(())
    }

    async fn update(&self, path: &DocPath, fields: Value) -> StoreResult<()> {
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .get_mut(path.as_str())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        let target = as_object(doc, path)?;
        match fields {
            Value::Object(map) => {
                for (key, value) in map {
                    target.insert(key, value);
                }
                Ok(())
            }
            _ => Err(StoreError::Backend("update fields must be an object".to_string())),
        }
    }

    async fn delete(&self, path: &DocPath) -> StoreResult<()> {
        let mut docs = self.docs.lock().unwrap();
        docs.remove(path.as_str());
        Ok(())
    }

    async fn list(&self, path: &CollectionPath) -> StoreResult<Vec<(String, Value)>> {
        let docs = self.docs.lock().unwrap();
        let prefix = format!("{}/", path.as_str());
        let mut out = Vec::new();
        for (key, value) in docs.iter() {
            if let Some(rest) = key.strip_prefix(&prefix) {
                // Direct children only; deeper paths belong to sub-collections.
                if !rest.contains('/') {
                    out.push((rest.to_string(), value.clone()));
                }
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    async fn increment(&self, path: &DocPath, field: &str, by: i64) -> StoreResult<i64> {
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .entry(path.as_str().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let target = as_object(doc, path)?;
        let current = target.get(field).and_then(Value::as_i64).unwrap_or(0);
        let next = current + by;
        target.insert(field.to_string(), Value::from(next));
        Ok(next)
    }

    async fn array_union(&self, path: &DocPath, field: &str, value: Value) -> StoreResult<()> {
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .get_mut(path.as_str())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        let target = as_object(doc, path)?;
        let entry = target
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let items = entry
            .as_array_mut()
            .ok_or_else(|| StoreError::Backend(format!("field {} of {} is not an array", field, path)))?;
        if !items.contains(&value) {
            items.push(value);
        }
        Ok(())
    }

    async fn array_remove(&self, path: &DocPath, field: &str, value: Value) -> StoreResult<()> {
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .get_mut(path.as_str())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        let target = as_object(doc, path)?;
        if let Some(entry) = target.get_mut(field) {
            let items = entry
                .as_array_mut()
                .ok_or_else(|| StoreError::Backend(format!("field {} of {} is not an array", field, path)))?;
            items.retain(|item| item != &value);
        }
        Ok(())
    }
}
