use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{DocumentStore, StoreError, UploadFile};
use crate::auth::CallerIdentity;

/// In-process store backing local mode and the test suite. Records live in
/// a mutex-guarded map keyed by `(collection, id)`; uploaded blobs are kept
/// alongside and addressed with `local://` URLs. The mutex is held only for
/// map access, never across an await point.
pub struct MemoryStore {
    records: Mutex<HashMap<(String, String), Value>>,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    bucket: String,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            blobs: Mutex::new(HashMap::new()),
            bucket: bucket.into(),
        }
    }

    fn key(collection: &str, id: &str) -> (String, String) {
        (collection.to_string(), id.to_string())
    }

    fn blob_url(&self, folder: &str, name: &str) -> String {
        format!("local://{}/{}/{}", self.bucket, folder, name)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("local")
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(
        &self,
        collection: &str,
        id: &str,
        _caller: &CallerIdentity,
    ) -> Result<Value, StoreError> {
        let records = self.records.lock().unwrap();
        records
            .get(&Self::key(collection, id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, id)))
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        payload: Value,
        _caller: &CallerIdentity,
    ) -> Result<Value, StoreError> {
        let mut records = self.records.lock().unwrap();
        let key = Self::key(collection, id);
        if records.contains_key(&key) {
            return Err(StoreError::Conflict(format!("{}/{}", collection, id)));
        }
        records.insert(key, payload.clone());
        Ok(payload)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        payload: Value,
        _caller: &CallerIdentity,
    ) -> Result<Value, StoreError> {
        let mut records = self.records.lock().unwrap();
        records.insert(Self::key(collection, id), payload.clone());
        Ok(payload)
    }

    async fn delete(
        &self,
        collection: &str,
        id: &str,
        _caller: &CallerIdentity,
    ) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.remove(&Self::key(collection, id));
        Ok(())
    }

    async fn upload(
        &self,
        files: Vec<UploadFile>,
        folder: &str,
        _caller: &CallerIdentity,
    ) -> Result<Vec<String>, StoreError> {
        let mut blobs = self.blobs.lock().unwrap();
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let url = self.blob_url(folder, &file.name);
            blobs.insert(url.clone(), file.bytes);
            urls.push(url);
        }
        Ok(urls)
    }
}
