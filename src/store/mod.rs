pub mod memory;
pub mod remote;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::auth::CallerIdentity;

/// Destination folder used when an upload names none.
pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";

/// One file handed to [`DocumentStore::upload`]: the destination name and
/// the raw contents.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("access denied: {0}")]
    PermissionDenied(String),
    #[error("store unreachable: {0}")]
    Unavailable(String),
    #[error("store rejected request with status {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("{0}")]
    Internal(String),
}

/// The five operations the relay forwards to the downstream document/object
/// store. Implementations must be safe for concurrent use by in-flight
/// requests; the relay constructs exactly one instance per process and
/// shares it behind an `Arc`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the record at `(collection, id)`.
    async fn read(
        &self,
        collection: &str,
        id: &str,
        caller: &CallerIdentity,
    ) -> Result<Value, StoreError>;

    /// Store a new record. Fails with [`StoreError::Conflict`] when the
    /// store enforces create-only semantics and the key is taken.
    async fn create(
        &self,
        collection: &str,
        id: &str,
        payload: Value,
        caller: &CallerIdentity,
    ) -> Result<Value, StoreError>;

    /// Overwrite the record at `(collection, id)`. The payload passes
    /// through unmodified; merge-vs-replace semantics belong to the store.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        payload: Value,
        caller: &CallerIdentity,
    ) -> Result<Value, StoreError>;

    /// Remove the record at `(collection, id)`. Deleting a missing record
    /// reports success; the operation is idempotent at this layer.
    async fn delete(
        &self,
        collection: &str,
        id: &str,
        caller: &CallerIdentity,
    ) -> Result<(), StoreError>;

    /// Store each file under `folder/name` and return access URLs in input
    /// order. Uploads run sequentially and are not atomic: a mid-list
    /// failure surfaces as an error while earlier files remain stored.
    async fn upload(
        &self,
        files: Vec<UploadFile>,
        folder: &str,
        caller: &CallerIdentity,
    ) -> Result<Vec<String>, StoreError>;
}
