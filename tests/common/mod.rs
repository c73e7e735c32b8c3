#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use reqwest::StatusCode as HttpStatus;
use serde_json::Value;
use tower::ServiceExt;

use docrelay::auth::CallerIdentity;
use docrelay::config::Mode;
use docrelay::routes;
use docrelay::state::AppState;
use docrelay::store::memory::MemoryStore;
use docrelay::store::{DocumentStore, StoreError, UploadFile};

/// Stub store for in-process router tests: delegates to a [`MemoryStore`]
/// and counts every invocation so tests can assert which requests never
/// reached the store at all.
pub struct CountingStore {
    inner: MemoryStore,
    pub reads: AtomicUsize,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    pub uploads: AtomicUsize,
    /// Arguments of the most recent create call: collection, id, payload,
    /// caller token.
    pub last_create: Mutex<Option<(String, String, Value, String)>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::default(),
            reads: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
            last_create: Mutex::new(None),
        }
    }

    pub fn total_calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
            + self.creates.load(Ordering::SeqCst)
            + self.updates.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
            + self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn read(
        &self,
        collection: &str,
        id: &str,
        caller: &CallerIdentity,
    ) -> Result<Value, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(collection, id, caller).await
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        payload: Value,
        caller: &CallerIdentity,
    ) -> Result<Value, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        *self.last_create.lock().unwrap() = Some((
            collection.to_string(),
            id.to_string(),
            payload.clone(),
            caller.token().to_string(),
        ));
        self.inner.create(collection, id, payload, caller).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        payload: Value,
        caller: &CallerIdentity,
    ) -> Result<Value, StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(collection, id, payload, caller).await
    }

    async fn delete(
        &self,
        collection: &str,
        id: &str,
        caller: &CallerIdentity,
    ) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(collection, id, caller).await
    }

    async fn upload(
        &self,
        files: Vec<UploadFile>,
        folder: &str,
        caller: &CallerIdentity,
    ) -> Result<Vec<String>, StoreError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.inner.upload(files, folder, caller).await
    }
}

/// Router over a counting stub store, in the given deployment mode.
pub fn test_app(mode: Mode) -> (Router, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::new());
    let state = AppState::new(store.clone(), mode);
    (routes::app(state), store)
}

/// Drive one request through the router and return status plus parsed JSON
/// body (Null for empty bodies such as 204 responses).
pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Local mode keeps the smoke test network-free and deterministic
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_docrelay"));
        cmd.env("DOCRELAY_PORT", port.to_string())
            .env("DOCRELAY_MODE", "local")
            .env("APP_ENV", "development")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == HttpStatus::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
