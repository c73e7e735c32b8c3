//! Consumer-side data client.
//!
//! Server mode speaks HTTP to a running relay with the caller's bearer
//! token. Local mode needs no network at all: it loads (or synthesizes) the
//! durable local contexts and operates an in-process store under the
//! default identity, which makes it a deterministic single-user sandbox.

use serde_json::{json, Value};

use crate::auth::CallerIdentity;
use crate::context::{AppContext, ContextStore, UserContext};
use crate::store::memory::MemoryStore;
use crate::store::{DocumentStore, UploadFile, DEFAULT_UPLOAD_FOLDER};

const USERS_COLLECTION: &str = "Users";

pub struct DataClient {
    inner: ClientInner,
}

enum ClientInner {
    Server {
        http: reqwest::Client,
        base_url: String,
        token: String,
    },
    Local {
        store: MemoryStore,
        user: UserContext,
        app: AppContext,
    },
}

impl DataClient {
    /// Client for a running relay. The token is presented as-is on every
    /// request; the relay and the store decide whether it is acceptable.
    pub fn connect(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            inner: ClientInner::Server {
                http: reqwest::Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
                token: token.into(),
            },
        }
    }

    /// Offline client backed by the default context directory.
    pub fn local() -> anyhow::Result<Self> {
        Self::local_with_contexts(ContextStore::open()?)
    }

    /// Offline client backed by an explicit context directory. Contexts
    /// already present in the directory win over the synthesized defaults.
    pub fn local_with_contexts(contexts: ContextStore) -> anyhow::Result<Self> {
        let user = contexts.user_context()?;
        let app = contexts.app_context()?;
        Ok(Self {
            inner: ClientInner::Local {
                store: MemoryStore::default(),
                user,
                app,
            },
        })
    }

    /// Identity the client acts as. Known up front only in local mode; in
    /// server mode identity belongs to whoever holds the token.
    pub fn user_id(&self) -> Option<&str> {
        match &self.inner {
            ClientInner::Server { .. } => None,
            ClientInner::Local { user, .. } => Some(&user.user_id),
        }
    }

    /// Application context of the local sandbox, when running in local mode.
    pub fn app_context(&self) -> Option<&AppContext> {
        match &self.inner {
            ClientInner::Server { .. } => None,
            ClientInner::Local { app, .. } => Some(app),
        }
    }

    pub async fn get_record(&self, user_id: &str) -> anyhow::Result<Value> {
        match &self.inner {
            ClientInner::Server { http, base_url, token } => {
                let response = http
                    .get(format!("{}/users/{}", base_url, user_id))
                    .bearer_auth(token)
                    .send()
                    .await?;
                expect_json(response).await
            }
            ClientInner::Local { store, user, .. } => {
                let caller = local_caller(user);
                Ok(store.read(USERS_COLLECTION, user_id, &caller).await?)
            }
        }
    }

    pub async fn create_record(&self, user_id: &str, data: Value) -> anyhow::Result<Value> {
        match &self.inner {
            ClientInner::Server { http, base_url, token } => {
                let response = http
                    .post(format!("{}/users/{}", base_url, user_id))
                    .bearer_auth(token)
                    .json(&json!({ "data": data }))
                    .send()
                    .await?;
                expect_json(response).await
            }
            ClientInner::Local { store, user, .. } => {
                let caller = local_caller(user);
                Ok(store.create(USERS_COLLECTION, user_id, data, &caller).await?)
            }
        }
    }

    pub async fn update_record(&self, user_id: &str, data: Value) -> anyhow::Result<Value> {
        match &self.inner {
            ClientInner::Server { http, base_url, token } => {
                let response = http
                    .put(format!("{}/users/{}", base_url, user_id))
                    .bearer_auth(token)
                    .json(&json!({ "data": data }))
                    .send()
                    .await?;
                expect_json(response).await
            }
            ClientInner::Local { store, user, .. } => {
                let caller = local_caller(user);
                Ok(store.update(USERS_COLLECTION, user_id, data, &caller).await?)
            }
        }
    }

    pub async fn delete_record(&self, user_id: &str) -> anyhow::Result<()> {
        match &self.inner {
            ClientInner::Server { http, base_url, token } => {
                let response = http
                    .delete(format!("{}/users/{}", base_url, user_id))
                    .bearer_auth(token)
                    .send()
                    .await?;
                expect_success(response).await?;
                Ok(())
            }
            ClientInner::Local { store, user, .. } => {
                let caller = local_caller(user);
                Ok(store.delete(USERS_COLLECTION, user_id, &caller).await?)
            }
        }
    }

    /// Upload named files and return their access URLs in input order.
    pub async fn upload(
        &self,
        files: Vec<(String, Vec<u8>)>,
        folder: Option<&str>,
    ) -> anyhow::Result<Vec<String>> {
        match &self.inner {
            ClientInner::Server { http, base_url, token } => {
                let (names, buffers): (Vec<String>, Vec<Vec<u8>>) = files.into_iter().unzip();
                let mut body = json!({
                    "fileNames": names,
                    "fileBuffers": buffers,
                });
                if let Some(folder) = folder {
                    body["folder"] = json!(folder);
                }
                let response = http
                    .post(format!("{}/storage/upload", base_url))
                    .bearer_auth(token)
                    .json(&body)
                    .send()
                    .await?;
                let value = expect_json(response).await?;
                let urls = value
                    .get("urls")
                    .and_then(Value::as_array)
                    .ok_or_else(|| anyhow::anyhow!("malformed upload response: {}", value))?
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
                Ok(urls)
            }
            ClientInner::Local { store, user, .. } => {
                let caller = local_caller(user);
                let files = files
                    .into_iter()
                    .map(|(name, bytes)| UploadFile { name, bytes })
                    .collect();
                Ok(store
                    .upload(files, folder.unwrap_or(DEFAULT_UPLOAD_FOLDER), &caller)
                    .await?)
            }
        }
    }
}

fn local_caller(user: &UserContext) -> CallerIdentity {
    CallerIdentity::Bearer(user.id_token.clone())
}

async fn expect_success(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("relay returned {}: {}", status, body)
}

async fn expect_json(response: reqwest::Response) -> anyhow::Result<Value> {
    let response = expect_success(response).await?;
    Ok(response.json().await?)
}
