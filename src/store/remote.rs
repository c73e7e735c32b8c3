use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

use super::{DocumentStore, StoreError, UploadFile};
use crate::auth::CallerIdentity;
use crate::config::StoreConfig;

/// Client for the remote document/object store.
///
/// Documents live at `{base}/v1/collections/{collection}/documents/{id}`,
/// blobs at `{base}/v1/storage/{bucket}/{folder}/{name}`. The relay
/// authenticates itself with the service-account token; the caller's token
/// travels in `x-caller-token` and access decisions stay with the store.
///
/// Constructed once at startup and shared across requests; the inner
/// `reqwest::Client` pools connections and is safe for concurrent use.
#[derive(Debug)]
pub struct RemoteStore {
    http: reqwest::Client,
    base_url: String,
    service_account: String,
    bucket: String,
}

impl RemoteStore {
    /// Build the store client from configuration. Fails when the
    /// service-account token is absent or the base URL does not parse;
    /// callers treat either as fatal before serving begins.
    pub fn from_config(config: &StoreConfig) -> anyhow::Result<Self> {
        let service_account = config.service_account.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "DOCRELAY_SERVICE_ACCOUNT is not set. \
                 Set it in your .env file or environment variables."
            )
        })?;

        let base_url = Url::parse(&config.base_url)?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            service_account,
            bucket: config.storage_bucket.clone(),
        })
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/v1/collections/{}/documents/{}",
            self.base_url, collection, id
        )
    }

    fn blob_url(&self, folder: &str, name: &str) -> String {
        format!(
            "{}/v1/storage/{}/{}/{}",
            self.base_url, self.bucket, folder, name
        )
    }

    fn request(&self, method: Method, url: &str, caller: &CallerIdentity) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.service_account)
            .header("x-caller-token", caller.token())
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, StoreError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(remote_message(response).await)),
            StatusCode::CONFLICT => Err(StoreError::Conflict(remote_message(response).await)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(StoreError::PermissionDenied(remote_message(response).await))
            }
            status => Err(StoreError::Upstream {
                status: status.as_u16(),
                message: remote_message(response).await,
            }),
        }
    }

    async fn json_body(response: reqwest::Response) -> Result<Value, StoreError> {
        response
            .json()
            .await
            .map_err(|e| StoreError::Internal(format!("malformed store response: {}", e)))
    }
}

async fn remote_message(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "no response body".to_string())
}

#[async_trait]
impl DocumentStore for RemoteStore {
    async fn read(
        &self,
        collection: &str,
        id: &str,
        caller: &CallerIdentity,
    ) -> Result<Value, StoreError> {
        let url = self.document_url(collection, id);
        let response = self.send(self.request(Method::GET, &url, caller)).await?;
        Self::json_body(response).await
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        payload: Value,
        caller: &CallerIdentity,
    ) -> Result<Value, StoreError> {
        let url = self.document_url(collection, id);
        let response = self
            .send(self.request(Method::POST, &url, caller).json(&payload))
            .await?;
        Self::json_body(response).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        payload: Value,
        caller: &CallerIdentity,
    ) -> Result<Value, StoreError> {
        let url = self.document_url(collection, id);
        let response = self
            .send(self.request(Method::PUT, &url, caller).json(&payload))
            .await?;
        Self::json_body(response).await
    }

    async fn delete(
        &self,
        collection: &str,
        id: &str,
        caller: &CallerIdentity,
    ) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);
        match self.send(self.request(Method::DELETE, &url, caller)).await {
            Ok(_) => Ok(()),
            // Repeat deletes report success at this layer.
            Err(StoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn upload(
        &self,
        files: Vec<UploadFile>,
        folder: &str,
        caller: &CallerIdentity,
    ) -> Result<Vec<String>, StoreError> {
        // Sequential by contract: a mid-list failure surfaces immediately
        // and files already uploaded stay in place.
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let url = self.blob_url(folder, &file.name);
            let response = self
                .send(
                    self.request(Method::PUT, &url, caller)
                        .header("content-type", "application/octet-stream")
                        .body(file.bytes),
                )
                .await?;

            let body = Self::json_body(response).await?;
            let access_url = body
                .get("url")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(url);
            urls.push(access_url);
        }
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    fn store_config(service_account: Option<&str>) -> StoreConfig {
        StoreConfig {
            service_account: service_account.map(str::to_string),
            base_url: "https://store.example.com/".to_string(),
            storage_bucket: "assets".to_string(),
        }
    }

    #[test]
    fn construction_requires_a_service_account() {
        let err = RemoteStore::from_config(&store_config(None)).unwrap_err();
        assert!(err.to_string().contains("DOCRELAY_SERVICE_ACCOUNT"));
    }

    #[test]
    fn urls_are_rooted_at_the_base() {
        let store = RemoteStore::from_config(&store_config(Some("svc-token"))).unwrap();
        assert_eq!(
            store.document_url("Users", "u1"),
            "https://store.example.com/v1/collections/Users/documents/u1"
        );
        assert_eq!(
            store.blob_url("uploads", "a.png"),
            "https://store.example.com/v1/storage/assets/uploads/a.png"
        );
    }
}
