use axum::Json;
use serde_json::{json, Value};

/// GET /health - liveness probe. Answers without touching the identity
/// layer or the store, so a hung downstream never fails the check.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}

/// GET / - service descriptor
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "docrelay",
        "version": version,
        "description": "Authenticated CRUD relay over a remote document and object store",
        "endpoints": {
            "health": "/health (public)",
            "users": "/users/:user_id (bearer token)",
            "storage": "/storage/upload (bearer token)",
        }
    }))
}
