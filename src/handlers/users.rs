use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::Value;

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// Collection the user routes operate on.
pub const USERS_COLLECTION: &str = "Users";

/// Pull the `data` object out of a request body. Only the structural shape
/// is checked; the content belongs to the caller and the store.
fn record_payload(body: &Value) -> Result<Value, ApiError> {
    match body.get("data") {
        Some(data @ Value::Object(_)) => Ok(data.clone()),
        Some(_) => Err(ApiError::validation_error("'data' must be a JSON object")),
        None => Err(ApiError::validation_error("missing 'data' in request body")),
    }
}

/// GET /users/:user_id - fetch a user record
pub async fn user_get(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record = state.store.read(USERS_COLLECTION, &user_id, &caller).await?;
    Ok(Json(record))
}

/// POST /users/:user_id - create a user record
pub async fn user_post(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = record_payload(&body)?;
    let record = state
        .store
        .create(USERS_COLLECTION, &user_id, payload, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /users/:user_id - update a user record
pub async fn user_put(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let payload = record_payload(&body)?;
    let record = state
        .store
        .update(USERS_COLLECTION, &user_id, payload, &caller)
        .await?;
    Ok(Json(record))
}

/// DELETE /users/:user_id - delete a user record; repeat deletes succeed
pub async fn user_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete(USERS_COLLECTION, &user_id, &caller)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
