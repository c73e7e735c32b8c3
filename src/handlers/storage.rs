use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{UploadFile, DEFAULT_UPLOAD_FOLDER};

/// File contents arrive as JSON byte arrays; transport encoding is the
/// caller's responsibility.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody {
    pub file_names: Vec<String>,
    pub file_buffers: Vec<Vec<u8>>,
    #[serde(default)]
    pub folder: Option<String>,
}

/// POST /storage/upload - store files and return access URLs in input order
pub async fn upload(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(body): Json<UploadBody>,
) -> Result<Json<Value>, ApiError> {
    // name[i] corresponds to buffer[i]; a mismatch is the caller's error
    // and never reaches the store.
    if body.file_names.len() != body.file_buffers.len() {
        return Err(ApiError::validation_error(format!(
            "fileNames and fileBuffers must have the same length ({} names, {} buffers)",
            body.file_names.len(),
            body.file_buffers.len()
        )));
    }

    let files = body
        .file_names
        .into_iter()
        .zip(body.file_buffers)
        .map(|(name, bytes)| UploadFile { name, bytes })
        .collect();

    let folder = body.folder.as_deref().unwrap_or(DEFAULT_UPLOAD_FOLDER);
    let urls = state.store.upload(files, folder, &caller).await?;
    Ok(Json(json!({ "urls": urls })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_accepts_camel_case_fields_and_defaults_folder() {
        let body: UploadBody = serde_json::from_value(json!({
            "fileNames": ["a.txt"],
            "fileBuffers": [[104, 105]],
        }))
        .unwrap();
        assert_eq!(body.file_names, vec!["a.txt"]);
        assert_eq!(body.file_buffers, vec![vec![104, 105]]);
        assert!(body.folder.is_none());
    }
}
