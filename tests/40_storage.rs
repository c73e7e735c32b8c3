mod common;

use docrelay::config::Mode;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn upload_returns_urls_in_input_order() {
    let (app, _store) = common::test_app(Mode::Server);

    let (status, body) = common::send(
        &app,
        "POST",
        "/storage/upload",
        Some("t"),
        Some(json!({
            "fileNames": ["a.txt", "b.txt"],
            "fileBuffers": [[97, 97], [98, 98]],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let urls = body["urls"].as_array().expect("urls array");
    assert_eq!(urls.len(), 2);
    assert!(urls[0].as_str().unwrap().ends_with("uploads/a.txt"));
    assert!(urls[1].as_str().unwrap().ends_with("uploads/b.txt"));
}

#[tokio::test]
async fn folder_override_is_honored() {
    let (app, _store) = common::test_app(Mode::Server);

    let (status, body) = common::send(
        &app,
        "POST",
        "/storage/upload",
        Some("t"),
        Some(json!({
            "fileNames": ["avatar.png"],
            "fileBuffers": [[0, 1, 2]],
            "folder": "avatars",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["urls"][0].as_str().unwrap().contains("/avatars/"));
}

#[tokio::test]
async fn mismatched_lists_never_reach_the_store() {
    let (app, store) = common::test_app(Mode::Server);

    let (status, body) = common::send(
        &app,
        "POST",
        "/storage/upload",
        Some("t"),
        Some(json!({
            "fileNames": ["a.txt", "b.txt"],
            "fileBuffers": [[97]],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(store.uploads.load(std::sync::atomic::Ordering::SeqCst), 0);
}
