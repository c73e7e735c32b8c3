mod common;

use docrelay::config::Mode;
use reqwest::StatusCode;

#[tokio::test]
async fn missing_header_is_401_and_store_is_never_called() {
    let (app, store) = common::test_app(Mode::Server);

    let (status, body) = common::send(&app, "GET", "/users/u1", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn malformed_schemes_are_rejected_in_server_mode() {
    let (app, store) = common::test_app(Mode::Server);

    for header in ["bearer sometoken", "Basic dXNlcjpwdw==", "Bearer"] {
        let request = axum::http::Request::builder()
            .method("GET")
            .uri("/users/u1")
            .header("authorization", header)
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "header {:?} should be rejected",
            header
        );
    }

    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn bearer_requests_reach_the_store_in_server_mode() {
    let (app, store) = common::test_app(Mode::Server);

    // Empty store, so the read itself misses; the point is that the
    // request got past the identity layer.
    let (status, _body) = common::send(&app, "GET", "/users/u1", Some("any-token"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(store.reads.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn local_mode_substitutes_the_default_identity() {
    let (app, store) = common::test_app(Mode::Local);

    let (status, _body) = common::send(&app, "GET", "/users/u1", None, None).await;

    // Proceeds to the store under the default identity instead of 401.
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(store.reads.load(std::sync::atomic::Ordering::SeqCst), 1);
}
