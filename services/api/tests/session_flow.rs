mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use common::{body_json, body_text, extract_nonce, get, TestAppBuilder};
use serde_json::json;
use std::io::Write;

fn session_request(nonce: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/session");
    if let Some(nonce) = nonce {
        builder = builder.header("x-session-nonce", nonce);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn session_is_issued_freely_without_configured_secret() {
    let app = TestAppBuilder::new().build();
    assert!(!app.state.sessions.requires_nonce());

    let response = app.send(session_request(None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().expect("token string");
    assert!(app.state.sessions.verify(Some(token)).is_ok());
}

#[tokio::test]
async fn missing_nonce_is_forbidden_when_secret_is_configured() {
    let app = TestAppBuilder::new().session_secret("production-secret").build();

    let response = app.send(session_request(None)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await,
        json!({
            "error": {
                "type": "AuthenticationError",
                "code": "INVALID_NONCE",
                "message": "Valid session nonce required. Please refresh the page.",
            }
        })
    );
}

#[tokio::test]
async fn page_nonce_is_exchanged_for_a_token_once() {
    let app = TestAppBuilder::new().session_secret("production-secret").build();

    let page = app.send(get("/")).await;
    assert_eq!(page.status(), StatusCode::OK);
    let html = body_text(page).await;
    let nonce = extract_nonce(&html).expect("nonce meta tag");
    assert!(html.contains("<title>Text Intelligence</title>"));

    let first = app.send(session_request(Some(&nonce))).await;
    assert_eq!(first.status(), StatusCode::OK);

    let replay = app.send(session_request(Some(&nonce))).await;
    assert_eq!(replay.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(replay).await["error"]["code"], "INVALID_NONCE");
}

#[tokio::test]
async fn stale_page_nonce_is_rejected() {
    let app = TestAppBuilder::new().session_secret("production-secret").build();
    let html = body_text(app.send(get("/")).await).await;
    let nonce = extract_nonce(&html).unwrap();

    app.clock.advance(chrono::Duration::minutes(5) + chrono::Duration::seconds(1));

    let response = app.send(session_request(Some(&nonce))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn rendering_the_page_sweeps_expired_nonces() {
    let app = TestAppBuilder::new().build();
    app.state.nonces.issue();
    app.state.nonces.issue();
    app.clock.advance(chrono::Duration::minutes(10));

    app.send(get("/")).await;

    // Only the nonce issued for this render is left.
    assert_eq!(app.state.nonces.len(), 1);
}

#[tokio::test]
async fn index_is_not_found_without_frontend_build() {
    let app = TestAppBuilder::new().without_frontend().build();

    let response = app.send(get("/")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["detail"],
        "Frontend not built. Run make build first."
    );
    assert!(app.state.nonces.is_empty());
}

#[tokio::test]
async fn health_reports_service_name() {
    let app = TestAppBuilder::new().build();

    let response = app.send(get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"status": "ok", "service": "text-intelligence"})
    );
}

#[tokio::test]
async fn request_id_is_echoed_on_success_and_failure() {
    let app = TestAppBuilder::new().session_secret("production-secret").build();

    let ok = app
        .send(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(ok.headers()["x-request-id"], "req-123");

    let forbidden = app
        .send(
            Request::builder()
                .uri("/api/session")
                .header("x-request-id", "req-456")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(forbidden.headers()["x-request-id"], "req-456");

    let untagged = app.send(get("/health")).await;
    assert!(untagged.headers().get("x-request-id").is_none());
}

#[tokio::test]
async fn request_id_is_echoed_on_cors_preflight() {
    let app = TestAppBuilder::new().build();

    let preflight = app
        .send(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/text-intelligence")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .header("x-request-id", "req-preflight")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert!(preflight.status().is_success());
    assert!(preflight
        .headers()
        .contains_key("access-control-allow-origin"));
    assert_eq!(preflight.headers()["x-request-id"], "req-preflight");
}

#[tokio::test]
async fn metadata_serves_meta_section() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[meta]\ntitle = \"Text Intelligence\"\nuseCase = \"text\"").unwrap();
    let app = TestAppBuilder::new()
        .metadata_path(file.path().to_path_buf())
        .build();

    let response = app.send(get("/api/metadata")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"title": "Text Intelligence", "useCase": "text"})
    );
}

#[tokio::test]
async fn metadata_without_file_is_a_server_error() {
    let app = TestAppBuilder::new().build();

    let response = app.send(get("/api/metadata")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({
            "error": "INTERNAL_SERVER_ERROR",
            "message": "deepgram.toml file not found",
        })
    );
}
