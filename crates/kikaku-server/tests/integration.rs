use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app(dir: &TempDir) -> axum::Router {
    kikaku_server::build_router(dir.path().to_path_buf(), None)
}

/// Send a request as `uid` and return (status, parsed JSON body).
async fn request(
    app: axum::Router,
    method: &str,
    uri: &str,
    uid: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(uid) = uid {
        builder = builder.header("x-user-id", uid);
    }
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str, uid: &str) -> (StatusCode, serde_json::Value) {
    request(app, "GET", uri, Some(uid), None).await
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    uid: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request(app, "POST", uri, Some(uid), Some(body)).await
}

/// Send a GET request and return the raw body text.
async fn get_text(app: axum::Router, uri: &str, uid: &str) -> (StatusCode, String, String) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .header("x-user-id", uid)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap_or("").to_string())
        .unwrap_or_default();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
}

/// Create a project owned by `uid` and return its id.
async fn create_project(dir: &TempDir, uid: &str, name: &str) -> String {
    let (status, json) = post_json(
        app(dir),
        "/api/projects",
        uid,
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_identity_header_is_401() {
    let dir = TempDir::new().unwrap();
    let (status, _json) = request(app(&dir), "GET", "/api/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unsafe_identity_is_400() {
    let dir = TempDir::new().unwrap();
    let (status, _json) = request(app(&dir), "GET", "/api/projects", Some("../x"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_project() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "文化祭アプリ").await;

    let (status, json) = get(app(&dir), &format!("/api/projects/{id}"), "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "文化祭アプリ");
    assert_eq!(json["owner"], "alice");
    assert_eq!(json["status"]["current_step"], "genre");
    assert_eq!(json["progress_percent"], 0);
}

#[tokio::test]
async fn create_with_empty_name_is_400() {
    let dir = TempDir::new().unwrap();
    let (status, _json) = post_json(
        app(&dir),
        "/api/projects",
        "alice",
        serde_json::json!({ "name": "  " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_project_is_404() {
    let dir = TempDir::new().unwrap();
    let id = uuid::Uuid::new_v4();
    let (status, _json) = get(app(&dir), &format!("/api/projects/{id}"), "alice").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_member_gets_403() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "private").await;

    let (status, _json) = get(app(&dir), &format!("/api/projects/{id}"), "mallory").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn listing_shows_owned_and_shared_only() {
    let dir = TempDir::new().unwrap();
    let owned = create_project(&dir, "alice", "mine").await;
    let shared = create_project(&dir, "bob", "bobs").await;
    create_project(&dir, "carol", "unrelated").await;

    let (status, _json) = post_json(
        app(&dir),
        &format!("/api/projects/{shared}/share"),
        "bob",
        serde_json::json!({ "user_id": "alice" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = get(app(&dir), "/api/projects", "alice").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&owned.as_str()));
    assert!(ids.contains(&shared.as_str()));
}

#[tokio::test]
async fn soft_deleted_project_disappears_from_listing() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "short-lived").await;

    let (status, json) = request(
        app(&dir),
        "DELETE",
        &format!("/api/projects/{id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["deleted_at"].is_string());

    let (status, json) = get(app(&dir), "/api/projects", "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn only_owner_can_delete() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "plan").await;
    post_json(
        app(&dir),
        &format!("/api/projects/{id}/share"),
        "alice",
        serde_json::json!({ "user_id": "bob" }),
    )
    .await;

    let (status, _json) = request(
        app(&dir),
        "DELETE",
        &format!("/api/projects/{id}"),
        Some("bob"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn share_with_owner_is_400_and_double_share_is_409() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "plan").await;

    let (status, _json) = post_json(
        app(&dir),
        &format!("/api/projects/{id}/share"),
        "alice",
        serde_json::json!({ "user_id": "alice" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _json) = post_json(
        app(&dir),
        &format!("/api/projects/{id}/share"),
        "alice",
        serde_json::json!({ "user_id": "bob" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _json) = post_json(
        app(&dir),
        &format!("/api/projects/{id}/share"),
        "alice",
        serde_json::json!({ "user_id": "bob" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unshare_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "plan").await;

    for _ in 0..2 {
        let (status, json) = post_json(
            app(&dir),
            &format!("/api/projects/{id}/unshare"),
            "alice",
            serde_json::json!({ "user_id": "bob" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["shared_with"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn rename_project() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "old name").await;

    let (status, json) = request(
        app(&dir),
        "PUT",
        &format!("/api/projects/{id}/name"),
        Some("alice"),
        Some(serde_json::json!({ "name": "new name" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "new name");
}

// ---------------------------------------------------------------------------
// Wizard state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn patch_state_merges_only_present_fields() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "plan").await;

    let (status, _json) = request(
        app(&dir),
        "PATCH",
        &format!("/api/projects/{id}/state"),
        Some("alice"),
        Some(serde_json::json!({ "genre": "遊び" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = request(
        app(&dir),
        "PATCH",
        &format!("/api/projects/{id}/state"),
        Some("alice"),
        Some(serde_json::json!({ "target": { "gender": "female" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["genre"], "遊び");
    assert_eq!(json["target"]["gender"], "female");
    assert_eq!(json["target"]["age_min"], "");
}

#[tokio::test]
async fn put_state_overwrites_wholesale() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "plan").await;

    request(
        app(&dir),
        "PATCH",
        &format!("/api/projects/{id}/state"),
        Some("alice"),
        Some(serde_json::json!({ "genre": "遊び" })),
    )
    .await;

    let (status, json) = request(
        app(&dir),
        "PUT",
        &format!("/api/projects/{id}/state"),
        Some("alice"),
        Some(serde_json::json!({ "concept": "録音アプリ" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["concept"], "録音アプリ");
    assert_eq!(json["genre"], "", "PUT replaces the whole state");
}

// ---------------------------------------------------------------------------
// Progress tracking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn marking_a_step_completes_its_prefix() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "plan").await;

    let (status, json) = post_json(
        app(&dir),
        &format!("/api/projects/{id}/step"),
        "alice",
        serde_json::json!({ "step": "scene" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["updated"], true);
    assert_eq!(json["status"]["current_step"], "scene");
    let completed: Vec<&str> = json["status"]["completed_steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert_eq!(
        completed,
        vec!["genre", "mind-map", "concept", "target", "scene"]
    );
}

#[tokio::test]
async fn unknown_step_is_a_logged_noop() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "plan").await;

    let (status, json) = post_json(
        app(&dir),
        &format!("/api/projects/{id}/step"),
        "alice",
        serde_json::json!({ "step": "settings" }),
    )
    .await;
    // Navigation must not be blocked: still a 200, nothing recorded.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["updated"], false);
    assert!(json["status"]["completed_steps"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn resume_follows_filled_state() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "plan").await;

    let (status, json) = get(app(&dir), &format!("/api/projects/{id}/resume"), "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], "genre");

    request(
        app(&dir),
        "PATCH",
        &format!("/api/projects/{id}/state"),
        Some("alice"),
        Some(serde_json::json!({ "genre": "遊び" })),
    )
    .await;

    let (_status, json) = get(app(&dir), &format!("/api/projects/{id}/resume"), "alice").await;
    assert_eq!(json["step"], "mind-map");
}

#[tokio::test]
async fn progress_reports_percent_and_steps() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "plan").await;

    post_json(
        app(&dir),
        &format!("/api/projects/{id}/step"),
        "alice",
        serde_json::json!({ "step": "target" }),
    )
    .await;

    let (status, json) = get(app(&dir), &format!("/api/projects/{id}/progress"), "alice").await;
    assert_eq!(status, StatusCode::OK);
    // 4 of 8 steps.
    assert_eq!(json["percent"], 50);
    assert_eq!(json["current_step"], "target");
}

#[tokio::test]
async fn summary_is_markdown() {
    let dir = TempDir::new().unwrap();
    let id = create_project(&dir, "alice", "plan").await;

    request(
        app(&dir),
        "PATCH",
        &format!("/api/projects/{id}/state"),
        Some("alice"),
        Some(serde_json::json!({
            "genre": "遊び",
            "keywords": ["公園", "友達"],
        })),
    )
    .await;

    let (status, content_type, body) =
        get_text(app(&dir), &format!("/api/projects/{id}/summary"), "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.contains("text/markdown"));
    assert!(body.starts_with("# 企画概要"));
    assert!(body.contains("**ジャンル:** 遊び"));
    assert!(body.contains("**キーワード:** 公園, 友達"));
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_then_search_users() {
    let dir = TempDir::new().unwrap();

    let (status, _json) = request(
        app(&dir),
        "PUT",
        "/api/users/me",
        Some("u1"),
        Some(serde_json::json!({ "email": "hana@example.com", "display_name": "はな" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = get(app(&dir), "/api/users/search?q=ha", "u2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["email"], "hana@example.com");

    let (status, json) = get(app(&dir), "/api/users/u1", "u2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["display_name"], "はな");

    let (status, _json) = get(app(&dir), "/api/users/nobody", "u2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Assists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn assist_without_client_is_503() {
    let dir = TempDir::new().unwrap();
    let (status, _json) = post_json(
        app(&dir),
        "/api/assist/word",
        "alice",
        serde_json::json!({ "word": "公園", "genre": "遊び" }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn assist_word_requires_a_word() {
    let dir = TempDir::new().unwrap();
    let (status, _json) = post_json(
        app(&dir),
        "/api/assist/word",
        "alice",
        serde_json::json!({ "word": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assist_word_proxies_to_text_service() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "すべり台" } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = gpt_assist::AssistClient::new(gpt_assist::ClientOptions {
        base_url: server.url(),
        api_key: "test-key".to_string(),
        ..Default::default()
    });
    let app = kikaku_server::build_router(dir.path().to_path_buf(), Some(client));

    let (status, json) = post_json(
        app,
        "/api/assist/word",
        "alice",
        serde_json::json!({ "word": "公園", "genre": "遊び", "used": ["ブランコ"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["word"], "すべり台");
}

#[tokio::test]
async fn assist_upstream_failure_is_502() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = gpt_assist::AssistClient::new(gpt_assist::ClientOptions {
        base_url: server.url(),
        api_key: "test-key".to_string(),
        ..Default::default()
    });
    let app = kikaku_server::build_router(dir.path().to_path_buf(), Some(client));

    let (status, _json) = post_json(
        app,
        "/api/assist/concepts",
        "alice",
        serde_json::json!({ "keywords": ["公園"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
