use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use math_glossary::api;
use math_glossary::attachments::LocalAttachments;
use math_glossary::config::Config;
use math_glossary::storage::Database;
use math_glossary::AppState;

const BOUNDARY: &str = "test-boundary";

fn test_app(temp_dir: &tempfile::TempDir) -> axum::Router {
    test_app_with_limit(temp_dir, 10 * 1024 * 1024) // 10MB for tests
}

fn test_app_with_limit(temp_dir: &tempfile::TempDir, max_upload_size: u64) -> axum::Router {
    let data_dir = temp_dir.path().join("data");
    let uploads_dir = temp_dir.path().join("uploads");

    let config = Config {
        bind_address: "127.0.0.1:0".to_string(),
        data_dir: data_dir.to_string_lossy().to_string(),
        uploads_dir: uploads_dir.to_string_lossy().to_string(),
        max_upload_size,
        test_mode: true,
    };

    let db = Database::open(&data_dir).expect("Failed to open test database");
    let attachments =
        LocalAttachments::new(&uploads_dir).expect("Failed to create test attachment store");

    api::create_router(Arc::new(AppState {
        config,
        db,
        attachments: Arc::new(attachments),
    }))
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn multipart_post(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"attachment\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Text-only categories
// ============================================================================

#[tokio::test]
async fn test_algebra_create_then_list() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/algebra",
            serde_json::json!({"title": "Linear equation", "definition": "ax+b=0"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Dados inseridos na tabela Algebra com sucesso!"
    );

    let response = app.oneshot(get("/api/algebra")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["title"], "Linear equation");
    assert_eq!(records[0]["definition"], "ax+b=0");
    assert_eq!(records[0]["attachment"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_missing_definition_rejected_with_legacy_message() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/algebra",
            serde_json::json!({"title": "Orphan"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Faltando título ou definição");

    // No row written
    let response = app.oneshot(get("/api/algebra")).await.unwrap();
    let records = body_json(response).await;
    assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_title_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    for slug in ["algebra", "trigonometry", "arithmetic"] {
        let response = app
            .clone()
            .oneshot(json_post(
                &format!("/api/{slug}"),
                serde_json::json!({"title": "", "definition": "something"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{slug}");
        let body = body_json(response).await;
        assert_eq!(body["error"], "Faltando título ou definição");
    }
}

#[tokio::test]
async fn test_trigonometry_and_arithmetic_answer_201() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/trigonometry",
            serde_json::json!({"title": "Sine", "definition": "opposite over hypotenuse"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Trigonometria adicionada com sucesso");

    let response = app
        .oneshot(json_post(
            "/api/arithmetic",
            serde_json::json!({"title": "Sum", "definition": "a+b"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Dados adicionados com sucesso!");
}

#[tokio::test]
async fn test_combinatorics_skips_validation() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    // Empty fields pass straight through to the insert
    let response = app
        .clone()
        .oneshot(json_post(
            "/api/combinatorics",
            serde_json::json!({"title": "", "definition": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Dados inseridos na tabela Combinatoria com sucesso!"
    );

    let response = app.clone().oneshot(get("/api/combinatorics")).await.unwrap();
    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["title"], "");

    // Absent fields bind as NULL and surface as a storage error, not a 400
    let response = app
        .oneshot(json_post("/api/combinatorics", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Erro ao inserir dados.");
}

#[tokio::test]
async fn test_list_empty_returns_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    for slug in [
        "geometry",
        "algebra",
        "combinatorics",
        "trigonometry",
        "arithmetic",
    ] {
        let response = app.clone().oneshot(get(&format!("/api/{slug}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{slug}");
        let records = body_json(response).await;
        assert_eq!(records, serde_json::json!([]), "{slug}");
    }
}

#[tokio::test]
async fn test_unknown_category_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app.clone().oneshot(get("/api/calculus")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unknown category");

    let response = app
        .oneshot(json_post(
            "/api/calculus",
            serde_json::json!({"title": "t", "definition": "d"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_portuguese_slugs_and_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/aritmetica",
            serde_json::json!({"titulo": "Soma", "definicao": "a+b"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same table as the English slug
    let response = app.oneshot(get("/api/arithmetic")).await.unwrap();
    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["title"], "Soma");
}

// ============================================================================
// Geometry (multipart + attachment)
// ============================================================================

#[tokio::test]
async fn test_geometry_upload_with_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let image = b"\x89PNG fake image bytes";
    let response = app
        .clone()
        .oneshot(multipart_post(
            "/api/geometry",
            &[("title", "Triangle"), ("definition", "Three-sided polygon")],
            Some(("triangle.png", image)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Dados inseridos na tabela Geometria com sucesso!"
    );

    let response = app.clone().oneshot(get("/api/geometry")).await.unwrap();
    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    let stored = records[0]["attachment"].as_str().unwrap();
    assert!(stored.ends_with("triangle.png"));

    // The stored attachment is downloadable
    let response = app
        .oneshot(get(&format!("/uploads/{stored}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "image/png"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], image);
}

#[tokio::test]
async fn test_geometry_upload_without_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(multipart_post(
            "/api/geometry",
            &[("title", "Circle"), ("definition", "A round shape")],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/geometry")).await.unwrap();
    let records = body_json(response).await;
    assert_eq!(records[0]["attachment"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_geometry_missing_definition_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(multipart_post(
            "/api/geometry",
            &[("title", "Square")],
            Some(("square.png", b"bytes")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Faltando título ou definição");

    // No row and no orphaned attachment listing
    let response = app.oneshot(get("/api/geometry")).await.unwrap();
    let records = body_json(response).await;
    assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_geometry_oversized_attachment_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app_with_limit(&dir, 1024); // 1KB limit

    let oversized = vec![0u8; 4096];
    let response = app
        .clone()
        .oneshot(multipart_post(
            "/api/geometry",
            &[("title", "Huge"), ("definition", "Too big to store")],
            Some(("huge.png", &oversized)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    // No row written
    let response = app.oneshot(get("/api/geometry")).await.unwrap();
    let records = body_json(response).await;
    assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_geometry_duplicate_filenames_stay_distinct() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    for definition in ["first", "second"] {
        let response = app
            .clone()
            .oneshot(multipart_post(
                "/api/geometry",
                &[("title", "Angle"), ("definition", definition)],
                Some(("angle.png", definition.as_bytes())),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/api/geometry")).await.unwrap();
    let records = body_json(response).await;
    let first = records[0]["attachment"].as_str().unwrap();
    let second = records[1]["attachment"].as_str().unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_geometry_legacy_slug_and_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(multipart_post(
            "/api/geometria",
            &[("titulo", "Reta"), ("definicao", "Uma linha infinita")],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/geometria")).await.unwrap();
    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["title"], "Reta");
}

// ============================================================================
// Uploads route
// ============================================================================

#[tokio::test]
async fn test_uploads_unknown_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app.oneshot(get("/uploads/no-such-file.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app.oneshot(get("/_internal/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_admin_purge() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    for slug in ["algebra", "trigonometry"] {
        app.clone()
            .oneshot(json_post(
                &format!("/api/{slug}"),
                serde_json::json!({"title": "t", "definition": "d"}),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/admin/purge")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["rows_deleted"], 2);

    let response = app.oneshot(get("/api/algebra")).await.unwrap();
    let records = body_json(response).await;
    assert!(records.as_array().unwrap().is_empty());
}
