//! API integration tests for static files, health and acquisition endpoints.
//!
//! Tests verify:
//! - Static files are served with a content type guessed from the extension
//! - `GET /` serves the index page
//! - Acquisition JSON endpoints and their error cases
//! - HTTP response codes and error bodies

use axum::http::StatusCode;

use super::test_utils::{
    body_bytes, body_json, create_mono16_png, get, post, test_router, MockFileSource,
};

// =============================================================================
// Static Files
// =============================================================================

#[tokio::test]
async fn test_static_file_served_as_is() {
    let source = MockFileSource::new()
        .with_file("app.js", b"console.log('plate');".to_vec())
        .with_file("css/site.css", b"body { margin: 0 }".to_vec());
    let router = test_router(source);

    let response = get(&router, "/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/javascript; charset=utf-8"
    );
    assert_eq!(&body_bytes(response).await[..], b"console.log('plate');");

    let response = get(&router, "/css/site.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/css; charset=utf-8"
    );
}

#[tokio::test]
async fn test_unknown_extension_is_octet_stream() {
    let source = MockFileSource::new().with_file("data.bin", vec![0, 1, 2, 3]);
    let router = test_router(source);

    let response = get(&router, "/data.bin").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/octet-stream"
    );
    assert_eq!(&body_bytes(response).await[..], &[0, 1, 2, 3]);
}

#[tokio::test]
async fn test_static_file_not_found() {
    let router = test_router(MockFileSource::new());

    let response = get(&router, "/missing.json").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_static_file_has_no_tile_headers() {
    let source = MockFileSource::new().with_file("notes.txt", b"hello".to_vec());
    let router = test_router(source);

    let response = get(&router, "/notes.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("x-tile-cache-hit"));
}

#[tokio::test]
async fn test_index_served_at_root() {
    let source = MockFileSource::new().with_file("index.html", b"<html>plates</html>".to_vec());
    let router = test_router(source);

    let response = get(&router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(&body_bytes(response).await[..], b"<html>plates</html>");
}

#[tokio::test]
async fn test_index_missing_returns_404() {
    let router = test_router(MockFileSource::new());

    let response = get(&router, "/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let source = MockFileSource::new().with_file("A01.png", create_mono16_png(20, 20));
    let router = test_router(source);

    let response = get(&router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["cached_tiles"], 0);

    // Render one tile and check the count moves
    assert_eq!(get(&router, "/A01.png").await.status(), StatusCode::OK);

    let json = body_json(get(&router, "/health").await).await;
    assert_eq!(json["cached_tiles"], 1);
}

// =============================================================================
// Full Path Name
// =============================================================================

#[tokio::test]
async fn test_full_path_name() {
    let router = test_router(MockFileSource::new());

    let response = post(
        &router,
        "/api/fullPathName",
        "application/json",
        r#"{"base_path": "/data", "project_name": "screen_7", "plate_name": "plate_12"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["full_output_path"], "/data/screen_7/plate_12");
}

#[tokio::test]
async fn test_full_path_name_trims_trailing_slash() {
    let router = test_router(MockFileSource::new());

    let response = post(
        &router,
        "/api/fullPathName",
        "application/json",
        r#"{"base_path": "/data/", "project_name": "p", "plate_name": "q"}"#,
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["full_output_path"], "/data/p/q");
}

#[tokio::test]
async fn test_full_path_name_rejects_non_json() {
    let router = test_router(MockFileSource::new());

    let response = post(&router, "/api/fullPathName", "text/plain", "base_path=/data").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_full_path_name_rejects_missing_field() {
    let router = test_router(MockFileSource::new());

    let response = post(
        &router,
        "/api/fullPathName",
        "application/json",
        r#"{"base_path": "/data", "project_name": "p"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Required Storage
// =============================================================================

#[tokio::test]
async fn test_required_storage_mono8() {
    let router = test_router(MockFileSource::new());

    let response = post(
        &router,
        "/api/requiredStorage",
        "application/json",
        r#"{
            "pixel_depth": {"handle": "mono8"},
            "grid": {"num_x": 2, "num_y": 2, "num_z": 1, "num_t": 1},
            "well_selection": [[true, false], [false, false]]
        }"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["max_required_storage"], 25_000_000u64);
}

#[tokio::test]
async fn test_required_storage_mono12_doubles() {
    let router = test_router(MockFileSource::new());

    let response = post(
        &router,
        "/api/requiredStorage",
        "application/json",
        r#"{
            "pixel_depth": {"handle": "mono12"},
            "grid": {"num_x": 1, "num_y": 1, "num_z": 3, "num_t": 1},
            "well_selection": [[true, true], [true, false]]
        }"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // 3 wells × 3 images × 2 bytes × 2500²
    let json = body_json(response).await;
    assert_eq!(json["max_required_storage"], 112_500_000u64);
}

#[tokio::test]
async fn test_required_storage_no_wells_selected() {
    let router = test_router(MockFileSource::new());

    let response = post(
        &router,
        "/api/requiredStorage",
        "application/json",
        r#"{
            "pixel_depth": {"handle": "mono8"},
            "grid": {"num_x": 4, "num_y": 4, "num_z": 1, "num_t": 1},
            "well_selection": [[false, false]]
        }"#,
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["max_required_storage"], 0);
}

#[tokio::test]
async fn test_required_storage_unknown_pixel_depth() {
    let router = test_router(MockFileSource::new());

    let response = post(
        &router,
        "/api/requiredStorage",
        "application/json",
        r#"{
            "pixel_depth": {"handle": "mono16"},
            "grid": {"num_x": 1, "num_y": 1, "num_z": 1, "num_t": 1},
            "well_selection": [[true]]
        }"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "unsupported_pixel_depth");
    assert!(json["message"].as_str().unwrap().contains("mono16"));
}

#[tokio::test]
async fn test_required_storage_overflow() {
    let router = test_router(MockFileSource::new());

    let response = post(
        &router,
        "/api/requiredStorage",
        "application/json",
        r#"{
            "pixel_depth": {"handle": "mono12"},
            "grid": {"num_x": 4294967296, "num_y": 4294967296, "num_z": 1, "num_t": 1},
            "well_selection": [[true]]
        }"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "storage_overflow");
}

#[tokio::test]
async fn test_required_storage_rejects_non_json() {
    let router = test_router(MockFileSource::new());

    let response = post(&router, "/api/requiredStorage", "text/plain", "mono8").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_on_api_is_not_a_file() {
    let router = test_router(MockFileSource::new());

    let response = get(&router, "/api/requiredStorage").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
