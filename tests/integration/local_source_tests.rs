//! End-to-end tests against a real directory on disk.
//!
//! Tests verify:
//! - Tiles render from files under the served root
//! - Static files and directories are told apart
//! - Paths cannot escape the served root

use axum::http::StatusCode;
use axum::Router;
use image::GenericImageView;
use tempfile::TempDir;

use plate_server::io::LocalFileSource;
use plate_server::tile::TileService;
use plate_server::{create_router, RouterConfig};

use super::test_utils::{body_bytes, create_mono16_tiff, decode_png, get, is_valid_png};

fn served_dir() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();

    std::fs::create_dir_all(dir.path().join("plate_1")).unwrap();
    std::fs::write(
        dir.path().join("plate_1/A01_site1.tif"),
        create_mono16_tiff(50, 30),
    )
    .unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>viewer</h1>").unwrap();

    let tile_service = TileService::new(LocalFileSource::new(dir.path()));
    let router = create_router(tile_service, RouterConfig::new().with_tracing(false));

    (dir, router)
}

#[tokio::test]
async fn test_tile_from_disk() {
    let (_dir, router) = served_dir();

    let response = get(&router, "/plate_1/A01_site1.tif.lowres.saturated").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_bytes(response).await;
    assert!(is_valid_png(&body));
    assert_eq!(decode_png(&body).dimensions(), (5, 3));
}

#[tokio::test]
async fn test_index_from_disk() {
    let (_dir, router) = served_dir();

    let response = get(&router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"<h1>viewer</h1>");
}

#[tokio::test]
async fn test_directory_is_not_a_file() {
    let (_dir, router) = served_dir();

    let response = get(&router, "/plate_1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_tile_on_disk() {
    let (_dir, router) = served_dir();

    let response = get(&router, "/plate_1/Z99_site1.tif.highres").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_parent_traversal_rejected() {
    let (_dir, router) = served_dir();

    let response = get(&router, "/plate_1/%2E%2E/%2E%2E/etc/passwd").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&router, "/plate_1/../../secret.tif").await;
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::NOT_FOUND
    );
}
