//! HTTP-level tests for the wifiqr API.

use std::io::Cursor;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;
use wifiqr_core::{Config, JsonStore, NoopNotifier};
use wifiqr_server::api::create_router;
use wifiqr_server::state::AppState;

async fn server() -> (TestServer, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.storage.data_dir = dir.path().to_path_buf();
    config.batch.max_ids = 3;

    let store = Arc::new(JsonStore::open_in(dir.path()).await.unwrap());
    let state = AppState::with_parts(config, store, Arc::new(NoopNotifier));
    (TestServer::new(create_router(state)).unwrap(), dir)
}

async fn create(server: &TestServer, body: Value) -> String {
    let response = server.post("/api/wifi").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (server, _dir) = server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_create_and_fetch_network() {
    let (server, _dir) = server().await;
    let id = create(
        &server,
        json!({ "ssid": "Home", "password": "pass1234", "encryption": "WPA2" }),
    )
    .await;

    let response = server.get(&format!("/api/wifi/{id}")).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["ssid"], "Home");
    assert_eq!(body["encryption"], "WPA2");
    assert_eq!(body["hidden"], false);

    let list = server.get("/api/wifi").await.json::<Value>();
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let (server, _dir) = server().await;
    let response = server
        .post("/api/wifi")
        .json(&json!({ "ssid": "", "password": "short", "encryption": "WPA9" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "validation_failed");
    assert_eq!(body["details"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_network_is_404() {
    let (server, _dir) = server().await;
    let id = uuid::Uuid::new_v4();

    server
        .get(&format!("/api/wifi/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get(&format!("/api/wifi/{id}/qr"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_single_qr() {
    let (server, _dir) = server().await;
    let id = create(
        &server,
        json!({ "ssid": "Guest", "encryption": "nopass", "hidden": true }),
    )
    .await;

    let response = server.get(&format!("/api/wifi/{id}/qr")).await;
    response.assert_status_ok();
    assert_eq!(response.header(header::CONTENT_TYPE), "image/png");
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment; filename=\"qrcode.png\""
    );

    let first = response.as_bytes().to_vec();
    let image = image::load_from_memory(&first).unwrap();
    assert_eq!(image.width() % 20, 0);

    let again = server.get(&format!("/api/wifi/{id}/qr")).await;
    assert_eq!(again.as_bytes().to_vec(), first);
}

#[tokio::test]
async fn test_bulk_download_skips_unknown_ids() {
    let (server, _dir) = server().await;
    let a = create(
        &server,
        json!({ "ssid": "Office/1", "password": "pass1234", "encryption": "WPA" }),
    )
    .await;
    let c = create(
        &server,
        json!({ "ssid": "Office:1", "password": "pass5678", "encryption": "WPA3" }),
    )
    .await;
    let missing = uuid::Uuid::new_v4().to_string();

    let response = server
        .post("/api/wifi/bulk-qr")
        .json(&json!({ "ids": [a, missing, c] }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(header::CONTENT_TYPE), "application/zip");
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment; filename=\"wifi-qrcodes.zip\""
    );
    assert_eq!(
        zip_entry_names(response.as_bytes()),
        vec![format!("Office_1_{a}.png"), format!("Office_1_{c}.png")]
    );
}

#[tokio::test]
async fn test_bulk_download_with_no_matches_is_404() {
    let (server, _dir) = server().await;
    let response = server
        .post("/api/wifi/bulk-qr")
        .json(&json!({ "ids": [uuid::Uuid::new_v4()] }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "no_records_found");
}

#[tokio::test]
async fn test_bulk_download_id_limits() {
    let (server, _dir) = server().await;

    server
        .post("/api/wifi/bulk-qr")
        .json(&json!({ "ids": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/wifi/bulk-qr")
        .json(&json!({ "ids": [uuid::Uuid::nil()] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "validation_failed");

    let too_many: Vec<_> = (0..4).map(|_| uuid::Uuid::new_v4()).collect();
    server
        .post("/api/wifi/bulk-qr")
        .json(&json!({ "ids": too_many }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (server, _dir) = server().await;
    let response = server.get("/api/openapi.json").await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["paths"]["/api/wifi/bulk-qr"].is_object());
}
