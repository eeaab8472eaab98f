//! Wi-Fi network API endpoints.
//!
//! Networks are created and read as JSON. Their QR codes are served as a PNG
//! for a single network or as a zip archive for a list of networks.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use wifiqr_core::{
    dispatch, validate_bulk_ids, validate_new_network, BatchOutcome, CancellationToken,
    CredentialRecord, RecordId, SecurityMode, SingleOutcome, WifiCreatedEvent,
};

use crate::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::state::SharedState;

/// Download name for a single QR code.
const SINGLE_FILE_NAME: &str = "qrcode.png";

/// Creates the Wi-Fi router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_networks).post(create_network))
        .route("/bulk-qr", post(download_bulk_qr))
        .route("/{id}", get(get_network))
        .route("/{id}/qr", get(download_qr))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A stored Wi-Fi network.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "0b9c7f1e-3a59-4c1b-9d6e-2f4a8b7c6d5e",
    "ssid": "Home",
    "password": "pass1234",
    "encryption": "WPA2",
    "hidden": false
}))]
pub struct WifiNetworkResponse {
    /// Unique identifier.
    pub id: Uuid,

    /// Network name.
    #[schema(example = "Home")]
    pub ssid: String,

    /// Network password, absent for open networks.
    #[schema(example = "pass1234")]
    pub password: Option<String>,

    /// Security mode.
    pub encryption: SecurityMode,

    /// Whether the SSID is hidden.
    #[schema(example = false)]
    pub hidden: bool,
}

impl From<CredentialRecord> for WifiNetworkResponse {
    fn from(record: CredentialRecord) -> Self {
        Self {
            id: record.id.into(),
            ssid: record.ssid,
            password: record.password,
            encryption: record.security,
            hidden: record.hidden,
        }
    }
}

/// Request body for creating a network.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "ssid": "Home",
    "password": "pass1234",
    "encryption": "WPA2",
    "hidden": false
}))]
pub struct CreateWifiRequest {
    /// Network name, 1-32 characters.
    #[schema(example = "Home", min_length = 1, max_length = 32)]
    pub ssid: String,

    /// Password, 8-63 characters. Required unless `encryption` is `nopass`.
    #[schema(example = "pass1234", min_length = 8, max_length = 63)]
    #[serde(default)]
    pub password: Option<String>,

    /// One of `WPA`, `WPA2`, `WPA3`, `WEP`, `nopass`. Defaults to `WPA`.
    #[schema(example = "WPA2")]
    #[serde(default = "default_encryption")]
    pub encryption: String,

    /// Whether the SSID is hidden.
    #[schema(example = false)]
    #[serde(default)]
    pub hidden: bool,
}

fn default_encryption() -> String {
    SecurityMode::Wpa.as_str().to_string()
}

/// Request body for a bulk QR download.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "ids": ["0b9c7f1e-3a59-4c1b-9d6e-2f4a8b7c6d5e"]
}))]
pub struct BulkQrRequest {
    /// Networks to include, in archive order.
    pub ids: Vec<Uuid>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List all stored networks.
#[utoipa::path(
    get,
    path = "/api/wifi",
    tag = "wifi",
    operation_id = "listNetworks",
    summary = "List Wi-Fi networks",
    responses(
        (status = 200, description = "All stored networks", body = [WifiNetworkResponse])
    )
)]
pub async fn list_networks(State(state): State<SharedState>) -> Json<Vec<WifiNetworkResponse>> {
    let records = state.store().list().await;
    Json(records.into_iter().map(Into::into).collect())
}

/// Store a new network.
///
/// A creation event is sent to the configured notifier. A failed notification
/// is logged and does not affect the response.
#[utoipa::path(
    post,
    path = "/api/wifi",
    tag = "wifi",
    operation_id = "createNetwork",
    summary = "Create a Wi-Fi network",
    request_body = CreateWifiRequest,
    responses(
        (status = 201, description = "Network created", body = WifiNetworkResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_network(
    State(state): State<SharedState>,
    Json(request): Json<CreateWifiRequest>,
) -> ApiResult<(StatusCode, Json<WifiNetworkResponse>)> {
    let network = validate_new_network(
        &request.ssid,
        request.password.as_deref(),
        &request.encryption,
        request.hidden,
    )?;

    let record = state.store().create(network).await?;
    info!(id = %record.id, "Created Wi-Fi network");

    dispatch(state.notifier(), &WifiCreatedEvent::for_record(&record)).await;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Fetch one network.
#[utoipa::path(
    get,
    path = "/api/wifi/{id}",
    tag = "wifi",
    operation_id = "getNetwork",
    summary = "Get a Wi-Fi network",
    params(("id" = Uuid, Path, description = "Network identifier")),
    responses(
        (status = 200, description = "Network found", body = WifiNetworkResponse),
        (status = 404, description = "No such network", body = ErrorResponse)
    )
)]
pub async fn get_network(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WifiNetworkResponse>> {
    let id = RecordId::from(id);
    state
        .store()
        .get(&id)
        .await
        .map(|record| Json(record.into()))
        .ok_or_else(|| ApiError::record_not_found(id))
}

/// Download the QR code for one network as a PNG.
#[utoipa::path(
    get,
    path = "/api/wifi/{id}/qr",
    tag = "qr",
    operation_id = "downloadQrCode",
    summary = "Download a network's QR code",
    description = "Renders the network's Wi-Fi payload as a PNG QR code at \
        error-correction level Q, 20 pixels per module.",
    params(("id" = Uuid, Path, description = "Network identifier")),
    responses(
        (status = 200, description = "PNG image", content_type = "image/png", body = Vec<u8>),
        (status = 404, description = "No such network", body = ErrorResponse)
    )
)]
pub async fn download_qr(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let id = RecordId::from(id);

    // Dropping the handler future (client disconnect) cancels the render.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    match state.archiver().build_single(&id, &cancel).await? {
        SingleOutcome::Image(image) => Ok(attachment(
            image.content_type,
            SINGLE_FILE_NAME,
            image.bytes,
        )),
        SingleOutcome::NotFound => Err(ApiError::record_not_found(id)),
    }
}

/// Download QR codes for several networks as a zip archive.
///
/// Unknown ids are skipped. Entries are named `<ssid>_<id>.png`.
#[utoipa::path(
    post,
    path = "/api/wifi/bulk-qr",
    tag = "qr",
    operation_id = "downloadBulkQrCodes",
    summary = "Download several QR codes as a zip",
    description = "Renders every known network in `ids` and returns them in one \
        zip archive, in request order. Ids that do not match a stored network \
        are skipped. Returns 404 when none match.",
    request_body = BulkQrRequest,
    responses(
        (status = 200, description = "Zip archive", content_type = "application/zip", body = Vec<u8>),
        (status = 400, description = "No ids or too many ids", body = ErrorResponse),
        (status = 404, description = "None of the ids matched", body = ErrorResponse)
    )
)]
pub async fn download_bulk_qr(
    State(state): State<SharedState>,
    Json(request): Json<BulkQrRequest>,
) -> ApiResult<Response> {
    validate_bulk_ids(&request.ids, state.config().batch.max_ids)?;
    let ids: Vec<RecordId> = request.ids.into_iter().map(RecordId::from).collect();

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    match state.archiver().build_archive(&ids, &cancel).await? {
        BatchOutcome::Archive(archive) => {
            info!(entries = archive.entries, "Serving QR archive");
            Ok(attachment(
                archive.content_type,
                archive.file_name,
                archive.bytes,
            ))
        }
        BatchOutcome::Empty => Err(ApiError::NotFound {
            error_code: "no_records_found".to_string(),
            message: "None of the requested Wi-Fi networks exist".to_string(),
        }),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Binary download response.
fn attachment(content_type: &str, file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
