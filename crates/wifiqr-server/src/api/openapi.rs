//! OpenAPI specification generation for the wifiqr API.
//!
//! The spec is served at `/api/openapi.json` and can be written to disk with
//! the `gen-openapi` binary for client generation.

use axum::Json;
use utoipa::OpenApi;
use wifiqr_core::{HealthResponse, SecurityMode};

use super::error::ErrorResponse;
use super::wifi::{BulkQrRequest, CreateWifiRequest, WifiNetworkResponse};

/// Serve the OpenAPI specification as JSON.
pub async fn get_openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Returns the OpenAPI specification as a pretty-printed string.
///
/// # Errors
///
/// Returns an error if the document cannot be serialised.
pub fn get_openapi_json() -> serde_json::Result<String> {
    ApiDoc::openapi().to_pretty_json()
}

/// Main OpenAPI document structure for wifiqr.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "wifiqr API",
        version = "0.1.0",
        description = r#"
# wifiqr API

Store Wi-Fi networks and download QR codes that phones can scan to join them.

## QR codes

- **downloadQrCode**: one PNG per network, error-correction level Q, 20 pixels per module.
- **downloadBulkQrCodes**: a zip with one PNG per known network, named `<ssid>_<id>.png`,
  in request order. Unknown ids are skipped; 404 if none are known.

Payloads follow the common `WIFI:T:<mode>;S:<ssid>;P:<password>;H:true;;` format.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local wifiqr server")
    ),
    tags(
        (name = "system", description = "Health checks"),
        (name = "wifi", description = "Stored Wi-Fi networks"),
        (name = "qr", description = "QR code downloads")
    ),
    paths(
        super::health::health_check,
        super::wifi::list_networks,
        super::wifi::create_network,
        super::wifi::get_network,
        super::wifi::download_qr,
        super::wifi::download_bulk_qr,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            SecurityMode,
            WifiNetworkResponse,
            CreateWifiRequest,
            BulkQrRequest,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generation() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "wifiqr API");
        assert!(spec.paths.paths.contains_key("/api/wifi/{id}/qr"));
        assert!(spec.paths.paths.contains_key("/api/wifi/bulk-qr"));
    }

    #[test]
    fn test_openapi_json_serialization() {
        let json = get_openapi_json().unwrap();
        assert!(json.contains("\"openapi\":"));
        assert!(json.contains("\"wifiqr API\""));
    }
}
