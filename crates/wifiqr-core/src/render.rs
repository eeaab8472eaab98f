//! QR matrix generation and PNG rasterisation.
//!
//! The payload is encoded at error-correction level Q and drawn with a fixed
//! number of pixels per module plus the standard four-module quiet zone.
//! Output is an 8-bit grayscale PNG, so the same payload always produces the
//! same bytes.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::types::QrError as MatrixError;
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::error::{QrError, Result};

/// Pixels per QR module.
pub const DEFAULT_MODULE_SCALE: u32 = 20;

/// Quiet zone width, in modules, drawn around the symbol.
pub const QUIET_ZONE_MODULES: u32 = 4;

/// A rendered raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// File extension without the leading dot.
    pub extension: &'static str,
}

/// Turns a payload string into image bytes.
///
/// Implementations must be pure: the same payload yields the same bytes.
/// They run on blocking worker threads, hence the `'static` bound.
pub trait Renderer: Send + Sync + 'static {
    /// Render `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::EncodingOverflow`] if the payload does not fit in a
    /// symbol and [`QrError::RenderFailure`] for any other defect.
    fn render(&self, payload: &str) -> Result<RenderedImage>;
}

/// PNG renderer backed by the `qrcode` and `image` crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrRenderer {
    module_scale: u32,
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE_SCALE)
    }
}

impl QrRenderer {
    /// Create a renderer drawing `module_scale` pixels per module.
    ///
    /// A scale of zero is clamped to one.
    #[must_use]
    pub fn new(module_scale: u32) -> Self {
        Self {
            module_scale: module_scale.max(1),
        }
    }

    /// Pixels per module.
    #[must_use]
    pub const fn module_scale(&self) -> u32 {
        self.module_scale
    }

    /// Encode `payload` into a QR matrix at level Q.
    ///
    /// # Errors
    ///
    /// See [`Renderer::render`].
    pub fn matrix(payload: &str) -> Result<QrCode> {
        QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::Q).map_err(|e| match e {
            MatrixError::DataTooLong | MatrixError::InvalidVersion => QrError::EncodingOverflow {
                payload_len: payload.len(),
            },
            other => QrError::RenderFailure(other.to_string()),
        })
    }
}

impl Renderer for QrRenderer {
    fn render(&self, payload: &str) -> Result<RenderedImage> {
        let code = Self::matrix(payload)?;

        let pixels = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(self.module_scale, self.module_scale)
            .build();

        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(pixels)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| QrError::RenderFailure(e.to_string()))?;

        debug!(
            modules = code.width(),
            scale = self.module_scale,
            bytes = bytes.len(),
            "Rendered QR code"
        );

        Ok(RenderedImage {
            bytes,
            content_type: "image/png",
            extension: "png",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = "WIFI:T:WPA;S:Home;P:pass1234;;";

    #[test]
    fn test_render_is_deterministic() {
        let renderer = QrRenderer::default();
        let first = renderer.render(PAYLOAD).unwrap();
        let second = renderer.render(PAYLOAD).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_produces_png() {
        let image = QrRenderer::default().render(PAYLOAD).unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.extension, "png");
        assert_eq!(&image.bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_render_scale_and_quiet_zone() {
        let modules = u32::try_from(QrRenderer::matrix(PAYLOAD).unwrap().width()).unwrap();
        let image = QrRenderer::default().render(PAYLOAD).unwrap();

        let decoded = image::load_from_memory(&image.bytes).unwrap();
        let expected = (modules + 2 * QUIET_ZONE_MODULES) * DEFAULT_MODULE_SCALE;
        assert_eq!(decoded.width(), expected);
        assert_eq!(decoded.height(), expected);

        // Quiet zone is light, the finder pattern corner is dark.
        let gray = decoded.to_luma8();
        assert_eq!(gray.get_pixel(0, 0).0, [255]);
        let corner = QUIET_ZONE_MODULES * DEFAULT_MODULE_SCALE;
        assert_eq!(gray.get_pixel(corner, corner).0, [0]);
    }

    #[test]
    fn test_different_payloads_render_differently() {
        let renderer = QrRenderer::default();
        let a = renderer.render("WIFI:T:WPA;S:A;P:password;;").unwrap();
        let b = renderer.render("WIFI:T:WPA;S:B;P:password;;").unwrap();
        assert_ne!(a.bytes, b.bytes);
    }

    #[test]
    fn test_oversized_payload_is_encoding_overflow() {
        let payload = "x".repeat(4000);
        let err = QrRenderer::default().render(&payload).unwrap_err();
        assert!(matches!(err, QrError::EncodingOverflow { payload_len: 4000 }));
    }

    #[test]
    fn test_zero_scale_is_clamped() {
        assert_eq!(QrRenderer::new(0).module_scale(), 1);
    }
}
