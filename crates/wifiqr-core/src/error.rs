//! Unified error types for the wifiqr core library.
//!
//! [`QrError`] covers every failure mode of the rendering pipeline and the
//! collaborators around it. Module-specific errors ([`ConfigError`],
//! [`ValidationErrors`], [`NotifyError`]) convert into it.
//!
//! "Nothing matched" outcomes are not errors. A single-item lookup miss is
//! [`SingleOutcome::NotFound`](crate::archive::SingleOutcome::NotFound) and a
//! batch with zero resolved records is
//! [`BatchOutcome::Empty`](crate::archive::BatchOutcome::Empty).
//!
//! # Example
//!
//! ```rust
//! use wifiqr_core::error::{QrError, Result};
//!
//! fn check_len(payload: &str) -> Result<()> {
//!     if payload.len() > 2953 {
//!         return Err(QrError::EncodingOverflow { payload_len: payload.len() });
//!     }
//!     Ok(())
//! }
//! # assert!(check_len("WIFI:T:nopass;S:Guest;;").is_ok());
//! ```
//!
//! [`ConfigError`]: crate::config::ConfigError
//! [`ValidationErrors`]: crate::validation::ValidationErrors
//! [`NotifyError`]: crate::notify::NotifyError

use thiserror::Error;

/// The unified error type for all wifiqr operations.
#[derive(Debug, Error)]
pub enum QrError {
    // =========================================================================
    // RENDERING ERRORS
    // =========================================================================
    /// The payload does not fit in any symbol version at the chosen
    /// error-correction level.
    #[error("Payload of {payload_len} bytes exceeds QR code capacity at error-correction level Q")]
    EncodingOverflow {
        /// Length of the payload in bytes.
        payload_len: usize,
    },

    /// The matrix or image generation failed for a reason other than capacity.
    #[error("QR rendering failed: {0}")]
    RenderFailure(String),

    /// The archive container could not be assembled.
    #[error("Archive assembly failed: {0}")]
    ArchiveFailure(String),

    /// The operation was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    // =========================================================================
    // INPUT ERRORS
    // =========================================================================
    /// Input rejected by validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// Configuration sources could not be read or merged.
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    /// The configuration was loaded but contains invalid values.
    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    // =========================================================================
    // PERSISTENCE & I/O ERRORS
    // =========================================================================
    /// An error occurred while persisting or reading records.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A low-level I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized [`Result`] type for wifiqr operations.
pub type Result<T> = std::result::Result<T, QrError>;

impl QrError {
    /// Returns `true` if this error came out of the render or archive stage.
    #[inline]
    #[must_use]
    pub const fn is_render_error(&self) -> bool {
        matches!(
            self,
            Self::EncodingOverflow { .. } | Self::RenderFailure(_) | Self::ArchiveFailure(_)
        )
    }

    /// Returns `true` if this error is related to configuration.
    #[inline]
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad(_) | Self::ConfigValidation(_))
    }

    /// Returns `true` if this error is related to I/O or persistence.
    #[inline]
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Io(_))
    }

    /// Returns `true` if this error represents an expected operational state
    /// rather than a defect.
    #[inline]
    #[must_use]
    pub const fn is_expected_state(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Validation(_))
    }

    /// Returns an HTTP-appropriate status code for this error.
    #[inline]
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::Validation(_) => 400,

            // 413 Payload Too Large - content does not fit in a symbol
            Self::EncodingOverflow { .. } => 413,

            // 499 Client Closed Request - caller went away
            Self::Cancelled => 499,

            // 500 Internal Server Error - server-side defects
            Self::RenderFailure(_)
            | Self::ArchiveFailure(_)
            | Self::ConfigLoad(_)
            | Self::ConfigValidation(_)
            | Self::Persistence(_)
            | Self::Io(_) => 500,
        }
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EncodingOverflow { .. } => "ENCODING_OVERFLOW",
            Self::RenderFailure(_) => "RENDER_FAILURE",
            Self::ArchiveFailure(_) => "ARCHIVE_FAILURE",
            Self::Cancelled => "CANCELLED",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::ConfigLoad(_) => "CONFIG_LOAD_ERROR",
            Self::ConfigValidation(_) => "CONFIG_VALIDATION_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

// =============================================================================
// CONVERSIONS FROM MODULE-SPECIFIC ERRORS
// =============================================================================

impl From<crate::config::ConfigError> for QrError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::Load(e) => Self::ConfigLoad(e.to_string()),
            err @ ConfigError::ValidationError { .. } => Self::ConfigValidation(err.to_string()),
            ConfigError::MultipleValidationErrors(errors) => {
                let messages: Vec<String> = errors.into_iter().map(|e| e.to_string()).collect();
                Self::ConfigValidation(messages.join("; "))
            }
        }
    }
}

impl From<crate::validation::ValidationErrors> for QrError {
    fn from(err: crate::validation::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<zip::result::ZipError> for QrError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::ArchiveFailure(err.to_string())
    }
}

impl From<serde_json::Error> for QrError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
