//! # wifiqr-core
//!
//! Core logic for turning stored Wi-Fi credentials into scannable QR codes.
//!
//! This crate provides:
//! - The `WIFI:` payload encoder
//! - QR rendering to PNG at a fixed module scale
//! - Batch rendering into a single zip archive
//! - The collaborators around that pipeline: record storage, creation
//!   notifications, input validation and configuration
//!
//! ## Architecture
//!
//! - [`payload`] - Payload grammar and field escaping
//! - [`render`] - QR matrix generation and PNG rasterisation
//! - [`lookup`] - Record lookup collaborator trait
//! - [`archive`] - Single and batch render orchestration
//! - [`storage`] - JSON-file record store
//! - [`notify`] - Fire-and-log creation notifications
//! - [`validation`] - Create and bulk request rules
//! - [`config`] - Layered configuration loading and validation
//! - [`error`] - Unified error types for the crate
//! - [`types`] - Shared types and OpenAPI schemas

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod archive;
pub mod config;
pub mod error;
pub mod lookup;
pub mod notify;
pub mod payload;
pub mod render;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export primary types for convenience
pub use archive::{
    entry_name, sanitize_file_name, ArchiveBytes, ArchiveOptions, BatchArchiver, BatchOutcome,
    SingleOutcome,
};
pub use config::{Config, ConfigError, ConfigResult};
pub use error::{QrError, Result};
pub use lookup::RecordLookup;
pub use notify::{dispatch, LogNotifier, NoopNotifier, Notifier, NotifyError, WifiCreatedEvent};
pub use render::{QrRenderer, RenderedImage, Renderer};
pub use storage::{default_data_dir, JsonStore};
pub use tokio_util::sync::CancellationToken;
pub use types::{CredentialRecord, HealthResponse, NewNetwork, RecordId, SecurityMode};
pub use validation::{validate_bulk_ids, validate_new_network, FieldError, ValidationErrors};
