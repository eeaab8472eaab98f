//! Notifications fired after a record is created.
//!
//! Delivery is best effort. [`dispatch`] logs a failed notification as a
//! warning and returns normally, so a broken sink never fails a create.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{CredentialRecord, RecordId, SecurityMode};

/// Event emitted when a Wi-Fi record is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiCreatedEvent {
    /// Identifier of the new record.
    pub wifi_id: RecordId,
    /// Network name.
    pub ssid: String,
    /// Security mode.
    pub encryption: SecurityMode,
    /// Hidden flag.
    pub hidden: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Who created the record.
    pub created_by: String,
    /// Free-form extra data for downstream consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl WifiCreatedEvent {
    /// Build an event for `record`, created now by the system.
    ///
    /// The password is not included.
    #[must_use]
    pub fn for_record(record: &CredentialRecord) -> Self {
        Self {
            wifi_id: record.id,
            ssid: record.ssid.clone(),
            encryption: record.security,
            hidden: record.hidden,
            created_at: Utc::now(),
            created_by: "System".to_string(),
            metadata: None,
        }
    }
}

/// Failure reported by a [`Notifier`].
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The event could not be serialised.
    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The sink rejected or did not accept the event.
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Sink for [`WifiCreatedEvent`]s.
pub trait Notifier: Send + Sync {
    /// Deliver one event.
    fn notify<'a>(&'a self, event: &'a WifiCreatedEvent) -> BoxFuture<'a, Result<(), NotifyError>>;
}

/// Writes events to the structured log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify<'a>(&'a self, event: &'a WifiCreatedEvent) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            let body = serde_json::to_string(event)?;
            info!(
                target: "wifiqr::events",
                wifi_id = %event.wifi_id,
                event = %body,
                "Wi-Fi network created"
            );
            Ok(())
        })
    }
}

/// Discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify<'a>(&'a self, _event: &'a WifiCreatedEvent) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async { Ok(()) })
    }
}

/// Deliver `event`, logging instead of failing.
///
/// Returns whether delivery succeeded.
pub async fn dispatch(notifier: &dyn Notifier, event: &WifiCreatedEvent) -> bool {
    match notifier.notify(event).await {
        Ok(()) => true,
        Err(e) => {
            warn!(wifi_id = %event.wifi_id, error = %e, "Failed to send creation notification");
            false
        }
    }
}
