//! Shared types and OpenAPI schemas.
//!
//! [`CredentialRecord`] is the snapshot the pipeline receives from the
//! persistence collaborator. It is read-only for the duration of a call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::payload;

/// Opaque unique identifier of a stored credential record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<RecordId> for Uuid {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Network security mode, written into the payload as a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SecurityMode {
    /// WPA personal.
    #[serde(rename = "WPA")]
    Wpa,
    /// WPA2 personal.
    #[serde(rename = "WPA2")]
    Wpa2,
    /// WPA3 personal.
    #[serde(rename = "WPA3")]
    Wpa3,
    /// Legacy WEP.
    #[serde(rename = "WEP")]
    Wep,
    /// Open network.
    #[serde(rename = "nopass")]
    NoPass,
}

impl SecurityMode {
    /// Every accepted token, in display order.
    pub const ALL: [Self; 5] = [Self::Wpa, Self::Wpa2, Self::Wpa3, Self::Wep, Self::NoPass];

    /// The payload token for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wpa => "WPA",
            Self::Wpa2 => "WPA2",
            Self::Wpa3 => "WPA3",
            Self::Wep => "WEP",
            Self::NoPass => "nopass",
        }
    }

    /// Whether a password is expected for this mode.
    #[must_use]
    pub const fn requires_password(self) -> bool {
        !matches!(self, Self::NoPass)
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the accepted security tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown security mode '{0}', expected one of: WPA, WPA2, WPA3, WEP, nopass")]
pub struct UnknownSecurityMode(pub String);

impl FromStr for SecurityMode {
    type Err = UnknownSecurityMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownSecurityMode(s.to_string()))
    }
}

/// A stored Wi-Fi network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Unique identifier.
    pub id: RecordId,

    /// Network name.
    pub ssid: String,

    /// Network secret. `None` and an empty string both mean "no secret".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Security mode.
    pub security: SecurityMode,

    /// Whether the network does not broadcast its SSID.
    #[serde(default)]
    pub hidden: bool,
}

impl CredentialRecord {
    /// Build the Wi-Fi configuration payload for this record.
    #[must_use]
    pub fn payload(&self) -> String {
        payload::encode(
            &self.ssid,
            self.password.as_deref().unwrap_or_default(),
            self.security.as_str(),
            self.hidden,
        )
    }
}

/// Validated input for creating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNetwork {
    /// Network name.
    pub ssid: String,
    /// Network secret, `None` for open networks.
    pub password: Option<String>,
    /// Security mode.
    pub security: SecurityMode,
    /// Hidden flag.
    pub hidden: bool,
}

impl NewNetwork {
    /// Attach an identifier, producing the record to store.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> CredentialRecord {
        CredentialRecord {
            id,
            ssid: self.ssid,
            password: self.password,
            security: self.security,
            hidden: self.hidden,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    #[schema(example = "ok")]
    pub status: String,

    /// Service version.
    #[schema(example = "0.1.0")]
    pub version: String,
}
