//! Input validation for record creation and bulk downloads.
//!
//! All rules are checked and every failure is reported, so a client can fix
//! a request in one round trip.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::types::{NewNetwork, SecurityMode};

/// Maximum SSID length in characters.
pub const MAX_SSID_LENGTH: usize = 32;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters.
pub const MAX_PASSWORD_LENGTH: usize = 63;

/// Default maximum number of ids in one bulk download.
pub const DEFAULT_MAX_BULK_IDS: usize = 50;

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Request field the rule applies to.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Every rule that failed for one input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether no rule failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `field` has at least one failure.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a create request.
///
/// An empty password is treated as absent.
///
/// # Errors
///
/// Returns every failed rule.
pub fn validate_new_network(
    ssid: &str,
    password: Option<&str>,
    encryption: &str,
    hidden: bool,
) -> Result<NewNetwork, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let password = password.filter(|p| !p.is_empty());

    let ssid_len = ssid.chars().count();
    if ssid_len == 0 {
        errors.push("ssid", "SSID is required");
    } else if ssid_len > MAX_SSID_LENGTH {
        errors.push(
            "ssid",
            format!("SSID cannot exceed {MAX_SSID_LENGTH} characters"),
        );
    }
    if ssid.chars().any(char::is_control) {
        errors.push("ssid", "SSID cannot contain control characters");
    }

    if let Some(p) = password {
        let len = p.chars().count();
        if len < MIN_PASSWORD_LENGTH {
            errors.push(
                "password",
                format!("Password cannot be less than {MIN_PASSWORD_LENGTH} characters"),
            );
        } else if len > MAX_PASSWORD_LENGTH {
            errors.push(
                "password",
                format!("Password cannot exceed {MAX_PASSWORD_LENGTH} characters"),
            );
        }
    }

    let security = if encryption.is_empty() {
        errors.push("encryption", "Encryption type is required");
        None
    } else {
        match encryption.parse::<SecurityMode>() {
            Ok(mode) => Some(mode),
            Err(_) => {
                errors.push(
                    "encryption",
                    "Encryption must be one of: WPA, WPA2, WPA3, WEP, or nopass",
                );
                None
            }
        }
    };

    match (security, password) {
        (Some(mode), None) if mode.requires_password() => {
            errors.push("password", "Password is required for encrypted networks");
        }
        (Some(SecurityMode::NoPass), Some(_)) => {
            errors.push("password", "Password should not be set for open networks");
        }
        _ => {}
    }

    let Some(security) = security else {
        return Err(errors);
    };

    errors.into_result(NewNetwork {
        ssid: ssid.to_string(),
        password: password.map(str::to_string),
        security,
        hidden,
    })
}

/// Validate the id list of a bulk download.
///
/// # Errors
///
/// Fails when the list is empty, longer than `max`, or holds the nil UUID.
pub fn validate_bulk_ids(ids: &[Uuid], max: usize) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if ids.is_empty() {
        errors.push("ids", "At least one WiFi network ID is required");
    } else if ids.len() > max {
        errors.push(
            "ids",
            format!("Cannot download more than {max} QR codes at once"),
        );
    }
    if ids.iter().any(Uuid::is_nil) {
        errors.push("ids", "WiFi network IDs cannot be empty");
    }
    errors.into_result(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_wpa_network() {
        let network = validate_new_network("Home", Some("pass1234"), "WPA", false).unwrap();
        assert_eq!(network.security, SecurityMode::Wpa);
        assert_eq!(network.password.as_deref(), Some("pass1234"));
    }

    #[test]
    fn test_valid_open_network() {
        let network = validate_new_network("Guest", Some(""), "nopass", true).unwrap();
        assert_eq!(network.security, SecurityMode::NoPass);
        assert_eq!(network.password, None);
        assert!(network.hidden);
    }

    #[test]
    fn test_ssid_rules() {
        let err = validate_new_network("", Some("pass1234"), "WPA", false).unwrap_err();
        assert!(err.has_field("ssid"));

        let long = "x".repeat(MAX_SSID_LENGTH + 1);
        let err = validate_new_network(&long, Some("pass1234"), "WPA", false).unwrap_err();
        assert!(err.to_string().contains("cannot exceed 32"));

        let err = validate_new_network("bad\nname", Some("pass1234"), "WPA", false).unwrap_err();
        assert!(err.to_string().contains("control characters"));

        assert!(validate_new_network(&"é".repeat(32), Some("pass1234"), "WPA", false).is_ok());
    }

    #[test]
    fn test_password_rules() {
        let err = validate_new_network("Home", Some("short"), "WPA2", false).unwrap_err();
        assert!(err.to_string().contains("less than 8"));

        let long = "p".repeat(MAX_PASSWORD_LENGTH + 1);
        let err = validate_new_network("Home", Some(&long), "WPA2", false).unwrap_err();
        assert!(err.to_string().contains("exceed 63"));

        let err = validate_new_network("Home", None, "WPA3", false).unwrap_err();
        assert!(err.to_string().contains("required for encrypted"));

        let err = validate_new_network("Home", Some("pass1234"), "nopass", false).unwrap_err();
        assert!(err.to_string().contains("open networks"));
    }

    #[test]
    fn test_encryption_rules() {
        let err = validate_new_network("Home", Some("pass1234"), "", false).unwrap_err();
        assert!(err.to_string().contains("required"));

        let err = validate_new_network("Home", Some("pass1234"), "wpa", false).unwrap_err();
        assert!(err.has_field("encryption"));
    }

    #[test]
    fn test_all_failures_are_reported() {
        let err = validate_new_network("", Some("short"), "BOGUS", false).unwrap_err();
        assert!(err.has_field("ssid"));
        assert!(err.has_field("password"));
        assert!(err.has_field("encryption"));
    }

    #[test]
    fn test_bulk_ids() {
        let ids = |n: usize| (0..n).map(|_| Uuid::new_v4()).collect::<Vec<_>>();
        assert!(validate_bulk_ids(&[], DEFAULT_MAX_BULK_IDS).is_err());
        assert!(validate_bulk_ids(&ids(3), DEFAULT_MAX_BULK_IDS).is_ok());
        assert!(validate_bulk_ids(&ids(51), DEFAULT_MAX_BULK_IDS).is_err());
        assert!(validate_bulk_ids(&ids(50), DEFAULT_MAX_BULK_IDS).is_ok());
    }

    #[test]
    fn test_bulk_ids_reject_nil() {
        let err = validate_bulk_ids(&[Uuid::new_v4(), Uuid::nil()], DEFAULT_MAX_BULK_IDS)
            .unwrap_err();
        assert!(err.has_field("ids"));
        assert!(err.to_string().contains("cannot be empty"));
    }
}
