//! Wi-Fi configuration payload encoding.
//!
//! Produces the `WIFI:` string understood by phone camera apps:
//!
//! ```text
//! WIFI:T:<mode>;S:<ssid>;[P:<password>;][H:true;];
//! ```
//!
//! Only `\` and `;` are escaped inside the SSID and password. Commas and
//! colons pass through, which is what common readers accept.

/// Build the payload for a network.
///
/// The security token is emitted verbatim. The `P:` segment is omitted when
/// `password` is empty and the `H:` segment is omitted when `hidden` is false.
///
/// ```rust
/// use wifiqr_core::payload::encode;
///
/// assert_eq!(
///     encode("Home", "pass1234", "WPA", false),
///     "WIFI:T:WPA;S:Home;P:pass1234;;"
/// );
/// ```
#[must_use]
pub fn encode(ssid: &str, password: &str, security: &str, hidden: bool) -> String {
    let mut out = String::with_capacity(16 + ssid.len() + password.len() + security.len());
    out.push_str("WIFI:T:");
    out.push_str(security);
    out.push_str(";S:");
    out.push_str(&escape(ssid));
    out.push(';');
    if !password.is_empty() {
        out.push_str("P:");
        out.push_str(&escape(password));
        out.push(';');
    }
    if hidden {
        out.push_str("H:true;");
    }
    out.push(';');
    out
}

/// Escape a single field value.
#[must_use]
pub fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        if matches!(c, '\\' | ';') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Reverse [`escape`].
///
/// A backslash makes the following character literal. A trailing lone
/// backslash is kept as-is.
#[must_use]
pub fn unescape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wpa_network() {
        assert_eq!(
            encode("Home", "pass1234", "WPA", false),
            "WIFI:T:WPA;S:Home;P:pass1234;;"
        );
    }

    #[test]
    fn test_encode_open_network_omits_password() {
        assert_eq!(encode("Guest", "", "nopass", false), "WIFI:T:nopass;S:Guest;;");
    }

    #[test]
    fn test_encode_escapes_and_hidden() {
        assert_eq!(
            encode("Office;Net", "p\\w;d", "WPA", true),
            "WIFI:T:WPA;S:Office\\;Net;P:p\\\\w\\;d;H:true;;"
        );
    }

    #[test]
    fn test_encode_hidden_without_password() {
        assert_eq!(
            encode("Attic", "", "nopass", true),
            "WIFI:T:nopass;S:Attic;H:true;;"
        );
    }

    #[test]
    fn test_encode_passes_unknown_security_token_through() {
        assert_eq!(
            encode("Lab", "secretpw", "WPA2-EAP", false),
            "WIFI:T:WPA2-EAP;S:Lab;P:secretpw;;"
        );
    }

    #[test]
    fn test_commas_and_colons_are_not_escaped() {
        assert_eq!(escape("a,b:c"), "a,b:c");
        assert_eq!(
            encode("Cafe:2,4GHz", "", "nopass", false),
            "WIFI:T:nopass;S:Cafe:2,4GHz;;"
        );
    }

    #[test]
    fn test_field_order_is_fixed() {
        let payload = encode("Net", "password", "WPA3", true);
        let t = payload.find("T:").unwrap();
        let s = payload.find("S:").unwrap();
        let p = payload.find("P:").unwrap();
        let h = payload.find("H:").unwrap();
        assert!(t < s && s < p && p < h);
        assert!(payload.starts_with("WIFI:"));
        assert!(payload.ends_with(";;"));
    }

    #[test]
    fn test_escape_round_trip() {
        let samples = [
            "",
            "plain",
            ";",
            "\\",
            "\\;",
            ";;\\\\;",
            "ends with backslash\\",
            "mixed;semi\\colon:comma,",
            "ünïcødé;\\",
        ];
        for original in samples {
            assert_eq!(unescape(&escape(original)), original, "sample {original:?}");
        }
    }

    #[test]
    fn test_escaped_field_has_no_bare_delimiter() {
        let escaped = escape("a;b\\;c");
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                assert!(matches!(chars.next(), Some('\\' | ';')));
            } else {
                assert_ne!(c, ';');
            }
        }
    }
}
