use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Verified account identifier of a visitor, usually an email address.
///
/// The identifier is kept exactly as supplied by the authentication layer.
/// It is never trimmed or case-folded: two identifiers that differ only in
/// case or surrounding whitespace are different identities.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorIdentifier(String);

impl VisitorIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns `true` for empty or whitespace-only identifiers.
    ///
    /// A blank identifier is treated exactly like a missing one.
    pub fn is_blank(&self) -> bool {
        is_blank(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

// Identifiers are personal data: keep them out of debug logs.
impl fmt::Debug for VisitorIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VisitorIdentifier(<{} bytes>)", self.0.len())
    }
}

impl From<&str> for VisitorIdentifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VisitorIdentifier {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Returns `true` if `value` is empty or consists only of whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// The value stored in a device cookie.
///
/// Either a random anonymous token (hyphenated UUID v4) or the lowercase hex
/// identity hash of an identified visitor. Both forms are valid cookie values
/// without further encoding.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Generate a fresh anonymous token with 122 bits of randomness.
    pub fn anonymous() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// Wrap an existing cookie value, rejecting values that cannot be sent
    /// back in a `Set-Cookie` header unchanged.
    pub fn parse(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TypeError::InvalidDeviceId {
                value,
                reason: "empty",
            });
        }
        if value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | ',' | '"' | '\\'))
        {
            return Err(TypeError::InvalidDeviceId {
                value,
                reason: "contains characters not allowed in a cookie value",
            });
        }
        Ok(Self(value))
    }

    /// Build a device id from an already-rendered lowercase hex digest.
    pub fn from_digest_hex(hex: String) -> Self {
        Self(hex)
    }

    /// Adopt a value read back from a device cookie verbatim.
    ///
    /// Whatever the client sent is kept as-is so that comparisons against
    /// the other device cookie are exact.
    pub fn from_cookie_value(value: String) -> Self {
        Self(value)
    }

    /// Returns `true` if this value has the shape of an anonymous token.
    pub fn is_anonymous_token(&self) -> bool {
        Uuid::parse_str(&self.0).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn blank_identifiers() {
        assert!(VisitorIdentifier::new("").is_blank());
        assert!(VisitorIdentifier::new("   ").is_blank());
        assert!(VisitorIdentifier::new("\t\n \r").is_blank());
        assert!(!VisitorIdentifier::new("alice@example.com").is_blank());
        assert!(!VisitorIdentifier::new("  a  ").is_blank());
    }

    #[test]
    fn identifier_is_not_normalized() {
        let id = VisitorIdentifier::new(" Alice@Example.com ");
        assert_eq!(id.as_str(), " Alice@Example.com ");
        assert_ne!(id, VisitorIdentifier::new("alice@example.com"));
    }

    #[test]
    fn identifier_debug_hides_value() {
        let id = VisitorIdentifier::new("alice@example.com");
        let debug = format!("{id:?}");
        assert!(!debug.contains("alice"));
        assert!(debug.contains("17 bytes"));
    }

    #[test]
    fn identifier_serde_is_transparent() {
        let id = VisitorIdentifier::new("bob@example.com");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bob@example.com\"");
    }

    #[test]
    fn anonymous_device_ids_are_unique_uuids() {
        let a = DeviceId::anonymous();
        let b = DeviceId::anonymous();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
        assert!(a.is_anonymous_token());
        assert_eq!(a.as_str(), a.as_str().to_lowercase());
    }

    #[test]
    fn digest_device_id_is_not_anonymous_token() {
        let id = DeviceId::from_digest_hex("ab".repeat(32));
        assert!(!id.is_anonymous_token());
        assert_eq!(id.to_string().len(), 64);
    }

    #[test]
    fn parse_accepts_plain_tokens() {
        let id = DeviceId::parse("abc-123").unwrap();
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn parse_rejects_empty_and_separators() {
        assert!(matches!(
            DeviceId::parse(""),
            Err(TypeError::InvalidDeviceId { reason: "empty", .. })
        ));
        assert!(DeviceId::parse("a;b").is_err());
        assert!(DeviceId::parse("a b").is_err());
        assert!(DeviceId::parse("a,b").is_err());
        assert!(DeviceId::parse("\"quoted\"").is_err());
    }

    proptest! {
        #[test]
        fn whitespace_only_is_always_blank(s in "[ \t\r\n]{0,16}") {
            prop_assert!(VisitorIdentifier::new(s).is_blank());
        }

        #[test]
        fn any_visible_char_is_not_blank(pre in "[ \t]{0,4}", c in "[a-zA-Z0-9@._+-]", post in "[ \t]{0,4}") {
            let s = format!("{pre}{c}{post}");
            prop_assert!(!VisitorIdentifier::new(s).is_blank());
        }
    }
}
