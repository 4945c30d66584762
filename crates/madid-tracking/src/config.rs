use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{TrackingError, TrackingResult};

/// Name of the cookie holding the anonymous token of a device.
pub const ANONYMOUS_DEVICE_ID_COOKIE: &str = "_madid_anonymous";
/// Name of the cookie holding the device id used for tracking attribution.
pub const DEVICE_ID_COOKIE: &str = "_madid";
/// Sliding retention window of both device cookies.
pub const DEVICE_COOKIE_RETENTION_DAYS: u32 = 365;
/// Longest accepted retention window (roughly a century).
pub const MAX_RETENTION_DAYS: u32 = 36_500;
/// Position of the device resolver in the interceptor chain. Late enough
/// that the visitor identifier has been populated by earlier interceptors.
pub const DEVICE_RESOLVER_SORT_ORDER: i32 = 2000;

/// Configuration for the device identity resolver.
///
/// The defaults are the cookie wire contract; changing the names breaks
/// continuity with devices that already carry the cookies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceCookieConfig {
    /// Cookie holding the per-device anonymous token.
    pub anonymous_cookie_name: String,
    /// Cookie holding the active device id.
    pub device_cookie_name: String,
    /// Days a cookie lives after its most recent write.
    pub retention_days: u32,
    /// Position of the resolver in the tracking pipeline (ascending).
    pub sort_order: i32,
}

impl Default for DeviceCookieConfig {
    fn default() -> Self {
        Self {
            anonymous_cookie_name: ANONYMOUS_DEVICE_ID_COOKIE.into(),
            device_cookie_name: DEVICE_ID_COOKIE.into(),
            retention_days: DEVICE_COOKIE_RETENTION_DAYS,
            sort_order: DEVICE_RESOLVER_SORT_ORDER,
        }
    }
}

impl DeviceCookieConfig {
    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(input: &str) -> TrackingResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| TrackingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as a TOML document.
    pub fn to_toml_string(&self) -> TrackingResult<String> {
        toml::to_string(self).map_err(|e| TrackingError::Config(e.to_string()))
    }

    /// The retention window as a duration.
    pub fn retention(&self) -> Duration {
        Duration::days(i64::from(self.retention_days))
    }

    /// Check that the configuration can be used to write cookies.
    pub fn validate(&self) -> TrackingResult<()> {
        validate_cookie_name("anonymous_cookie_name", &self.anonymous_cookie_name)?;
        validate_cookie_name("device_cookie_name", &self.device_cookie_name)?;
        if self.anonymous_cookie_name == self.device_cookie_name {
            return Err(TrackingError::Config(format!(
                "anonymous and device cookies must differ, both are {:?}",
                self.device_cookie_name
            )));
        }
        if self.retention_days == 0 {
            return Err(TrackingError::Config(
                "retention_days must be at least 1".into(),
            ));
        }
        if self.retention_days > MAX_RETENTION_DAYS {
            return Err(TrackingError::Config(format!(
                "retention_days must be at most {MAX_RETENTION_DAYS}, got {}",
                self.retention_days
            )));
        }
        Ok(())
    }
}

fn validate_cookie_name(field: &str, name: &str) -> TrackingResult<()> {
    if name.is_empty() {
        return Err(TrackingError::Config(format!("{field} must not be empty")));
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | '=' | ','))
    {
        return Err(TrackingError::Config(format!(
            "{field} {name:?} contains invalid character {c:?}"
        )));
    }
    Ok(())
}
