use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CookieError, CookieResult};

/// A single cookie record: name, value and absolute expiry.
///
/// Transport attributes (path, domain, flags) belong to the HTTP layer and
/// are not modelled here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires_at,
        }
    }

    /// A cookie that lives for `retention` starting at `now`.
    ///
    /// Fails with [`CookieError::ExpiryOverflow`] if the expiry cannot be
    /// represented.
    pub fn with_retention(
        name: impl Into<String>,
        value: impl Into<String>,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> CookieResult<Self> {
        let name = name.into();
        match now.checked_add_signed(retention) {
            Some(expires_at) => Ok(Self::new(name, value, expires_at)),
            None => Err(CookieError::ExpiryOverflow(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_sets_expiry() {
        let now = DateTime::<Utc>::UNIX_EPOCH;
        let cookie = Cookie::with_retention("_madid", "abc", now, Duration::days(365)).unwrap();
        assert_eq!(cookie.expires_at, now + Duration::days(365));
        assert_eq!(cookie.name, "_madid");
        assert_eq!(cookie.value, "abc");
    }

    #[test]
    fn retention_past_max_date_is_an_error() {
        let err = Cookie::with_retention("_madid", "abc", DateTime::<Utc>::MAX_UTC, Duration::days(1))
            .unwrap_err();
        assert_eq!(err, CookieError::ExpiryOverflow("_madid".into()));
    }

    #[test]
    fn serializes_expiry_as_rfc3339() {
        let cookie = Cookie::new("c", "v", DateTime::<Utc>::UNIX_EPOCH);
        let json = serde_json::to_string(&cookie).unwrap();
        assert!(json.contains("1970-01-01T00:00:00Z"));
    }
}
