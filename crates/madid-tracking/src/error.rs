use std::fmt;

use madid_cookies::CookieError;

/// Errors that can occur while resolving device identity or running the
/// tracking pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    /// The request's cookie collection could not be read or written.
    #[error("cookie store error: {0}")]
    Cookie(#[from] CookieError),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// An interceptor failed for a reason of its own.
    #[error("interceptor error in '{interceptor}': {message}")]
    Interceptor { interceptor: String, message: String },
}

impl TrackingError {
    /// Create an interceptor error with a name and message.
    pub fn interceptor(interceptor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Interceptor {
            interceptor: interceptor.into(),
            message: message.into(),
        }
    }
}

impl PartialEq for TrackingError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by display representation for test convenience.
        fmt::format(format_args!("{self}")) == fmt::format(format_args!("{other}"))
    }
}

impl Eq for TrackingError {}

/// Result alias for tracking operations.
pub type TrackingResult<T> = Result<T, TrackingError>;
