/// Errors from cookie store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CookieError {
    /// A thread panicked while holding the collection lock; the collection
    /// may be half-updated.
    #[error("cookie collection lock poisoned")]
    LockPoisoned,

    /// Cookie names must be non-empty tokens.
    #[error("invalid cookie name {0:?}")]
    InvalidName(String),

    /// The store does not accept writes (e.g. a frozen inbound request).
    #[error("cookie store is read-only")]
    ReadOnly,

    /// The expiry instant falls outside the representable date range.
    #[error("cookie {0:?} expiry is out of range")]
    ExpiryOverflow(String),
}

/// Result alias for cookie store operations.
pub type CookieResult<T> = Result<T, CookieError>;
