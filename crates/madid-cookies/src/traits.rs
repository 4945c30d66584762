use crate::cookie::Cookie;
use crate::error::CookieResult;

/// A cookie collection belonging to one side of one HTTP exchange.
///
/// All implementations must satisfy these invariants:
/// - At most one cookie per name is held at any time.
/// - [`CookieStore::set`] replaces an existing cookie of the same name
///   atomically: concurrent writers on the same instance never observe a
///   removed-but-not-reinserted state, and never produce duplicate names.
/// - Absent cookies are `Ok(None)`, never an error.
/// - Locking is per instance. Two requests never contend on each other's
///   collections.
pub trait CookieStore: Send + Sync {
    /// Read a cookie by name.
    fn get(&self, name: &str) -> CookieResult<Option<Cookie>>;

    /// Write a cookie, replacing any cookie of the same name.
    ///
    /// Returns the cookie that was replaced, if any.
    fn set(&self, cookie: Cookie) -> CookieResult<Option<Cookie>>;

    /// Remove a cookie by name. Returns the removed cookie, if any.
    fn remove(&self, name: &str) -> CookieResult<Option<Cookie>>;

    /// All cookies currently held, in write order.
    fn snapshot(&self) -> CookieResult<Vec<Cookie>>;

    /// The value of a cookie, if present.
    fn value(&self, name: &str) -> CookieResult<Option<String>> {
        Ok(self.get(name)?.map(|cookie| cookie.value))
    }

    /// Names of all cookies currently held, in write order.
    fn names(&self) -> CookieResult<Vec<String>> {
        Ok(self.snapshot()?.into_iter().map(|cookie| cookie.name).collect())
    }

    /// Check whether a cookie with this name exists.
    fn contains(&self, name: &str) -> CookieResult<bool> {
        Ok(self.get(name)?.is_some())
    }
}
