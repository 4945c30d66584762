use std::sync::Mutex;

use crate::cookie::Cookie;
use crate::error::{CookieError, CookieResult};
use crate::traits::CookieStore;

/// In-memory, `Vec`-backed cookie collection.
///
/// Intended for tests and embedding. Cookies are kept in write order behind
/// a `Mutex` owned by this instance; the remove+insert pair in
/// [`CookieStore::set`] runs under a single guard.
pub struct InMemoryCookieStore {
    cookies: Mutex<Vec<Cookie>>,
    read_only: bool,
}

impl InMemoryCookieStore {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self {
            cookies: Mutex::new(Vec::new()),
            read_only: false,
        }
    }

    /// Create a collection pre-populated with cookies.
    ///
    /// Later entries replace earlier ones with the same name.
    pub fn with_cookies(cookies: impl IntoIterator<Item = Cookie>) -> Self {
        let mut held: Vec<Cookie> = Vec::new();
        for cookie in cookies {
            held.retain(|c| c.name != cookie.name);
            held.push(cookie);
        }
        Self {
            cookies: Mutex::new(held),
            read_only: false,
        }
    }

    /// Create a collection that rejects every write.
    pub fn read_only(cookies: impl IntoIterator<Item = Cookie>) -> Self {
        Self {
            read_only: true,
            ..Self::with_cookies(cookies)
        }
    }

    /// Number of cookies currently held.
    pub fn len(&self) -> usize {
        self.cookies.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all cookies.
    pub fn clear(&self) -> CookieResult<()> {
        self.check_writable()?;
        self.cookies
            .lock()
            .map_err(|_| CookieError::LockPoisoned)?
            .clear();
        Ok(())
    }

    fn check_writable(&self) -> CookieResult<()> {
        if self.read_only {
            return Err(CookieError::ReadOnly);
        }
        Ok(())
    }
}

impl Default for InMemoryCookieStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> CookieResult<()> {
    if name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | '=' | ','))
    {
        return Err(CookieError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl CookieStore for InMemoryCookieStore {
    fn get(&self, name: &str) -> CookieResult<Option<Cookie>> {
        let cookies = self.cookies.lock().map_err(|_| CookieError::LockPoisoned)?;
        Ok(cookies.iter().find(|c| c.name == name).cloned())
    }

    fn set(&self, cookie: Cookie) -> CookieResult<Option<Cookie>> {
        validate_name(&cookie.name)?;
        self.check_writable()?;
        let mut cookies = self.cookies.lock().map_err(|_| CookieError::LockPoisoned)?;
        let replaced = cookies
            .iter()
            .position(|c| c.name == cookie.name)
            .map(|idx| cookies.remove(idx));
        cookies.push(cookie);
        Ok(replaced)
    }

    fn remove(&self, name: &str) -> CookieResult<Option<Cookie>> {
        self.check_writable()?;
        let mut cookies = self.cookies.lock().map_err(|_| CookieError::LockPoisoned)?;
        Ok(cookies
            .iter()
            .position(|c| c.name == name)
            .map(|idx| cookies.remove(idx)))
    }

    fn snapshot(&self) -> CookieResult<Vec<Cookie>> {
        let cookies = self.cookies.lock().map_err(|_| CookieError::LockPoisoned)?;
        Ok(cookies.clone())
    }
}

impl std::fmt::Debug for InMemoryCookieStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCookieStore")
            .field("cookie_count", &self.len())
            .field("read_only", &self.read_only)
            .finish()
    }
}
