use std::sync::Arc;

use tracing::trace;

use crate::cookie::Cookie;
use crate::error::CookieResult;
use crate::memory::InMemoryCookieStore;
use crate::traits::CookieStore;

/// The cookie state of one in-flight HTTP exchange.
///
/// Cloning is cheap and clones share the same underlying collections.
#[derive(Clone)]
pub struct HttpContext {
    request: Arc<dyn CookieStore>,
    response: Arc<dyn CookieStore>,
}

impl HttpContext {
    pub fn new(request: Arc<dyn CookieStore>, response: Arc<dyn CookieStore>) -> Self {
        Self { request, response }
    }

    /// A context with empty in-memory request and response collections.
    pub fn in_memory() -> Self {
        Self::with_request_cookies(Vec::new())
    }

    /// A context whose inbound request carries `cookies`.
    pub fn with_request_cookies(cookies: impl IntoIterator<Item = Cookie>) -> Self {
        Self::new(
            Arc::new(InMemoryCookieStore::with_cookies(cookies)),
            Arc::new(InMemoryCookieStore::new()),
        )
    }

    /// Inbound cookies, as sent by the client and updated during processing.
    pub fn request(&self) -> &dyn CookieStore {
        self.request.as_ref()
    }

    /// Outbound cookies, to be serialized into `Set-Cookie` headers.
    pub fn response(&self) -> &dyn CookieStore {
        self.response.as_ref()
    }

    /// Current value of a cookie as seen by this request.
    pub fn cookie_value(&self, name: &str) -> CookieResult<Option<String>> {
        self.request.value(name)
    }

    /// Write a cookie to both the request and the response collections.
    ///
    /// The request side is written first so that a failure never leaves the
    /// client with a value the rest of this request did not see.
    pub fn set_cookie(&self, cookie: Cookie) -> CookieResult<()> {
        trace!(cookie = %cookie.name, expires_at = %cookie.expires_at, "writing cookie");
        self.request.set(cookie.clone())?;
        self.response.set(cookie)?;
        Ok(())
    }
}

impl std::fmt::Debug for HttpContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpContext")
            .field("request", &self.request.names().unwrap_or_default())
            .field("response", &self.response.names().unwrap_or_default())
            .finish()
    }
}

/// Supplies the HTTP context of the exchange currently being processed.
///
/// Returns `None` when no request is active, e.g. for events raised by
/// background jobs. Callers must treat that as "nothing to do".
pub trait ContextProvider: Send + Sync {
    fn context(&self) -> Option<HttpContext>;
}

/// Provider for code running outside of any HTTP exchange.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoContext;

impl ContextProvider for NoContext {
    fn context(&self) -> Option<HttpContext> {
        None
    }
}

/// A context bound directly to a resolver serves exactly that exchange.
impl ContextProvider for HttpContext {
    fn context(&self) -> Option<HttpContext> {
        Some(self.clone())
    }
}

impl<P: ContextProvider + ?Sized> ContextProvider for Arc<P> {
    fn context(&self) -> Option<HttpContext> {
        (**self).context()
    }
}

impl<P: ContextProvider> ContextProvider for Option<P> {
    fn context(&self) -> Option<HttpContext> {
        self.as_ref().and_then(ContextProvider::context)
    }
}
