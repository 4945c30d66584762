//! Request-scoped cookie state for multi-user device identity.
//!
//! Each HTTP request owns two cookie collections: the inbound request
//! cookies and the outbound response cookies. The device resolver reads the
//! request collection and writes to both, so later logic in the same request
//! sees the fresh value and the client receives it.
//!
//! # Storage Backends
//!
//! All backends implement the [`CookieStore`] trait:
//!
//! - [`InMemoryCookieStore`] -- `Vec`-backed collection for tests and embedding
//!
//! # Design Rules
//!
//! 1. A collection is owned by one request; there is no process-global cookie state.
//! 2. Writing a cookie replaces any cookie of the same name (remove, then insert).
//! 3. The remove+insert pair is a critical section guarded by a lock on that
//!    collection instance only.
//! 4. A missing request context is not an error: [`ContextProvider::context`]
//!    returns `None` and callers skip their work.

pub mod context;
pub mod cookie;
pub mod error;
pub mod memory;
pub mod traits;

pub use context::{ContextProvider, HttpContext, NoContext};
pub use cookie::Cookie;
pub use error::{CookieError, CookieResult};
pub use memory::InMemoryCookieStore;
pub use traits::CookieStore;
