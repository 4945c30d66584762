//! Device identity resolution for shared browsers and devices.
//!
//! Analytics pipelines key events by a device cookie. When several people
//! sign in on one browser (a kiosk, a family computer) a single anonymous
//! device id would merge them all. The [`MultiUserDeviceResolver`] keeps an
//! anonymous token per device and switches the device id to a deterministic
//! hash of the visitor's identifier once they are identified, so each account
//! is attributed separately.
//!
//! The resolver runs as one [`TrackingInterceptor`] in a
//! [`TrackingPipeline`], ordered late enough that earlier interceptors have
//! already attached the visitor to the event.
//!
//! # Quick Start
//!
//! ```rust
//! use madid_cookies::{CookieStore, HttpContext};
//! use madid_tracking::{MultiUserDeviceResolver, TrackingPipeline};
//! use madid_types::TrackedEvent;
//!
//! let request = HttpContext::in_memory();
//! let pipeline = TrackingPipeline::new()
//!     .with_interceptor(Box::new(MultiUserDeviceResolver::with_default_config(request.clone())));
//!
//! let mut event = TrackedEvent::new("page_view").with_identifier("alice@example.com");
//! let report = pipeline.process(&mut event);
//! assert!(report.is_clean());
//! assert_eq!(
//!     request.response().value("_madid").unwrap().as_deref(),
//!     Some("ff8d9819fc0e12bf0d24892e45987e249a28dce836a85cad60e28eaaa8c6d976"),
//! );
//! ```

pub mod config;
pub mod error;
pub mod interceptor;
pub mod pipeline;
pub mod resolver;

// Re-exports for convenience.
pub use config::{
    DeviceCookieConfig, ANONYMOUS_DEVICE_ID_COOKIE, DEVICE_COOKIE_RETENTION_DAYS,
    DEVICE_ID_COOKIE, DEVICE_RESOLVER_SORT_ORDER, MAX_RETENTION_DAYS,
};
pub use error::{TrackingError, TrackingResult};
pub use interceptor::{InterceptOutcome, InterceptorResult, InterceptorStatus, TrackingInterceptor};
pub use pipeline::{PipelineReport, TrackingPipeline};
pub use resolver::{MultiUserDeviceResolver, Resolution};
