use std::sync::Arc;

use madid_cookies::{ContextProvider, Cookie, HttpContext};
use madid_crypto::IdentityHasher;
use madid_types::{Clock, DeviceId, SystemClock, TrackedEvent, VisitorIdentifier};
use tracing::debug;

use crate::config::DeviceCookieConfig;
use crate::error::TrackingResult;
use crate::interceptor::{InterceptOutcome, TrackingInterceptor};

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// What the resolver decided for one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// No HTTP exchange was active; no cookie was touched.
    NoContext,
    /// The visitor is anonymous; the device id tracks the anonymous token.
    Anonymous {
        device_id: DeviceId,
        /// A new anonymous token was generated for this device.
        anonymous_created: bool,
        /// The device cookie was (re)written to match the anonymous token.
        device_id_written: bool,
    },
    /// The visitor is identified; the device id is their identity hash.
    Identified {
        device_id: DeviceId,
        /// The device cookie held a different value before this event.
        changed: bool,
    },
}

impl Resolution {
    /// The device id now in effect, if a context was available.
    pub fn device_id(&self) -> Option<&DeviceId> {
        match self {
            Self::NoContext => None,
            Self::Anonymous { device_id, .. } | Self::Identified { device_id, .. } => {
                Some(device_id)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MultiUserDeviceResolver
// ---------------------------------------------------------------------------

/// Chooses and persists the device id of the visitor behind each event.
///
/// Anonymous visitors are tracked under a random per-device token that is
/// created once and never regenerated. Once a visitor is identified, the
/// device id switches to the SHA-256 of their identifier, so different
/// accounts signing in on one shared browser are attributed separately and
/// one account converges on one identity across browsers.
///
/// Every write goes to both the request and response cookie collections
/// with a fresh sliding expiry. On the anonymous path the device cookie is
/// only rewritten when its value differs from the anonymous token; on the
/// identified path it is always rewritten.
pub struct MultiUserDeviceResolver {
    provider: Arc<dyn ContextProvider>,
    clock: Arc<dyn Clock>,
    hasher: IdentityHasher,
    config: DeviceCookieConfig,
}

impl MultiUserDeviceResolver {
    /// Create a resolver with an explicit configuration.
    pub fn new(
        provider: impl ContextProvider + 'static,
        config: DeviceCookieConfig,
    ) -> TrackingResult<Self> {
        config.validate()?;
        Ok(Self {
            provider: Arc::new(provider),
            clock: Arc::new(SystemClock),
            hasher: IdentityHasher,
            config,
        })
    }

    /// Create a resolver using the standard cookie contract.
    pub fn with_default_config(provider: impl ContextProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
            clock: Arc::new(SystemClock),
            hasher: IdentityHasher,
            config: DeviceCookieConfig::default(),
        }
    }

    /// Replace the time source used for cookie expiry.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The current configuration.
    pub fn config(&self) -> &DeviceCookieConfig {
        &self.config
    }

    /// Resolve and persist the device id for one event.
    ///
    /// Returns [`Resolution::NoContext`] without side effects when no HTTP
    /// exchange is active. Errors only come from the cookie collections.
    pub fn resolve(&self, event: &TrackedEvent) -> TrackingResult<Resolution> {
        let Some(context) = self.provider.context() else {
            debug!(event_id = %event.event_id, "no http context, skipping device resolution");
            return Ok(Resolution::NoContext);
        };

        match event.visitor_identifier() {
            Some(identifier) => self.resolve_identified(&context, identifier),
            None => self.resolve_anonymous(&context),
        }
    }

    fn resolve_anonymous(&self, context: &HttpContext) -> TrackingResult<Resolution> {
        let anonymous_name = &self.config.anonymous_cookie_name;
        let device_name = &self.config.device_cookie_name;

        // The read and the write below are separate critical sections. Two
        // concurrent first events on one request may both mint a token; the
        // last write wins and the next event resynchronizes the device id.
        let (anonymous_id, anonymous_created) = match context.cookie_value(anonymous_name)? {
            Some(value) => (DeviceId::from_cookie_value(value), false),
            None => {
                let fresh = DeviceId::anonymous();
                self.write(context, anonymous_name, &fresh)?;
                debug!(cookie = %anonymous_name, device_id = %fresh, "created anonymous device id");
                (fresh, true)
            }
        };

        let current = context.cookie_value(device_name)?;
        let device_id_written = current.as_deref() != Some(anonymous_id.as_str());
        if device_id_written {
            self.write(context, device_name, &anonymous_id)?;
            debug!(
                cookie = %device_name,
                device_id = %anonymous_id,
                "device id resynchronized to anonymous token"
            );
        }

        Ok(Resolution::Anonymous {
            device_id: anonymous_id,
            anonymous_created,
            device_id_written,
        })
    }

    fn resolve_identified(
        &self,
        context: &HttpContext,
        identifier: &VisitorIdentifier,
    ) -> TrackingResult<Resolution> {
        let device_name = &self.config.device_cookie_name;
        let device_id = self.hasher.device_id(identifier);

        let changed = context.cookie_value(device_name)?.as_deref() != Some(device_id.as_str());
        // Always rewritten, so an identified visitor's expiry slides on every event.
        self.write(context, device_name, &device_id)?;
        if changed {
            debug!(cookie = %device_name, device_id = %device_id, "device id switched to identity hash");
        }

        Ok(Resolution::Identified { device_id, changed })
    }

    fn write(&self, context: &HttpContext, name: &str, value: &DeviceId) -> TrackingResult<()> {
        let cookie = Cookie::with_retention(
            name,
            value.as_str(),
            self.clock.now(),
            self.config.retention(),
        )?;
        context.set_cookie(cookie)?;
        Ok(())
    }
}

impl TrackingInterceptor for MultiUserDeviceResolver {
    fn name(&self) -> &str {
        "multi-user-device"
    }

    fn sort_order(&self) -> i32 {
        self.config.sort_order
    }

    fn intercept(&self, event: &mut TrackedEvent) -> TrackingResult<InterceptOutcome> {
        match self.resolve(event)? {
            Resolution::NoContext => Ok(InterceptOutcome::skipped("no http context")),
            _ => Ok(InterceptOutcome::Applied),
        }
    }
}

impl std::fmt::Debug for MultiUserDeviceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiUserDeviceResolver")
            .field("config", &self.config)
            .finish()
    }
}
