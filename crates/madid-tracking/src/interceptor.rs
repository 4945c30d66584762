use std::time::Duration;

use madid_types::TrackedEvent;

use crate::error::TrackingResult;

// ---------------------------------------------------------------------------
// InterceptOutcome
// ---------------------------------------------------------------------------

/// What an interceptor did with an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterceptOutcome {
    /// The interceptor ran and applied its effect.
    Applied,
    /// The interceptor had nothing to do for this event.
    Skipped { reason: String },
}

impl InterceptOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// InterceptorStatus / InterceptorResult
// ---------------------------------------------------------------------------

/// Recorded status of one interceptor run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterceptorStatus {
    Applied,
    Skipped { reason: String },
    /// The interceptor returned an error. The pipeline kept going.
    Failed { error: String },
}

impl InterceptorStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl From<InterceptOutcome> for InterceptorStatus {
    fn from(outcome: InterceptOutcome) -> Self {
        match outcome {
            InterceptOutcome::Applied => Self::Applied,
            InterceptOutcome::Skipped { reason } => Self::Skipped { reason },
        }
    }
}

/// Recorded result from one interceptor invocation.
#[derive(Clone, Debug)]
pub struct InterceptorResult {
    /// Name of the interceptor that produced this result.
    pub interceptor: String,
    /// Its position in the chain.
    pub sort_order: i32,
    pub status: InterceptorStatus,
    /// Wall-clock time the interceptor took.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// TrackingInterceptor trait
// ---------------------------------------------------------------------------

/// A single step in the tracking pipeline.
///
/// Interceptors run in ascending [`TrackingInterceptor::sort_order`]. Each
/// receives the event after all lower-ordered interceptors have seen it and
/// may enrich it in place.
///
/// The trait is object-safe and `Send + Sync` so interceptors can be stored
/// in a `Vec<Box<dyn TrackingInterceptor>>`.
pub trait TrackingInterceptor: Send + Sync {
    /// Human-readable name of this interceptor (e.g., "multi-user-device").
    fn name(&self) -> &str;

    /// Position in the pipeline; lower runs first.
    fn sort_order(&self) -> i32;

    /// Process the event.
    fn intercept(&self, event: &mut TrackedEvent) -> TrackingResult<InterceptOutcome>;
}
