use std::time::{Duration, Instant};

use madid_types::TrackedEvent;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::interceptor::{InterceptorResult, InterceptorStatus, TrackingInterceptor};

// ---------------------------------------------------------------------------
// PipelineReport
// ---------------------------------------------------------------------------

/// The outcome of running one event through the interceptor chain.
#[derive(Clone, Debug)]
pub struct PipelineReport {
    pub event_id: Uuid,
    /// Per-interceptor results in execution order.
    pub results: Vec<InterceptorResult>,
    /// Total wall-clock time for the chain.
    pub elapsed: Duration,
}

impl PipelineReport {
    /// Returns `true` if every interceptor either applied or skipped.
    pub fn is_clean(&self) -> bool {
        !self.results.iter().any(|r| r.status.is_failed())
    }

    /// Results of interceptors that returned an error.
    pub fn failures(&self) -> impl Iterator<Item = &InterceptorResult> {
        self.results.iter().filter(|r| r.status.is_failed())
    }

    /// The recorded result for the named interceptor, if it ran.
    pub fn result_for(&self, name: &str) -> Option<&InterceptorResult> {
        self.results.iter().find(|r| r.interceptor == name)
    }
}

// ---------------------------------------------------------------------------
// TrackingPipeline
// ---------------------------------------------------------------------------

/// An ordered chain of interceptors applied to every tracked event.
///
/// Tracking is best-effort: an interceptor that fails is logged and
/// recorded, and the remaining interceptors still run. Nothing in the
/// pipeline can fail the surrounding request.
pub struct TrackingPipeline {
    interceptors: Vec<Box<dyn TrackingInterceptor>>,
}

impl TrackingPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    /// Register an interceptor at the position given by its sort order.
    ///
    /// Interceptors with equal sort orders keep their registration order.
    pub fn add_interceptor(&mut self, interceptor: Box<dyn TrackingInterceptor>) {
        let order = interceptor.sort_order();
        let idx = self
            .interceptors
            .partition_point(|existing| existing.sort_order() <= order);
        self.interceptors.insert(idx, interceptor);
    }

    /// Builder-style [`Self::add_interceptor`].
    pub fn with_interceptor(mut self, interceptor: Box<dyn TrackingInterceptor>) -> Self {
        self.add_interceptor(interceptor);
        self
    }

    /// Number of registered interceptors.
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Interceptor names in execution order.
    pub fn interceptor_names(&self) -> Vec<&str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Run every interceptor over the event, in ascending sort order.
    pub fn process(&self, event: &mut TrackedEvent) -> PipelineReport {
        let pipeline_start = Instant::now();
        let mut results = Vec::with_capacity(self.interceptors.len());

        for interceptor in &self.interceptors {
            let start = Instant::now();
            let status = match interceptor.intercept(event) {
                Ok(outcome) => InterceptorStatus::from(outcome),
                Err(e) => {
                    warn!(
                        interceptor = interceptor.name(),
                        event_id = %event.event_id,
                        error = %e,
                        "tracking interceptor failed, continuing"
                    );
                    InterceptorStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };

            results.push(InterceptorResult {
                interceptor: interceptor.name().to_string(),
                sort_order: interceptor.sort_order(),
                status,
                elapsed: start.elapsed(),
            });
        }

        let elapsed = pipeline_start.elapsed();
        debug!(
            event_id = %event.event_id,
            interceptors = results.len(),
            ?elapsed,
            "tracking pipeline finished"
        );

        PipelineReport {
            event_id: event.event_id,
            results,
            elapsed,
        }
    }
}

impl Default for TrackingPipeline {
    fn default() -> Self {
        Self::new()
    }
}
