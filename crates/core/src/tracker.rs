use std::fmt;

use tracing::debug;

use crate::types::AnalysisResult;

/// Token handed out for every accepted submit. Strictly increasing per tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of the one request a session may have.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestLifecycle {
    #[default]
    Idle,
    Loading {
        generation: Generation,
    },
    Success(AnalysisResult),
    Error(String),
}

impl RequestLifecycle {
    pub fn name(&self) -> &'static str {
        match self {
            RequestLifecycle::Idle => "idle",
            RequestLifecycle::Loading { .. } => "loading",
            RequestLifecycle::Success(_) => "success",
            RequestLifecycle::Error(_) => "error",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestLifecycle::Loading { .. })
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            RequestLifecycle::Success(_) | RequestLifecycle::Error(_)
        )
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            RequestLifecycle::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestLifecycle::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Single-flight tracker for the analysis request.
#[derive(Debug, Default)]
pub struct ApiStatusTracker {
    lifecycle: RequestLifecycle,
    issued: u64,
}

impl ApiStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lifecycle(&self) -> &RequestLifecycle {
        &self.lifecycle
    }

    pub fn is_loading(&self) -> bool {
        self.lifecycle.is_loading()
    }

    /// Enter `loading`, dropping any previous result or error.
    ///
    /// Returns `None` when a request is already in flight.
    pub fn begin(&mut self) -> Option<Generation> {
        if let RequestLifecycle::Loading { generation } = self.lifecycle {
            debug!(%generation, "submit ignored, request already in flight");
            return None;
        }

        self.issued += 1;
        let generation = Generation(self.issued);
        self.lifecycle = RequestLifecycle::Loading { generation };
        debug!(%generation, "request lifecycle -> loading");
        Some(generation)
    }

    /// Apply the outcome of the call tagged with `generation`.
    ///
    /// Returns `false` and leaves the state untouched when the token is not the
    /// one currently loading.
    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: Result<AnalysisResult, String>,
    ) -> bool {
        match self.lifecycle {
            RequestLifecycle::Loading { generation: current } if current == generation => {}
            _ => {
                debug!(
                    %generation,
                    state = self.lifecycle.name(),
                    "discarding stale completion"
                );
                return false;
            }
        }

        self.lifecycle = match outcome {
            Ok(result) => RequestLifecycle::Success(result),
            Err(message) => RequestLifecycle::Error(message),
        };
        debug!(%generation, state = self.lifecycle.name(), "request lifecycle settled");
        true
    }

    /// Back to `idle`. A request still in flight becomes stale.
    pub fn reset(&mut self) {
        self.lifecycle = RequestLifecycle::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(summary: &str) -> AnalysisResult {
        AnalysisResult {
            summary: Some(summary.to_string()),
            ..AnalysisResult::default()
        }
    }

    #[test]
    fn test_happy_path() {
        let mut tracker = ApiStatusTracker::new();
        assert_eq!(tracker.lifecycle(), &RequestLifecycle::Idle);

        let generation = tracker.begin().unwrap();
        assert!(tracker.is_loading());
        assert!(tracker.lifecycle().result().is_none());

        assert!(tracker.complete(generation, Ok(result("S"))));
        assert_eq!(
            tracker.lifecycle().result().unwrap().summary.as_deref(),
            Some("S")
        );
        assert!(tracker.lifecycle().error_message().is_none());
    }

    #[test]
    fn test_begin_while_loading_is_noop() {
        let mut tracker = ApiStatusTracker::new();
        let first = tracker.begin().unwrap();
        assert_eq!(tracker.begin(), None);
        assert_eq!(
            tracker.lifecycle(),
            &RequestLifecycle::Loading { generation: first }
        );
    }

    #[test]
    fn test_error_then_fresh_submit_clears_message() {
        let mut tracker = ApiStatusTracker::new();
        let first = tracker.begin().unwrap();
        tracker.complete(first, Err("quota exceeded".to_string()));
        assert_eq!(tracker.lifecycle().error_message(), Some("quota exceeded"));

        let second = tracker.begin().unwrap();
        assert!(second > first);
        assert!(tracker.lifecycle().error_message().is_none());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut tracker = ApiStatusTracker::new();
        let old = tracker.begin().unwrap();
        tracker.reset();
        let new = tracker.begin().unwrap();

        assert!(!tracker.complete(old, Ok(result("old"))));
        assert_eq!(tracker.lifecycle(), &RequestLifecycle::Loading { generation: new });

        assert!(tracker.complete(new, Err("boom".to_string())));
        assert!(!tracker.complete(new, Ok(result("late duplicate"))));
        assert_eq!(tracker.lifecycle().error_message(), Some("boom"));
    }

    #[test]
    fn test_reset_after_completion() {
        let mut tracker = ApiStatusTracker::new();
        let generation = tracker.begin().unwrap();
        tracker.complete(generation, Ok(result("S")));
        tracker.reset();
        assert_eq!(tracker.lifecycle(), &RequestLifecycle::Idle);
        assert!(tracker.lifecycle().result().is_none());
        assert!(tracker.lifecycle().error_message().is_none());
    }
}
