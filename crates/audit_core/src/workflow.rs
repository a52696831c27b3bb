use std::fmt;

/// The four independent audit workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkflowKind {
    Clustering,
    InternalLinks,
    Localization,
    AiReadiness,
}

impl WorkflowKind {
    pub const ALL: [WorkflowKind; 4] = [
        WorkflowKind::Clustering,
        WorkflowKind::InternalLinks,
        WorkflowKind::Localization,
        WorkflowKind::AiReadiness,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowKind::Clustering => "clustering",
            WorkflowKind::InternalLinks => "internal-links",
            WorkflowKind::Localization => "localization",
            WorkflowKind::AiReadiness => "ai-readiness",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Generation = u64;

/// Identifies one issued request. Completions carry it back so stale
/// responses can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId {
    pub workflow: WorkflowKind,
    pub generation: Generation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Ingest,
    Analyze,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Ingest => f.write_str("ingest"),
            Operation::Analyze => f.write_str("analyze"),
        }
    }
}

/// Lifecycle phase as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Empty,
    Ingesting,
    Ready,
    Analyzing,
    Scored,
    /// The last attempt of `operation` failed. The held pages and results are
    /// those of the last stable phase.
    Failed { operation: Operation },
}

impl Phase {
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Ingesting | Phase::Analyzing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub operation: Operation,
    pub message: String,
}

/// Tracks the single outstanding request of one workflow.
///
/// Every `begin` bumps the generation, so only the most recently issued
/// request can `settle`; anything older is reported as stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTracker {
    workflow: WorkflowKind,
    generation: Generation,
    in_flight: Option<Operation>,
    failure: Option<Failure>,
}

impl RequestTracker {
    pub fn new(workflow: WorkflowKind) -> Self {
        Self {
            workflow,
            generation: 0,
            in_flight: None,
            failure: None,
        }
    }

    pub fn workflow(&self) -> WorkflowKind {
        self.workflow
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn in_flight(&self) -> Option<Operation> {
        self.in_flight
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn begin(&mut self, operation: Operation) -> RequestId {
        self.generation += 1;
        self.in_flight = Some(operation);
        self.failure = None;
        RequestId {
            workflow: self.workflow,
            generation: self.generation,
        }
    }

    /// Marks `request` as finished and drops any failure recorded while it
    /// was in flight. Returns false when it is not the current request, in
    /// which case nothing changes and the caller must discard the response.
    pub fn settle(&mut self, request: RequestId) -> bool {
        if request.workflow != self.workflow
            || request.generation != self.generation
            || self.in_flight.is_none()
        {
            return false;
        }
        self.in_flight = None;
        self.failure = None;
        true
    }

    /// Records a failed attempt of `operation`, either a settled request or
    /// a locally rejected one.
    pub fn fail(&mut self, operation: Operation, message: impl Into<String>) {
        self.failure = Some(Failure {
            operation,
            message: message.into(),
        });
    }

    pub fn phase(&self, has_input: bool, has_results: bool) -> Phase {
        match (self.in_flight, &self.failure) {
            (Some(Operation::Ingest), _) => Phase::Ingesting,
            (Some(Operation::Analyze), _) => Phase::Analyzing,
            (None, Some(failure)) => Phase::Failed {
                operation: failure.operation,
            },
            (None, None) => Self::stable_phase(has_input, has_results),
        }
    }

    pub fn stable_phase(has_input: bool, has_results: bool) -> Phase {
        if has_results {
            Phase::Scored
        } else if has_input {
            Phase::Ready
        } else {
            Phase::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_generation_settles() {
        let mut tracker = RequestTracker::new(WorkflowKind::Clustering);
        let first = tracker.begin(Operation::Ingest);
        let second = tracker.begin(Operation::Analyze);

        assert!(!tracker.settle(first));
        assert_eq!(tracker.in_flight(), Some(Operation::Analyze));
        assert!(tracker.settle(second));
        assert_eq!(tracker.in_flight(), None);
        assert!(!tracker.settle(second));
    }

    #[test]
    fn foreign_workflow_is_ignored() {
        let mut tracker = RequestTracker::new(WorkflowKind::Localization);
        let request = tracker.begin(Operation::Analyze);
        let foreign = RequestId {
            workflow: WorkflowKind::AiReadiness,
            generation: request.generation,
        };
        assert!(!tracker.settle(foreign));
    }

    #[test]
    fn failure_is_cleared_by_next_attempt() {
        let mut tracker = RequestTracker::new(WorkflowKind::InternalLinks);
        tracker.fail(Operation::Analyze, "boom");
        assert_eq!(
            tracker.phase(true, false),
            Phase::Failed {
                operation: Operation::Analyze
            }
        );
        tracker.begin(Operation::Analyze);
        assert!(tracker.failure().is_none());
        assert_eq!(tracker.phase(true, false), Phase::Analyzing);
    }

    #[test]
    fn settling_clears_a_failure_recorded_mid_flight() {
        let mut tracker = RequestTracker::new(WorkflowKind::Clustering);
        let request = tracker.begin(Operation::Ingest);
        tracker.fail(Operation::Analyze, "no pages loaded");

        assert!(tracker.settle(request));
        assert!(tracker.failure().is_none());
        assert_eq!(tracker.phase(true, false), Phase::Ready);
    }
}
