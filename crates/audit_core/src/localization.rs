use crate::model::align_by_position;
use crate::views::{classify_drift, DriftStatus};
use crate::{
    AlignedLocalization, AnalysisOutcome, LocalizationPair, LocalizationRequest, Operation, Phase,
    RequestFailure, RequestId, RequestTracker, ValidationError, WorkflowKind,
};

const CHECK_FALLBACK: &str = "Check failed";
pub(crate) const DEFAULT_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairField {
    Original,
    Translation,
}

/// Localization drift workflow over a user-built list of URL pairs.
///
/// The pair list never drops below one entry. Results keep the pair they
/// were requested for, so later edits to the list cannot misalign them.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationWorkflow {
    tracker: RequestTracker,
    pairs: Vec<LocalizationPair>,
    threshold: f64,
    submitted: Vec<LocalizationPair>,
    results: Option<Vec<AlignedLocalization>>,
}

impl Default for LocalizationWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalizationWorkflow {
    pub fn new() -> Self {
        Self {
            tracker: RequestTracker::new(WorkflowKind::Localization),
            pairs: vec![LocalizationPair::default()],
            threshold: DEFAULT_THRESHOLD,
            submitted: Vec::new(),
            results: None,
        }
    }

    pub fn phase(&self) -> Phase {
        let has_input = self.pairs.iter().all(LocalizationPair::is_complete);
        self.tracker.phase(has_input, self.results.is_some())
    }

    pub fn error(&self) -> Option<&str> {
        self.tracker.failure().map(|failure| failure.message.as_str())
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub fn pairs(&self) -> &[LocalizationPair] {
        &self.pairs
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn results(&self) -> &[AlignedLocalization] {
        self.results.as_deref().unwrap_or_default()
    }

    pub fn can_remove(&self) -> bool {
        self.pairs.len() > 1
    }

    /// Drift status of every result at the current threshold.
    pub fn classifications(&self) -> Vec<DriftStatus> {
        self.results()
            .iter()
            .map(|row| classify_drift(row.result.similarity, self.threshold))
            .collect()
    }

    pub(crate) fn add_pair(&mut self) {
        self.pairs.push(LocalizationPair::default());
    }

    pub(crate) fn remove_pair(&mut self, index: usize) -> bool {
        if !self.can_remove() || index >= self.pairs.len() {
            return false;
        }
        self.pairs.remove(index);
        true
    }

    pub(crate) fn edit_pair(&mut self, index: usize, field: PairField, value: String) -> bool {
        let Some(pair) = self.pairs.get_mut(index) else {
            return false;
        };
        let slot = match field {
            PairField::Original => &mut pair.original,
            PairField::Translation => &mut pair.translation,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    pub(crate) fn set_threshold(&mut self, threshold: f64) -> bool {
        if !threshold.is_finite() || self.threshold == threshold {
            return false;
        }
        self.threshold = threshold;
        true
    }

    pub(crate) fn begin_check(&mut self) -> Option<(RequestId, LocalizationRequest)> {
        if let Some(index) = self.pairs.iter().position(|pair| !pair.is_complete()) {
            self.tracker.fail(
                Operation::Analyze,
                ValidationError::IncompletePair { index }.to_string(),
            );
            return None;
        }
        self.submitted = self.pairs.clone();
        let payload = LocalizationRequest {
            originals: self.submitted.iter().map(|p| p.original.clone()).collect(),
            translations: self.submitted.iter().map(|p| p.translation.clone()).collect(),
            threshold: self.threshold,
        };
        Some((self.tracker.begin(Operation::Analyze), payload))
    }

    pub(crate) fn complete_check(
        &mut self,
        request: RequestId,
        result: Result<AnalysisOutcome, RequestFailure>,
    ) -> bool {
        if !self.tracker.settle(request) {
            return false;
        }
        let aligned = result.and_then(|outcome| match outcome {
            AnalysisOutcome::Localization(rows) => {
                let rows = align_by_position(self.submitted.len(), rows)?;
                Ok(rows
                    .into_iter()
                    .map(|(index, result)| AlignedLocalization {
                        index,
                        pair: self.submitted[index].clone(),
                        result,
                    })
                    .collect::<Vec<_>>())
            }
            other => Err(other.mismatch(WorkflowKind::Localization).into()),
        });
        match aligned {
            Ok(rows) => self.results = Some(rows),
            Err(failure) => self
                .tracker
                .fail(Operation::Analyze, failure.message_or(CHECK_FALLBACK)),
        }
        true
    }
}
