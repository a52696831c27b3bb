use std::path::{Path, PathBuf};

use crate::model::align_by_position;
use crate::page_workflow::PageWorkflow;
use crate::{
    AnalysisOutcome, PageRecord, PageStore, Phase, RequestFailure, RequestId, RequestTracker,
    ScoredPage, ValidationError, WorkflowKind,
};

const SCORE_FALLBACK: &str = "Failed to get AI readiness scores";

/// AI-readiness scoring workflow. Pages can be reviewed and edited before
/// scoring; each result row can be expanded to show the page content.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessWorkflow {
    flow: PageWorkflow<Vec<ScoredPage>>,
    expanded: Option<usize>,
}

impl Default for ReadinessWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadinessWorkflow {
    pub fn new() -> Self {
        Self {
            flow: PageWorkflow::new(WorkflowKind::AiReadiness),
            expanded: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.flow.phase()
    }

    pub fn error(&self) -> Option<&str> {
        self.flow.error()
    }

    pub fn tracker(&self) -> &RequestTracker {
        self.flow.tracker()
    }

    pub fn pages(&self) -> &PageStore {
        self.flow.pages()
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.flow.selected_file()
    }

    pub fn scores(&self) -> &[ScoredPage] {
        self.flow.results().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Pages are editable only until the first scores arrive.
    pub fn is_reviewing(&self) -> bool {
        !self.pages().is_empty() && self.flow.results().is_none()
    }

    /// Current content of the page a result row was scored from. This reads
    /// the live store, so edits made after scoring show up here.
    pub fn full_content(&self, row: &ScoredPage) -> Option<&str> {
        self.pages()
            .get(row.index)
            .map(|page| page.content.as_str())
            .filter(|content| !content.is_empty())
    }

    pub(crate) fn select_file(&mut self, path: Option<PathBuf>) -> bool {
        self.flow.select_file(path)
    }

    pub(crate) fn begin_upload(&mut self) -> Option<(RequestId, PathBuf)> {
        let issued = self.flow.begin_upload();
        if issued.is_some() {
            self.expanded = None;
        }
        issued
    }

    pub(crate) fn begin_fetch(&mut self, urls: Vec<String>) -> Option<(RequestId, Vec<String>)> {
        let issued = self.flow.begin_fetch(urls);
        if issued.is_some() {
            self.expanded = None;
        }
        issued
    }

    pub(crate) fn complete_ingest(
        &mut self,
        request: RequestId,
        result: Result<Vec<PageRecord>, RequestFailure>,
    ) -> bool {
        self.flow.complete_ingest(request, result)
    }

    pub(crate) fn edit_content(&mut self, index: usize, content: String) -> Result<(), ValidationError> {
        self.flow.edit_content(index, content)
    }

    pub(crate) fn begin_analyze(&mut self) -> Option<(RequestId, Vec<PageRecord>)> {
        self.flow.begin_analyze()
    }

    pub(crate) fn complete_analyze(
        &mut self,
        request: RequestId,
        result: Result<AnalysisOutcome, RequestFailure>,
    ) -> bool {
        let submitted = self.flow.submitted_len();
        let result = result.and_then(|outcome| match outcome {
            AnalysisOutcome::Readiness(rows) => {
                let rows = align_by_position(submitted, rows)?;
                Ok(rows
                    .into_iter()
                    .map(|(index, result)| ScoredPage { index, result })
                    .collect::<Vec<_>>())
            }
            other => Err(other.mismatch(WorkflowKind::AiReadiness).into()),
        });
        let succeeded = result.is_ok();
        let applied = self.flow.complete_analyze(request, result, SCORE_FALLBACK);
        if applied && succeeded {
            self.expanded = None;
        }
        applied
    }

    /// Expands `index`, or collapses it when it is already expanded.
    pub(crate) fn toggle_content(&mut self, index: usize) -> bool {
        if index >= self.scores().len() {
            return false;
        }
        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
        true
    }
}
