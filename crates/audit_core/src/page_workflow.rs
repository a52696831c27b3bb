use std::path::{Path, PathBuf};

use crate::{
    Operation, PageRecord, PageStore, Phase, RequestFailure, RequestId, RequestTracker,
    ValidationError, WorkflowKind,
};

const UPLOAD_FALLBACK: &str = "Upload failed";
const FETCH_FALLBACK: &str = "Failed to fetch URLs";

/// Lifecycle shared by the workflows that audit an ingested page set.
///
/// `R` is the workflow's result type. Pages and results are only ever
/// replaced as a whole, and a completion is applied only when the tracker
/// confirms it belongs to the latest request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageWorkflow<R> {
    tracker: RequestTracker,
    pages: PageStore,
    selected_file: Option<PathBuf>,
    ingest_fallback: &'static str,
    submitted_len: usize,
    results: Option<R>,
}

impl<R> PageWorkflow<R> {
    pub(crate) fn new(workflow: WorkflowKind) -> Self {
        Self {
            tracker: RequestTracker::new(workflow),
            pages: PageStore::new(),
            selected_file: None,
            ingest_fallback: UPLOAD_FALLBACK,
            submitted_len: 0,
            results: None,
        }
    }

    pub(crate) fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub(crate) fn pages(&self) -> &PageStore {
        &self.pages
    }

    pub(crate) fn results(&self) -> Option<&R> {
        self.results.as_ref()
    }

    pub(crate) fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    /// Number of pages in the snapshot sent by the latest analyze request.
    pub(crate) fn submitted_len(&self) -> usize {
        self.submitted_len
    }

    pub(crate) fn phase(&self) -> Phase {
        self.tracker
            .phase(!self.pages.is_empty(), self.results.is_some())
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.tracker.failure().map(|failure| failure.message.as_str())
    }

    pub(crate) fn select_file(&mut self, path: Option<PathBuf>) -> bool {
        if self.selected_file == path {
            return false;
        }
        self.selected_file = path;
        true
    }

    pub(crate) fn begin_upload(&mut self) -> Option<(RequestId, PathBuf)> {
        let Some(path) = self.selected_file.clone() else {
            self.tracker
                .fail(Operation::Ingest, ValidationError::NoFileSelected.to_string());
            return None;
        };
        self.ingest_fallback = UPLOAD_FALLBACK;
        Some((self.begin_ingest(), path))
    }

    /// Trims the entries and keeps those starting with `http`. Returns `None`
    /// without touching any state when nothing is left.
    pub(crate) fn begin_fetch(&mut self, urls: Vec<String>) -> Option<(RequestId, Vec<String>)> {
        let urls: Vec<String> = urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| url.starts_with("http"))
            .map(ToOwned::to_owned)
            .collect();
        if urls.is_empty() {
            return None;
        }
        self.ingest_fallback = FETCH_FALLBACK;
        Some((self.begin_ingest(), urls))
    }

    fn begin_ingest(&mut self) -> RequestId {
        // Stale results must never be shown against a new page set.
        self.pages.clear();
        self.results = None;
        self.tracker.begin(Operation::Ingest)
    }

    pub(crate) fn complete_ingest(
        &mut self,
        request: RequestId,
        result: Result<Vec<PageRecord>, RequestFailure>,
    ) -> bool {
        if !self.tracker.settle(request) {
            return false;
        }
        self.results = None;
        match result {
            Ok(pages) => self.pages.replace(pages),
            Err(failure) => {
                self.pages.clear();
                self.tracker
                    .fail(Operation::Ingest, failure.message_or(self.ingest_fallback));
            }
        }
        true
    }

    pub(crate) fn edit_content(&mut self, index: usize, content: String) -> Result<(), ValidationError> {
        self.pages.edit_content(index, content)
    }

    pub(crate) fn begin_analyze(&mut self) -> Option<(RequestId, Vec<PageRecord>)> {
        if self.pages.is_empty() {
            self.tracker
                .fail(Operation::Analyze, ValidationError::NoPages.to_string());
            return None;
        }
        let snapshot = self.pages.snapshot();
        self.submitted_len = snapshot.len();
        Some((self.tracker.begin(Operation::Analyze), snapshot))
    }

    /// Applies an analyze completion. On failure the held results stay as
    /// they were before the attempt.
    pub(crate) fn complete_analyze(
        &mut self,
        request: RequestId,
        result: Result<R, RequestFailure>,
        fallback: &str,
    ) -> bool {
        if !self.tracker.settle(request) {
            return false;
        }
        match result {
            Ok(results) => self.results = Some(results),
            Err(failure) => self
                .tracker
                .fail(Operation::Analyze, failure.message_or(fallback)),
        }
        true
    }
}
