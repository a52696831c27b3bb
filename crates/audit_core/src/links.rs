use std::path::{Path, PathBuf};

use crate::page_workflow::PageWorkflow;
use crate::views::{filter_links, language_options};
use crate::{
    AnalysisOutcome, LinkRequestParams, LinkSuggestion, PageRecord, PageStore, Phase,
    RequestFailure, RequestId, RequestTracker, ValidationError, WorkflowKind,
};

const LINKS_FALLBACK: &str = "Failed to get internal links";
pub(crate) const DEFAULT_MIN_SIMILARITY: f64 = 0.7;

/// Internal-link suggestion workflow with a language and similarity filter.
#[derive(Debug, Clone, PartialEq)]
pub struct LinksWorkflow {
    flow: PageWorkflow<Vec<LinkSuggestion>>,
    params: LinkRequestParams,
    selected_language: String,
    min_similarity: f64,
}

impl Default for LinksWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl LinksWorkflow {
    pub fn new() -> Self {
        Self {
            flow: PageWorkflow::new(WorkflowKind::InternalLinks),
            params: LinkRequestParams::default(),
            selected_language: String::new(),
            min_similarity: DEFAULT_MIN_SIMILARITY,
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

    pub fn links(&self) -> &[LinkSuggestion] {
        self.flow.results().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn params(&self) -> LinkRequestParams {
        self.params
    }

    pub fn selected_language(&self) -> &str {
        &self.selected_language
    }

    pub fn min_similarity(&self) -> f64 {
        self.min_similarity
    }

    /// Distinct non-empty languages of the current page set.
    pub fn languages(&self) -> Vec<String> {
        language_options(self.pages().as_slice())
    }

    /// Links passing the current language and similarity filter, in service order.
    pub fn filtered(&self) -> Vec<&LinkSuggestion> {
        filter_links(
            self.links(),
            self.pages().as_slice(),
            &self.selected_language,
            self.min_similarity,
        )
    }

    pub(crate) fn select_file(&mut self, path: Option<PathBuf>) -> bool {
        self.flow.select_file(path)
    }

    pub(crate) fn begin_upload(&mut self) -> Option<(RequestId, PathBuf)> {
        let issued = self.flow.begin_upload();
        if issued.is_some() {
            self.selected_language.clear();
        }
        issued
    }

    pub(crate) fn begin_fetch(&mut self, urls: Vec<String>) -> Option<(RequestId, Vec<String>)> {
        let issued = self.flow.begin_fetch(urls);
        if issued.is_some() {
            self.selected_language.clear();
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

    pub(crate) fn begin_analyze(
        &mut self,
    ) -> Option<(RequestId, Vec<PageRecord>, LinkRequestParams)> {
        let params = self.params;
        self.flow
            .begin_analyze()
            .map(|(request, pages)| (request, pages, params))
    }

    pub(crate) fn complete_analyze(
        &mut self,
        request: RequestId,
        result: Result<AnalysisOutcome, RequestFailure>,
    ) -> bool {
        let result = result.and_then(|outcome| match outcome {
            AnalysisOutcome::Links(links) => Ok(links),
            other => Err(other.mismatch(WorkflowKind::InternalLinks).into()),
        });
        self.flow.complete_analyze(request, result, LINKS_FALLBACK)
    }

    pub(crate) fn set_params(&mut self, params: LinkRequestParams) -> bool {
        if self.params == params {
            return false;
        }
        self.params = params;
        true
    }

    pub(crate) fn select_language(&mut self, language: String) -> bool {
        if self.selected_language == language {
            return false;
        }
        self.selected_language = language;
        true
    }

    pub(crate) fn set_min_similarity(&mut self, min_similarity: f64) -> bool {
        if !min_similarity.is_finite() || self.min_similarity == min_similarity {
            return false;
        }
        self.min_similarity = min_similarity;
        true
    }
}
