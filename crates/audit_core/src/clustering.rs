use std::path::{Path, PathBuf};

use crate::page_workflow::PageWorkflow;
use crate::{
    AnalysisOutcome, ClusterId, ClusterResult, PageRecord, PageStore, Phase, RequestFailure,
    RequestId, RequestTracker, ValidationError, WorkflowKind,
};

const CLUSTER_FALLBACK: &str = "Clustering failed";

/// Semantic clustering workflow: ingest pages, cluster them, browse clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringWorkflow {
    flow: PageWorkflow<ClusterResult>,
    selected_cluster: Option<ClusterId>,
}

impl Default for ClusteringWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusteringWorkflow {
    pub fn new() -> Self {
        Self {
            flow: PageWorkflow::new(WorkflowKind::Clustering),
            selected_cluster: None,
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

    pub fn result(&self) -> Option<&ClusterResult> {
        self.flow.results()
    }

    pub fn selected_cluster(&self) -> Option<&ClusterId> {
        self.selected_cluster.as_ref()
    }

    pub(crate) fn select_file(&mut self, path: Option<PathBuf>) -> bool {
        self.flow.select_file(path)
    }

    pub(crate) fn begin_upload(&mut self) -> Option<(RequestId, PathBuf)> {
        let issued = self.flow.begin_upload();
        if issued.is_some() {
            self.selected_cluster = None;
        }
        issued
    }

    pub(crate) fn begin_fetch(&mut self, urls: Vec<String>) -> Option<(RequestId, Vec<String>)> {
        let issued = self.flow.begin_fetch(urls);
        if issued.is_some() {
            self.selected_cluster = None;
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
        let issued = self.flow.begin_analyze();
        if issued.is_some() {
            self.selected_cluster = None;
        }
        issued
    }

    pub(crate) fn complete_analyze(
        &mut self,
        request: RequestId,
        result: Result<AnalysisOutcome, RequestFailure>,
    ) -> bool {
        let result = result.and_then(|outcome| match outcome {
            AnalysisOutcome::Clusters(clusters) => {
                clusters.validate()?;
                Ok(clusters)
            }
            other => Err(other.mismatch(WorkflowKind::Clustering).into()),
        });
        let succeeded = result.is_ok();
        let applied = self.flow.complete_analyze(request, result, CLUSTER_FALLBACK);
        if applied && succeeded {
            self.selected_cluster = None;
        }
        applied
    }

    /// Changes the selection only; never triggers a request.
    pub(crate) fn select_cluster(&mut self, cluster: Option<ClusterId>) -> bool {
        if self.selected_cluster == cluster {
            return false;
        }
        self.selected_cluster = cluster;
        true
    }
}
