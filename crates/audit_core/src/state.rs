use std::path::PathBuf;

use crate::view_model::AuditViewModel;
use crate::{
    ClusteringWorkflow, LinksWorkflow, LocalizationWorkflow, PageRecord, PageStore, Phase,
    ReadinessWorkflow, RequestFailure, RequestId, ValidationError, WorkflowKind,
};

/// State of all four workflows. They share nothing but the dirty flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditState {
    clustering: ClusteringWorkflow,
    links: LinksWorkflow,
    localization: LocalizationWorkflow,
    readiness: ReadinessWorkflow,
    dirty: bool,
}

impl AuditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AuditViewModel {
        AuditViewModel::build(self)
    }

    pub fn clustering(&self) -> &ClusteringWorkflow {
        &self.clustering
    }

    pub fn links(&self) -> &LinksWorkflow {
        &self.links
    }

    pub fn localization(&self) -> &LocalizationWorkflow {
        &self.localization
    }

    pub fn readiness(&self) -> &ReadinessWorkflow {
        &self.readiness
    }

    pub fn phase(&self, workflow: WorkflowKind) -> Phase {
        match workflow {
            WorkflowKind::Clustering => self.clustering.phase(),
            WorkflowKind::InternalLinks => self.links.phase(),
            WorkflowKind::Localization => self.localization.phase(),
            WorkflowKind::AiReadiness => self.readiness.phase(),
        }
    }

    pub fn error(&self, workflow: WorkflowKind) -> Option<&str> {
        match workflow {
            WorkflowKind::Clustering => self.clustering.error(),
            WorkflowKind::InternalLinks => self.links.error(),
            WorkflowKind::Localization => self.localization.error(),
            WorkflowKind::AiReadiness => self.readiness.error(),
        }
    }

    /// Loaded pages of a page-based workflow; `None` for localization,
    /// which works on URL pairs.
    pub fn pages(&self, workflow: WorkflowKind) -> Option<&PageStore> {
        match workflow {
            WorkflowKind::Clustering => Some(self.clustering.pages()),
            WorkflowKind::InternalLinks => Some(self.links.pages()),
            WorkflowKind::Localization => None,
            WorkflowKind::AiReadiness => Some(self.readiness.pages()),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the state changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clustering_mut(&mut self) -> &mut ClusteringWorkflow {
        &mut self.clustering
    }

    pub(crate) fn links_mut(&mut self) -> &mut LinksWorkflow {
        &mut self.links
    }

    pub(crate) fn localization_mut(&mut self) -> &mut LocalizationWorkflow {
        &mut self.localization
    }

    pub(crate) fn readiness_mut(&mut self) -> &mut ReadinessWorkflow {
        &mut self.readiness
    }

    /// The workflow behind `workflow` if it works on an ingested page set.
    pub(crate) fn intake_mut(&mut self, workflow: WorkflowKind) -> Option<&mut dyn PageIntake> {
        match workflow {
            WorkflowKind::Clustering => Some(&mut self.clustering),
            WorkflowKind::InternalLinks => Some(&mut self.links),
            WorkflowKind::AiReadiness => Some(&mut self.readiness),
            WorkflowKind::Localization => None,
        }
    }
}

/// Ingest and editing operations shared by the page-based workflows.
pub(crate) trait PageIntake {
    fn select_file(&mut self, path: Option<PathBuf>) -> bool;
    fn begin_upload(&mut self) -> Option<(RequestId, PathBuf)>;
    fn begin_fetch(&mut self, urls: Vec<String>) -> Option<(RequestId, Vec<String>)>;
    fn complete_ingest(
        &mut self,
        request: RequestId,
        result: Result<Vec<PageRecord>, RequestFailure>,
    ) -> bool;
    fn edit_content(&mut self, index: usize, content: String) -> Result<(), ValidationError>;
}

macro_rules! impl_page_intake {
    ($workflow:ty) => {
        impl PageIntake for $workflow {
            fn select_file(&mut self, path: Option<PathBuf>) -> bool {
                <$workflow>::select_file(self, path)
            }

            fn begin_upload(&mut self) -> Option<(RequestId, PathBuf)> {
                <$workflow>::begin_upload(self)
            }

            fn begin_fetch(&mut self, urls: Vec<String>) -> Option<(RequestId, Vec<String>)> {
                <$workflow>::begin_fetch(self, urls)
            }

            fn complete_ingest(
                &mut self,
                request: RequestId,
                result: Result<Vec<PageRecord>, RequestFailure>,
            ) -> bool {
                <$workflow>::complete_ingest(self, request, result)
            }

            fn edit_content(&mut self, index: usize, content: String) -> Result<(), ValidationError> {
                <$workflow>::edit_content(self, index, content)
            }
        }
    };
}

impl_page_intake!(ClusteringWorkflow);
impl_page_intake!(LinksWorkflow);
impl_page_intake!(ReadinessWorkflow);
