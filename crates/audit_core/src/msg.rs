use std::path::PathBuf;

use crate::{
    AnalysisOutcome, ClusterId, LinkRequestParams, PageRecord, PairField, RequestFailure,
    RequestId, WorkflowKind,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked (or cleared) the file to upload.
    FileSelected {
        workflow: WorkflowKind,
        path: Option<PathBuf>,
    },
    /// User asked to upload the selected file.
    UploadClicked { workflow: WorkflowKind },
    /// User submitted URLs to fetch. Entries are trimmed and non-http ones dropped.
    UrlsSubmitted {
        workflow: WorkflowKind,
        urls: Vec<String>,
    },
    /// Upload or fetch finished.
    IngestCompleted {
        request: RequestId,
        result: Result<Vec<PageRecord>, RequestFailure>,
    },
    /// User edited the extracted content of one page.
    ContentEdited {
        workflow: WorkflowKind,
        index: usize,
        content: String,
    },
    /// User started the workflow's analysis.
    AnalyzeClicked { workflow: WorkflowKind },
    /// Analysis request finished.
    AnalysisCompleted {
        request: RequestId,
        result: Result<AnalysisOutcome, RequestFailure>,
    },
    /// User picked a cluster in the overview; `None` clears the selection.
    ClusterSelected(Option<ClusterId>),
    /// Language filter for link suggestions; empty means all languages.
    LanguageSelected(String),
    MinSimilarityChanged(f64),
    LinkParamsChanged(LinkRequestParams),
    PairAdded,
    PairRemoved(usize),
    PairEdited {
        index: usize,
        field: PairField,
        value: String,
    },
    ThresholdChanged(f64),
    /// User toggled the full-content row of a readiness result.
    ContentToggled(usize),
    /// User asked for the workflow's CSV export.
    ExportClicked { workflow: WorkflowKind },
    /// Fallback for placeholder wiring.
    NoOp,
}
