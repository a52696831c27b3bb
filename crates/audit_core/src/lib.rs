//! Audit core: pure workflow state machines, derived views and CSV export.
mod clustering;
mod effect;
mod error;
mod export;
mod links;
mod localization;
mod model;
mod msg;
mod page;
mod page_workflow;
mod readiness;
mod state;
mod update;
mod view_model;
mod views;
mod workflow;

pub use clustering::ClusteringWorkflow;
pub use effect::Effect;
pub use error::{ExportError, RequestFailure, ShapeError, ValidationError};
pub use export::{
    export_clusters, export_links, export_localization, CsvArtifact, CLUSTERS_CSV, CSV_MIME,
    INTERNAL_LINKS_CSV, LOCALIZATION_CSV,
};
pub use links::LinksWorkflow;
pub use localization::{LocalizationWorkflow, PairField};
pub use model::{
    AiReadinessResult, AlignedLocalization, AnalysisOutcome, ClusterId, ClusterMap,
    ClusterResult, ClusteredPage, LinkRequestParams, LinkSuggestion, LocalizationPair,
    LocalizationRequest, LocalizationResult, ScoredPage,
};
pub use msg::Msg;
pub use page::{PageRecord, PageStore};
pub use readiness::ReadinessWorkflow;
pub use state::AuditState;
pub use update::{split_url_input, update};
pub use view_model::{
    AuditViewModel, ClusterMemberRow, ClusteringView, EditablePageView, LinkRowView, LinksView,
    LocalizationRowView, LocalizationView, PageRowView, ReadinessRowView, ReadinessView,
};
pub use views::{
    classify_drift, cluster_keywords, cluster_members, cluster_overview, filter_links,
    format_similarity, lang_of, language_options, preview, ClusterSummary, DriftStatus,
    PLACEHOLDER, TABLE_PREVIEW_CHARS,
};
pub use workflow::{Failure, Generation, Operation, Phase, RequestId, RequestTracker, WorkflowKind};
