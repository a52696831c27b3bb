use std::path::PathBuf;

use crate::views::{
    cluster_members, cluster_overview, format_similarity, preview, ClusterSummary, DriftStatus,
    PLACEHOLDER, TABLE_PREVIEW_CHARS,
};
use crate::{
    AuditState, ClusterId, ClusteringWorkflow, LinkRequestParams, LinksWorkflow, LocalizationPair,
    LocalizationWorkflow, PageStore, Phase, ReadinessWorkflow,
};

/// Everything the presentation layer needs to draw the four workflows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditViewModel {
    pub clustering: ClusteringView,
    pub links: LinksView,
    pub localization: LocalizationView,
    pub readiness: ReadinessView,
    pub dirty: bool,
}

impl AuditViewModel {
    pub(crate) fn build(state: &AuditState) -> Self {
        Self {
            clustering: ClusteringView::build(state.clustering()),
            links: LinksView::build(state.links()),
            localization: LocalizationView::build(state.localization()),
            readiness: ReadinessView::build(state.readiness()),
            dirty: state.is_dirty(),
        }
    }
}

/// A page row in the ingest preview table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRowView {
    pub index: usize,
    pub url: String,
    pub lang: String,
    pub content_preview: String,
}

fn page_rows(pages: &PageStore) -> Vec<PageRowView> {
    pages
        .as_slice()
        .iter()
        .enumerate()
        .map(|(index, page)| PageRowView {
            index,
            url: page.url.clone(),
            lang: page.lang.clone(),
            content_preview: preview(&page.content, TABLE_PREVIEW_CHARS),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterMemberRow {
    pub url: String,
    pub lang: String,
    pub content_preview: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusteringView {
    pub phase: Phase,
    pub error: Option<String>,
    pub selected_file: Option<PathBuf>,
    pub pages: Vec<PageRowView>,
    pub clusters: Vec<ClusterSummary>,
    /// Keywords of every cluster, in cluster order.
    pub keywords: Vec<(ClusterId, Vec<String>)>,
    pub selected_cluster: Option<ClusterId>,
    pub members: Vec<ClusterMemberRow>,
    pub can_analyze: bool,
    pub can_export: bool,
}

impl ClusteringView {
    fn build(workflow: &ClusteringWorkflow) -> Self {
        let selected = workflow.selected_cluster().map(ClusterId::as_str);
        let mut view = Self {
            phase: workflow.phase(),
            error: workflow.error().map(ToOwned::to_owned),
            selected_file: workflow.selected_file().map(ToOwned::to_owned),
            pages: page_rows(workflow.pages()),
            selected_cluster: workflow.selected_cluster().cloned(),
            can_analyze: !workflow.pages().is_empty() && !workflow.phase().is_busy(),
            ..Self::default()
        };
        if let Some(result) = workflow.result() {
            view.clusters = cluster_overview(result, selected);
            view.keywords = result
                .clusters
                .keys()
                .map(|id| {
                    let keywords = result.cluster_keywords.get(id.as_str()).cloned();
                    (id.clone(), keywords.unwrap_or_default())
                })
                .collect();
            view.members = cluster_members(result, selected)
                .into_iter()
                .map(|page| ClusterMemberRow {
                    url: page.url.clone(),
                    lang: page.lang.clone(),
                    content_preview: preview(&page.content, TABLE_PREVIEW_CHARS),
                })
                .collect();
            view.can_export = !result.clustered_pages.is_empty();
        }
        view
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRowView {
    pub source_url: String,
    pub target_url: String,
    pub anchor_text: String,
    pub similarity: String,
    pub same_language: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinksView {
    pub phase: Phase,
    pub error: Option<String>,
    pub selected_file: Option<PathBuf>,
    pub pages: Vec<PageRowView>,
    pub params: LinkRequestParams,
    pub languages: Vec<String>,
    pub selected_language: String,
    pub min_similarity: f64,
    pub total_links: usize,
    /// Links passing the current filter.
    pub rows: Vec<LinkRowView>,
    pub can_analyze: bool,
    pub can_export: bool,
}

impl LinksView {
    fn build(workflow: &LinksWorkflow) -> Self {
        let rows: Vec<LinkRowView> = workflow
            .filtered()
            .into_iter()
            .map(|link| LinkRowView {
                source_url: link.source_url.clone(),
                target_url: link.target_url.clone(),
                anchor_text: link.anchor_text.clone(),
                similarity: format_similarity(link.similarity),
                same_language: if link.same_language { "Yes" } else { "No" },
            })
            .collect();
        Self {
            phase: workflow.phase(),
            error: workflow.error().map(ToOwned::to_owned),
            selected_file: workflow.selected_file().map(ToOwned::to_owned),
            pages: page_rows(workflow.pages()),
            params: workflow.params(),
            languages: workflow.languages(),
            selected_language: workflow.selected_language().to_owned(),
            min_similarity: workflow.min_similarity(),
            total_links: workflow.links().len(),
            can_analyze: !workflow.pages().is_empty() && !workflow.phase().is_busy(),
            can_export: !rows.is_empty(),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationRowView {
    pub original_url: String,
    pub translation_url: String,
    pub similarity: String,
    pub status: DriftStatus,
    pub original_preview: String,
    pub translation_preview: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalizationView {
    pub phase: Phase,
    pub error: Option<String>,
    pub pairs: Vec<LocalizationPair>,
    pub can_remove: bool,
    pub threshold: f64,
    pub rows: Vec<LocalizationRowView>,
    pub can_analyze: bool,
    pub can_export: bool,
}

impl LocalizationView {
    fn build(workflow: &LocalizationWorkflow) -> Self {
        let rows: Vec<LocalizationRowView> = workflow
            .results()
            .iter()
            .zip(workflow.classifications())
            .map(|(row, status)| LocalizationRowView {
                original_url: row.pair.original.clone(),
                translation_url: row.pair.translation.clone(),
                similarity: format_similarity(row.result.similarity),
                status,
                original_preview: preview(&row.result.original, TABLE_PREVIEW_CHARS),
                translation_preview: preview(&row.result.translation, TABLE_PREVIEW_CHARS),
            })
            .collect();
        Self {
            phase: workflow.phase(),
            error: workflow.error().map(ToOwned::to_owned),
            pairs: workflow.pairs().to_vec(),
            can_remove: workflow.can_remove(),
            threshold: workflow.threshold(),
            can_analyze: !workflow.phase().is_busy(),
            can_export: !rows.is_empty(),
            rows,
        }
    }
}

/// A page shown with its full content while it can still be edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditablePageView {
    pub index: usize,
    pub url: String,
    pub lang: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessRowView {
    pub index: usize,
    pub url: String,
    pub score: String,
    pub summary_similarity: String,
    pub missing_headers: String,
    pub llm_summary: String,
    pub suggestions: Vec<String>,
    pub expanded: bool,
    /// Full page content, present only for the expanded row.
    pub full_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadinessView {
    pub phase: Phase,
    pub error: Option<String>,
    pub selected_file: Option<PathBuf>,
    pub reviewing: bool,
    pub pages: Vec<EditablePageView>,
    pub rows: Vec<ReadinessRowView>,
    pub can_analyze: bool,
}

impl ReadinessView {
    fn build(workflow: &ReadinessWorkflow) -> Self {
        let reviewing = workflow.is_reviewing();
        let pages = if reviewing {
            workflow
                .pages()
                .as_slice()
                .iter()
                .enumerate()
                .map(|(index, page)| EditablePageView {
                    index,
                    url: page.url.clone(),
                    lang: page.lang.clone(),
                    content: page.content.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };
        let rows = workflow
            .scores()
            .iter()
            .enumerate()
            .map(|(position, scored)| {
                let row = &scored.result;
                let expanded = workflow.expanded() == Some(position);
                ReadinessRowView {
                    index: scored.index,
                    url: row.url.clone(),
                    score: row.score.to_string(),
                    summary_similarity: row
                        .summary_similarity
                        .map(format_similarity)
                        .unwrap_or_else(|| PLACEHOLDER.to_owned()),
                    missing_headers: if row.missing_headers.is_empty() {
                        PLACEHOLDER.to_owned()
                    } else {
                        row.missing_headers.join(", ")
                    },
                    llm_summary: row
                        .llm_summary
                        .as_deref()
                        .filter(|summary| !summary.is_empty())
                        .unwrap_or(PLACEHOLDER)
                        .to_owned(),
                    suggestions: row.suggestions.clone(),
                    expanded,
                    full_content: expanded.then(|| {
                        workflow
                            .full_content(scored)
                            .unwrap_or(PLACEHOLDER)
                            .to_owned()
                    }),
                }
            })
            .collect();
        Self {
            phase: workflow.phase(),
            error: workflow.error().map(ToOwned::to_owned),
            selected_file: workflow.selected_file().map(ToOwned::to_owned),
            reviewing,
            pages,
            rows,
            can_analyze: !workflow.pages().is_empty() && !workflow.phase().is_busy(),
        }
    }
}
