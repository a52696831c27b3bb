//! Derived views: read-only recomputations over raw results.
//!
//! Nothing here mutates its inputs; callers re-run these whenever a
//! parameter changes.

use std::collections::HashSet;

use crate::{ClusterId, ClusterResult, ClusteredPage, LinkSuggestion, PageRecord};

/// Shown in place of absent optional values.
pub const PLACEHOLDER: &str = "-";
/// Characters of text shown in table previews.
pub const TABLE_PREVIEW_CHARS: usize = 120;
const ELLIPSIS: &str = "...";

/// Pages of `selected`, compared as text. No selection yields no pages.
pub fn cluster_members<'a>(
    result: &'a ClusterResult,
    selected: Option<&str>,
) -> Vec<&'a ClusteredPage> {
    let Some(selected) = selected else {
        return Vec::new();
    };
    result
        .clustered_pages
        .iter()
        .filter(|page| page.cluster.as_str() == selected)
        .collect()
}

pub fn cluster_keywords<'a>(result: &'a ClusterResult, cluster: &str) -> &'a [String] {
    result
        .cluster_keywords
        .get(cluster)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// One entry of the cluster overview (bubble chart / list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSummary {
    pub id: ClusterId,
    pub page_count: usize,
    pub label: String,
    pub selected: bool,
}

pub fn cluster_overview(result: &ClusterResult, selected: Option<&str>) -> Vec<ClusterSummary> {
    result
        .clusters
        .iter()
        .map(|(id, urls)| ClusterSummary {
            id: id.clone(),
            page_count: urls.len(),
            label: cluster_keywords(result, id.as_str()).join(", "),
            selected: selected == Some(id.as_str()),
        })
        .collect()
}

/// Language of the first page whose url equals `url`.
pub fn lang_of<'a>(pages: &'a [PageRecord], url: &str) -> Option<&'a str> {
    pages
        .iter()
        .find(|page| page.url == url)
        .map(|page| page.lang.as_str())
}

/// Distinct non-empty languages in order of first appearance.
pub fn language_options(pages: &[PageRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    pages
        .iter()
        .map(|page| page.lang.as_str())
        .filter(|lang| !lang.is_empty() && seen.insert(*lang))
        .map(ToOwned::to_owned)
        .collect()
}

/// Keeps links touching `language` (empty means any) with a similarity of
/// at least `min_similarity`.
pub fn filter_links<'a>(
    links: &'a [LinkSuggestion],
    pages: &[PageRecord],
    language: &str,
    min_similarity: f64,
) -> Vec<&'a LinkSuggestion> {
    links
        .iter()
        .filter(|link| {
            let lang_match = language.is_empty()
                || lang_of(pages, &link.source_url) == Some(language)
                || lang_of(pages, &link.target_url) == Some(language);
            lang_match && link.similarity >= min_similarity
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftStatus {
    Drift,
    Ok,
}

impl DriftStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DriftStatus::Drift => "Drift",
            DriftStatus::Ok => "OK",
        }
    }
}

pub fn classify_drift(similarity: f64, threshold: f64) -> DriftStatus {
    if similarity < threshold {
        DriftStatus::Drift
    } else {
        DriftStatus::Ok
    }
}

/// First `max_chars` characters of `text` followed by `...`.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    out
}

pub fn format_similarity(similarity: f64) -> String {
    format!("{similarity:.2}")
}
