//! CSV serializers, one fixed schema per workflow.
//!
//! Rows are joined with `\n` after a header line, with no trailing newline.
//! Columns the schema always quotes are quoted unconditionally; every other
//! column is quoted only when it contains a separator, quote or line break.
//! Embedded quotes are doubled in both cases.

use std::borrow::Cow;

use crate::views::{classify_drift, cluster_keywords, preview};
use crate::{AlignedLocalization, ClusterResult, ExportError, LinkSuggestion};

pub const CSV_MIME: &str = "text/csv";
pub const CLUSTERS_CSV: &str = "clusters.csv";
pub const INTERNAL_LINKS_CSV: &str = "internal_links.csv";
pub const LOCALIZATION_CSV: &str = "localization_consistency.csv";

const CLUSTERS_HEADER: &str = "cluster_id,url,lang,keywords";
const LINKS_HEADER: &str = "source_url,target_url,anchor_text,similarity,same_language";
const LOCALIZATION_HEADER: &str = "original_url,translation_url,similarity,drift,original_text_preview,translation_text_preview";
const CSV_PREVIEW_CHARS: usize = 80;

/// A ready-to-deliver CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvArtifact {
    pub filename: &'static str,
    pub mime: &'static str,
    pub body: String,
}

impl CsvArtifact {
    fn new(filename: &'static str, header: &str, rows: Vec<String>) -> Result<Self, ExportError> {
        if rows.is_empty() {
            return Err(ExportError::Empty);
        }
        let mut body = String::from(header);
        body.push('\n');
        body.push_str(&rows.join("\n"));
        Ok(Self {
            filename,
            mime: CSV_MIME,
            body,
        })
    }
}

/// One row per clustered page with its cluster's space-joined keywords.
pub fn export_clusters(result: &ClusterResult) -> Result<CsvArtifact, ExportError> {
    let rows = result
        .clustered_pages
        .iter()
        .map(|page| {
            let keywords = cluster_keywords(result, page.cluster.as_str()).join(" ");
            format!(
                "{},{},{},{}",
                field(page.cluster.as_str()),
                field(&page.url),
                field(&page.lang),
                quoted(&keywords)
            )
        })
        .collect();
    CsvArtifact::new(CLUSTERS_CSV, CLUSTERS_HEADER, rows)
}

/// Exports the given (usually filtered) links in iteration order.
pub fn export_links<'a, I>(links: I) -> Result<CsvArtifact, ExportError>
where
    I: IntoIterator<Item = &'a LinkSuggestion>,
{
    let rows = links
        .into_iter()
        .map(|link| {
            format!(
                "{},{},{},{},{}",
                field(&link.source_url),
                field(&link.target_url),
                quoted(&link.anchor_text),
                link.similarity,
                if link.same_language { "Yes" } else { "No" }
            )
        })
        .collect();
    CsvArtifact::new(INTERNAL_LINKS_CSV, LINKS_HEADER, rows)
}

/// Drift is classified against `threshold`, the value in effect at export time.
pub fn export_localization(
    rows: &[AlignedLocalization],
    threshold: f64,
) -> Result<CsvArtifact, ExportError> {
    let rows = rows
        .iter()
        .map(|row| {
            format!(
                "{},{},{},{},{},{}",
                quoted(&row.pair.original),
                quoted(&row.pair.translation),
                row.result.similarity,
                classify_drift(row.result.similarity, threshold).as_str(),
                quoted(&preview(&row.result.original, CSV_PREVIEW_CHARS)),
                quoted(&preview(&row.result.translation, CSV_PREVIEW_CHARS))
            )
        })
        .collect();
    CsvArtifact::new(LOCALIZATION_CSV, LOCALIZATION_HEADER, rows)
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn field(value: &str) -> Cow<'_, str> {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        Cow::Owned(quoted(value))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{field, quoted};

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quoted(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(quoted(""), r#""""#);
    }

    #[test]
    fn plain_fields_are_left_alone() {
        assert_eq!(field("https://example.com/a"), "https://example.com/a");
        assert_eq!(field("a,b"), "\"a,b\"");
        assert_eq!(field("line\nbreak"), "\"line\nbreak\"");
    }
}
