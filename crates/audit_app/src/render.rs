//! Text rendering of the view model for the terminal.

use audit_core::{
    ClusteringView, EditablePageView, LinksView, LocalizationView, PageRowView, Phase,
    ReadinessView, WorkflowKind,
};

pub fn status_line(workflow: WorkflowKind, phase: Phase, error: Option<&str>) -> String {
    let phase = match phase {
        Phase::Empty => "no pages".to_string(),
        Phase::Ingesting => "loading pages".to_string(),
        Phase::Ready => "ready".to_string(),
        Phase::Analyzing => "analyzing".to_string(),
        Phase::Scored => "results available".to_string(),
        Phase::Failed { operation } => format!("{operation} failed"),
    };
    match error {
        Some(error) => format!("[{workflow}] {phase}: {error}"),
        None => format!("[{workflow}] {phase}"),
    }
}

pub fn pages(rows: &[PageRowView]) -> Vec<String> {
    let mut lines = vec![format!("Pages ({})", rows.len())];
    for row in rows {
        lines.push(format!("{:>4}  {:<5} {}", row.index, lang(&row.lang), row.url));
        lines.push(format!("            {}", row.content_preview));
    }
    lines
}

pub fn editable_pages(rows: &[EditablePageView]) -> Vec<String> {
    let mut lines = vec![format!("Pages under review ({})", rows.len())];
    for row in rows {
        lines.push(format!("{:>4}  {:<5} {}", row.index, lang(&row.lang), row.url));
        lines.extend(row.content.lines().map(|line| format!("        | {line}")));
    }
    lines
}

pub fn clustering(view: &ClusteringView) -> Vec<String> {
    let mut lines = vec![format!("Clusters ({})", view.clusters.len())];
    for cluster in &view.clusters {
        let marker = if cluster.selected { '*' } else { ' ' };
        lines.push(format!(
            "{marker} {:<6} {:>4} pages  {}",
            cluster.id.as_str(),
            cluster.page_count,
            cluster.label
        ));
    }

    if let Some(selected) = &view.selected_cluster {
        lines.push(String::new());
        lines.push(format!("Pages in cluster {selected}"));
        for member in &view.members {
            lines.push(format!("  {:<5} {}", lang(&member.lang), member.url));
            lines.push(format!("        {}", member.content_preview));
        }
    } else if !view.keywords.is_empty() {
        lines.push(String::new());
        lines.push("Keywords".to_string());
        for (id, keywords) in &view.keywords {
            lines.push(format!("  {:<6} {}", id.as_str(), keywords.join(", ")));
        }
    }
    lines
}

pub fn links(view: &LinksView) -> Vec<String> {
    let language = if view.selected_language.is_empty() {
        "all"
    } else {
        view.selected_language.as_str()
    };
    let mut lines = vec![format!(
        "Showing {} of {} links (language: {}, min similarity {:.2})",
        view.rows.len(),
        view.total_links,
        language,
        view.min_similarity
    )];
    if !view.languages.is_empty() {
        lines.push(format!("Languages: {}", view.languages.join(", ")));
    }
    for row in &view.rows {
        lines.push(format!(
            "  {}  {} -> {}  \"{}\"  same language: {}",
            row.similarity, row.source_url, row.target_url, row.anchor_text, row.same_language
        ));
    }
    lines
}

pub fn localization(view: &LocalizationView) -> Vec<String> {
    let mut lines = vec![format!(
        "Localization drift at threshold {:.2} ({} pairs)",
        view.threshold,
        view.rows.len()
    )];
    for row in &view.rows {
        lines.push(format!(
            "  {:<5} {}  {} -> {}",
            row.status.as_str(),
            row.similarity,
            row.original_url,
            row.translation_url
        ));
        lines.push(format!("        original:    {}", row.original_preview));
        lines.push(format!("        translation: {}", row.translation_preview));
    }
    lines
}

pub fn readiness(view: &ReadinessView) -> Vec<String> {
    let mut lines = vec![format!("AI readiness ({} pages)", view.rows.len())];
    for (position, row) in view.rows.iter().enumerate() {
        lines.push(format!("{:>4}  {}  score {}", position, row.url, row.score));
        lines.push(format!("        summary similarity: {}", row.summary_similarity));
        lines.push(format!("        missing headers:    {}", row.missing_headers));
        lines.push(format!("        summary:            {}", row.llm_summary));
        for suggestion in &row.suggestions {
            lines.push(format!("        - {suggestion}"));
        }
        if let Some(content) = &row.full_content {
            lines.push("        content:".to_string());
            lines.extend(content.lines().map(|line| format!("        | {line}")));
        }
    }
    lines
}

fn lang(lang: &str) -> &str {
    if lang.is_empty() {
        audit_core::PLACEHOLDER
    } else {
        lang
    }
}

#[cfg(test)]
mod tests {
    use audit_core::{DriftStatus, LocalizationRowView, Operation, ReadinessRowView};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_shows_failed_operation_and_message() {
        assert_eq!(
            status_line(
                WorkflowKind::Localization,
                Phase::Failed {
                    operation: Operation::Analyze
                },
                Some("Check failed"),
            ),
            "[localization] analyze failed: Check failed"
        );
        assert_eq!(
            status_line(WorkflowKind::Clustering, Phase::Ready, None),
            "[clustering] ready"
        );
    }

    #[test]
    fn localization_rows_show_status_and_previews() {
        let view = LocalizationView {
            threshold: 0.7,
            rows: vec![LocalizationRowView {
                original_url: "https://a.example/en".into(),
                translation_url: "https://a.example/de".into(),
                similarity: "0.65".into(),
                status: DriftStatus::Drift,
                original_preview: "Hello...".into(),
                translation_preview: "Hallo...".into(),
            }],
            ..LocalizationView::default()
        };

        assert_eq!(
            localization(&view),
            vec![
                "Localization drift at threshold 0.70 (1 pairs)",
                "  Drift 0.65  https://a.example/en -> https://a.example/de",
                "        original:    Hello...",
                "        translation: Hallo...",
            ]
        );
    }

    #[test]
    fn expanded_readiness_row_prints_content() {
        let view = ReadinessView {
            rows: vec![ReadinessRowView {
                index: 0,
                url: "https://a.example".into(),
                score: "80".into(),
                summary_similarity: "-".into(),
                missing_headers: "h2".into(),
                llm_summary: "-".into(),
                suggestions: vec!["Add a summary".into()],
                expanded: true,
                full_content: Some("line one\nline two".into()),
            }],
            ..ReadinessView::default()
        };

        let lines = readiness(&view);
        assert_eq!(lines[1], "   0  https://a.example  score 80");
        assert!(lines.contains(&"        - Add a summary".to_string()));
        assert_eq!(
            &lines[lines.len() - 2..],
            &["        | line one".to_string(), "        | line two".to_string()]
        );
    }
}
