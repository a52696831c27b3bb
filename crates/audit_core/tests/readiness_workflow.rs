use std::sync::Once;

use audit_core::{
    update, AiReadinessResult, AnalysisOutcome, AuditState, Effect, Msg, PageRecord, Phase,
    RequestFailure, WorkflowKind,
};
use pretty_assertions::assert_eq;

const WORKFLOW: WorkflowKind = WorkflowKind::AiReadiness;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(audit_logging::initialize_for_tests);
}

fn ingested() -> AuditState {
    let (state, effects) = update(
        AuditState::new(),
        Msg::UrlsSubmitted {
            workflow: WORKFLOW,
            urls: vec!["https://a.example".into(), "https://b.example".into()],
        },
    );
    let request = effects[0].request().expect("fetch issued");
    update(
        state,
        Msg::IngestCompleted {
            request,
            result: Ok(vec![
                PageRecord::new("https://a.example", "en", "Alpha page"),
                PageRecord::new("https://b.example", "en", ""),
            ]),
        },
    )
    .0
}

fn score(url: &str) -> AiReadinessResult {
    AiReadinessResult {
        url: url.to_string(),
        score: 72.5,
        summary_similarity: None,
        missing_headers: Vec::new(),
        llm_summary: None,
        suggestions: vec!["Add an FAQ section".into()],
    }
}

fn scored(state: AuditState, rows: Vec<AiReadinessResult>) -> AuditState {
    let (state, effects) = update(state, Msg::AnalyzeClicked { workflow: WORKFLOW });
    let request = effects[0].request().expect("scoring issued");
    update(
        state,
        Msg::AnalysisCompleted {
            request,
            result: Ok(AnalysisOutcome::Readiness(rows)),
        },
    )
    .0
}

#[test]
fn edits_before_scoring_are_submitted() {
    init_logging();
    let state = ingested();
    assert!(state.view().readiness.reviewing);

    let (state, _) = update(
        state,
        Msg::ContentEdited {
            workflow: WORKFLOW,
            index: 1,
            content: "Beta page".into(),
        },
    );
    let (_, effects) = update(state, Msg::AnalyzeClicked { workflow: WORKFLOW });

    match &effects[..] {
        [Effect::ScoreReadiness { pages, .. }] => {
            assert_eq!(pages[1].content, "Beta page");
            assert_eq!(pages[0].content, "Alpha page");
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn out_of_range_edit_is_ignored() {
    init_logging();
    let mut state = ingested();
    state.consume_dirty();
    let (mut next, _) = update(
        state.clone(),
        Msg::ContentEdited {
            workflow: WORKFLOW,
            index: 7,
            content: "nowhere".into(),
        },
    );

    assert!(!next.consume_dirty());
    assert_eq!(next, state);
}

#[test]
fn analyze_without_pages_is_rejected() {
    init_logging();
    let (state, effects) = update(AuditState::new(), Msg::AnalyzeClicked { workflow: WORKFLOW });

    assert!(effects.is_empty());
    assert_eq!(state.error(WORKFLOW), Some("no pages loaded"));
}

#[test]
fn scores_render_placeholders_for_missing_values() {
    init_logging();
    let state = scored(
        ingested(),
        vec![
            score("https://a.example"),
            AiReadinessResult {
                summary_similarity: Some(0.456),
                missing_headers: vec!["h1".into(), "h2".into()],
                llm_summary: Some("A short summary".into()),
                ..score("https://b.example")
            },
        ],
    );
    let view = state.view().readiness;

    assert_eq!(state.phase(WORKFLOW), Phase::Scored);
    assert!(!view.reviewing);
    assert!(view.pages.is_empty());
    assert_eq!(view.rows[0].score, "72.5");
    assert_eq!(view.rows[0].summary_similarity, "-");
    assert_eq!(view.rows[0].missing_headers, "-");
    assert_eq!(view.rows[0].llm_summary, "-");
    assert_eq!(view.rows[1].summary_similarity, "0.46");
    assert_eq!(view.rows[1].missing_headers, "h1, h2");
    assert_eq!(view.rows[1].llm_summary, "A short summary");
    assert_eq!(view.rows[1].suggestions, vec!["Add an FAQ section"]);
}

#[test]
fn toggling_a_row_shows_its_page_content() {
    init_logging();
    let state = scored(
        ingested(),
        vec![score("https://a.example"), score("https://b.example")],
    );

    let (state, _) = update(state, Msg::ContentToggled(0));
    let rows = state.view().readiness.rows;
    assert!(rows[0].expanded);
    assert_eq!(rows[0].full_content.as_deref(), Some("Alpha page"));
    assert_eq!(rows[1].full_content, None);

    let (state, _) = update(state, Msg::ContentToggled(1));
    let rows = state.view().readiness.rows;
    assert!(!rows[0].expanded);
    assert_eq!(rows[1].full_content.as_deref(), Some("-"));

    let (state, _) = update(state, Msg::ContentToggled(1));
    assert!(state.view().readiness.rows.iter().all(|row| !row.expanded));
}

#[test]
fn misaligned_scores_are_rejected() {
    init_logging();
    let state = scored(ingested(), vec![score("https://a.example")]);

    assert!(state.readiness().scores().is_empty());
    assert_eq!(state.error(WORKFLOW), Some("expected 2 results, received 1"));
}

#[test]
fn failed_scoring_uses_fallback_message() {
    init_logging();
    let (state, effects) = update(ingested(), Msg::AnalyzeClicked { workflow: WORKFLOW });
    let request = effects[0].request().expect("scoring issued");
    let (state, _) = update(
        state,
        Msg::AnalysisCompleted {
            request,
            result: Err(RequestFailure::new("")),
        },
    );

    assert_eq!(state.error(WORKFLOW), Some("Failed to get AI readiness scores"));
    assert_eq!(state.readiness().pages().len(), 2);
}

#[test]
fn wrong_outcome_kind_is_a_failure() {
    init_logging();
    let (state, effects) = update(ingested(), Msg::AnalyzeClicked { workflow: WORKFLOW });
    let request = effects[0].request().expect("scoring issued");
    let (state, _) = update(
        state,
        Msg::AnalysisCompleted {
            request,
            result: Ok(AnalysisOutcome::Links(Vec::new())),
        },
    );

    assert_eq!(
        state.error(WORKFLOW),
        Some("unexpected internal-links response for the ai-readiness workflow")
    );
}

#[test]
fn readiness_has_no_csv_export() {
    init_logging();
    let state = scored(
        ingested(),
        vec![score("https://a.example"), score("https://b.example")],
    );
    let (_, effects) = update(state, Msg::ExportClicked { workflow: WORKFLOW });
    assert!(effects.is_empty());
}
