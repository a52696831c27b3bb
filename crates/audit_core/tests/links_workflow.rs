use std::sync::Once;

use audit_core::{
    update, AnalysisOutcome, AuditState, Effect, LinkRequestParams, LinkSuggestion, Msg,
    PageRecord, WorkflowKind,
};
use pretty_assertions::assert_eq;

const WORKFLOW: WorkflowKind = WorkflowKind::InternalLinks;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(audit_logging::initialize_for_tests);
}

fn link(source: &str, target: &str, similarity: f64) -> LinkSuggestion {
    LinkSuggestion {
        source_url: source.to_string(),
        target_url: target.to_string(),
        anchor_text: format!("to {target}"),
        similarity,
        same_language: false,
    }
}

fn site() -> Vec<PageRecord> {
    vec![
        PageRecord::new("https://a.example", "en", "english"),
        PageRecord::new("https://b.example", "de", "deutsch"),
        PageRecord::new("https://c.example", "fr", "francais"),
        PageRecord::new("https://d.example", "en", "more english"),
    ]
}

/// Ingests `pages`, requests links and completes the request with `links`.
fn with_links(pages: Vec<PageRecord>, links: Vec<LinkSuggestion>) -> AuditState {
    let (state, effects) = update(
        AuditState::new(),
        Msg::UrlsSubmitted {
            workflow: WORKFLOW,
            urls: pages.iter().map(|page| page.url.clone()).collect(),
        },
    );
    let request = effects[0].request().expect("fetch issued");
    let (state, _) = update(
        state,
        Msg::IngestCompleted {
            request,
            result: Ok(pages),
        },
    );
    let (state, effects) = update(state, Msg::AnalyzeClicked { workflow: WORKFLOW });
    let request = effects[0].request().expect("links requested");
    let (state, _) = update(
        state,
        Msg::AnalysisCompleted {
            request,
            result: Ok(AnalysisOutcome::Links(links)),
        },
    );
    state
}

fn visible(state: &AuditState) -> Vec<(String, String)> {
    state
        .links()
        .filtered()
        .into_iter()
        .map(|link| (link.source_url.clone(), link.target_url.clone()))
        .collect()
}

fn pair(source: &str, target: &str) -> (String, String) {
    (source.to_string(), target.to_string())
}

#[test]
fn analyze_sends_snapshot_and_params() {
    init_logging();
    let state = with_links(site(), Vec::new());
    let params = LinkRequestParams {
        max_links_per_page: 5,
        same_language_only: true,
    };
    let (state, _) = update(state, Msg::LinkParamsChanged(params));
    let (_, effects) = update(state, Msg::AnalyzeClicked { workflow: WORKFLOW });

    match &effects[..] {
        [Effect::SuggestLinks {
            pages, params: sent, ..
        }] => {
            assert_eq!(pages, &site());
            assert_eq!(*sent, params);
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn raising_min_similarity_never_adds_links() {
    init_logging();
    let state = with_links(
        site(),
        vec![
            link("https://a.example", "https://b.example", 0.95),
            link("https://b.example", "https://c.example", 0.8),
            link("https://c.example", "https://d.example", 0.65),
            link("https://d.example", "https://a.example", 0.55),
        ],
    );

    let mut counts = Vec::new();
    let mut state = state;
    for threshold in [0.5, 0.7, 0.9] {
        let (next, effects) = update(state, Msg::MinSimilarityChanged(threshold));
        assert!(effects.is_empty());
        counts.push(next.links().filtered().len());
        state = next;
    }

    assert_eq!(counts, vec![4, 2, 1]);
    assert_eq!(state.links().links().len(), 4);
}

#[test]
fn link_at_the_minimum_similarity_is_kept() {
    init_logging();
    let state = with_links(
        site(),
        vec![
            link("https://a.example", "https://b.example", 0.5),
            link("https://b.example", "https://c.example", 0.7),
            link("https://c.example", "https://d.example", 0.9),
        ],
    );
    let (state, _) = update(state, Msg::MinSimilarityChanged(0.7));

    let kept: Vec<f64> = state
        .links()
        .filtered()
        .iter()
        .map(|link| link.similarity)
        .collect();
    assert_eq!(kept, vec![0.7, 0.9]);
}

#[test]
fn language_filter_matches_either_end_of_a_link() {
    init_logging();
    let state = with_links(
        site(),
        vec![
            link("https://a.example", "https://b.example", 0.9),
            link("https://b.example", "https://c.example", 0.9),
            link("https://c.example", "https://a.example", 0.9),
        ],
    );
    assert_eq!(state.links().languages(), vec!["en", "de", "fr"]);

    let (state, _) = update(state, Msg::LanguageSelected("de".into()));
    assert_eq!(
        visible(&state),
        vec![
            pair("https://a.example", "https://b.example"),
            pair("https://b.example", "https://c.example"),
        ]
    );

    let (state, _) = update(state, Msg::LanguageSelected("fr".into()));
    assert_eq!(
        visible(&state),
        vec![
            pair("https://b.example", "https://c.example"),
            pair("https://c.example", "https://a.example"),
        ]
    );

    let (state, _) = update(state, Msg::LanguageSelected("en".into()));
    assert_eq!(
        visible(&state),
        vec![
            pair("https://a.example", "https://b.example"),
            pair("https://c.example", "https://a.example"),
        ]
    );

    let (state, _) = update(state, Msg::LanguageSelected(String::new()));
    assert_eq!(visible(&state).len(), 3);
}

#[test]
fn links_to_unknown_pages_only_pass_the_any_language_filter() {
    init_logging();
    let state = with_links(
        site(),
        vec![link("https://x.example", "https://y.example", 0.9)],
    );
    assert_eq!(visible(&state).len(), 1);

    let (state, _) = update(state, Msg::LanguageSelected("en".into()));
    assert!(visible(&state).is_empty());
}

#[test]
fn export_writes_filtered_links_in_service_order() {
    init_logging();
    let state = with_links(
        site(),
        vec![
            LinkSuggestion {
                source_url: "https://a.example/x".into(),
                target_url: "https://b.example/y".into(),
                anchor_text: r#"Read "more""#.into(),
                similarity: 0.8123,
                same_language: true,
            },
            link("https://a.example", "https://c.example", 0.4),
            LinkSuggestion {
                source_url: "https://b.example/y".into(),
                target_url: "https://a.example/x,1".into(),
                anchor_text: "Back".into(),
                similarity: 0.75,
                same_language: false,
            },
        ],
    );
    let (_, effects) = update(state, Msg::ExportClicked { workflow: WORKFLOW });

    match &effects[..] {
        [Effect::DeliverArtifact(artifact)] => {
            assert_eq!(artifact.filename, "internal_links.csv");
            assert_eq!(artifact.mime, "text/csv");
            assert_eq!(
                artifact.body,
                "source_url,target_url,anchor_text,similarity,same_language\n\
                 https://a.example/x,https://b.example/y,\"Read \"\"more\"\"\",0.8123,Yes\n\
                 https://b.example/y,\"https://a.example/x,1\",\"Back\",0.75,No"
            );
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn export_of_empty_filter_emits_nothing() {
    init_logging();
    let state = with_links(
        site(),
        vec![link("https://a.example", "https://b.example", 0.3)],
    );
    let (_, effects) = update(state, Msg::ExportClicked { workflow: WORKFLOW });
    assert!(effects.is_empty());
}

#[test]
fn view_formats_similarity_with_two_decimals() {
    init_logging();
    let state = with_links(
        site(),
        vec![link("https://a.example", "https://b.example", 0.87654)],
    );
    let view = state.view().links;

    assert_eq!(view.total_links, 1);
    assert_eq!(view.rows[0].similarity, "0.88");
    assert_eq!(view.rows[0].same_language, "No");
    assert!(view.can_export);
}
