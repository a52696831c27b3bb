use crate::{
    export_clusters, export_links, export_localization, AuditState, CsvArtifact, Effect, Msg,
    WorkflowKind,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AuditState, msg: Msg) -> (AuditState, Vec<Effect>) {
    let mut effects = Vec::new();
    let changed = match msg {
        Msg::FileSelected { workflow, path } => state
            .intake_mut(workflow)
            .is_some_and(|flow| flow.select_file(path)),
        Msg::UploadClicked { workflow } => match state.intake_mut(workflow) {
            Some(flow) => {
                // A missing file is recorded as a failure, so state changes either way.
                if let Some((request, path)) = flow.begin_upload() {
                    effects.push(Effect::Upload { request, path });
                }
                true
            }
            None => false,
        },
        Msg::UrlsSubmitted { workflow, urls } => {
            match state
                .intake_mut(workflow)
                .and_then(|flow| flow.begin_fetch(urls))
            {
                Some((request, urls)) => {
                    effects.push(Effect::FetchPages { request, urls });
                    true
                }
                None => false,
            }
        }
        Msg::IngestCompleted { request, result } => state
            .intake_mut(request.workflow)
            .is_some_and(|flow| flow.complete_ingest(request, result)),
        Msg::ContentEdited {
            workflow,
            index,
            content,
        } => state
            .intake_mut(workflow)
            .is_some_and(|flow| flow.edit_content(index, content).is_ok()),
        Msg::AnalyzeClicked { workflow } => {
            effects.extend(begin_analysis(&mut state, workflow));
            true
        }
        Msg::AnalysisCompleted { request, result } => match request.workflow {
            WorkflowKind::Clustering => state.clustering_mut().complete_analyze(request, result),
            WorkflowKind::InternalLinks => state.links_mut().complete_analyze(request, result),
            WorkflowKind::Localization => state.localization_mut().complete_check(request, result),
            WorkflowKind::AiReadiness => state.readiness_mut().complete_analyze(request, result),
        },
        Msg::ClusterSelected(cluster) => state.clustering_mut().select_cluster(cluster),
        Msg::LanguageSelected(language) => state.links_mut().select_language(language),
        Msg::MinSimilarityChanged(value) => state.links_mut().set_min_similarity(value),
        Msg::LinkParamsChanged(params) => state.links_mut().set_params(params),
        Msg::PairAdded => {
            state.localization_mut().add_pair();
            true
        }
        Msg::PairRemoved(index) => state.localization_mut().remove_pair(index),
        Msg::PairEdited {
            index,
            field,
            value,
        } => state.localization_mut().edit_pair(index, field, value),
        Msg::ThresholdChanged(value) => state.localization_mut().set_threshold(value),
        Msg::ContentToggled(index) => state.readiness_mut().toggle_content(index),
        Msg::ExportClicked { workflow } => {
            effects.extend(export_artifact(&state, workflow).map(Effect::DeliverArtifact));
            false
        }
        Msg::NoOp => false,
    };

    if changed {
        state.mark_dirty();
    }
    (state, effects)
}

/// Splits a multi-line URL input box into entries, one per line.
pub fn split_url_input(raw: &str) -> Vec<String> {
    raw.lines().map(ToOwned::to_owned).collect()
}

fn begin_analysis(state: &mut AuditState, workflow: WorkflowKind) -> Option<Effect> {
    match workflow {
        WorkflowKind::Clustering => state
            .clustering_mut()
            .begin_analyze()
            .map(|(request, pages)| Effect::Cluster { request, pages }),
        WorkflowKind::InternalLinks => {
            state
                .links_mut()
                .begin_analyze()
                .map(|(request, pages, params)| Effect::SuggestLinks {
                    request,
                    pages,
                    params,
                })
        }
        WorkflowKind::Localization => state
            .localization_mut()
            .begin_check()
            .map(|(request, payload)| Effect::CheckLocalization { request, payload }),
        WorkflowKind::AiReadiness => state
            .readiness_mut()
            .begin_analyze()
            .map(|(request, pages)| Effect::ScoreReadiness { request, pages }),
    }
}

/// Serializes the workflow's exportable view. Empty views and workflows
/// without a CSV schema produce nothing.
fn export_artifact(state: &AuditState, workflow: WorkflowKind) -> Option<CsvArtifact> {
    match workflow {
        WorkflowKind::Clustering => state
            .clustering()
            .result()
            .and_then(|result| export_clusters(result).ok()),
        WorkflowKind::InternalLinks => export_links(state.links().filtered()).ok(),
        WorkflowKind::Localization => {
            let localization = state.localization();
            export_localization(localization.results(), localization.threshold()).ok()
        }
        WorkflowKind::AiReadiness => None,
    }
}
