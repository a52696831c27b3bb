use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use audit_core::{AnalysisOutcome, Effect, PageRecord, RequestId};
use audit_logging::{audit_debug, audit_error, audit_info, audit_warn};

use crate::client::{AuditService, ClientSettings, ReqwestAuditClient};
use crate::{EngineEvent, FailureKind, ServiceError};

/// Runs service requests on a background runtime and reports completions
/// over a channel, so the caller's loop never blocks on the network.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<Effect>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ServiceError> {
        let client = ReqwestAuditClient::new(settings)?;
        audit_info!("analysis service at {}", client.base_url());
        Ok(Self::with_service(Arc::new(client)))
    }

    pub fn with_service(service: Arc<dyn AuditService>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Effect>();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    audit_error!("engine runtime failed to start: {err}");
                    let error = ServiceError::new(FailureKind::Unavailable, err.to_string());
                    while let Ok(effect) = cmd_rx.recv() {
                        if let Some(event) = failure_event(effect, error.clone()) {
                            let _ = event_tx.send(event);
                        }
                    }
                    return;
                }
            };
            while let Ok(effect) = cmd_rx.recv() {
                let service = service.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    if let Some(event) = execute(service.as_ref(), effect).await {
                        let _ = event_tx.send(event);
                    }
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Queues a service-call effect. Returns false for effects that are not
    /// service calls; those are the caller's to carry out.
    pub fn submit(&self, effect: Effect) -> bool {
        let Some(request) = effect.request() else {
            return false;
        };
        audit_debug!(
            workflow: request.workflow,
            "submitting request {}",
            request.generation
        );
        if self.cmd_tx.send(effect).is_err() {
            audit_error!(workflow: request.workflow, "engine thread is gone");
            return false;
        }
        true
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn execute(service: &dyn AuditService, effect: Effect) -> Option<EngineEvent> {
    let event = match effect {
        Effect::Upload { request, path } => {
            audit_info!(workflow: request.workflow, "uploading {}", path.display());
            let result = service.upload(&path).await;
            ingest_completed(request, result)
        }
        Effect::FetchPages { request, urls } => {
            audit_info!(workflow: request.workflow, "fetching {} urls", urls.len());
            let result = service.fetch_pages(&urls).await;
            ingest_completed(request, result)
        }
        Effect::Cluster { request, pages } => {
            audit_info!(workflow: request.workflow, "clustering {} pages", pages.len());
            let result = service.cluster(&pages).await;
            analysis_completed(request, result.map(AnalysisOutcome::Clusters))
        }
        Effect::SuggestLinks {
            request,
            pages,
            params,
        } => {
            audit_info!(
                workflow: request.workflow,
                "requesting links for {} pages (max {} per page, same language only: {})",
                pages.len(),
                params.max_links_per_page,
                params.same_language_only
            );
            let result = service.suggest_links(&pages, params).await;
            analysis_completed(request, result.map(AnalysisOutcome::Links))
        }
        Effect::CheckLocalization { request, payload } => {
            audit_info!(
                workflow: request.workflow,
                "checking {} pairs at threshold {}",
                payload.originals.len(),
                payload.threshold
            );
            let result = service.check_localization(&payload).await;
            analysis_completed(request, result.map(AnalysisOutcome::Localization))
        }
        Effect::ScoreReadiness { request, pages } => {
            audit_info!(workflow: request.workflow, "scoring {} pages", pages.len());
            let result = service.score_readiness(&pages).await;
            analysis_completed(request, result.map(AnalysisOutcome::Readiness))
        }
        Effect::DeliverArtifact(_) => return None,
    };
    Some(event)
}

fn ingest_completed(
    request: RequestId,
    result: Result<Vec<PageRecord>, ServiceError>,
) -> EngineEvent {
    match &result {
        Ok(pages) => audit_info!(workflow: request.workflow, "received {} pages", pages.len()),
        Err(err) => audit_warn!(workflow: request.workflow, "ingest failed ({}): {}", err.kind, err),
    }
    EngineEvent::IngestCompleted { request, result }
}

fn analysis_completed(
    request: RequestId,
    result: Result<AnalysisOutcome, ServiceError>,
) -> EngineEvent {
    match &result {
        Ok(_) => audit_info!(workflow: request.workflow, "analysis {} completed", request.generation),
        Err(err) => audit_warn!(workflow: request.workflow, "analysis failed ({}): {}", err.kind, err),
    }
    EngineEvent::AnalysisCompleted { request, result }
}

fn failure_event(effect: Effect, error: ServiceError) -> Option<EngineEvent> {
    let request = effect.request()?;
    Some(match effect {
        Effect::Upload { .. } | Effect::FetchPages { .. } => EngineEvent::IngestCompleted {
            request,
            result: Err(error),
        },
        _ => EngineEvent::AnalysisCompleted {
            request,
            result: Err(error),
        },
    })
}
