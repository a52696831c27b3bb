use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use audit_core::{Effect, Msg, RequestFailure};
use audit_engine::{ArtifactWriter, EngineEvent, EngineHandle};
use audit_logging::{audit_info, audit_warn};

/// Carries out the effects returned by `update`: service calls go to the
/// engine, artifacts are written to the output directory.
pub struct EffectRunner {
    engine: EngineHandle,
    writer: ArtifactWriter,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, writer: ArtifactWriter) -> Self {
        Self { engine, writer }
    }

    /// Runs `effects` in order and returns the paths of delivered artifacts.
    pub fn run(&self, effects: Vec<Effect>) -> anyhow::Result<Vec<PathBuf>> {
        let mut delivered = Vec::new();
        for effect in effects {
            match effect {
                Effect::DeliverArtifact(artifact) => {
                    let path = self.writer.deliver(&artifact).with_context(|| {
                        format!(
                            "writing {} to {}",
                            artifact.filename,
                            self.writer.dir().display()
                        )
                    })?;
                    audit_info!("Exported {} ({} bytes)", path.display(), artifact.body.len());
                    delivered.push(path);
                }
                effect => {
                    if !self.engine.submit(effect) {
                        audit_warn!("Engine rejected a request; it will not complete");
                    }
                }
            }
        }
        Ok(delivered)
    }

    /// Waits up to `timeout` for the next engine completion.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(event_to_msg)
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::IngestCompleted { request, result } => Msg::IngestCompleted {
            request,
            result: result.map_err(RequestFailure::from),
        },
        EngineEvent::AnalysisCompleted { request, result } => Msg::AnalysisCompleted {
            request,
            result: result.map_err(RequestFailure::from),
        },
    }
}
