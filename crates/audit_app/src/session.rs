use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::bail;
use audit_core::{update, AuditState, AuditViewModel, Msg, WorkflowKind};
use audit_logging::{audit_debug, audit_warn};

use crate::effects::EffectRunner;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the audit state and feeds it messages, one at a time.
pub struct Session {
    state: AuditState,
    runner: EffectRunner,
    wait_limit: Duration,
    exported: Vec<PathBuf>,
}

impl Session {
    pub fn new(runner: EffectRunner, wait_limit: Duration) -> Self {
        Self {
            state: AuditState::new(),
            runner,
            wait_limit,
            exported: Vec::new(),
        }
    }

    pub fn state(&self) -> &AuditState {
        &self.state
    }

    pub fn view(&self) -> AuditViewModel {
        self.state.view()
    }

    /// Artifacts delivered since the last call.
    pub fn take_exported(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.exported)
    }

    pub fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            audit_debug!("state changed, {} effects", effects.len());
        }
        self.state = state;
        let delivered = self.runner.run(effects)?;
        self.exported.extend(delivered);
        Ok(())
    }

    /// Dispatches `msg`, then applies engine completions until `workflow` is
    /// no longer busy.
    pub fn dispatch_and_wait(&mut self, workflow: WorkflowKind, msg: Msg) -> anyhow::Result<()> {
        self.dispatch(msg)?;
        self.wait_idle(workflow)
    }

    /// Runs an upload or fetch message to completion and returns the number
    /// of pages loaded.
    pub fn ingest(&mut self, workflow: WorkflowKind, msg: Msg) -> anyhow::Result<usize> {
        self.dispatch(msg)?;
        let submitted = self.state.phase(workflow).is_busy();
        self.wait_idle(workflow)?;
        self.ensure_ok(workflow)?;
        if !submitted {
            bail!("no http(s) URLs to fetch");
        }
        let loaded = self.state.pages(workflow).map_or(0, |pages| pages.len());
        if loaded == 0 {
            bail!("{workflow}: the service returned no pages");
        }
        Ok(loaded)
    }

    fn wait_idle(&mut self, workflow: WorkflowKind) -> anyhow::Result<()> {
        let started = Instant::now();
        while self.state.phase(workflow).is_busy() {
            if started.elapsed() > self.wait_limit {
                audit_warn!(workflow: workflow, "gave up after {:?}", self.wait_limit);
                bail!("timed out waiting for the {workflow} workflow");
            }
            if let Some(msg) = self.runner.next_msg(POLL_INTERVAL) {
                self.dispatch(msg)?;
            }
        }
        Ok(())
    }

    /// Fails with the workflow's current error, if any.
    pub fn ensure_ok(&self, workflow: WorkflowKind) -> anyhow::Result<()> {
        match self.state.error(workflow) {
            Some(error) => bail!("{workflow}: {error}"),
            None => Ok(()),
        }
    }
}
