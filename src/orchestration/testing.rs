//! Scripted in-memory runtime for tests

use crate::error::{DaggersError, DaggersResult};
use crate::orchestration::runtime::{ContainerRuntime, ExecOutput};
use crate::orchestration::spec::ContainerSpec;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Replays queued results and records every execution it receives
#[derive(Default)]
pub(crate) struct ScriptedRuntime {
    responses: Mutex<VecDeque<DaggersResult<ExecOutput>>>,
    calls: Mutex<Vec<(ContainerSpec, Vec<String>)>>,
    closed: AtomicBool,
}

impl ScriptedRuntime {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a successful execution printing `stdout`
    pub(crate) fn respond_stdout(self, stdout: &str) -> Self {
        self.respond(Ok(ExecOutput {
            stdout: stdout.to_string(),
            ..ExecOutput::default()
        }))
    }

    /// Queue an arbitrary result
    pub(crate) fn respond(self, result: DaggersResult<ExecOutput>) -> Self {
        self.responses.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(ContainerSpec, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContainerRuntime for ScriptedRuntime {
    async fn ensure_ready(&self) -> DaggersResult<()> {
        Ok(())
    }

    async fn exec(
        &self,
        spec: &ContainerSpec,
        args: &[String],
        _cancel: &CancellationToken,
    ) -> DaggersResult<ExecOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((spec.clone(), args.to_vec()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DaggersError::Internal("no scripted response".to_string())))
    }

    async fn close(&self) -> DaggersResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn runtime_name(&self) -> &'static str {
        "Scripted"
    }
}

/// Write an executable shell script standing in for the engine binary
#[cfg(unix)]
pub(crate) fn fake_engine(dir: &tempfile::TempDir, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join("fake-engine");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}
