//! Container runtime abstraction
//!
//! Provides a trait for container execution that can be implemented by
//! different engines (podman, docker) or by in-memory stubs in tests.

use crate::error::DaggersResult;
use crate::orchestration::spec::ContainerSpec;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Captured result of one container execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecOutput {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Abstract container runtime interface
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Ensure the runtime can execute containers
    async fn ensure_ready(&self) -> DaggersResult<()>;

    /// Run `args` in a fresh container described by `spec` and capture its output
    ///
    /// A non-zero exit is reported through [`ExecOutput::exit_code`], not as
    /// an error. When `cancel` fires the call returns
    /// [`DaggersError::Cancelled`](crate::error::DaggersError::Cancelled)
    /// promptly.
    async fn exec(
        &self,
        spec: &ContainerSpec,
        args: &[String],
        cancel: &CancellationToken,
    ) -> DaggersResult<ExecOutput>;

    /// Release any client resources held by the runtime
    async fn close(&self) -> DaggersResult<()> {
        Ok(())
    }

    /// Get the human-readable runtime name for display
    fn runtime_name(&self) -> &'static str;
}
