//! Runtime handle
//!
//! A [`Runtime`] pairs a container backend with the working directory the
//! tools operate on. It is created once per invocation and released with
//! [`Runtime::close`].

use crate::error::{DaggersError, DaggersResult};
use crate::options::{init_config, option, ConfigOption};
use crate::orchestration::error_output;
use crate::orchestration::podman::PodmanRuntime;
use crate::orchestration::runtime::{ContainerRuntime, ExecOutput};
use crate::orchestration::spec::ContainerSpec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Settings used by [`Runtime::connect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Engine binary (podman, docker)
    pub engine: String,
    /// Host directory mounted into tool containers
    pub workdir: PathBuf,
    /// Forward container stderr to the log
    pub verbose: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            engine: "podman".to_string(),
            workdir: PathBuf::from("."),
            verbose: false,
        }
    }
}

/// Select the engine binary
pub fn with_engine(engine: impl Into<String>) -> ConfigOption<RuntimeOptions> {
    let engine = engine.into();
    option(move |mut opts: RuntimeOptions| {
        if engine.trim().is_empty() {
            return Err(DaggersError::invalid_option("engine", "must not be empty"));
        }
        opts.engine = engine.clone();
        Ok(opts)
    })
}

/// Select the host working directory
pub fn with_workdir(path: impl Into<PathBuf>) -> ConfigOption<RuntimeOptions> {
    let path = path.into();
    option(move |mut opts: RuntimeOptions| {
        opts.workdir = path.clone();
        Ok(opts)
    })
}

/// Toggle verbose container output
pub fn with_verbose(verbose: bool) -> ConfigOption<RuntimeOptions> {
    option(move |mut opts: RuntimeOptions| {
        opts.verbose = verbose;
        Ok(opts)
    })
}

/// Scoped handle on a container backend plus working directory
pub struct Runtime {
    backend: Arc<dyn ContainerRuntime>,
    workdir: PathBuf,
    closed: bool,
}

impl Runtime {
    /// Wrap an existing backend
    pub fn new(backend: Arc<dyn ContainerRuntime>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            workdir: workdir.into(),
            closed: false,
        }
    }

    /// Build the engine backend from `options` and check that it is usable
    pub async fn connect(options: &[ConfigOption<RuntimeOptions>]) -> DaggersResult<Self> {
        let opts = init_config(options)?;

        let workdir = opts.workdir.canonicalize().map_err(|e| {
            DaggersError::io(format!("resolving workdir {}", opts.workdir.display()), e)
        })?;

        let backend = PodmanRuntime::new(opts.engine).with_verbose(opts.verbose);
        backend.ensure_ready().await?;

        info!(
            "Using {} ({}) with workdir {}",
            backend.runtime_name(),
            backend.engine(),
            workdir.display()
        );
        Ok(Self::new(Arc::new(backend), workdir))
    }

    /// Canonical host working directory
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Execute `args` in `spec`, returning the raw output
    pub async fn exec(
        &self,
        cancel: &CancellationToken,
        spec: &ContainerSpec,
        args: &[String],
    ) -> DaggersResult<ExecOutput> {
        debug!("exec in {}: {:?}", spec.image(), args);
        self.backend.exec(spec, args, cancel).await
    }

    /// Execute `args` in `spec` and return stdout, failing on non-zero exit
    pub async fn stdout(
        &self,
        cancel: &CancellationToken,
        spec: &ContainerSpec,
        args: &[String],
    ) -> DaggersResult<String> {
        let output = self.exec(cancel, spec, args).await?;
        if !output.success() {
            return Err(DaggersError::ContainerCommand {
                command: args.join(" "),
                code: output.exit_code,
                output: error_output(&output.stdout, &output.stderr),
            });
        }
        Ok(output.stdout)
    }

    /// Release the backend
    pub async fn close(mut self) -> DaggersResult<()> {
        self.closed = true;
        debug!("Closing {} runtime", self.backend.runtime_name());
        self.backend.close().await
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                "{} runtime handle dropped without close",
                self.backend.runtime_name()
            );
        }
    }
}
