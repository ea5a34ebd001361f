//! OCI CLI engine runtime
//!
//! Implements the ContainerRuntime trait by invoking `podman` (or any CLI
//! with the same `run` surface, such as `docker`) as a child process. Every
//! execution gets a fresh, auto-removed container.

use crate::config::ConfigManager;
use crate::error::{DaggersError, DaggersResult};
use crate::orchestration::download;
use crate::orchestration::runtime::{ContainerRuntime, ExecOutput};
use crate::orchestration::spec::ContainerSpec;
use crate::orchestration::stream_child_output;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

/// Container runtime driving an OCI CLI engine
pub struct PodmanRuntime {
    engine: String,
    verbose: bool,
    download_dir: PathBuf,
}

impl PodmanRuntime {
    /// Create a runtime for the given engine binary
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            verbose: false,
            download_dir: ConfigManager::download_dir(),
        }
    }

    /// Forward container stderr to the log as it arrives
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Directory used to cache downloaded files
    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = dir;
        self
    }

    /// Engine binary this runtime invokes
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Check if the engine binary runs
    async fn engine_installed(&self) -> bool {
        Command::new(&self.engine)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Fetch every file the spec downloads, returning (host path, container path) pairs
    async fn resolve_files(&self, spec: &ContainerSpec) -> DaggersResult<Vec<(PathBuf, String)>> {
        let mut resolved = Vec::with_capacity(spec.files().len());
        for file in spec.files() {
            let host = download::fetch(&file.url, &self.download_dir).await?;
            resolved.push((host, file.destination.clone()));
        }
        Ok(resolved)
    }

    /// Force-remove a container, ignoring failures
    async fn remove_container(&self, name: &str) {
        debug!("Removing container: {}", name);

        let result = Command::new(&self.engine)
            .args(["rm", "-f", name])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        if let Err(e) = result {
            debug!("Could not remove container {}: {}", name, e);
        }
    }
}

/// Render the `run` argument vector for a spec
///
/// Order is fixed (workdir, directory mounts, cache mounts, files, env,
/// image, command) so identical specs always render identically.
pub(crate) fn run_args(
    spec: &ContainerSpec,
    name: &str,
    files: &[(PathBuf, String)],
    command: &[String],
) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "--rm".to_string(),
        "--name".to_string(),
        name.to_string(),
    ];

    // Working directory
    if let Some(workdir) = spec.workdir() {
        args.push("-w".to_string());
        args.push(workdir.to_string());
    }

    // Directory mounts
    for dir in spec.directories() {
        args.push("-v".to_string());
        args.push(dir.volume_arg());
    }

    // Cache volumes
    for cache in spec.caches() {
        args.push("-v".to_string());
        args.push(cache.volume_arg());
    }

    // Downloaded files, read-only
    for (host, destination) in files {
        args.push("-v".to_string());
        args.push(format!("{}:{}:ro", host.display(), destination));
    }

    // Environment variables
    for (k, v) in spec.env() {
        args.push("-e".to_string());
        args.push(format!("{}={}", k, v));
    }

    // Image
    args.push(spec.image().to_string());

    // Command to run
    args.extend(command.iter().cloned());

    args
}

#[async_trait]
impl ContainerRuntime for PodmanRuntime {
    async fn ensure_ready(&self) -> DaggersResult<()> {
        if !self.engine_installed().await {
            return Err(DaggersError::EngineNotFound {
                engine: self.engine.clone(),
            });
        }
        Ok(())
    }

    async fn exec(
        &self,
        spec: &ContainerSpec,
        args: &[String],
        cancel: &CancellationToken,
    ) -> DaggersResult<ExecOutput> {
        if cancel.is_cancelled() {
            return Err(DaggersError::Cancelled);
        }

        let files = self.resolve_files(spec).await?;
        let name = format!("daggers-{}", Uuid::new_v4());
        let run_args = run_args(spec, &name, &files, args);

        debug!("Running container: {} {:?}", self.engine, run_args);

        let mut child = Command::new(&self.engine)
            .args(&run_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DaggersError::command_failed(format!("{} run {}", self.engine, spec.image()), e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DaggersError::Internal("stdout not piped".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DaggersError::Internal("stderr not piped".to_string()))?;

        let verbose = self.verbose;
        let on_stderr = move |line: &str| {
            if verbose {
                info!("{}", line);
            }
        };

        let finished = {
            let run = async {
                let (out, err) = stream_child_output(stdout, stderr, &on_stderr).await;
                let status = child.wait().await;
                (out, err, status)
            };
            tokio::select! {
                result = run => Some(result),
                _ = cancel.cancelled() => None,
            }
        };

        let Some((out, err, status)) = finished else {
            debug!("Cancelled, stopping container {}", name);
            if let Err(e) = child.kill().await {
                debug!("Could not kill engine process for {}: {}", name, e);
            }
            self.remove_container(&name).await;
            return Err(DaggersError::Cancelled);
        };

        let status = status
            .map_err(|e| DaggersError::command_failed(format!("{} run {}", self.engine, spec.image()), e))?;

        Ok(ExecOutput {
            stdout: out,
            stderr: err,
            exit_code: status.code().unwrap_or(-1),
        })
    }

    fn runtime_name(&self) -> &'static str {
        let binary = std::path::Path::new(&self.engine)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        match binary {
            "podman" => "Podman",
            "docker" => "Docker",
            _ => "OCI engine",
        }
    }
}
