//! pre-commit runner
//!
//! Runs every pre-commit hook against the working directory inside a Python
//! container. Hook environments are kept in a cache volume keyed by the
//! contents of `.pre-commit-config.yaml`, so they are rebuilt only when the
//! hook configuration changes.
//!
//! The pre-commit release is pinned; making it configurable is left open.

use crate::cache::{derive_cache_key, CacheVolume};
use crate::customizers::download_file;
use crate::error::{DaggersError, DaggersResult};
use crate::options::{init_config, option, ConfigOption};
use crate::orchestration::{apply_customizers, ContainerSpec, Customizer, Runtime, RuntimeOptions};
use crate::tools::SRC_DIR;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Hook configuration file hashed into the cache key
pub const CONFIG_FILE_NAME: &str = ".pre-commit-config.yaml";
/// Cache volume mount path
pub const CACHE_DIR: &str = "/pre-commit-cache";
/// Variable pointing pre-commit at its cache directory
pub const PRECOMMIT_HOME_ENV_VAR: &str = "PRE_COMMIT_HOME";
/// Prefix of the cache volume name
pub const CACHE_KEY_PREFIX: &str = "pre-commit-";
/// Default base image
pub const DEFAULT_BASE_IMAGE: &str = "python:3.10-bullseye";

const PRECOMMIT_PYZ_URL: &str =
    "https://github.com/pre-commit/pre-commit/releases/download/v2.20.0/pre-commit-2.20.0.pyz";
const PRECOMMIT_PYZ_PATH: &str = "/usr/local/bin/pre-commit-2.20.0.pyz";

/// Resolved pre-commit configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecommitConfig {
    /// Image providing the Python interpreter and git
    pub base_image: String,
    /// Steps applied to the container before pre-commit is installed
    pub container_customizers: Vec<Customizer>,
}

impl Default for PrecommitConfig {
    fn default() -> Self {
        Self {
            base_image: DEFAULT_BASE_IMAGE.to_string(),
            container_customizers: Vec::new(),
        }
    }
}

/// Use `image` as the base image
pub fn with_base_image(image: impl Into<String>) -> ConfigOption<PrecommitConfig> {
    let image = image.into();
    option(move |mut cfg: PrecommitConfig| {
        if image.trim().is_empty() {
            return Err(DaggersError::invalid_option("base_image", "must not be empty"));
        }
        cfg.base_image = image.clone();
        Ok(cfg)
    })
}

/// Append container customizers, keeping their order
pub fn with_container_customizers(customizers: Vec<Customizer>) -> ConfigOption<PrecommitConfig> {
    option(move |mut cfg: PrecommitConfig| {
        cfg.container_customizers.extend(customizers.iter().cloned());
        Ok(cfg)
    })
}

/// Fixed pre-commit invocation
fn precommit_args() -> Vec<String> {
    [
        "python",
        PRECOMMIT_PYZ_PATH,
        "run",
        "--all-files",
        "--show-diff-on-failure",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Build the container job for `cfg` against `runtime`'s working directory
fn build_spec(runtime: &Runtime, cfg: &PrecommitConfig) -> DaggersResult<ContainerSpec> {
    let container = ContainerSpec::from(&cfg.base_image);
    let container = apply_customizers(container, &cfg.container_customizers)?;
    let container = download_file(PRECOMMIT_PYZ_URL, PRECOMMIT_PYZ_PATH).apply(container)?;

    let key = derive_cache_key(CACHE_KEY_PREFIX, runtime.workdir(), &[CONFIG_FILE_NAME])?;
    debug!("pre-commit cache volume: {}", key);
    let volume = CacheVolume::new(key);

    Ok(container
        .with_env_variable(PRECOMMIT_HOME_ENV_VAR, CACHE_DIR)
        .with_mounted_cache(CACHE_DIR, &volume)
        .with_mounted_directory(SRC_DIR, runtime.workdir())
        .with_workdir(SRC_DIR))
}

/// Run all pre-commit hooks and return their output
pub async fn run(
    cancel: &CancellationToken,
    runtime: &Runtime,
    options: &[ConfigOption<PrecommitConfig>],
) -> DaggersResult<String> {
    let cfg = init_config(options)?;
    let container = build_spec(runtime, &cfg)?;

    info!("Running pre-commit in {}", cfg.base_image);
    runtime.stdout(cancel, &container, &precommit_args()).await
}

/// Connect a runtime, run pre-commit, and release the runtime
pub async fn run_with_options(
    cancel: &CancellationToken,
    runtime_options: &[ConfigOption<RuntimeOptions>],
    options: &[ConfigOption<PrecommitConfig>],
) -> DaggersResult<String> {
    let runtime = Runtime::connect(runtime_options).await?;
    run_on(cancel, runtime, options).await
}

/// Run on `runtime` and close it, even when the run fails
///
/// The run's error wins over a close error.
pub async fn run_on(
    cancel: &CancellationToken,
    runtime: Runtime,
    options: &[ConfigOption<PrecommitConfig>],
) -> DaggersResult<String> {
    let result = run(cancel, &runtime, options).await;
    let closed = runtime.close().await;

    let output = result?;
    closed?;
    Ok(output)
}
