//! svu wrapper
//!
//! Computes semantic versions from git tags with
//! [svu](https://github.com/caarlos0/svu). Each run executes svu twice in the
//! same container spec: once for the version as tagged, once with
//! `--strip-prefix` for the bare version.

use crate::error::{DaggersError, DaggersResult};
use crate::options::{init_config, option, ConfigOption};
use crate::orchestration::{ContainerSpec, Runtime, RuntimeOptions};
use crate::tools::SRC_DIR;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// svu image repository
pub const BASE_IMAGE: &str = "ghcr.io/caarlos0/svu";
/// Default svu image tag
pub const DEFAULT_VERSION: &str = "v1.9.0";

/// svu subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Next version based on commit messages
    #[default]
    Next,
    /// Next major version
    Major,
    /// Next minor version
    Minor,
    /// Next patch version
    Patch,
    /// Current version
    Current,
    /// Next pre-release version
    #[value(name = "prerelease")]
    PreRelease,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Current => "current",
            Self::PreRelease => "prerelease",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tags svu considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagMode {
    /// Tags reachable from the current branch
    CurrentBranch,
    /// Tags from every branch
    AllBranches,
}

impl TagMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentBranch => "current-branch",
            Self::AllBranches => "all-branches",
        }
    }
}

impl fmt::Display for TagMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved svu configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvuConfig {
    /// svu image tag
    pub version: String,
    pub command: Command,
    /// Tag match pattern (omitted when empty)
    pub pattern: String,
    /// Tag prefix (omitted when empty)
    pub prefix: String,
    /// Version suffix (omitted when empty)
    pub suffix: String,
    /// Tag mode (omitted when unset)
    pub tag_mode: Option<TagMode>,
    pub metadata: bool,
    pub pre_release: bool,
    pub build: bool,
}

impl Default for SvuConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            command: Command::default(),
            pattern: String::new(),
            prefix: String::new(),
            suffix: String::new(),
            tag_mode: None,
            metadata: true,
            pre_release: true,
            build: true,
        }
    }
}

/// Versions computed by one svu run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    /// Version as tagged, e.g. `v1.2.3`
    pub version: String,
    /// Version without the tag prefix, e.g. `1.2.3`
    pub version_without_prefix: String,
}

macro_rules! string_option {
    ($(#[$doc:meta])* $name:ident, $field:ident) => {
        $(#[$doc])*
        pub fn $name(value: impl Into<String>) -> ConfigOption<SvuConfig> {
            let value = value.into();
            option(move |mut cfg: SvuConfig| {
                cfg.$field = value.clone();
                Ok(cfg)
            })
        }
    };
}

macro_rules! bool_option {
    ($(#[$doc:meta])* $name:ident, $field:ident) => {
        $(#[$doc])*
        pub fn $name(enabled: bool) -> ConfigOption<SvuConfig> {
            option(move |mut cfg: SvuConfig| {
                cfg.$field = enabled;
                Ok(cfg)
            })
        }
    };
}

/// Use svu image tag `version`
pub fn with_version(version: impl Into<String>) -> ConfigOption<SvuConfig> {
    let version = version.into();
    option(move |mut cfg: SvuConfig| {
        if version.trim().is_empty() {
            return Err(DaggersError::invalid_option("version", "must not be empty"));
        }
        cfg.version = version.clone();
        Ok(cfg)
    })
}

pub fn with_command(command: Command) -> ConfigOption<SvuConfig> {
    option(move |mut cfg: SvuConfig| {
        cfg.command = command;
        Ok(cfg)
    })
}

pub fn with_tag_mode(tag_mode: TagMode) -> ConfigOption<SvuConfig> {
    option(move |mut cfg: SvuConfig| {
        cfg.tag_mode = Some(tag_mode);
        Ok(cfg)
    })
}

string_option!(
    /// Only consider tags matching this glob
    with_pattern,
    pattern
);
string_option!(
    /// Tag prefix, e.g. `v`
    with_prefix,
    prefix
);
string_option!(
    /// Suffix appended to the computed version
    with_suffix,
    suffix
);
bool_option!(
    /// Keep build metadata from the previous tag
    with_metadata,
    metadata
);
bool_option!(
    /// Keep pre-release identifiers from the previous tag
    with_pre_release,
    pre_release
);
bool_option!(
    /// Keep the build identifier from the previous tag
    with_build,
    build
);

/// Render svu flags for `cfg`
///
/// Toggles always emit either their affirmative or negative spelling so
/// svu's own defaults never apply silently.
pub fn flags_from_config(cfg: &SvuConfig) -> Vec<String> {
    let mut flags = Vec::new();

    if !cfg.pattern.is_empty() {
        flags.push("--pattern".to_string());
        flags.push(cfg.pattern.clone());
    }
    if !cfg.prefix.is_empty() {
        flags.push("--prefix".to_string());
        flags.push(cfg.prefix.clone());
    }
    if !cfg.suffix.is_empty() {
        flags.push("--suffix".to_string());
        flags.push(cfg.suffix.clone());
    }
    if let Some(mode) = cfg.tag_mode {
        flags.push("--tag-mode".to_string());
        flags.push(mode.to_string());
    }

    let toggles = [
        (cfg.metadata, "--metadata", "--no-metadata"),
        (cfg.pre_release, "--pre-release", "--no-pre-release"),
        (cfg.build, "--build", "--no-build"),
    ];
    for (enabled, yes, no) in toggles {
        flags.push(if enabled { yes } else { no }.to_string());
    }

    flags
}

/// Run svu and return the version with and without its prefix
pub async fn run(
    cancel: &CancellationToken,
    runtime: &Runtime,
    options: &[ConfigOption<SvuConfig>],
) -> DaggersResult<Output> {
    let cfg = init_config(options)?;

    let container = ContainerSpec::from(format!("{}:{}", BASE_IMAGE, cfg.version))
        .with_mounted_directory(SRC_DIR, runtime.workdir())
        .with_workdir(SRC_DIR);

    let mut args = vec![cfg.command.to_string()];
    args.extend(flags_from_config(&cfg));

    info!("Running svu {}", cfg.command);
    let version = runtime.stdout(cancel, &container, &args).await?;

    args.push("--strip-prefix".to_string());
    let version_without_prefix = runtime.stdout(cancel, &container, &args).await?;

    let output = Output {
        version: version.trim().to_string(),
        version_without_prefix: version_without_prefix.trim().to_string(),
    };
    debug!("svu computed {:?}", output);
    Ok(output)
}

/// Connect a runtime, run svu, and release the runtime
pub async fn run_with_options(
    cancel: &CancellationToken,
    runtime_options: &[ConfigOption<RuntimeOptions>],
    options: &[ConfigOption<SvuConfig>],
) -> DaggersResult<Output> {
    let runtime = Runtime::connect(runtime_options).await?;
    run_on(cancel, runtime, options).await
}

/// Run on `runtime` and close it, even when the run fails
///
/// The run's error wins over a close error.
pub async fn run_on(
    cancel: &CancellationToken,
    runtime: Runtime,
    options: &[ConfigOption<SvuConfig>],
) -> DaggersResult<Output> {
    let result = run(cancel, &runtime, options).await;
    let closed = runtime.close().await;

    let output = result?;
    closed?;
    Ok(output)
}
