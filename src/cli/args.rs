//! CLI argument definitions using clap derive

use crate::tools::svu::{Command as SvuCommand, TagMode};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// daggers - containerized CI helpers
///
/// Runs pre-commit and svu inside containers through podman or docker.
#[derive(Parser, Debug)]
#[command(name = "daggers")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DAGGERS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .daggers.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,

    /// Container engine binary (podman, docker)
    #[arg(long, global = true, env = "DAGGERS_ENGINE")]
    pub engine: Option<String>,

    /// Repository directory to run in (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub workdir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run all pre-commit hooks in a container
    Precommit(PrecommitArgs),

    /// Compute the next semantic version with svu
    Svu(SvuArgs),

    /// Print the cache key derived from files in the workdir
    CacheKey(CacheKeyArgs),

    /// Show configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the precommit command
#[derive(Parser, Debug)]
pub struct PrecommitArgs {
    /// Base image providing python and git
    #[arg(long)]
    pub base_image: Option<String>,

    /// Additional environment variables (KEY=VALUE)
    #[arg(short, long, value_parser = parse_env_var)]
    pub env: Vec<(String, String)>,
}

/// Arguments for the svu command
#[derive(Parser, Debug)]
pub struct SvuArgs {
    /// svu subcommand
    #[arg(value_enum)]
    pub command: Option<SvuCommand>,

    /// svu image tag
    #[arg(long)]
    pub image_version: Option<String>,

    /// Only consider tags matching this pattern
    #[arg(long)]
    pub pattern: Option<String>,

    /// Tag prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Version suffix
    #[arg(long)]
    pub suffix: Option<String>,

    /// Tags to consider
    #[arg(long, value_enum)]
    pub tag_mode: Option<TagMode>,

    /// Keep build metadata
    #[arg(long, overrides_with = "no_metadata")]
    pub metadata: bool,

    /// Drop build metadata
    #[arg(long, overrides_with = "metadata")]
    pub no_metadata: bool,

    /// Keep pre-release identifiers
    #[arg(long, overrides_with = "no_pre_release")]
    pub pre_release: bool,

    /// Drop pre-release identifiers
    #[arg(long, overrides_with = "pre_release")]
    pub no_pre_release: bool,

    /// Keep the build identifier
    #[arg(long, overrides_with = "no_build")]
    pub build: bool,

    /// Drop the build identifier
    #[arg(long, overrides_with = "build")]
    pub no_build: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

impl SvuArgs {
    pub fn metadata(&self) -> Option<bool> {
        flag_pair(self.metadata, self.no_metadata)
    }

    pub fn pre_release(&self) -> Option<bool> {
        flag_pair(self.pre_release, self.no_pre_release)
    }

    pub fn build(&self) -> Option<bool> {
        flag_pair(self.build, self.no_build)
    }
}

/// Arguments for the cache-key command
#[derive(Parser, Debug)]
pub struct CacheKeyArgs {
    /// Prefix of the key
    #[arg(long, default_value = "pre-commit-")]
    pub prefix: String,

    /// Files to hash, relative to the workdir, in order
    #[arg(default_value = ".pre-commit-config.yaml")]
    pub files: Vec<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,

    /// Show configuration file path
    Path,
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format for tool results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// Resolve an `--x` / `--no-x` pair (the later flag wins)
fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Parse environment variable in KEY=VALUE format
fn parse_env_var(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE format: no '=' found in '{s}'"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}
