//! Configuration schema for daggers
//!
//! Global configuration lives at `~/.config/daggers/config.toml`; a project
//! may add a `.daggers.toml` whose values win over the global file. Unset
//! tool values fall back to each tool's own defaults.

use crate::customizers::env_variable;
use crate::options::ConfigOption;
use crate::orchestration::{self, RuntimeOptions};
use crate::tools::precommit::{self, PrecommitConfig};
use crate::tools::svu::{self, Command, SvuConfig, TagMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Container engine settings
    pub runtime: RuntimeConfig,

    /// pre-commit defaults
    pub precommit: PrecommitSection,

    /// svu defaults
    pub svu: SvuSection,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Container engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Engine binary (podman or docker)
    pub engine: String,

    /// Forward container stderr to the log
    pub verbose: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: "podman".to_string(),
            verbose: false,
        }
    }
}

impl RuntimeConfig {
    pub fn options(&self) -> Vec<ConfigOption<RuntimeOptions>> {
        vec![
            orchestration::with_engine(self.engine.clone()),
            orchestration::with_verbose(self.verbose),
        ]
    }
}

/// pre-commit settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecommitSection {
    /// Base image override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_image: Option<String>,

    /// Environment variables set in the container (e.g. SKIP)
    pub env: BTreeMap<String, String>,
}

impl PrecommitSection {
    pub fn options(&self) -> Vec<ConfigOption<PrecommitConfig>> {
        let mut opts = Vec::new();
        if let Some(image) = &self.base_image {
            opts.push(precommit::with_base_image(image.clone()));
        }
        if !self.env.is_empty() {
            let customizers = self
                .env
                .iter()
                .map(|(k, v)| env_variable(k.clone(), v.clone()))
                .collect();
            opts.push(precommit::with_container_customizers(customizers));
        }
        opts
    }
}

/// svu settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SvuSection {
    /// svu image tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_mode: Option<TagMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_release: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<bool>,
}

impl SvuSection {
    /// Options for every value set in this section
    pub fn options(&self) -> Vec<ConfigOption<SvuConfig>> {
        let mut opts = Vec::new();
        if let Some(v) = &self.version {
            opts.push(svu::with_version(v.clone()));
        }
        if let Some(c) = self.command {
            opts.push(svu::with_command(c));
        }
        if let Some(p) = &self.pattern {
            opts.push(svu::with_pattern(p.clone()));
        }
        if let Some(p) = &self.prefix {
            opts.push(svu::with_prefix(p.clone()));
        }
        if let Some(s) = &self.suffix {
            opts.push(svu::with_suffix(s.clone()));
        }
        if let Some(m) = self.tag_mode {
            opts.push(svu::with_tag_mode(m));
        }
        if let Some(b) = self.metadata {
            opts.push(svu::with_metadata(b));
        }
        if let Some(b) = self.pre_release {
            opts.push(svu::with_pre_release(b));
        }
        if let Some(b) = self.build {
            opts.push(svu::with_build(b));
        }
        opts
    }
}
