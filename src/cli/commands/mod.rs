//! CLI command implementations

pub mod cache_key;
pub mod completions;
pub mod config;
pub mod precommit;
pub mod svu;

pub use cache_key::execute as cache_key;
pub use completions::execute as completions;
pub use config::execute as config;
pub use precommit::execute as precommit;
pub use svu::execute as svu;

use crate::config::Config;
use crate::error::{DaggersError, DaggersResult};
use crate::options::ConfigOption;
use crate::orchestration::{self, RuntimeOptions};
use crate::ui::UiContext;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// State shared by every command after config loading
pub struct CommandContext {
    /// Effective configuration (global merged with local)
    pub config: Config,
    /// Path of the global configuration file
    pub config_path: PathBuf,
    /// `--engine` override
    pub engine: Option<String>,
    /// `--workdir` override
    pub workdir: Option<PathBuf>,
    /// `-v` count
    pub verbose: u8,
    /// Cancelled on Ctrl-C
    pub cancel: CancellationToken,
}

impl CommandContext {
    /// Directory the tools operate on
    pub fn workdir(&self) -> DaggersResult<PathBuf> {
        match &self.workdir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir()
                .map_err(|e| DaggersError::io("getting current directory", e)),
        }
    }

    /// Runtime options: config first, then command-line overrides
    pub fn runtime_options(&self) -> DaggersResult<Vec<ConfigOption<RuntimeOptions>>> {
        let mut opts = self.config.runtime.options();
        if let Some(engine) = &self.engine {
            opts.push(orchestration::with_engine(engine.clone()));
        }
        if self.verbose > 0 {
            opts.push(orchestration::with_verbose(true));
        }
        opts.push(orchestration::with_workdir(self.workdir()?));
        Ok(opts)
    }

    /// Output context; spinners are off when engine output is being logged
    pub fn ui(&self) -> UiContext {
        UiContext::detect().with_quiet(self.verbose > 0 || self.config.runtime.verbose)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn context(config: Config) -> CommandContext {
        CommandContext {
            config,
            config_path: PathBuf::from("/etc/daggers/config.toml"),
            engine: None,
            workdir: None,
            verbose: 0,
            cancel: CancellationToken::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::context;
    use super::*;
    use crate::options::init_config;

    #[test]
    fn runtime_options_follow_config() {
        let mut config = Config::default();
        config.runtime.engine = "docker".to_string();
        let mut ctx = context(config);
        ctx.workdir = Some(PathBuf::from("/repo"));

        let opts = init_config(&ctx.runtime_options().unwrap()).unwrap();
        assert_eq!(opts.engine, "docker");
        assert_eq!(opts.workdir, PathBuf::from("/repo"));
        assert!(!opts.verbose);
    }

    #[test]
    fn command_line_overrides_config() {
        let mut config = Config::default();
        config.runtime.engine = "docker".to_string();
        let mut ctx = context(config);
        ctx.engine = Some("podman".to_string());
        ctx.verbose = 1;

        let opts = init_config(&ctx.runtime_options().unwrap()).unwrap();
        assert_eq!(opts.engine, "podman");
        assert!(opts.verbose);
    }

    #[test]
    fn workdir_defaults_to_current_dir() {
        let ctx = context(Config::default());
        assert_eq!(ctx.workdir().unwrap(), std::env::current_dir().unwrap());
    }
}
