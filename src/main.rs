//! Daggers - containerized CI helpers
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use daggers::cli::commands::{self, CommandContext};
use daggers::cli::{Cli, Commands};
use daggers::config::{Config, ConfigManager};
use daggers::error::{DaggersError, DaggersResult};
use daggers::ui;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(output) = e.output().filter(|o| !o.is_empty()) {
                eprintln!("{output}");
            }
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> DaggersResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions(args) = cli.command {
        commands::completions(args);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let local_config_path = if cli.no_local {
        None
    } else {
        let start = match cli.workdir {
            Some(ref dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|e| DaggersError::io("getting current directory", e))?,
        };
        ConfigManager::find_local_config(&start)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    init_tracing(cli.verbose, &config);
    match local_config_path {
        Some(ref path) => debug!("Merged local config: {}", path.display()),
        None => debug!("No local config in use"),
    }

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let ctx = CommandContext {
        config,
        config_path: config_manager.path().to_path_buf(),
        engine: cli.engine,
        workdir: cli.workdir,
        verbose: cli.verbose,
        cancel,
    };

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Precommit(args) => commands::precommit(args, &ctx).await,
        Commands::Svu(args) => commands::svu(args, &ctx).await,
        Commands::CacheKey(args) => commands::cache_key(args, &ctx).await,
        Commands::Config(args) => commands::config(args, &ctx).await,
    }
}

/// 0 = warn, 1 = info, 2+ = debug; `RUST_LOG` wins when set
fn init_tracing(verbose: u8, config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("daggers=warn"),
        1 => EnvFilter::new("daggers=info"),
        _ => EnvFilter::new("daggers=debug"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ui::step_warn("Interrupted, stopping container...");
            cancel.cancel();
        }
    });
}
