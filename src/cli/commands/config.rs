//! Config command - show configuration

use super::CommandContext;
use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::error::DaggersResult;

/// Execute the config command
pub async fn execute(args: ConfigArgs, ctx: &CommandContext) -> DaggersResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => {
            let toml = toml::to_string_pretty(&ctx.config)?;
            println!("{toml}");
        }
        Some(ConfigAction::Path) => println!("{}", ctx.config_path.display()),
    }
    Ok(())
}
