//! Svu command - compute the next semantic version

use super::CommandContext;
use crate::cli::args::{OutputFormat, SvuArgs};
use crate::error::DaggersResult;
use crate::options::ConfigOption;
use crate::tools::svu::{self, Output, SvuConfig};
use crate::ui::{self, TaskSpinner};

/// Execute the svu command
pub async fn execute(args: SvuArgs, ctx: &CommandContext) -> DaggersResult<()> {
    let options = build_options(&args, ctx);
    let runtime_options = ctx.runtime_options()?;

    let mut spinner = TaskSpinner::new(&ctx.ui());
    spinner.start("Computing version with svu...");

    let output = match svu::run_with_options(&ctx.cancel, &runtime_options, &options).await {
        Ok(output) => {
            spinner.stop(&format!("Version {}", output.version));
            output
        }
        Err(e) => {
            spinner.stop_error("svu failed");
            return Err(e);
        }
    };

    print_output(&output, args.format)
}

fn build_options(args: &SvuArgs, ctx: &CommandContext) -> Vec<ConfigOption<SvuConfig>> {
    let mut options = ctx.config.svu.options();
    if let Some(version) = &args.image_version {
        options.push(svu::with_version(version.clone()));
    }
    if let Some(command) = args.command {
        options.push(svu::with_command(command));
    }
    if let Some(pattern) = &args.pattern {
        options.push(svu::with_pattern(pattern.clone()));
    }
    if let Some(prefix) = &args.prefix {
        options.push(svu::with_prefix(prefix.clone()));
    }
    if let Some(suffix) = &args.suffix {
        options.push(svu::with_suffix(suffix.clone()));
    }
    if let Some(tag_mode) = args.tag_mode {
        options.push(svu::with_tag_mode(tag_mode));
    }
    if let Some(enabled) = args.metadata() {
        options.push(svu::with_metadata(enabled));
    }
    if let Some(enabled) = args.pre_release() {
        options.push(svu::with_pre_release(enabled));
    }
    if let Some(enabled) = args.build() {
        options.push(svu::with_build(enabled));
    }
    options
}

fn print_output(output: &Output, format: OutputFormat) -> DaggersResult<()> {
    match format {
        OutputFormat::Text => {
            ui::key_value("VERSION", &output.version);
            ui::key_value("VERSION_WITHOUT_PREFIX", &output.version_without_prefix);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(output)?),
    }
    Ok(())
}
