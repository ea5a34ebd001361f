//! Precommit command - run pre-commit hooks in a container

use super::CommandContext;
use crate::cli::args::PrecommitArgs;
use crate::customizers::env_variable;
use crate::error::DaggersResult;
use crate::options::ConfigOption;
use crate::tools::precommit::{self, PrecommitConfig};
use crate::ui::TaskSpinner;

/// Execute the precommit command
pub async fn execute(args: PrecommitArgs, ctx: &CommandContext) -> DaggersResult<()> {
    let options = build_options(&args, ctx);
    let runtime_options = ctx.runtime_options()?;

    let mut spinner = TaskSpinner::new(&ctx.ui());
    spinner.start("Running pre-commit hooks...");

    match precommit::run_with_options(&ctx.cancel, &runtime_options, &options).await {
        Ok(output) => {
            spinner.stop("pre-commit hooks passed");
            print!("{output}");
            Ok(())
        }
        Err(e) => {
            spinner.stop_error("pre-commit hooks failed");
            Err(e)
        }
    }
}

fn build_options(args: &PrecommitArgs, ctx: &CommandContext) -> Vec<ConfigOption<PrecommitConfig>> {
    let mut options = ctx.config.precommit.options();
    if let Some(image) = &args.base_image {
        options.push(precommit::with_base_image(image.clone()));
    }
    if !args.env.is_empty() {
        let customizers = args
            .env
            .iter()
            .map(|(k, v)| env_variable(k.clone(), v.clone()))
            .collect();
        options.push(precommit::with_container_customizers(customizers));
    }
    options
}
