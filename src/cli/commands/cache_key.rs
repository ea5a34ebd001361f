//! Cache-key command - print the key a tool would use for its cache volume

use super::CommandContext;
use crate::cache::derive_cache_key;
use crate::cli::args::CacheKeyArgs;
use crate::error::DaggersResult;

/// Execute the cache-key command
pub async fn execute(args: CacheKeyArgs, ctx: &CommandContext) -> DaggersResult<()> {
    let workdir = ctx.workdir()?;
    let key = derive_cache_key(&args.prefix, &workdir, &args.files)?;
    println!("{key}");
    Ok(())
}
