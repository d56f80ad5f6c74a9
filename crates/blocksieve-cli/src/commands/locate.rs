use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use anyhow::{Context as _, Result};
use blocksieve_core::{JobId, OutputFormat};
use blocksieve_store::paths;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub struct LocateArgs {
    pub id: String,
    #[arg(long)]
    pub format: Option<OutputFormat>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Located {
    id: JobId,
    path: PathBuf,
}

pub fn locate(ctx: &Context<'_>, args: LocateArgs) -> Result<()> {
    let id: JobId = args
        .id
        .trim()
        .parse()
        .map_err(|_| invalid_input(format!("invalid job id: {}", args.id)))?;
    let dir = paths::resolve_artifacts_dir(args.output_dir.or_else(|| ctx.config.output.dir.clone()))
        .with_context(|| "resolve output directory")?;
    let format = args.format.unwrap_or(ctx.config.output.format);

    let path = paths::locate_artifact(&dir, &id, format)
        .ok_or_else(|| not_found(format!("no artifact for job {id}")))?;

    if ctx.json {
        return print_json(&Located { id, path });
    }
    println!("{}", path.display());
    Ok(())
}
