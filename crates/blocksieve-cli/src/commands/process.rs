use crate::commands::{print_json_line, Context};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use blocksieve_config::{validate_blocklist_url, AppConfig};
use blocksieve_core::{OutputFormat, ProcessingOptions};
use blocksieve_pipeline::{JobRequest, Pipeline};
use blocksieve_source::{BlocklistSource, FileBlocklistSource, HttpBlocklistSource};
use blocksieve_store::{paths, OutputWriter};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, clap::Args)]
pub struct ProcessArgs {
    /// CSV, TXT or spreadsheet file to filter
    pub input: PathBuf,
    /// Name of the column holding phone numbers
    #[arg(long, default_value = "phone")]
    pub column: String,
    /// Write numbers without the leading '+'
    #[arg(long)]
    pub strip_plus: bool,
    /// Bundle large outputs as an archive of bounded parts
    #[arg(long)]
    pub split_files: bool,
    #[arg(long)]
    pub format: Option<OutputFormat>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    #[arg(long, conflicts_with = "blocklist_file")]
    pub blocklist_url: Option<String>,
    /// Read the blocklist from a local file instead of the configured URL
    #[arg(long)]
    pub blocklist_file: Option<PathBuf>,
}

pub fn process(ctx: &Context<'_>, args: ProcessArgs) -> Result<()> {
    let source = blocklist_source(ctx.config, &args)?;
    let output_dir = paths::resolve_artifacts_dir(
        args.output_dir.clone().or_else(|| ctx.config.output.dir.clone()),
    )
    .with_context(|| "resolve output directory")?;
    debug!(dir = %output_dir.display(), "output directory resolved");

    let pipeline = Pipeline::new(
        source,
        ctx.config.phone.normalizer(),
        OutputWriter::new(output_dir, ctx.config.output.max_rows_per_part),
    );
    let request = JobRequest {
        input: args.input.clone(),
        options: ProcessingOptions {
            phone_column: args.column,
            strip_plus: args.strip_plus,
            split_files: args.split_files,
        },
        format: args.format.unwrap_or(ctx.config.output.format),
    };

    let outcome = pipeline
        .run(&request)
        .with_context(|| format!("process {}", args.input.display()))?;

    if ctx.json {
        return print_json_line(&outcome);
    }

    let stats = &outcome.stats;
    println!("job: {}", outcome.job_id);
    println!("output: {}", outcome.artifact.path.display());
    if outcome.artifact.archived {
        println!("parts: {}", outcome.artifact.parts);
    }
    println!(
        "rows: {} total, {} valid, {} duplicates, {} blocked, {} written",
        stats.total_rows,
        stats.valid_numbers,
        stats.duplicates_removed,
        stats.blocked_numbers,
        stats.final_rows
    );
    println!("blocklist: {} numbers", stats.blocklist_size);
    println!("time: {:.2}s", stats.processing_time_seconds);
    Ok(())
}

fn blocklist_source(config: &AppConfig, args: &ProcessArgs) -> Result<Box<dyn BlocklistSource>> {
    if let Some(path) = &args.blocklist_file {
        return Ok(Box::new(FileBlocklistSource::new(path.clone())));
    }

    let url = match args.blocklist_url.as_deref() {
        Some(url) => validate_blocklist_url(url)?,
        None => config.blocklist.url.clone().ok_or_else(|| {
            invalid_input("no blocklist configured; set blocklist.url or pass --blocklist-url")
        })?,
    };
    Ok(Box::new(HttpBlocklistSource::new(
        url,
        Duration::from_secs(config.blocklist.timeout_secs),
        config.blocklist.user_agent.clone(),
    )))
}
