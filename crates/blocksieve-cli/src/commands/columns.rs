use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use blocksieve_store::{read_table, InputInfo};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub struct ColumnsArgs {
    pub input: PathBuf,
}

#[derive(Debug, Serialize)]
struct ColumnsReport<'a> {
    columns: &'a [String],
    rows: usize,
    #[serde(flatten)]
    info: &'a InputInfo,
}

pub fn columns(ctx: &Context<'_>, args: ColumnsArgs) -> Result<()> {
    let input = read_table(&args.input).with_context(|| format!("read {}", args.input.display()))?;
    let report = ColumnsReport {
        columns: &input.table.headers,
        rows: input.table.len(),
        info: &input.info,
    };

    if ctx.json {
        return print_json(&report);
    }

    println!("format: {}", report.info.format);
    if let Some(encoding) = report.info.encoding {
        println!("encoding: {encoding}");
    }
    if let Some(delimiter) = report.info.delimiter {
        println!("delimiter: {}", delimiter.escape_default());
    }
    println!("rows: {}", report.rows);
    if report.info.skipped_rows > 0 {
        println!("skipped rows: {}", report.info.skipped_rows);
    }
    for column in report.columns {
        println!("{column}");
    }
    Ok(())
}
