use anyhow::Result;
use blocksieve_config::AppConfig;
use serde::Serialize;
use std::io::{self, Write};

pub mod columns;
pub mod completions;
pub mod locate;
pub mod normalize;
pub mod process;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Compact single-line JSON, for results consumed by other programs.
pub fn print_json_line<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
