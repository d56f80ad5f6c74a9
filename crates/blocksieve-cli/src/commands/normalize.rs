use crate::commands::{print_json, Context};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, clap::Args)]
pub struct NormalizeArgs {
    #[arg(required = true)]
    pub numbers: Vec<String>,
    #[arg(long)]
    pub strip_plus: bool,
}

#[derive(Debug, Serialize)]
struct NormalizedNumber<'a> {
    raw: &'a str,
    canonical: Option<&'a str>,
    valid: bool,
}

pub fn normalize(ctx: &Context<'_>, args: NormalizeArgs) -> Result<()> {
    let normalizer = ctx.config.phone.normalizer();
    let values: Vec<_> = args
        .numbers
        .iter()
        .map(|raw| normalizer.normalize(raw))
        .collect();

    if ctx.json {
        let report: Vec<NormalizedNumber<'_>> = values
            .iter()
            .map(|value| NormalizedNumber {
                raw: &value.raw,
                canonical: value.canonical.as_deref(),
                valid: value.is_valid(),
            })
            .collect();
        return print_json(&report);
    }

    for value in &values {
        if value.is_valid() {
            println!("{}\t{}", value.raw, value.output_value(args.strip_plus));
        } else {
            println!("{}\tinvalid", value.raw);
        }
    }
    Ok(())
}
