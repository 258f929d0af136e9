use anyhow::{Context, Result};
use clap::Parser;
use junos_reconcile::report::render_diff;
use netconf_xml_core::{diff, format_json, format_text, parse_file};

mod apply_cmd;
mod cli;

use cli::{Cli, Command, DiffArgs, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Apply(args) => apply_cmd::run_apply(args),
        Command::Render(args) => apply_cmd::run_render(args),
        Command::Diff(args) => run_diff(args),
    }
}

fn run_diff(args: DiffArgs) -> Result<()> {
    let left = parse_file(&args.file1)
        .with_context(|| format!("failed to parse {}", args.file1.display()))?;
    let right = parse_file(&args.file2)
        .with_context(|| format!("failed to parse {}", args.file2.display()))?;

    let entries = diff(&left, &right);
    match args.format {
        OutputFormat::Text => println!("{}", render_diff(&format_text(&entries))),
        OutputFormat::Json => println!("{}", format_json(&entries)),
    }
    Ok(())
}
