use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "junos-reconcile")]
#[command(about = "Reconcile declarative configuration against a Junos-style XML datastore")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Apply a desired-state file to a datastore, committing or discarding.
    Apply(ApplyArgs),
    /// Print the NETCONF edit-config payloads for a desired-state file.
    Render(RenderArgs),
    /// Compare two datastore XML files.
    Diff(DiffArgs),
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Desired-state TOML file.
    pub state: PathBuf,
    /// Datastore XML file holding the running configuration.
    pub datastore: PathBuf,
    /// Report the pending diff and discard instead of committing.
    #[arg(long)]
    pub check: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Suppress diff output, print only the changed flag.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Desired-state TOML file.
    pub state: PathBuf,
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    pub file1: PathBuf,
    pub file2: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
