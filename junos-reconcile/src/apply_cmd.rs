use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use junos_reconcile::candidate::CandidateSession;
use junos_reconcile::model::TransactionResult;
use junos_reconcile::modules::{firewall, pbr};
use junos_reconcile::payload;
use junos_reconcile::report::render_diff;
use junos_reconcile::transaction::Mode;
use netconf_xml_core::{parse_file, write_file};

use crate::cli::{ApplyArgs, OutputFormat, RenderArgs};

/// Desired state for one reconciliation run, one table per module.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesiredState {
    #[serde(default)]
    pub firewall: Option<firewall::FirewallParams>,
    #[serde(default)]
    pub pbr: Option<pbr::PbrParams>,
}

pub fn run_apply(args: ApplyArgs) -> Result<()> {
    let state = load_state(&args.state)?;
    let running = parse_file(&args.datastore)
        .with_context(|| format!("failed to parse {}", args.datastore.display()))?;

    let mut session = CandidateSession::new(running);
    let mode = if args.check { Mode::Check } else { Mode::Apply };

    let mut changed = false;
    let mut diffs = Vec::new();

    if let Some(params) = &state.firewall {
        let result = firewall::run(&mut session, params, mode)
            .with_context(|| "firewall reconciliation failed")?;
        changed |= result.changed;
        diffs.extend(result.diff);
    }
    if let Some(params) = &state.pbr {
        let result =
            pbr::run(&mut session, params, mode).with_context(|| "pbr reconciliation failed")?;
        changed |= result.changed;
        diffs.extend(result.diff);
    }

    if changed && !args.check {
        write_file(session.running(), &args.datastore)
            .with_context(|| format!("failed to write {}", args.datastore.display()))?;
    }

    let result = TransactionResult {
        changed,
        diff: if diffs.is_empty() {
            None
        } else {
            Some(diffs.join("\n"))
        },
    };

    match args.format {
        OutputFormat::Text => {
            println!("changed={}", result.changed);
            if !args.quiet {
                if let Some(diff) = &result.diff {
                    println!("{}", render_diff(diff));
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}

pub fn run_render(args: RenderArgs) -> Result<()> {
    let state = load_state(&args.state)?;

    let mut requests = Vec::new();
    if let Some(params) = &state.firewall {
        requests.extend(firewall::build_requests(params)?);
    }
    if let Some(params) = &state.pbr {
        requests.extend(pbr::build_requests(params)?);
    }

    for request in &requests {
        println!("{}", payload::to_xml(request)?);
    }
    Ok(())
}

fn load_state(path: &Path) -> Result<DesiredState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
