use std::fs::{read_to_string, write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

mod coerce;
mod continent;
mod error;
mod geonames;
mod merge;
mod record;
mod schema;
mod utils;

use geonames::{Client, ResponseCache};

#[derive(Debug, Parser)]
struct Cli {
    /// Geonames service account.
    #[arg(long, default_value = "roradmin")]
    username: String,

    /// Look up this geonames id instead of the stored one. Only valid for a
    /// single-record file, since it would override every record in a batch.
    #[arg(long)]
    alt_id: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Update legacy records (single primary address).
    Addresses { path: String },
    /// Update v2 records (list of locations).
    Locations { path: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (path, v2) = match &cli.command {
        Command::Addresses { path } => (path.clone(), false),
        Command::Locations { path } => (path.clone(), true),
    };

    let mut records: Vec<Value> = serde_json::from_str(
        &read_to_string(&path).with_context(|| format!("failed to read {path}"))?,
    )?;

    check_alt_id(cli.alt_id, records.len())?;

    let client = Client::new(&cli.username);
    let mut cache = ResponseCache::new();

    eprintln!("Updating {} records...", records.len());
    let bar = utils::progress_bar(records.len() as u64);
    let mut failures = Vec::new();
    for (i, record) in records.iter_mut().enumerate() {
        let result = if v2 {
            record::update_locations(record, &client, &mut cache)
        } else {
            record::update_address(record, &client, &mut cache, cli.alt_id)
        };
        // failed records are left exactly as they were read
        if let Err(err) = result {
            failures.push((i, err));
        }
        bar.inc(1);
    }
    bar.finish();

    let mut output = serde_json::to_string_pretty(&records)?;
    output.push('\n');
    write(&path, output).with_context(|| format!("failed to write {path}"))?;

    if !failures.is_empty() {
        for (i, err) in &failures {
            eprintln!("- record {i}: {err}");
        }
        bail!("{} of {} records failed", failures.len(), records.len());
    }

    Ok(())
}

fn check_alt_id(alt_id: Option<u64>, records: usize) -> Result<()> {
    if alt_id.is_some() && records > 1 {
        bail!("--alt-id overrides every record's geonames id; use it with a single-record file");
    }
    Ok(())
}
