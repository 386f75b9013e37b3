//! Command handlers

pub mod chains;
pub mod options;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use redeploy::types::Coordinates;
use redeploy::{ContractIndex, IngestReport};

use crate::cli::{Cli, Command};
use crate::config::Config;

/// Effective settings after CLI flags override the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    pub depot: Coordinates,
    pub window_days: u32,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let input = cli
            .input
            .clone()
            .or_else(|| config.contracts_file.clone())
            .context("No contract dataset given: pass --input or set CONTRACTS_FILE")?;

        Ok(Self {
            input,
            depot: Coordinates::new(
                cli.depot_lat.unwrap_or(config.depot.lat),
                cli.depot_lon.unwrap_or(config.depot.lng),
            ),
            window_days: cli.window_days.unwrap_or(config.window_days),
        })
    }
}

/// Run the selected command
pub fn run(cli: Cli, config: &Config) -> Result<()> {
    let settings = Settings::resolve(&cli, config)?;
    info!(
        "Analyzing {} (depot {:.4}, {:.4}; window {} days)",
        settings.input.display(),
        settings.depot.lat,
        settings.depot.lng,
        settings.window_days
    );

    let records = load_records(&settings.input)?;
    let report = ingest(&records, settings.depot);

    match cli.command {
        Command::Chains {
            output,
            chains_csv,
            top,
        } => chains::handle_chains(
            &records,
            report,
            &settings,
            output.as_deref(),
            chains_csv.as_deref(),
            top,
        ),
        Command::Options { output, top } => {
            options::handle_options(&report, &settings, output.as_deref(), top)
        }
        Command::Opportunities { top } => options::handle_opportunities(&report, &settings, top),
    }
}

/// Read a dataset file: a JSON object keyed by contract key
pub fn load_records(path: &Path) -> Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;

    match value {
        Value::Object(records) => {
            info!("Loaded {} raw records from {}", records.len(), path.display());
            Ok(records)
        }
        _ => anyhow::bail!(
            "{} must contain a JSON object keyed by contract key",
            path.display()
        ),
    }
}

fn ingest(records: &Map<String, Value>, depot: Coordinates) -> IngestReport {
    let report = ContractIndex::new(depot).ingest(records);
    for (kind, count) in report.rejected_by_kind() {
        warn!("Excluded {} records: {}", count, kind);
    }
    report
}

/// Pretty-print `value` as JSON to `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Shorten `text` to `width` characters for table output
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width.saturating_sub(3)).collect();
        short.push_str("...");
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn test_settings_cli_overrides_config() {
        let cli = Cli::parse_from([
            "redeploy",
            "--input",
            "c.json",
            "--window-days",
            "3",
            "--depot-lon",
            "144.9",
            "opportunities",
        ]);
        let settings = Settings::resolve(&cli, &config()).unwrap();
        assert_eq!(settings.input, PathBuf::from("c.json"));
        assert_eq!(settings.window_days, 3);
        assert_eq!(settings.depot, Coordinates::new(-37.6805, 144.9));
    }

    #[test]
    fn test_settings_requires_input() {
        let cli = Cli::parse_from(["redeploy", "chains"]);
        assert!(Settings::resolve(&cli, &config()).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Princes Highway West", 10), "Princes...");
    }
}
