//! `chains` command

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::info;

use redeploy::services::chains::{enumerate_chains, summarize};
use redeploy::services::report::{annotate_records, round1, write_chains_csv};
use redeploy::{ChainMatcher, IngestReport, LinkGraph};

use super::{truncate, write_json, Settings};

pub fn handle_chains(
    records: &Map<String, Value>,
    report: IngestReport,
    settings: &Settings,
    output: Option<&Path>,
    chains_csv: Option<&Path>,
    top: usize,
) -> Result<()> {
    let graph = LinkGraph::build(report.contracts, &ChainMatcher::new(settings.window_days));
    let chains = enumerate_chains(&graph);
    let summary = summarize(&graph, &chains);

    if let Some(path) = output {
        let annotated = annotate_records(records, &graph)?;
        write_json(path, &annotated)?;
    }
    if let Some(path) = chains_csv {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_chains_csv(file, &chains, &graph)?;
        info!("Wrote {}", path.display());
    }

    println!("=== CHAIN LENGTH ANALYSIS ===");
    println!("Contracts analyzed: {}", graph.len());
    println!("Total chains found: {}", summary.total_chains);

    if chains.is_empty() {
        println!("No redeployment chains found with current parameters.");
        return Ok(());
    }

    println!("\n=== TOP {} LONGEST CHAINS ===", top.min(chains.len()));
    println!("{:<5} {:<7} {:<10} Chain (Contract IDs)", "Rank", "Length", "Savings");
    println!("{}", "-".repeat(80));
    for (i, chain) in chains.iter().take(top).enumerate() {
        println!(
            "{:<5} {:<7} {:<10} {}",
            i + 1,
            chain.len(),
            format!("{:.1} km", round1(chain.total_savings_km)),
            truncate(&chain.keys.join(" → "), 60)
        );
    }

    let longest = &chains[0];
    println!("\n=== LONGEST CHAIN (Length {}) ===", longest.len());
    for (i, key) in longest.keys.iter().enumerate() {
        if let Some(contract) = graph.get(key) {
            println!(
                "{}. {} ({}) - {}",
                i + 1,
                key,
                contract.start_day(),
                truncate(&contract.site_name, 30)
            );
        }
        if i + 1 < longest.len() {
            if let Some(link) = graph.successor(key) {
                println!("    ↓ saves {:.1} km", round1(link.savings_km));
            }
        }
    }

    println!("\n=== CHAIN LENGTH DISTRIBUTION ===");
    for (length, count) in summary.length_distribution.iter().rev() {
        println!("Length {}: {} chains", length, count);
    }

    println!("\n=== CONTRACT STATES ===");
    for (state, count) in &summary.state_counts {
        println!("{:<13} {}", state.as_str(), count);
    }

    println!("\n=== CHAIN IMPACT ===");
    println!("Contracts in chains: {}", summary.contracts_with_predecessor);
    println!("Total chain savings: {:.1} km", summary.total_savings_km);
    println!(
        "Average savings per chained contract: {:.1} km",
        summary.average_savings_km
    );

    Ok(())
}
