//! `options` and `opportunities` commands

use std::path::Path;

use anyhow::Result;

use redeploy::services::options::summarize;
use redeploy::services::report::{option_reports, round1};
use redeploy::{IngestReport, OptionsAnalyzer};

use super::{truncate, write_json, Settings};

pub fn handle_options(
    report: &IngestReport,
    settings: &Settings,
    output: Option<&Path>,
    top: usize,
) -> Result<()> {
    let analyzer = OptionsAnalyzer::new(settings.window_days);
    let multiple = analyzer.multiple_options(&report.contracts);
    let summary = summarize(&multiple);

    if let Some(path) = output {
        write_json(path, &option_reports(&multiple)?)?;
    }

    println!("=== MULTIPLE EQUIPMENT OPTIONS ANALYSIS ===");
    println!(
        "Found {} contracts with multiple equipment options",
        summary.contracts_with_multiple_options
    );

    let Some(example) = multiple.first() else {
        println!("No contracts found with multiple equipment options.");
        return Ok(());
    };

    println!("\n=== CONTRACTS WITH MOST OPTIONS ===");
    println!(
        "{:<12} {:<25} {:<12} {:<8} Best Savings",
        "Contract", "Site", "Start Date", "Options"
    );
    println!("{}", "-".repeat(80));
    for set in multiple.iter().take(top) {
        let best = set.best().map(|o| round1(o.savings_km)).unwrap_or(0.0);
        println!(
            "{:<12} {:<25} {:<12} {:<8} {:.1} km",
            set.contract_key,
            truncate(&set.site_name, 24),
            set.start_date.to_string(),
            set.num_options(),
            best
        );
    }

    println!("\n=== DETAILED EXAMPLE: {} ===", example.contract_key);
    println!("Site: {}", example.site_name);
    println!("Start Date: {}", example.start_date);
    println!("Depot Distance: {:.1} km", example.depot_distance_km);
    println!(
        "{:<5} {:<12} {:<9} {:<10} {:<8} %",
        "Rank", "From", "Days Gap", "Distance", "Savings"
    );
    println!("{}", "-".repeat(60));
    for (i, option) in example.options.iter().take(10).enumerate() {
        println!(
            "{:<5} {:<12} {:<9} {:<10.1} {:<8.1} {:.1}%",
            i + 1,
            option.contract_key,
            option.days_gap,
            option.site_to_site_km,
            option.savings_km,
            option.savings_percentage
        );
    }

    println!("\n=== SUMMARY STATISTICS ===");
    println!(
        "Contracts with multiple options: {}",
        summary.contracts_with_multiple_options
    );
    println!("Total equipment options available: {}", summary.total_options);
    println!("Average options per contract: {:.1}", summary.average_options);
    println!("Maximum options for single contract: {}", summary.max_options);
    println!("\nOption Count Distribution:");
    for (count, contracts) in &summary.option_count_distribution {
        println!("  {} options: {} contracts", count, contracts);
    }

    Ok(())
}

pub fn handle_opportunities(report: &IngestReport, settings: &Settings, top: usize) -> Result<()> {
    let opportunities = OptionsAnalyzer::new(settings.window_days).opportunities(&report.contracts);

    println!("=== EQUIPMENT SITE-TO-SITE OPTIMIZATION ===");
    println!("Found {} optimization opportunities", opportunities.len());

    if opportunities.is_empty() {
        println!("No optimization opportunities found with current parameters.");
        return Ok(());
    }

    println!(
        "\n{:<12} {:<12} {:<4} {:<10} {:<10} {:<8} %",
        "Contract", "Previous", "Gap", "Site-Site", "Depot-Site", "Savings"
    );
    println!("{}", "-".repeat(70));
    for opp in opportunities.iter().take(top) {
        println!(
            "{:<12} {:<12} {:<4} {:<10.1} {:<10.1} {:<8.1} {:.1}%",
            opp.contract_key,
            opp.previous.contract_key,
            format!("{}d", opp.previous.days_gap),
            opp.previous.site_to_site_km,
            opp.depot_to_site_km,
            opp.previous.savings_km,
            opp.previous.savings_percentage
        );
    }

    let total: f64 = opportunities.iter().map(|o| o.previous.savings_km).sum();
    println!("\nTotal potential savings: {:.1} km", total);
    println!(
        "Average savings per opportunity: {:.1} km",
        total / opportunities.len() as f64
    );

    Ok(())
}
