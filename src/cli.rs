//! CLI argument parsing for the redeploy binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "redeploy", about = "Site-to-site equipment redeployment analysis")]
pub struct Cli {
    /// Contract dataset: a JSON object keyed by contract key
    #[arg(long, short, global = true)]
    pub input: Option<PathBuf>,

    /// Override WINDOW_DAYS
    #[arg(long, global = true)]
    pub window_days: Option<u32>,

    /// Override DEPOT_LAT
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub depot_lat: Option<f64>,

    /// Override DEPOT_LON
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub depot_lon: Option<f64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build redeployment chains and report the longest ones
    Chains {
        /// Write the annotated record set (prev_contract / next_contract) here
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write chain members as CSV for mapping tools
        #[arg(long)]
        chains_csv: Option<PathBuf>,
        /// Number of chains to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Report contracts with more than one redeployment source
    Options {
        /// Write the multiple-options mapping as JSON here
        #[arg(long)]
        output: Option<PathBuf>,
        /// Number of contracts to print
        #[arg(long, default_value_t = 15)]
        top: usize,
    },
    /// List every eligible site-to-site move, best savings first
    Opportunities {
        /// Number of moves to print
        #[arg(long, default_value_t = 15)]
        top: usize,
    },
}
