//! Configuration management

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::defaults::{default_depot, DEFAULT_LOGS_DIR, DEFAULT_WINDOW_DAYS};
use redeploy::types::Coordinates;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Depot every contract is measured against
    pub depot: Coordinates,

    /// Maximum days between a predecessor's end and a contract's start
    pub window_days: u32,

    /// Directory for rolling log files
    pub logs_dir: String,

    /// Contract dataset used when `--input` is not given
    pub contracts_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fallback = default_depot();

        let lat = match lookup("DEPOT_LAT") {
            Some(raw) => parse_coordinate("DEPOT_LAT", &raw, 90.0)?,
            None => fallback.lat,
        };
        let lng = match lookup("DEPOT_LON") {
            Some(raw) => parse_coordinate("DEPOT_LON", &raw, 180.0)?,
            None => fallback.lng,
        };

        let window_days = match lookup("WINDOW_DAYS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("WINDOW_DAYS must be a non-negative integer, got '{}'", raw))?,
            None => DEFAULT_WINDOW_DAYS,
        };

        let logs_dir = lookup("LOGS_DIR").unwrap_or_else(|| DEFAULT_LOGS_DIR.to_string());

        let contracts_file = lookup("CONTRACTS_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            depot: Coordinates::new(lat, lng),
            window_days,
            logs_dir,
            contracts_file,
        })
    }
}

fn parse_coordinate(name: &str, raw: &str, limit: f64) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("{} must be a number, got '{}'", name, raw))?;

    if !value.is_finite() || value.abs() > limit {
        anyhow::bail!("{} must be within ±{} degrees, got {}", name, limit, value);
    }
    Ok(value)
}
