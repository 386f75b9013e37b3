//! Output shaping for downstream reporting
//!
//! Everything leaving the engine is rounded to one decimal here; internal
//! values stay exact.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::services::link_graph::LinkGraph;
use crate::types::{Chain, ContractLink, OptionSet};

/// Round to one decimal on the exact stored value, so 0.35 (stored just
/// below) becomes 0.3.
pub fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// `prev_contract` as attached to an annotated record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrevContract {
    pub contract_key: String,
    pub site_name: String,
    pub end_date: NaiveDate,
    pub days_gap: i64,
    pub site_to_site_km: f64,
    pub savings_km: f64,
    pub savings_percentage: f64,
}

impl From<&ContractLink> for PrevContract {
    fn from(link: &ContractLink) -> Self {
        Self {
            contract_key: link.contract_key.clone(),
            site_name: link.site_name.clone(),
            end_date: link.date,
            days_gap: link.days_gap,
            site_to_site_km: round1(link.site_to_site_km),
            savings_km: round1(link.savings_km),
            savings_percentage: round1(link.savings_percentage),
        }
    }
}

/// `next_contract` as attached to an annotated record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextContract {
    pub contract_key: String,
    pub site_name: String,
    pub start_date: NaiveDate,
    pub days_gap: i64,
    pub site_to_site_km: f64,
    pub savings_km: f64,
    pub savings_percentage: f64,
}

impl From<&ContractLink> for NextContract {
    fn from(link: &ContractLink) -> Self {
        Self {
            contract_key: link.contract_key.clone(),
            site_name: link.site_name.clone(),
            start_date: link.date,
            days_gap: link.days_gap,
            site_to_site_km: round1(link.site_to_site_km),
            savings_km: round1(link.savings_km),
            savings_percentage: round1(link.savings_percentage),
        }
    }
}

/// Copy each ingested record and attach its links.
///
/// Output keeps the graph's order (start date ascending). Records that were
/// rejected at ingestion are not part of the graph and are left out.
pub fn annotate_records(records: &Map<String, Value>, graph: &LinkGraph) -> Result<Map<String, Value>> {
    let mut annotated = Map::new();

    for entry in graph.annotated() {
        let key = &entry.contract.key;
        let mut record = match records.get(key) {
            Some(Value::Object(fields)) => fields.clone(),
            _ => Map::new(),
        };

        record.insert(
            "prev_contract".to_string(),
            serde_json::to_value(entry.predecessor.map(PrevContract::from))?,
        );
        record.insert(
            "next_contract".to_string(),
            serde_json::to_value(entry.successor.map(NextContract::from))?,
        );
        annotated.insert(key.clone(), Value::Object(record));
    }

    Ok(annotated)
}

/// One chain as written to JSON reports
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReport {
    pub rank: usize,
    pub length: usize,
    pub contracts: Vec<String>,
    pub total_savings_km: f64,
}

pub fn chain_reports(chains: &[Chain]) -> Vec<ChainReport> {
    chains
        .iter()
        .enumerate()
        .map(|(i, chain)| ChainReport {
            rank: i + 1,
            length: chain.len(),
            contracts: chain.keys.clone(),
            total_savings_km: round1(chain.total_savings_km),
        })
        .collect()
}

/// One entry of an option set's `options` list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionReport {
    pub previous_contract: String,
    pub previous_site: String,
    pub previous_end: NaiveDate,
    pub days_gap: i64,
    pub site_to_site_km: f64,
    pub potential_savings_km: f64,
    pub savings_percentage: f64,
}

impl From<&ContractLink> for OptionReport {
    fn from(link: &ContractLink) -> Self {
        Self {
            previous_contract: link.contract_key.clone(),
            previous_site: link.site_name.clone(),
            previous_end: link.date,
            days_gap: link.days_gap,
            site_to_site_km: round1(link.site_to_site_km),
            potential_savings_km: round1(link.savings_km),
            savings_percentage: round1(link.savings_percentage),
        }
    }
}

/// One option set as written to JSON reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSetReport {
    pub current_contract: String,
    pub current_site: String,
    pub current_start: NaiveDate,
    pub depot_distance_km: f64,
    pub num_options: usize,
    pub options: Vec<OptionReport>,
}

impl From<&OptionSet> for OptionSetReport {
    fn from(set: &OptionSet) -> Self {
        Self {
            current_contract: set.contract_key.clone(),
            current_site: set.site_name.clone(),
            current_start: set.start_date,
            depot_distance_km: round1(set.depot_distance_km),
            num_options: set.num_options(),
            options: set.options.iter().map(OptionReport::from).collect(),
        }
    }
}

/// Contract key -> option set report, preserving the order of `sets`
pub fn option_reports(sets: &[OptionSet]) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for set in sets {
        out.insert(
            set.contract_key.clone(),
            serde_json::to_value(OptionSetReport::from(set))?,
        );
    }
    Ok(out)
}

#[derive(Debug, Serialize)]
struct ChainCsvRow<'a> {
    chain_rank: usize,
    chain_length: usize,
    order: usize,
    contract: &'a str,
    latitude: f64,
    longitude: f64,
    site_name: &'a str,
    start_date: NaiveDate,
    savings_km: f64,
}

/// Write one CSV row per chain member, for mapping tools.
///
/// `savings_km` is the saving of the hop out of that contract, 0 for the last.
pub fn write_chains_csv<W: Write>(writer: W, chains: &[Chain], graph: &LinkGraph) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    for (rank, chain) in chains.iter().enumerate() {
        for (order, key) in chain.keys.iter().enumerate() {
            let Some(contract) = graph.get(key) else {
                continue;
            };
            let is_last = order + 1 == chain.len();
            let savings_km = match graph.successor(key) {
                Some(link) if !is_last => round1(link.savings_km),
                _ => 0.0,
            };

            csv.serialize(ChainCsvRow {
                chain_rank: rank + 1,
                chain_length: chain.len(),
                order: order + 1,
                contract: key,
                latitude: contract.location.lat,
                longitude: contract.location.lng,
                site_name: &contract.site_name,
                start_date: contract.start_day(),
                savings_km,
            })?;
        }
    }

    csv.flush()?;
    Ok(())
}
