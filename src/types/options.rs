//! Redeployment option types

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::ContractLink;

/// Every eligible predecessor for one contract, best savings first
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSet {
    pub contract_key: String,
    pub site_name: String,
    pub start_date: NaiveDate,
    pub depot_distance_km: f64,
    pub options: Vec<ContractLink>,
}

impl OptionSet {
    pub fn num_options(&self) -> usize {
        self.options.len()
    }

    pub fn has_multiple_options(&self) -> bool {
        self.options.len() >= 2
    }

    pub fn best(&self) -> Option<&ContractLink> {
        self.options.first()
    }
}

/// A single eligible (contract, predecessor) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub contract_key: String,
    pub site_name: String,
    pub start_date: NaiveDate,
    pub depot_to_site_km: f64,
    pub previous: ContractLink,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsSummary {
    pub contracts_with_multiple_options: usize,
    pub total_options: usize,
    pub average_options: f64,
    pub max_options: usize,
    /// Option count -> number of contracts with that many options
    pub option_count_distribution: BTreeMap<usize, usize>,
}
