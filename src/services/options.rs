//! Redeployment options analysis
//!
//! Read-only sibling of [`ChainMatcher::best_predecessor`]: same eligibility
//! rule, but every eligible predecessor is kept. Options are ranked by savings
//! with a stable sort, so the first option is exactly the matcher's pick.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::services::matcher::ChainMatcher;
use crate::types::{Contract, ContractLink, OptionSet, Opportunity, OptionsSummary};

#[derive(Debug, Clone, Copy)]
pub struct OptionsAnalyzer {
    matcher: ChainMatcher,
}

impl OptionsAnalyzer {
    pub fn new(window_days: u32) -> Self {
        Self {
            matcher: ChainMatcher::new(window_days),
        }
    }

    /// Every eligible predecessor for `contract`, savings descending
    pub fn all_options(&self, contract: &Contract, all: &[Contract]) -> Vec<ContractLink> {
        let mut options: Vec<ContractLink> = all
            .iter()
            .filter_map(|previous| self.matcher.candidate(contract, previous))
            .collect();
        options.sort_by(|a, b| b.savings_km.total_cmp(&a.savings_km));
        options
    }

    /// Option sets for every contract, in contract order
    pub fn analyze(&self, contracts: &[Contract]) -> Vec<OptionSet> {
        contracts
            .par_iter()
            .map(|contract| OptionSet {
                contract_key: contract.key.clone(),
                site_name: contract.site_name.clone(),
                start_date: contract.start_day(),
                depot_distance_km: contract.distance_to_depot_km,
                options: self.all_options(contract, contracts),
            })
            .collect()
    }

    /// Contracts with two or more options, most options first
    pub fn multiple_options(&self, contracts: &[Contract]) -> Vec<OptionSet> {
        let mut sets: Vec<OptionSet> = self
            .analyze(contracts)
            .into_iter()
            .filter(OptionSet::has_multiple_options)
            .collect();
        sets.sort_by(|a, b| b.num_options().cmp(&a.num_options()));
        sets
    }

    /// Every eligible pair across all contracts, savings descending
    pub fn opportunities(&self, contracts: &[Contract]) -> Vec<Opportunity> {
        let mut opportunities: Vec<Opportunity> = self
            .analyze(contracts)
            .into_iter()
            .flat_map(|set| {
                let OptionSet {
                    contract_key,
                    site_name,
                    start_date,
                    depot_distance_km,
                    options,
                } = set;
                options.into_iter().map(move |previous| Opportunity {
                    contract_key: contract_key.clone(),
                    site_name: site_name.clone(),
                    start_date,
                    depot_to_site_km: depot_distance_km,
                    previous,
                })
            })
            .collect();
        opportunities.sort_by(|a, b| b.previous.savings_km.total_cmp(&a.previous.savings_km));
        opportunities
    }
}

/// Statistics over sets that each have two or more options
pub fn summarize(sets: &[OptionSet]) -> OptionsSummary {
    let multiple: Vec<&OptionSet> = sets.iter().filter(|s| s.has_multiple_options()).collect();

    let mut option_count_distribution = BTreeMap::new();
    for set in &multiple {
        *option_count_distribution.entry(set.num_options()).or_insert(0) += 1;
    }

    let total_options: usize = multiple.iter().map(|s| s.num_options()).sum();
    let average_options = if multiple.is_empty() {
        0.0
    } else {
        total_options as f64 / multiple.len() as f64
    };

    OptionsSummary {
        contracts_with_multiple_options: multiple.len(),
        total_options,
        average_options,
        max_options: multiple.iter().map(|s| s.num_options()).max().unwrap_or(0),
        option_count_distribution,
    }
}
