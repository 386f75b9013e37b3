//! Predecessor / successor link graph
//!
//! Every contract gets at most one predecessor (its best source, see
//! [`ChainMatcher`]) and at most one successor. Successors are derived by
//! reversing predecessor links in contract order, and the first contract to
//! claim a predecessor keeps it: when several contracts pick the same
//! predecessor, only the earliest in order becomes its successor, regardless
//! of savings. The later ones keep their predecessor link but are not
//! reachable from it when walking chains.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::services::matcher::ChainMatcher;
use crate::types::{ChainState, Contract, ContractLink};

/// A contract together with its links
#[derive(Debug, Clone, Copy)]
pub struct AnnotatedContract<'a> {
    pub contract: &'a Contract,
    pub predecessor: Option<&'a ContractLink>,
    pub successor: Option<&'a ContractLink>,
}

impl AnnotatedContract<'_> {
    pub fn state(&self) -> ChainState {
        ChainState::from_links(self.predecessor.is_some(), self.successor.is_some())
    }
}

#[derive(Debug, Clone)]
pub struct LinkGraph {
    contracts: Vec<Contract>,
    index: HashMap<String, usize>,
    predecessors: HashMap<String, ContractLink>,
    successors: HashMap<String, ContractLink>,
}

impl LinkGraph {
    /// Compute every contract's best predecessor, then reverse-assign successors.
    ///
    /// `contracts` must already be in ingestion order (start date ascending);
    /// that order decides which contract becomes a shared predecessor's
    /// successor.
    /// Keys must be unique: a later contract reusing a key is dropped with a
    /// warning, since links are stored per key.
    pub fn build(contracts: Vec<Contract>, matcher: &ChainMatcher) -> Self {
        let contracts = unique_keys(contracts);

        // Order-preserving collect, so results line up with `contracts`
        let best: Vec<Option<ContractLink>> = contracts
            .par_iter()
            .map(|contract| matcher.best_predecessor(contract, &contracts))
            .collect();

        let index: HashMap<String, usize> = contracts
            .iter()
            .enumerate()
            .map(|(i, c)| (c.key.clone(), i))
            .collect();

        let mut predecessors = HashMap::new();
        let mut successors = HashMap::new();

        for (contract, link) in contracts.iter().zip(best) {
            let Some(link) = link else {
                continue;
            };

            if let Entry::Vacant(slot) = successors.entry(link.contract_key.clone()) {
                slot.insert(ContractLink {
                    contract_key: contract.key.clone(),
                    site_name: contract.site_name.clone(),
                    date: contract.start_day(),
                    days_gap: link.days_gap,
                    site_to_site_km: link.site_to_site_km,
                    savings_km: link.savings_km,
                    savings_percentage: link.savings_percentage,
                });
            }
            predecessors.insert(contract.key.clone(), link);
        }

        info!(
            "Link graph built: {} contracts, {} predecessor links, {} successor links (window {} days)",
            contracts.len(),
            predecessors.len(),
            successors.len(),
            matcher.window_days()
        );

        Self {
            contracts,
            index,
            predecessors,
            successors,
        }
    }

    /// Contracts in ingestion order
    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Contract> {
        self.index.get(key).map(|&i| &self.contracts[i])
    }

    pub fn predecessor(&self, key: &str) -> Option<&ContractLink> {
        self.predecessors.get(key)
    }

    pub fn successor(&self, key: &str) -> Option<&ContractLink> {
        self.successors.get(key)
    }

    pub fn predecessor_count(&self) -> usize {
        self.predecessors.len()
    }

    pub fn successor_count(&self) -> usize {
        self.successors.len()
    }

    /// `None` for keys not in the graph
    pub fn state(&self, key: &str) -> Option<ChainState> {
        self.get(key).map(|_| {
            ChainState::from_links(
                self.predecessors.contains_key(key),
                self.successors.contains_key(key),
            )
        })
    }

    pub fn state_counts(&self) -> BTreeMap<ChainState, usize> {
        let mut counts = BTreeMap::new();
        for annotated in self.annotated() {
            *counts.entry(annotated.state()).or_insert(0) += 1;
        }
        counts
    }

    /// Contracts with their links, in ingestion order
    pub fn annotated(&self) -> impl Iterator<Item = AnnotatedContract<'_>> + '_ {
        self.contracts.iter().map(move |contract| AnnotatedContract {
            contract,
            predecessor: self.predecessors.get(&contract.key),
            successor: self.successors.get(&contract.key),
        })
    }
}

fn unique_keys(contracts: Vec<Contract>) -> Vec<Contract> {
    let mut seen = HashSet::new();
    contracts
        .into_iter()
        .filter(|contract| {
            let fresh = seen.insert(contract.key.clone());
            if !fresh {
                warn!("Duplicate contract key {}, keeping the first", contract.key);
            }
            fresh
        })
        .collect()
}
